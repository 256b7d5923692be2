use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use tracing::{debug, warn};

use super::types::{ChatReply, ReferenceId, ReferenceList, RequestEnvelope, ResponsePayload};
use crate::config::Config;
use crate::error::BackendError;

pub const CHAT_PATH: &str = "/api/chat";
pub const LIST_PATH: &str = "/api/list_xml_files";
pub const UPLOAD_PATH: &str = "/api/process_pdf";

/// The one request contract the interaction loop depends on.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponsePayload, BackendError>;
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Names of the reference documents the backend can scope answers to.
    pub async fn list_references(&self) -> Result<Vec<ReferenceId>, BackendError> {
        let response = self
            .client
            .get(self.endpoint(LIST_PATH))
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(BackendError::from_transport)?;
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let list: ReferenceList =
            serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(list.xml_files)
    }

    /// Uploads a PDF for the backend to turn into a reference document.
    pub async fn upload_document(&self, path: &Path) -> Result<(), BackendError> {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(BackendError::NotPdf(path.display().to_string()));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| BackendError::Client(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected { status: status.as_u16(), body });
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponsePayload, BackendError> {
        let response = self
            .client
            .post(self.endpoint(CHAT_PATH))
            .json(envelope)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(BackendError::from_transport)?;

        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!(bytes = body.len(), "chat reply received");
        Ok(decode_reply(&body))
    }
}

/// Unparsable bodies decode to an empty payload; the classifier reports them.
pub fn decode_reply(body: &[u8]) -> ResponsePayload {
    match serde_json::from_slice::<ChatReply>(body) {
        Ok(reply) => reply.response.unwrap_or_default(),
        Err(e) => {
            warn!("Chat reply did not parse: {}", e);
            ResponsePayload::default()
        }
    }
}
