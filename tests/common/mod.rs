#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use guided_ops::error::{BackendError, VoiceError};
use guided_ops::kernel::controller::DispatchSettings;
use guided_ops::kernel::event::Event;
use guided_ops::services::backend::{Backend, RequestEnvelope, ResponsePayload};
use guided_ops::speech::{CommandRecognizer, RecognitionEvent, SessionId, SpeechCapability};
use guided_ops::Reactor;

/// Backend that replays canned replies and records every envelope it receives.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ResponsePayload, BackendError>>>,
    requests: Mutex<Vec<RequestEnvelope>>,
    hang: bool,
}

impl ScriptedBackend {
    pub fn replying(replies: Vec<Result<ResponsePayload, BackendError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    /// Never answers, like a stuck backend.
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            hang: true,
            ..Default::default()
        })
    }

    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponsePayload, BackendError> {
        self.requests.lock().unwrap().push(envelope.clone());
        if self.hang {
            std::future::pending::<()>().await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(ResponsePayload::default()))
    }
}

/// Speech capability driven by the test through a `VoiceScript` handle.
#[derive(Clone, Default)]
pub struct ScriptedCapability {
    session: Arc<Mutex<Option<(SessionId, mpsc::Sender<RecognitionEvent>)>>>,
    unavailable: bool,
}

impl ScriptedCapability {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn is_listening(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    /// Replays a recognized utterance followed by the end of the session.
    pub async fn say(&self, transcript: &str) {
        let current = self.session.lock().unwrap().take();
        if let Some((session, tx)) = current {
            tx.send(RecognitionEvent::Result { session, transcript: transcript.to_string() })
                .await
                .unwrap();
            tx.send(RecognitionEvent::End { session }).await.unwrap();
        }
    }

    /// Ends the session without hearing anything.
    pub async fn silence(&self) {
        let current = self.session.lock().unwrap().take();
        if let Some((session, tx)) = current {
            tx.send(RecognitionEvent::End { session }).await.unwrap();
        }
    }
}

impl SpeechCapability for ScriptedCapability {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn start(
        &mut self,
        session: SessionId,
        events: mpsc::Sender<RecognitionEvent>,
    ) -> Result<(), VoiceError> {
        *self.session.lock().unwrap() = Some((session, events));
        Ok(())
    }

    fn stop(&mut self) {
        self.session.lock().unwrap().take();
    }
}

pub fn reactor_with<C: SpeechCapability>(backend: Arc<ScriptedBackend>, capability: C) -> Reactor<C> {
    let (tx, rx) = mpsc::channel(100);
    Reactor::new(rx, tx, backend, capability, DispatchSettings::default())
}

pub fn text_reactor(backend: Arc<ScriptedBackend>) -> Reactor<CommandRecognizer> {
    reactor_with(backend, CommandRecognizer::new(None, "en-US"))
}

/// Waits for the next event and feeds it through the reactor.
pub async fn settle<C: SpeechCapability>(reactor: &mut Reactor<C>) -> Event {
    let event = tokio::time::timeout(Duration::from_secs(2), reactor.next_event())
        .await
        .expect("event within 2s")
        .expect("channel open");
    reactor.process(event.clone());
    event
}
