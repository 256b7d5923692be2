use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an uploaded reference document, as the backend lists it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    pub timestamp: String,
    pub value: f64,
}

impl TelemetryPoint {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self { timestamp: timestamp.into(), value }
    }
}

/// Samples in the order the backend sent them. Never re-sorted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TelemetrySeries(Vec<TelemetryPoint>);

impl TelemetrySeries {
    pub fn points(&self) -> &[TelemetryPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TelemetryPoint> {
        self.0.iter()
    }
}

impl From<Vec<TelemetryPoint>> for TelemetrySeries {
    fn from(points: Vec<TelemetryPoint>) -> Self {
        Self(points)
    }
}

/// Outbound body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEnvelope {
    pub user_input: String,
    #[serde(rename = "selected_xml", skip_serializing_if = "Option::is_none")]
    pub selected_reference: Option<ReferenceId>,
    pub model: String,
    #[serde(rename = "max_tokens_to_sample")]
    pub max_tokens: u32,
}

/// The `response` object of a chat reply. Both fields are optional on the wire;
/// telemetry is kept undecoded so the classifier can tell "absent" from "malformed".
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ResponsePayload {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub telemetry: Option<serde_json::Value>,
}

impl ResponsePayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), telemetry: None }
    }

    pub fn telemetry(points: &[TelemetryPoint]) -> Self {
        Self {
            text: None,
            telemetry: serde_json::to_value(points).ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    #[serde(default)]
    pub response: Option<ResponsePayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReferenceList {
    pub xml_files: Vec<ReferenceId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_omits_absent_reference() {
        let envelope = RequestEnvelope {
            user_input: "How do I start the pump?".into(),
            selected_reference: None,
            model: "claude-v1".into(),
            max_tokens: 300,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "user_input": "How do I start the pump?",
                "model": "claude-v1",
                "max_tokens_to_sample": 300
            })
        );
    }

    #[test]
    fn test_envelope_names_reference_selected_xml() {
        let envelope = RequestEnvelope {
            user_input: "Where is the valve?".into(),
            selected_reference: Some(ReferenceId::new("pump_manual.xml")),
            model: "claude-v1".into(),
            max_tokens: 300,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["selected_xml"], json!("pump_manual.xml"));
    }

    #[test]
    fn test_reply_without_response_field() {
        let reply: ChatReply = serde_json::from_str(r#"{"error": "nope"}"#).unwrap();
        assert!(reply.response.is_none());
    }
}
