use crate::services::backend::{ResponsePayload, TelemetryPoint, TelemetrySeries};

/// What a chat reply carries, decided once so nothing downstream probes fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Telemetry(TelemetrySeries),
    Text(String),
    Invalid,
}

/// PURE FUNCTION: Payload -> Classification.
/// Telemetry wins over text. A telemetry field that is present but empty or
/// malformed makes the whole reply `Invalid`, even if text is also present.
pub fn classify(payload: &ResponsePayload) -> Classification {
    if let Some(raw) = &payload.telemetry {
        return match serde_json::from_value::<Vec<TelemetryPoint>>(raw.clone()) {
            Ok(points) if !points.is_empty() => Classification::Telemetry(points.into()),
            _ => Classification::Invalid,
        };
    }

    match &payload.text {
        Some(text) => Classification::Text(text.clone()),
        None => Classification::Invalid,
    }
}
