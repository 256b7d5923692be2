use thiserror::Error;

/// The one message the UI ever shows for a failed dispatch cycle.
pub const BACKEND_ERROR_MESSAGE: &str = "Error fetching AI response. Please try again later.";

/// Everything that can go wrong in an interaction, as the controller sees it.
/// Backend kinds collapse to one user-visible message; the rest are log-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InteractionError {
    #[error("empty submission")]
    InputInvalid,
    #[error("backend unreachable")]
    BackendUnreachable,
    #[error("backend rejected the request")]
    BackendRejected,
    #[error("backend request timed out")]
    BackendTimeout,
    #[error("response body matched no known shape")]
    ResponseMalformed,
    #[error("voice capture unavailable")]
    VoiceUnavailable,
    #[error("voice session ended without a transcript")]
    VoiceNoResult,
}

impl InteractionError {
    /// Whether this kind reaches the interaction state at all.
    pub fn is_surfaced(&self) -> bool {
        matches!(
            self,
            InteractionError::BackendUnreachable
                | InteractionError::BackendRejected
                | InteractionError::BackendTimeout
                | InteractionError::ResponseMalformed
        )
    }

    pub fn user_message(&self) -> Option<&'static str> {
        if self.is_surfaced() {
            Some(BACKEND_ERROR_MESSAGE)
        } else {
            None
        }
    }
}

/// Failures talking to the backend collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("backend request timed out")]
    Timeout,

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("not a PDF document: {0}")]
    NotPdf(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl BackendError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Unreachable(err.to_string())
        }
    }

    pub fn kind(&self) -> InteractionError {
        match self {
            BackendError::Rejected { .. } => InteractionError::BackendRejected,
            BackendError::Timeout => InteractionError::BackendTimeout,
            BackendError::Decode(_) => InteractionError::ResponseMalformed,
            BackendError::Unreachable(_)
            | BackendError::NotPdf(_)
            | BackendError::Io(_)
            | BackendError::Client(_) => InteractionError::BackendUnreachable,
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        BackendError::Io(e.to_string())
    }
}

/// Failures of the platform speech capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("speech recognition unavailable: {0}")]
    Unavailable(String),

    #[error("failed to spawn recognizer: {0}")]
    Spawn(String),
}

impl VoiceError {
    pub fn kind(&self) -> InteractionError {
        InteractionError::VoiceUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kinds_share_one_message() {
        let errors = [
            BackendError::Unreachable("refused".into()),
            BackendError::Rejected { status: 502, body: "bad gateway".into() },
            BackendError::Timeout,
            BackendError::Decode("eof".into()),
        ];
        for err in errors {
            assert_eq!(err.kind().user_message(), Some(BACKEND_ERROR_MESSAGE));
        }
    }

    #[test]
    fn test_voice_and_input_kinds_are_not_surfaced() {
        assert!(!InteractionError::InputInvalid.is_surfaced());
        assert!(!InteractionError::VoiceUnavailable.is_surfaced());
        assert!(!InteractionError::VoiceNoResult.is_surfaced());
        assert_eq!(VoiceError::Unavailable("no command".into()).kind().user_message(), None);
    }
}
