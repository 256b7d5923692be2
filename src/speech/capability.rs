use tokio::sync::mpsc;

use crate::error::VoiceError;

/// Tags every callback with the capture session that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(&self) -> Self {
        SessionId(self.0 + 1)
    }
}

/// Inbound callbacks from the platform recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Result { session: SessionId, transcript: String },
    /// Session over. May follow a `Result`, or arrive alone when nothing was heard.
    End { session: SessionId },
}

impl RecognitionEvent {
    pub fn session(&self) -> SessionId {
        match self {
            RecognitionEvent::Result { session, .. } | RecognitionEvent::End { session } => *session,
        }
    }
}

/// Narrow contract over a platform speech-to-text engine.
/// Non-continuous: one `start` yields at most one `Result`, then `End`.
pub trait SpeechCapability: Send {
    fn is_available(&self) -> bool;

    fn start(
        &mut self,
        session: SessionId,
        events: mpsc::Sender<RecognitionEvent>,
    ) -> Result<(), VoiceError>;

    fn stop(&mut self);
}
