use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::capability::{RecognitionEvent, SessionId, SpeechCapability};
use crate::error::InteractionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Inactive,
    Capturing,
}

/// Two-state machine guarding the single underlying capture session.
/// Created once per session lifetime and reused for every capture.
pub struct SpeechCaptureAdapter<C: SpeechCapability> {
    capability: C,
    state: CaptureState,
    session: SessionId,
    events: mpsc::Sender<RecognitionEvent>,
}

impl<C: SpeechCapability> SpeechCaptureAdapter<C> {
    pub fn new(capability: C, events: mpsc::Sender<RecognitionEvent>) -> Self {
        Self {
            capability,
            state: CaptureState::Inactive,
            session: SessionId::default(),
            events,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    /// Returns whether a new session began. Unavailability is logged, never raised.
    pub fn start(&mut self) -> bool {
        if self.is_capturing() {
            debug!("Capture already running");
            return false;
        }
        if !self.capability.is_available() {
            warn!("{}: no recognizer configured", InteractionError::VoiceUnavailable);
            return false;
        }

        let session = self.session.next();
        match self.capability.start(session, self.events.clone()) {
            Ok(()) => {
                self.session = session;
                self.state = CaptureState::Capturing;
                info!(session = session.0, "Listening");
                true
            }
            Err(e) => {
                warn!("{}: {}", InteractionError::VoiceUnavailable, e);
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if !self.is_capturing() {
            return;
        }
        self.capability.stop();
        self.state = CaptureState::Inactive;
        info!(session = self.session.0, "Stopped listening");
    }

    pub fn toggle(&mut self) {
        if self.is_capturing() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Consumes a recognizer callback. Returns the transcript to hand to the
    /// listener, if this event completed the current session with one.
    pub fn on_event(&mut self, event: RecognitionEvent) -> Option<String> {
        if !self.is_capturing() || event.session() != self.session {
            debug!(session = event.session().0, "Dropping event outside the current session");
            return None;
        }
        self.state = CaptureState::Inactive;

        match event {
            RecognitionEvent::Result { transcript, .. } if !transcript.trim().is_empty() => {
                Some(transcript)
            }
            _ => {
                info!("{}", InteractionError::VoiceNoResult);
                None
            }
        }
    }
}
