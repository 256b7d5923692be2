use std::fmt;
use uuid::Uuid;

use crate::error::BackendError;
use crate::services::backend::{ReferenceId, ResponsePayload};
use crate::speech::capability::RecognitionEvent;

/// Identifies one dispatch cycle. Outcomes carrying any other id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleId(Uuid);

impl CycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// User actions (keys, clicks, selections)
    Input(InputEvent),
    /// Speech capability callbacks
    Recognition(RecognitionEvent),
    /// A dispatch task finished
    Outcome {
        cycle: CycleId,
        result: Result<ResponsePayload, BackendError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Replaces the input field contents (typing, pasting).
    Typed(String),
    /// Enter pressed. `soft_newline` is set when the newline modifier is held.
    EnterKey { soft_newline: bool },
    SendClicked,
    SuggestionSelected(usize),
    ReferenceSelected(Option<ReferenceId>),
    MicToggled,
    Cancel,
}

impl InputEvent {
    pub fn typed(text: &str) -> Self {
        InputEvent::Typed(text.to_string())
    }
}
