use super::classifier::Classification;
use super::event::CycleId;
use crate::services::backend::{ReferenceId, TelemetrySeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingResponse(CycleId),
}

/// Strict state delta. This is the ONLY way state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    InputChanged(String),
    ReferenceChanged(Option<ReferenceId>),
    /// Clears all three result slots and enters `AwaitingResponse`.
    CycleStarted(CycleId),
    FirstMessageSent,
    ResultLanded(Classification),
    ErrorRaised(String),
    /// Back to `Idle`; the input field is always emptied.
    CycleEnded,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    input_text: String,
    phase: Phase,
    last_text_response: Option<String>,
    last_telemetry: Option<TelemetrySeries>,
    error_message: Option<String>,
    has_sent_first_message: bool,
    selected_reference: Option<ReferenceId>,
    // Bumped on every applied delta; lets renderers skip unchanged frames
    version: u64,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn in_flight(&self) -> Option<CycleId> {
        match self.phase {
            Phase::AwaitingResponse(cycle) => Some(cycle),
            Phase::Idle => None,
        }
    }

    pub fn last_text_response(&self) -> Option<&str> {
        self.last_text_response.as_deref()
    }

    pub fn last_telemetry(&self) -> Option<&TelemetrySeries> {
        self.last_telemetry.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn has_sent_first_message(&self) -> bool {
        self.has_sent_first_message
    }

    pub fn selected_reference(&self) -> Option<&ReferenceId> {
        self.selected_reference.as_ref()
    }

    pub(crate) fn reduce(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::InputChanged(text) => self.input_text = text,
            StateDelta::ReferenceChanged(reference) => self.selected_reference = reference,
            StateDelta::CycleStarted(cycle) => {
                self.clear_results();
                self.phase = Phase::AwaitingResponse(cycle);
            }
            StateDelta::FirstMessageSent => self.has_sent_first_message = true,
            StateDelta::ResultLanded(classification) => {
                self.clear_results();
                match classification {
                    Classification::Text(text) => self.last_text_response = Some(text),
                    Classification::Telemetry(series) => self.last_telemetry = Some(series),
                    // Callers turn Invalid into ErrorRaised; never lands as a result
                    Classification::Invalid => {}
                }
            }
            StateDelta::ErrorRaised(message) => {
                self.clear_results();
                self.error_message = Some(message);
            }
            StateDelta::CycleEnded => {
                self.phase = Phase::Idle;
                self.input_text.clear();
            }
        }
        self.version += 1;
    }

    fn clear_results(&mut self) {
        self.last_text_response = None;
        self.last_telemetry = None;
        self.error_message = None;
    }
}
