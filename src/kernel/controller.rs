use tracing::{debug, info, warn};

use super::classifier::{classify, Classification};
use super::effect::SideEffect;
use super::event::{CycleId, InputEvent};
use super::metrics::event::OutcomeKind;
use super::state::{InteractionState, StateDelta};
use super::suggestions;
use crate::config::Config;
use crate::error::{BackendError, InteractionError, BACKEND_ERROR_MESSAGE};
use crate::services::backend::{ReferenceId, RequestEnvelope, ResponsePayload};

/// Fixed request parameters stamped onto every envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

/// Owns the interaction state. Every transition is a pure step:
/// (state, user action | outcome) -> (new state, side effects).
/// MUST NOT await I/O; the driver executes the returned effects.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
    settings: DispatchSettings,
}

impl InteractionController {
    pub fn new(settings: DispatchSettings) -> Self {
        Self {
            state: InteractionState::new(),
            settings,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn handle(&mut self, input: InputEvent) -> Vec<SideEffect> {
        match input {
            InputEvent::Typed(text) => {
                self.set_input_text(&text);
                Vec::new()
            }
            InputEvent::EnterKey { soft_newline } => self.on_enter_key(soft_newline),
            InputEvent::SendClicked => {
                let text = self.state.input_text().to_string();
                self.submit(&text)
            }
            InputEvent::SuggestionSelected(index) => {
                self.select_suggestion(index);
                Vec::new()
            }
            InputEvent::ReferenceSelected(reference) => {
                self.set_reference(reference);
                Vec::new()
            }
            InputEvent::Cancel => self.cancel(),
            // The microphone belongs to the speech adapter, not to this state
            InputEvent::MicToggled => Vec::new(),
        }
    }

    pub fn set_input_text(&mut self, text: &str) {
        self.state.reduce(StateDelta::InputChanged(text.to_string()));
    }

    /// Starts a dispatch cycle. Empty input and submits during an in-flight
    /// cycle are ignored and produce no effects.
    pub fn submit(&mut self, text: &str) -> Vec<SideEffect> {
        if text.trim().is_empty() {
            debug!("Ignoring submit: {}", InteractionError::InputInvalid);
            return Vec::new();
        }
        if let Some(cycle) = self.state.in_flight() {
            debug!(%cycle, "Ignoring submit while a request is in flight");
            return Vec::new();
        }

        let mut effects = Vec::new();
        if !self.state.has_sent_first_message() {
            self.state.reduce(StateDelta::FirstMessageSent);
            effects.push(SideEffect::FirstMessageSent);
        }

        let cycle = CycleId::new();
        self.state.reduce(StateDelta::CycleStarted(cycle));

        let envelope = RequestEnvelope {
            user_input: text.to_string(),
            selected_reference: self.state.selected_reference().cloned(),
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
        };
        info!(
            %cycle,
            chars = text.len(),
            scoped = envelope.selected_reference.is_some(),
            "Dispatching request"
        );
        effects.push(SideEffect::Dispatch { cycle, envelope });
        effects
    }

    /// Takes effect on the next submit; an in-flight request keeps its original scope.
    pub fn set_reference(&mut self, reference: Option<ReferenceId>) {
        info!(reference = ?reference.as_ref().map(ReferenceId::as_str), "Reference selected");
        self.state.reduce(StateDelta::ReferenceChanged(reference));
    }

    /// Voice input auto-sends, unlike typed input.
    pub fn on_voice_result(&mut self, text: String) -> Vec<SideEffect> {
        debug!(transcript = %text, "Voice result");
        self.set_input_text(&text);
        self.submit(&text)
    }

    pub fn on_enter_key(&mut self, soft_newline: bool) -> Vec<SideEffect> {
        if soft_newline {
            return Vec::new();
        }
        let text = self.state.input_text().to_string();
        self.submit(&text)
    }

    /// Seeds the input with a canned prompt. Never submits.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        match suggestions::seed_text(index) {
            Some(text) => {
                self.set_input_text(text);
                true
            }
            None => {
                debug!(index, "No such suggestion");
                false
            }
        }
    }

    /// Abandons the in-flight cycle. Its outcome, if it ever arrives, is discarded.
    pub fn cancel(&mut self) -> Vec<SideEffect> {
        match self.state.in_flight() {
            Some(cycle) => {
                info!(%cycle, "Request cancelled");
                self.state.reduce(StateDelta::CycleEnded);
                vec![SideEffect::CancelDispatch(cycle)]
            }
            None => Vec::new(),
        }
    }

    /// Routes a finished request into the state and ends the cycle.
    pub fn complete(
        &mut self,
        cycle: CycleId,
        result: Result<ResponsePayload, BackendError>,
    ) -> Vec<SideEffect> {
        if self.state.in_flight() != Some(cycle) {
            info!(%cycle, "Discarded stale outcome");
            return Vec::new();
        }

        let outcome = match result {
            Ok(payload) => match classify(&payload) {
                Classification::Invalid => {
                    warn!(%cycle, "Reply carried neither text nor usable telemetry");
                    self.fail(InteractionError::ResponseMalformed)
                }
                Classification::Text(text) => {
                    self.state.reduce(StateDelta::ResultLanded(Classification::Text(text)));
                    OutcomeKind::Text
                }
                Classification::Telemetry(series) => {
                    debug!(%cycle, points = series.len(), "Telemetry reply");
                    self.state.reduce(StateDelta::ResultLanded(Classification::Telemetry(series)));
                    OutcomeKind::Telemetry
                }
            },
            Err(err) => {
                warn!(%cycle, "Error fetching AI response: {}", err);
                self.fail(err.kind())
            }
        };

        self.state.reduce(StateDelta::CycleEnded);
        vec![SideEffect::Settled { cycle, outcome }]
    }

    fn fail(&mut self, kind: InteractionError) -> OutcomeKind {
        let message = kind.user_message().unwrap_or(BACKEND_ERROR_MESSAGE);
        self.state.reduce(StateDelta::ErrorRaised(message.to_string()));
        OutcomeKind::Failed(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatched(effects: &[SideEffect]) -> Option<(CycleId, RequestEnvelope)> {
        effects.iter().find_map(|e| match e {
            SideEffect::Dispatch { cycle, envelope } => Some((*cycle, envelope.clone())),
            _ => None,
        })
    }

    #[test]
    fn test_soft_newline_enter_is_noop() {
        let mut controller = InteractionController::default();
        controller.set_input_text("line one");
        assert!(controller.on_enter_key(true).is_empty());
        assert_eq!(controller.state().input_text(), "line one");
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_envelope_carries_text_as_typed_and_reference() {
        let mut controller = InteractionController::default();
        controller.set_reference(Some(ReferenceId::new("boiler.xml")));
        let effects = controller.submit("  check the boiler\n");
        let (_, envelope) = dispatched(&effects).expect("dispatch");
        assert_eq!(envelope.user_input, "  check the boiler\n");
        assert_eq!(envelope.selected_reference, Some(ReferenceId::new("boiler.xml")));
        assert_eq!(envelope.model, "claude-v1");
        assert_eq!(envelope.max_tokens, 300);
    }

    #[test]
    fn test_first_message_notification_fires_once() {
        let mut controller = InteractionController::default();
        let first = controller.submit("one");
        let (cycle, _) = dispatched(&first).expect("dispatch");
        assert!(first.contains(&SideEffect::FirstMessageSent));

        controller.complete(cycle, Ok(ResponsePayload::text("ok")));
        let second = controller.submit("two");
        assert!(!second.contains(&SideEffect::FirstMessageSent));
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let mut controller = InteractionController::default();
        let (cycle, _) = dispatched(&controller.submit("slow question")).expect("dispatch");
        assert_eq!(controller.cancel(), vec![SideEffect::CancelDispatch(cycle)]);

        let effects = controller.complete(cycle, Ok(ResponsePayload::text("late")));
        assert!(effects.is_empty());
        assert!(controller.state().last_text_response().is_none());
        assert!(controller.state().error_message().is_none());
    }

    #[test]
    fn test_invalid_reply_surfaces_backend_message() {
        let mut controller = InteractionController::default();
        let (cycle, _) = dispatched(&controller.submit("status?")).expect("dispatch");
        let effects = controller.complete(cycle, Ok(ResponsePayload::default()));

        assert_eq!(
            effects,
            vec![SideEffect::Settled {
                cycle,
                outcome: OutcomeKind::Failed(InteractionError::ResponseMalformed)
            }]
        );
        assert_eq!(controller.state().error_message(), Some(BACKEND_ERROR_MESSAGE));
    }

    #[test]
    fn test_mic_toggle_is_not_controller_state() {
        let mut controller = InteractionController::default();
        let before = controller.state().version();
        assert!(controller.handle(InputEvent::MicToggled).is_empty());
        assert_eq!(controller.state().version(), before);
    }
}
