use super::event::CycleId;
use super::metrics::event::OutcomeKind;
use crate::services::backend::RequestEnvelope;

/// Work the controller asks its driver to perform. The controller itself never does I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Dispatch { cycle: CycleId, envelope: RequestEnvelope },
    CancelDispatch(CycleId),
    /// Fired exactly once per session, on the first accepted submit.
    FirstMessageSent,
    Settled { cycle: CycleId, outcome: OutcomeKind },
}
