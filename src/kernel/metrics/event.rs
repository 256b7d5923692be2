use crate::error::InteractionError;
use crate::kernel::event::CycleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Text,
    Telemetry,
    Failed(InteractionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    Dispatched { cycle: CycleId },
    Completed { cycle: CycleId, outcome: OutcomeKind, latency_ms: u64 },
    Cancelled { cycle: CycleId },
}
