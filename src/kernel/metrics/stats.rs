use std::collections::VecDeque;
use std::fmt;
use super::event::{CycleEvent, OutcomeKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleStats {
    pub dispatched: u64,
    pub text_replies: u64,
    pub telemetry_replies: u64,
    pub failures: u64,
    pub cancelled: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dispatched={} text={} telemetry={} failed={} cancelled={} avg_latency={:.0}ms max_latency={}ms",
            self.dispatched,
            self.text_replies,
            self.telemetry_replies,
            self.failures,
            self.cancelled,
            self.avg_latency_ms,
            self.max_latency_ms
        )
    }
}

pub fn compute_snapshot(events: &VecDeque<CycleEvent>) -> CycleStats {
    let mut snap = CycleStats::default();
    let mut completed = 0u64;
    let mut total_latency = 0u64;

    for event in events {
        match event {
            CycleEvent::Dispatched { .. } => snap.dispatched += 1,
            CycleEvent::Completed { outcome, latency_ms, .. } => {
                match outcome {
                    OutcomeKind::Text => snap.text_replies += 1,
                    OutcomeKind::Telemetry => snap.telemetry_replies += 1,
                    OutcomeKind::Failed(_) => snap.failures += 1,
                }
                completed += 1;
                total_latency += latency_ms;
                snap.max_latency_ms = snap.max_latency_ms.max(*latency_ms);
            }
            CycleEvent::Cancelled { .. } => snap.cancelled += 1,
        }
    }

    if completed > 0 {
        snap.avg_latency_ms = total_latency as f64 / completed as f64;
    }

    snap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InteractionError;
    use crate::kernel::event::CycleId;

    #[test]
    fn test_snapshot_counts_and_latency() {
        let a = CycleId::new();
        let b = CycleId::new();
        let c = CycleId::new();
        let events: VecDeque<CycleEvent> = vec![
            CycleEvent::Dispatched { cycle: a },
            CycleEvent::Completed { cycle: a, outcome: OutcomeKind::Text, latency_ms: 100 },
            CycleEvent::Dispatched { cycle: b },
            CycleEvent::Completed {
                cycle: b,
                outcome: OutcomeKind::Failed(InteractionError::BackendRejected),
                latency_ms: 300,
            },
            CycleEvent::Dispatched { cycle: c },
            CycleEvent::Cancelled { cycle: c },
        ]
        .into();

        let snap = compute_snapshot(&events);
        assert_eq!(snap.dispatched, 3);
        assert_eq!(snap.text_replies, 1);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.cancelled, 1);
        assert_eq!(snap.avg_latency_ms, 200.0);
        assert_eq!(snap.max_latency_ms, 300);
    }
}
