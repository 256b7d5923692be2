use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::event::CycleId;

#[derive(Debug)]
struct InFlight {
    token: CancellationToken,
    started: Instant,
}

/// Effect-layer bookkeeping for dispatch tasks. The controller decides what to
/// cancel; this only holds the tokens that make it happen.
#[derive(Debug, Default)]
pub struct CancellationRegistry {
    in_flight: HashMap<CycleId, InFlight>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, cycle: CycleId) -> CancellationToken {
        let token = CancellationToken::new();
        self.in_flight.insert(
            cycle,
            InFlight {
                token: token.clone(),
                started: Instant::now(),
            },
        );
        token
    }

    /// Returns false if the cycle was unknown (already finished or never registered).
    pub fn cancel(&mut self, cycle: CycleId) -> bool {
        match self.in_flight.remove(&cycle) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Forgets a settled cycle and reports how long it was in flight.
    pub fn finish(&mut self, cycle: CycleId) -> Option<Duration> {
        self.in_flight.remove(&cycle).map(|entry| entry.started.elapsed())
    }

    pub fn is_pending(&self, cycle: CycleId) -> bool {
        self.in_flight.contains_key(&cycle)
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn cancel_all(&mut self) {
        for (_, entry) in self.in_flight.drain() {
            entry.token.cancel();
        }
    }
}
