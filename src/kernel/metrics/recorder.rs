use std::collections::VecDeque;
use super::event::CycleEvent;
use super::stats::{compute_snapshot, CycleStats};

const MAX_EVENTS: usize = 10_000;

#[derive(Debug)]
pub struct CycleRecorder {
    buffer: VecDeque<CycleEvent>,
}

impl Default for CycleRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(256),
        }
    }

    pub fn record(&mut self, event: CycleEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn snapshot(&self) -> CycleStats {
        compute_snapshot(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::event::CycleId;

    #[test]
    fn test_buffer_is_bounded() {
        let mut recorder = CycleRecorder::new();
        for _ in 0..MAX_EVENTS + 10 {
            recorder.record(CycleEvent::Dispatched { cycle: CycleId::new() });
        }
        assert_eq!(recorder.len(), MAX_EVENTS);
    }
}
