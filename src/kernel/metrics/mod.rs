//! Dispatch cycle instrumentation.
//!
//! # PRIVACY INVARIANT
//! Cycle events must **NEVER** contain user content (input text, transcripts, replies).
//! Only cycle ids, outcome kinds and latencies are recorded.

pub mod event;
pub mod recorder;
pub mod stats;
