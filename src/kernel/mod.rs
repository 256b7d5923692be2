pub mod cancel;
pub mod classifier;
pub mod controller;
pub mod effect;
pub mod event;
pub mod metrics;
pub mod reactor;
pub mod state;
pub mod suggestions;
