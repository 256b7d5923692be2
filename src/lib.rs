pub mod cli;
pub mod config;
pub mod error;
pub mod kernel;
pub mod outputs;
pub mod services;
pub mod speech;

// Re-export specific items if needed for convenient access
pub use kernel::controller::InteractionController;
pub use kernel::reactor::Reactor;
