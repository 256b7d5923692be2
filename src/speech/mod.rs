pub mod adapter;
pub mod capability;
pub mod command;

pub use adapter::{CaptureState, SpeechCaptureAdapter};
pub use capability::{RecognitionEvent, SessionId, SpeechCapability};
pub use command::CommandRecognizer;
