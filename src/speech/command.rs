use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::capability::{RecognitionEvent, SessionId, SpeechCapability};
use crate::config::Config;
use crate::error::VoiceError;

/// Speech capability backed by an external one-shot transcriber.
///
/// Each session spawns the configured command line; the first non-empty line
/// it prints is the transcript. The locale is passed as `GUIDED_OPS_LOCALE`.
pub struct CommandRecognizer {
    command: Option<String>,
    locale: String,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl CommandRecognizer {
    pub fn new(command: Option<String>, locale: impl Into<String>) -> Self {
        Self {
            command,
            locale: locale.into(),
            stop_tx: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stt_command.clone(), config.locale.clone())
    }
}

impl SpeechCapability for CommandRecognizer {
    fn is_available(&self) -> bool {
        self.command.is_some()
    }

    fn start(
        &mut self,
        session: SessionId,
        events: mpsc::Sender<RecognitionEvent>,
    ) -> Result<(), VoiceError> {
        let command = self
            .command
            .as_deref()
            .ok_or_else(|| VoiceError::Unavailable("no recognizer command configured".to_string()))?;

        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| VoiceError::Unavailable("empty recognizer command".to_string()))?;

        let child = Command::new(program)
            .args(parts)
            .env("GUIDED_OPS_LOCALE", &self.locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| VoiceError::Spawn(e.to_string()))?;

        if let Some(previous) = self.stop_tx.take() {
            let _ = previous.send(());
        }
        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);

        tokio::spawn(async move {
            tokio::select! {
                output = child.wait_with_output() => {
                    match output {
                        Ok(out) => {
                            if !out.status.success() {
                                warn!(status = %out.status, "Recognizer exited unsuccessfully");
                            }
                            if let Some(transcript) = first_transcript(&out.stdout) {
                                let _ = events.send(RecognitionEvent::Result { session, transcript }).await;
                            }
                        }
                        Err(e) => warn!("Recognizer failed: {}", e),
                    }
                    let _ = events.send(RecognitionEvent::End { session }).await;
                }
                // Dropping the wait future drops the child, which kills it
                _ = stop_rx => debug!(session = session.0, "Recognizer stopped"),
            }
        });

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

fn first_transcript(stdout: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_transcript_skips_blank_lines() {
        assert_eq!(first_transcript(b"\n  \nfind the valve\nextra\n").as_deref(), Some("find the valve"));
        assert_eq!(first_transcript(b"\n\n"), None);
    }

    #[test]
    fn test_unconfigured_is_unavailable() {
        let mut recognizer = CommandRecognizer::new(None, "en-US");
        let (tx, _rx) = mpsc::channel(4);
        assert!(!recognizer.is_available());
        assert!(matches!(
            recognizer.start(SessionId(1), tx),
            Err(VoiceError::Unavailable(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_echo_command_yields_result_then_end() {
        let mut recognizer = CommandRecognizer::new(Some("echo find the valve".into()), "en-US");
        let (tx, mut rx) = mpsc::channel(4);
        recognizer.start(SessionId(7), tx).unwrap();

        assert_eq!(
            rx.recv().await,
            Some(RecognitionEvent::Result {
                session: SessionId(7),
                transcript: "find the valve".into()
            })
        );
        assert_eq!(rx.recv().await, Some(RecognitionEvent::End { session: SessionId(7) }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_command_yields_only_end() {
        let mut recognizer = CommandRecognizer::new(Some("true".into()), "en-US");
        let (tx, mut rx) = mpsc::channel(4);
        recognizer.start(SessionId(1), tx).unwrap();
        assert_eq!(rx.recv().await, Some(RecognitionEvent::End { session: SessionId(1) }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_kills_session_without_events() {
        let mut recognizer = CommandRecognizer::new(Some("sleep 5".into()), "en-US");
        let (tx, mut rx) = mpsc::channel(4);
        recognizer.start(SessionId(2), tx).unwrap();
        recognizer.stop();

        let next = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv()).await;
        assert!(matches!(next, Ok(None)), "Stopped session must close without emitting");
    }
}
