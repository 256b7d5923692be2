use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::cancel::CancellationRegistry;
use super::controller::{DispatchSettings, InteractionController};
use super::effect::SideEffect;
use super::event::{Event, InputEvent};
use super::metrics::event::CycleEvent;
use super::metrics::recorder::CycleRecorder;
use crate::services::backend::Backend;
use crate::speech::{RecognitionEvent, SpeechCaptureAdapter, SpeechCapability};

const RECOGNITION_CHANNEL: usize = 16;

/// Single control flow of the session: one event in, one pure step, then the
/// resulting side effects are executed. Network I/O runs in spawned tasks that
/// report back through `tx`.
pub struct Reactor<C: SpeechCapability> {
    pub receiver: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,
    recognition_rx: mpsc::Receiver<RecognitionEvent>,
    pub controller: InteractionController,
    pub speech: SpeechCaptureAdapter<C>,
    backend: Arc<dyn Backend>,
    pub cancel_registry: CancellationRegistry,
    pub recorder: CycleRecorder,
    first_message: Option<oneshot::Sender<()>>,
}

impl<C: SpeechCapability> Reactor<C> {
    pub fn new(
        receiver: mpsc::Receiver<Event>,
        tx: mpsc::Sender<Event>,
        backend: Arc<dyn Backend>,
        capability: C,
        settings: DispatchSettings,
    ) -> Self {
        let (recognition_tx, recognition_rx) = mpsc::channel(RECOGNITION_CHANNEL);
        Self {
            receiver,
            tx,
            recognition_rx,
            controller: InteractionController::new(settings),
            speech: SpeechCaptureAdapter::new(capability, recognition_tx),
            backend,
            cancel_registry: CancellationRegistry::new(),
            recorder: CycleRecorder::new(),
            first_message: None,
        }
    }

    /// Resolves once, when the first message of the session is sent.
    /// Already resolved if that has happened.
    pub fn on_first_message(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if self.controller.state().has_sent_first_message() {
            let _ = tx.send(());
        } else {
            self.first_message = Some(tx);
        }
        rx
    }

    /// Pure step: routes one event to the adapter or the controller.
    pub fn step(&mut self, event: Event) -> Vec<SideEffect> {
        match event {
            Event::Input(InputEvent::MicToggled) => {
                self.speech.toggle();
                Vec::new()
            }
            Event::Input(input) => self.controller.handle(input),
            Event::Recognition(recognition) => match self.speech.on_event(recognition) {
                Some(transcript) => self.controller.on_voice_result(transcript),
                None => Vec::new(),
            },
            Event::Outcome { cycle, result } => self.controller.complete(cycle, result),
        }
    }

    /// Executes side effects. Spawns, never awaits.
    pub fn apply(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::Dispatch { cycle, envelope } => {
                    let token = self.cancel_registry.register(cycle);
                    self.recorder.record(CycleEvent::Dispatched { cycle });

                    let backend = Arc::clone(&self.backend);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => debug!(%cycle, "Dispatch task cancelled"),
                            result = backend.send(&envelope) => {
                                let _ = tx.send(Event::Outcome { cycle, result }).await;
                            }
                        }
                    });
                }
                SideEffect::CancelDispatch(cycle) => {
                    self.cancel_registry.cancel(cycle);
                    self.recorder.record(CycleEvent::Cancelled { cycle });
                }
                SideEffect::FirstMessageSent => {
                    if let Some(tx) = self.first_message.take() {
                        let _ = tx.send(());
                    }
                }
                SideEffect::Settled { cycle, outcome } => {
                    let latency = self.cancel_registry.finish(cycle).unwrap_or_default();
                    self.recorder.record(CycleEvent::Completed {
                        cycle,
                        outcome,
                        latency_ms: latency.as_millis() as u64,
                    });
                }
            }
        }
    }

    pub fn process(&mut self, event: Event) {
        let effects = self.step(event);
        self.apply(effects);
    }

    /// Waits for the next user, recognizer or dispatch event.
    pub async fn next_event(&mut self) -> Option<Event> {
        tokio::select! {
            Some(event) = self.receiver.recv() => Some(event),
            Some(recognition) = self.recognition_rx.recv() => Some(Event::Recognition(recognition)),
            else => None,
        }
    }

    /// Async Driver Loop. The reactor holds its own senders, so the loop
    /// only ends through `stop`, after which the session is shut down.
    pub async fn run(&mut self, stop: CancellationToken) {
        info!("Interaction loop started");
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                Some(event) = self.next_event() => self.process(event),
            }
        }
        self.shutdown();
    }

    pub fn shutdown(&mut self) {
        self.speech.stop();
        self.cancel_registry.cancel_all();
        info!(stats = %self.recorder.snapshot(), "Session closed");
    }
}
