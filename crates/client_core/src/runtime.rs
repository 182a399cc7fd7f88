//! Tokio driver for the [`Sequencer`]: one task owns the machine, its single
//! timer slot, the command queue, and the guest lookup result.

use std::{future::pending, sync::Arc};

use shared::{
    domain::GuestId,
    error::{FailureCode, LookupFailure},
};
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::{
    guest::{resolve_guest, GuestContext, GuestDirectory, GuestOutcome},
    sequencer::{
        Effect, PresentationState, Sequencer, SequencerConfig, SequencerEvent, TimerToken, View,
    },
    transliterate::NameTransliterator,
    Clock,
};

const COMMAND_QUEUE_CAPACITY: usize = 16;
const EVENT_BUFFER_CAPACITY: usize = 256;
const LOOKUP_ABORTED_NOTICE: &str = "Your invitation details are unavailable right now.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    Transitioned {
        from: PresentationState,
        to: PresentationState,
    },
    Rendered(View),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerCommand {
    OpenInvitation,
    Shutdown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerCommandError {
    #[error("sequencer command queue is full; retry")]
    QueueFull,
    #[error("sequencer has stopped")]
    Stopped,
}

pub struct SequencerRuntime {
    config: SequencerConfig,
    directory: Arc<dyn GuestDirectory>,
    transliterator: Arc<dyn NameTransliterator>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<PresentationEvent>,
}

impl SequencerRuntime {
    pub fn new(
        config: SequencerConfig,
        directory: Arc<dyn GuestDirectory>,
        transliterator: Arc<dyn NameTransliterator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER_CAPACITY);
        Self {
            config,
            directory,
            transliterator,
            clock,
            events,
        }
    }

    /// Subscribe before [`Self::start`] to observe the initial view.
    pub fn subscribe(&self) -> broadcast::Receiver<PresentationEvent> {
        self.events.subscribe()
    }

    /// Mounts the sequencer and, when `guest_id` is set, starts the single
    /// guest lookup. Must be called within a tokio runtime.
    pub fn start(self, guest_id: Option<GuestId>) -> SequencerHandle {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let machine = Sequencer::new(self.config, GuestContext::for_request(guest_id.as_ref()));

        let lookup = guest_id.map(|guest_id| {
            let (tx, rx) = oneshot::channel();
            let directory = Arc::clone(&self.directory);
            let transliterator = Arc::clone(&self.transliterator);
            let task = tokio::spawn(async move {
                let outcome = resolve_guest(directory, transliterator, &guest_id).await;
                if tx.send(outcome).is_err() {
                    debug!("runtime: guest outcome arrived after teardown");
                }
            });
            PendingLookup { rx, task }
        });

        let task = tokio::spawn(drive(
            machine,
            commands_rx,
            self.events.clone(),
            self.clock,
            lookup,
        ));

        SequencerHandle {
            commands: commands_tx,
            events: self.events,
            task,
        }
    }
}

struct PendingLookup {
    rx: oneshot::Receiver<GuestOutcome>,
    task: JoinHandle<()>,
}

pub struct SequencerHandle {
    commands: mpsc::Sender<SequencerCommand>,
    events: broadcast::Sender<PresentationEvent>,
    task: JoinHandle<()>,
}

impl SequencerHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<PresentationEvent> {
        self.events.subscribe()
    }

    pub fn open_invitation(&self) -> Result<(), SequencerCommandError> {
        self.dispatch(SequencerCommand::OpenInvitation)
    }

    fn dispatch(&self, command: SequencerCommand) -> Result<(), SequencerCommandError> {
        match self.commands.try_send(command) {
            Ok(()) => {
                debug!(?command, "runtime: queued command");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(SequencerCommandError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SequencerCommandError::Stopped),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Tears the sequencer down and waits for its task to exit. Pending
    /// timers are cancelled and nothing is published afterwards.
    pub async fn shutdown(self) {
        let Self {
            commands,
            events,
            task,
        } = self;
        if commands.send(SequencerCommand::Shutdown).await.is_err() {
            debug!("runtime: sequencer already stopped");
        }
        drop(events);
        if let Err(err) = task.await {
            debug!(error = %err, "runtime: sequencer task ended abnormally");
        }
    }
}

async fn drive(
    mut machine: Sequencer,
    mut commands: mpsc::Receiver<SequencerCommand>,
    events: broadcast::Sender<PresentationEvent>,
    clock: Arc<dyn Clock>,
    mut lookup: Option<PendingLookup>,
) {
    let mut timer: Option<(TimerToken, Instant)> = None;
    let effects = machine.handle(SequencerEvent::Mounted, clock.now());
    apply(effects, &mut timer, &events);

    let mut lookup_pending = lookup.is_some();
    loop {
        let armed = timer;
        tokio::select! {
            command = commands.recv() => match command {
                Some(SequencerCommand::OpenInvitation) => {
                    let effects = machine.handle(SequencerEvent::OpenRequested, clock.now());
                    apply(effects, &mut timer, &events);
                }
                Some(SequencerCommand::Shutdown) | None => break,
            },
            outcome = await_lookup(lookup.as_mut()), if lookup_pending => {
                lookup_pending = false;
                let outcome = outcome.unwrap_or_else(|_| {
                    GuestOutcome::Failed(LookupFailure::new(
                        FailureCode::Internal,
                        LOOKUP_ABORTED_NOTICE,
                    ))
                });
                let effects = machine.handle(SequencerEvent::GuestResolved(outcome), clock.now());
                apply(effects, &mut timer, &events);
            }
            token = await_timer(armed), if armed.is_some() => {
                timer = None;
                let effects = machine.handle(SequencerEvent::TimerFired(token), clock.now());
                apply(effects, &mut timer, &events);
            }
        }
    }

    let effects = machine.handle(SequencerEvent::Unmount, clock.now());
    apply(effects, &mut timer, &events);
    if let Some(lookup) = lookup {
        lookup.task.abort();
    }
    info!(state = ?machine.state(), "runtime: sequencer stopped");
}

async fn await_timer(armed: Option<(TimerToken, Instant)>) -> TimerToken {
    match armed {
        Some((token, deadline)) => {
            sleep_until(deadline).await;
            token
        }
        None => pending().await,
    }
}

async fn await_lookup(
    lookup: Option<&mut PendingLookup>,
) -> Result<GuestOutcome, oneshot::error::RecvError> {
    match lookup {
        Some(lookup) => (&mut lookup.rx).await,
        None => pending().await,
    }
}

fn apply(
    effects: Vec<Effect>,
    timer: &mut Option<(TimerToken, Instant)>,
    events: &broadcast::Sender<PresentationEvent>,
) {
    for effect in effects {
        match effect {
            Effect::Schedule { token, after } => *timer = Some((token, Instant::now() + after)),
            Effect::Cancel(token) => {
                if timer.map(|(t, _)| t) == Some(token) {
                    *timer = None;
                }
            }
            Effect::Transitioned { from, to } => {
                // No receivers is fine; the page simply has nobody watching.
                let _ = events.send(PresentationEvent::Transitioned { from, to });
            }
            Effect::Render(view) => {
                let _ = events.send(PresentationEvent::Rendered(view));
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
