//! Runtime driver for a [`Sequence`]: one task owns the state machine and
//! serializes every start, sort, advance, and timer expiry through a single
//! command queue.
//!
//! Timers are spawned sleeps that post a command back to the queue when they
//! elapse. The auto-skip timer for each presentation hangs off a child
//! [`CancellationToken`] and is cancelled as soon as the item leaves the
//! "current" slot. A timer that fires late anyway is rejected by the state
//! machine's index and lockout checks.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{Item, Phase, PileId, PileStore, Presentation, Sequence, Sorted};
use crate::error::SequencerError;

/// Why an item left the round without being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The auto-skip delay elapsed.
    Timeout,
    /// The operator advanced past it.
    Advanced,
}

/// Notifications emitted in the order the transitions happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEvent {
    ItemPresented {
        index: usize,
        item: Item,
    },
    ItemSorted {
        index: usize,
        item: Item,
        pile: PileId,
    },
    ItemSkipped {
        index: usize,
        item: Item,
        reason: SkipReason,
    },
    /// Terminal. Carries the final piles for grading.
    Finished(PileStore),
}

/// Read-only view of the round at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSnapshot {
    pub phase: Phase,
    pub current_index: Option<usize>,
    pub current_item: Option<Item>,
    pub queue_len: usize,
    pub piles: PileStore,
}

#[derive(Debug, Clone, Copy)]
enum Timer {
    Resume,
    AutoSkip(usize),
}

enum Command {
    Start,
    PresentNext,
    Sort {
        pile: usize,
        reply: oneshot::Sender<Result<Sorted, SequencerError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SequenceSnapshot>,
    },
    Elapsed(Timer),
}

/// Cloneable handle to a running sequencer. The task stops once every handle
/// is dropped; pending timers are cancelled with it.
#[derive(Clone)]
pub struct SequencerHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SequencerHandle {
    /// Start the round. Repeat calls are ignored.
    pub fn start(&self) -> Result<(), SequencerError> {
        self.send(Command::Start)
    }

    /// Advance manually, discarding the current item if there is one.
    pub fn present_next(&self) -> Result<(), SequencerError> {
        self.send(Command::PresentNext)
    }

    pub async fn sort_current_into_pile(&self, pile: usize) -> Result<Sorted, SequencerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Sort { pile, reply })?;
        rx.await.map_err(|_| SequencerError::Closed)?
    }

    pub async fn snapshot(&self) -> Result<SequenceSnapshot, SequencerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| SequencerError::Closed)
    }

    fn send(&self, command: Command) -> Result<(), SequencerError> {
        self.commands
            .send(command)
            .map_err(|_| SequencerError::Closed)
    }
}

/// Spawn the sequencer task on the current runtime.
pub fn spawn(sequence: Sequence) -> (SequencerHandle, mpsc::UnboundedReceiver<SequenceEvent>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let actor = SequencerActor {
        sequence,
        commands: command_rx,
        timers: command_tx.downgrade(),
        events: event_tx,
        shutdown: CancellationToken::new(),
        auto_skip: None,
    };
    tokio::spawn(actor.run());

    (
        SequencerHandle {
            commands: command_tx,
        },
        event_rx,
    )
}

struct SequencerActor {
    sequence: Sequence,
    commands: mpsc::UnboundedReceiver<Command>,
    // Weak so that timers alone never keep the task alive.
    timers: mpsc::WeakUnboundedSender<Command>,
    events: mpsc::UnboundedSender<SequenceEvent>,
    shutdown: CancellationToken,
    auto_skip: Option<CancellationToken>,
}

impl SequencerActor {
    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        debug!("sequencer handles dropped; stopping");
        self.shutdown.cancel();
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start => self.on_start(),
            Command::PresentNext => {
                let presentation = self.sequence.present_next();
                self.on_presentation(presentation);
            }
            Command::Sort { pile, reply } => {
                let result = self.on_sort(pile);
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Elapsed(Timer::Resume) => {
                let presentation = self.sequence.resume();
                self.on_presentation(presentation);
            }
            Command::Elapsed(Timer::AutoSkip(index)) => self.on_auto_skip(index),
        }
    }

    fn on_start(&mut self) {
        match self.sequence.start() {
            Some(delay) => {
                info!(
                    items = self.sequence.queue().len(),
                    piles = self.sequence.piles().pile_count(),
                    "round started"
                );
                self.schedule(delay, Timer::Resume, self.shutdown.child_token());
            }
            None => debug!("start ignored; round already started"),
        }
    }

    fn on_presentation(&mut self, presentation: Presentation) {
        match presentation {
            Presentation::Presented {
                index,
                item,
                auto_skip,
                discarded,
            } => {
                self.cancel_auto_skip();
                if let Some(previous) = discarded {
                    self.emit_skip(index.saturating_sub(1), previous, SkipReason::Advanced);
                }
                debug!(index, item = item.display_name(), "item presented");
                let _ = self.events.send(SequenceEvent::ItemPresented { index, item });

                if let Some(delay) = auto_skip {
                    let token = self.shutdown.child_token();
                    self.auto_skip = Some(token.clone());
                    self.schedule(delay, Timer::AutoSkip(index), token);
                }
            }
            Presentation::Finished { piles, discarded } => {
                self.cancel_auto_skip();
                if let (Some(previous), Some(cursor)) = (discarded, self.sequence.current_index()) {
                    self.emit_skip(cursor.saturating_sub(1), previous, SkipReason::Advanced);
                }
                info!(placed = piles.total_items(), "round finished");
                for id in piles.pile_ids() {
                    info!(pile = id.get(), owner = %piles.owner(id), "{}", piles.describe(id));
                }
                let _ = self.events.send(SequenceEvent::Finished(piles));
            }
            Presentation::Ignored => {
                debug!(phase = ?self.sequence.phase(), "presentation ignored");
            }
        }
    }

    fn on_sort(&mut self, pile: usize) -> Result<Sorted, SequencerError> {
        match self.sequence.sort_current_into_pile(pile) {
            Ok(sorted) => {
                self.cancel_auto_skip();
                info!(
                    index = sorted.index,
                    item = sorted.item.display_name(),
                    pile = sorted.pile.get(),
                    "item sorted"
                );
                let _ = self.events.send(SequenceEvent::ItemSorted {
                    index: sorted.index,
                    item: sorted.item.clone(),
                    pile: sorted.pile,
                });
                self.schedule(sorted.next_in, Timer::Resume, self.shutdown.child_token());
                Ok(sorted)
            }
            Err(err @ SequencerError::InvalidPileId { .. }) => {
                warn!(pile, error = %err, "sort rejected");
                Err(err)
            }
            Err(err) => {
                debug!(pile, error = %err, "sort ignored");
                Err(err)
            }
        }
    }

    fn on_auto_skip(&mut self, index: usize) {
        let Some(skipped) = self.sequence.auto_skip(index) else {
            debug!(index, "stale auto-skip ignored");
            return;
        };
        self.auto_skip = None;
        self.emit_skip(skipped.index, skipped.item, SkipReason::Timeout);
        self.schedule(skipped.next_in, Timer::Resume, self.shutdown.child_token());
    }

    fn emit_skip(&self, index: usize, item: Item, reason: SkipReason) {
        info!(index, item = item.display_name(), ?reason, "item skipped");
        let _ = self
            .events
            .send(SequenceEvent::ItemSkipped { index, item, reason });
    }

    fn cancel_auto_skip(&mut self) {
        if let Some(token) = self.auto_skip.take() {
            token.cancel();
        }
    }

    fn schedule(&self, delay: Duration, timer: Timer, token: CancellationToken) {
        let commands = self.timers.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Some(commands) = commands.upgrade() {
                        let _ = commands.send(Command::Elapsed(timer));
                    }
                }
            }
        });
    }

    fn snapshot(&self) -> SequenceSnapshot {
        SequenceSnapshot {
            phase: self.sequence.phase(),
            current_index: self.sequence.current_index(),
            current_item: self.sequence.current_item().cloned(),
            queue_len: self.sequence.queue().len(),
            piles: self.sequence.piles().clone(),
        }
    }
}
