use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::item::Item;
use super::piles::{PileId, PileStore};
use crate::config::RoundConfig;
use crate::error::SequencerError;

/// Round progression: `NotStarted → Presenting ⇄ Waiting → Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `start()` not yet called.
    NotStarted,
    /// An item is current and can be sorted or skipped.
    Presenting,
    /// Lockout between an action (or the start) and the next presentation.
    Waiting,
    /// Queue exhausted. Terminal.
    Finished,
}

/// Outcome of advancing the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Presented {
        index: usize,
        item: Item,
        /// Arm an inactivity timer for this long, if set.
        auto_skip: Option<Duration>,
        /// Item that was still current when the operator advanced manually.
        discarded: Option<Item>,
    },
    /// The queue ran out; carries the final piles.
    Finished {
        piles: PileStore,
        discarded: Option<Item>,
    },
    /// Not started, already finished, or locked out.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorted {
    pub index: usize,
    pub item: Item,
    pub pile: PileId,
    /// Delay before the next presentation.
    pub next_in: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub index: usize,
    pub item: Item,
    pub next_in: Duration,
}

/// The sequencing state machine, free of any timers or I/O.
///
/// Callers schedule the returned delays themselves and feed the elapsed
/// timers back through [`Sequence::resume`] and [`Sequence::auto_skip`].
/// The `waiting` lockout and the `finished` flag make every transition
/// mutually exclusive: whichever of sort or auto-skip lands first wins and
/// the other is a no-op.
#[derive(Debug, Clone)]
pub struct Sequence {
    queue: Vec<Item>,
    cursor: Option<usize>,
    current: Option<Item>,
    has_started: bool,
    finished: bool,
    waiting: bool,
    piles: PileStore,
    next_item_delay: Duration,
    auto_skip_delay: Option<Duration>,
}

impl Sequence {
    /// Build a round from a catalog, shuffling with the configured seed or
    /// OS entropy.
    pub fn new(items: Vec<Item>, config: &RoundConfig) -> Result<Self, SequencerError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(items, config, &mut rng)
    }

    /// Shuffle happens once, before the item limit, so a limit selects a
    /// random subset rather than a prefix.
    pub fn with_rng<R>(
        mut items: Vec<Item>,
        config: &RoundConfig,
        rng: &mut R,
    ) -> Result<Self, SequencerError>
    where
        R: Rng + ?Sized,
    {
        if items.is_empty() {
            return Err(SequencerError::EmptyCatalog);
        }

        if config.shuffle_on_start {
            // Fisher–Yates
            items.shuffle(rng);
        }

        if config.item_limit > 0 && config.item_limit < items.len() {
            items.truncate(config.item_limit);
        }

        Ok(Self {
            queue: items,
            cursor: None,
            current: None,
            has_started: false,
            finished: false,
            waiting: false,
            piles: PileStore::new(config.pile_count),
            next_item_delay: config.next_item_delay,
            auto_skip_delay: config.auto_skip_delay,
        })
    }

    /// Accept the start once. Returns the delay before the first
    /// presentation; the round is locked out until [`Sequence::resume`].
    pub fn start(&mut self) -> Option<Duration> {
        if self.has_started {
            return None;
        }
        self.has_started = true;
        self.waiting = true;
        Some(self.next_item_delay)
    }

    /// End the lockout and present the next item.
    pub fn resume(&mut self) -> Presentation {
        if !self.has_started || self.finished {
            return Presentation::Ignored;
        }
        self.waiting = false;
        self.present_next()
    }

    pub fn present_next(&mut self) -> Presentation {
        if !self.has_started || self.finished || self.waiting {
            return Presentation::Ignored;
        }

        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next);
        let discarded = self.current.take();

        match self.queue.get(next) {
            Some(item) => {
                self.current = Some(item.clone());
                Presentation::Presented {
                    index: next,
                    item: item.clone(),
                    auto_skip: self.auto_skip_delay,
                    discarded,
                }
            }
            None => {
                self.finished = true;
                Presentation::Finished {
                    piles: self.piles.clone(),
                    discarded,
                }
            }
        }
    }

    pub fn sort_current_into_pile(&mut self, pile: usize) -> Result<Sorted, SequencerError> {
        let (Some(index), Some(item)) = (self.cursor, self.current.clone()) else {
            return Err(self.not_accepting());
        };
        if !self.has_started || self.finished || self.waiting {
            return Err(self.not_accepting());
        }

        let pile = self.piles.resolve(pile)?;
        self.piles.push(pile, item.clone())?;
        self.current = None;
        self.waiting = true;

        Ok(Sorted {
            index,
            item,
            pile,
            next_in: self.next_item_delay,
        })
    }

    /// Inactivity timer for the item at `index` elapsed. Inert unless that
    /// item is still current and the round is still active.
    pub fn auto_skip(&mut self, index: usize) -> Option<Skipped> {
        if !self.has_started || self.finished || self.waiting || self.cursor != Some(index) {
            return None;
        }
        let item = self.current.take()?;
        self.waiting = true;

        Some(Skipped {
            index,
            item,
            next_in: self.next_item_delay,
        })
    }

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if !self.has_started {
            Phase::NotStarted
        } else if self.waiting {
            Phase::Waiting
        } else {
            Phase::Presenting
        }
    }

    /// `None` until the first presentation.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.current.as_ref()
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn piles(&self) -> &PileStore {
        &self.piles
    }

    /// The queue after shuffling and limiting.
    pub fn queue(&self) -> &[Item] {
        &self.queue
    }

    fn not_accepting(&self) -> SequencerError {
        SequencerError::NotAccepting {
            phase: self.phase(),
        }
    }
}
