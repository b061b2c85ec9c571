use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::Item;
use crate::error::SequencerError;

/// 1-based pile identifier, valid for the store that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PileId(usize);

impl PileId {
    pub fn get(self) -> usize {
        self.0
    }

    fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two competing players. Player A owns the first half of the piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    A,
    B,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::A => f.write_str("A"),
            Player::B => f.write_str("B"),
        }
    }
}

/// Fixed table of piles `1..=pile_count`, each an append-only list of items.
///
/// Every pile exists from construction onward, so the store is always fully
/// populated when read for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PileStore {
    piles: Vec<Vec<Item>>,
}

impl PileStore {
    /// Create `pile_count` empty piles. A count below 1 is coerced to 1.
    pub fn new(pile_count: usize) -> Self {
        let pile_count = pile_count.max(1);
        Self {
            piles: vec![Vec::new(); pile_count],
        }
    }

    pub fn pile_count(&self) -> usize {
        self.piles.len()
    }

    /// Validate a raw pile number against `[1, pile_count]`.
    pub fn resolve(&self, pile: usize) -> Result<PileId, SequencerError> {
        if (1..=self.pile_count()).contains(&pile) {
            Ok(PileId(pile))
        } else {
            Err(SequencerError::InvalidPileId {
                pile,
                pile_count: self.pile_count(),
            })
        }
    }

    pub fn pile_ids(&self) -> impl Iterator<Item = PileId> {
        (1..=self.pile_count()).map(PileId)
    }

    pub fn items(&self, pile: PileId) -> &[Item] {
        self.piles
            .get(pile.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Piles in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PileId, &[Item])> {
        self.piles
            .iter()
            .enumerate()
            .map(|(i, items)| (PileId(i + 1), items.as_slice()))
    }

    pub fn total_items(&self) -> usize {
        self.piles.iter().map(Vec::len).sum()
    }

    pub fn owner(&self, pile: PileId) -> Player {
        let player_a_piles = self.pile_count().div_ceil(2);
        if pile.get() <= player_a_piles {
            Player::A
        } else {
            Player::B
        }
    }

    pub(crate) fn push(&mut self, pile: PileId, item: Item) -> Result<(), SequencerError> {
        let pile_count = self.pile_count();
        let slot = self
            .piles
            .get_mut(pile.index())
            .ok_or(SequencerError::InvalidPileId {
                pile: pile.get(),
                pile_count,
            })?;
        slot.push(item);
        Ok(())
    }

    /// Human-readable listing of one pile, as logged when a round finishes.
    pub fn describe(&self, pile: PileId) -> String {
        let items = self.items(pile);
        if items.is_empty() {
            return format!("Pile {pile}: (empty)");
        }
        let mut out = format!("Pile {pile} ({} items):", items.len());
        for item in items {
            out.push_str("\n- ");
            out.push_str(item.display_name());
        }
        out
    }
}
