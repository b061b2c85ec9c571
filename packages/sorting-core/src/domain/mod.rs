//! Domain layer: items, piles, and the round state machine.

pub mod item;
pub mod piles;
pub mod sequence;

#[cfg(test)]
mod tests_props_sequence;
#[cfg(test)]
mod tests_sequence;

// Re-exports for ergonomics
pub use item::Item;
pub use piles::{PileId, PileStore, Player};
pub use sequence::{Phase, Presentation, Sequence, Skipped, Sorted};
