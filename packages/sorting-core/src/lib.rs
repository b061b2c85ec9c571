//! Round sequencing and grading protocol for the two-player sorting game.
//!
//! A round is a [`Sequence`] driven by the [`sequencer`] task; its finished
//! [`PileStore`] is handed to a [`GradingClient`], which speaks the wire
//! contract in [`protocol`].

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod sequencer;

pub use client::GradingClient;
pub use config::{ClientConfig, RoundConfig};
pub use domain::{Item, Phase, PileId, PileStore, Player, Presentation, Sequence, Skipped, Sorted};
pub use error::{ConfigError, GradeError, GradeErrorKind, SequencerError};
pub use protocol::{build_request, GradeRequest, GradeResult, HealthStatus, Winner};
pub use sequencer::{SequenceEvent, SequenceSnapshot, SequencerHandle, SkipReason};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
