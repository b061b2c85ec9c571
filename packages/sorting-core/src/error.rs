//! Error types for rounds, grading, and configuration.

use std::fmt;

use thiserror::Error;

use crate::domain::sequence::Phase;

/// Errors raised by the sequencing state machine and its runtime.
///
/// None of these change round state; callers treat them as rejected actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    #[error("cannot start a round with an empty item catalog")]
    EmptyCatalog,
    #[error("invalid pile number: {pile}. Valid range: 1..{pile_count}")]
    InvalidPileId { pile: usize, pile_count: usize },
    #[error("no item is awaiting a pile (phase: {phase:?})")]
    NotAccepting { phase: Phase },
    #[error("sequencer task is no longer running")]
    Closed,
}

/// Coarse classification of a grading failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeErrorKind {
    TransportError,
    ParseError,
    ConfigError,
}

impl fmt::Display for GradeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeErrorKind::TransportError => f.write_str("TransportError"),
            GradeErrorKind::ParseError => f.write_str("ParseError"),
            GradeErrorKind::ConfigError => f.write_str("ConfigError"),
        }
    }
}

/// A failed grading or health request. Never accompanied by a result.
#[derive(Error, Debug)]
pub enum GradeError {
    #[error("transport error{}: {detail}", http_suffix(.status))]
    Transport {
        status: Option<u16>,
        body: Option<String>,
        timed_out: bool,
        detail: String,
    },
    #[error("could not parse grading response: {detail}")]
    Parse { body: String, detail: String },
    #[error("grading client misconfigured: {detail}")]
    Config { detail: String },
}

impl GradeError {
    pub fn kind(&self) -> GradeErrorKind {
        match self {
            GradeError::Transport { .. } => GradeErrorKind::TransportError,
            GradeError::Parse { .. } => GradeErrorKind::ParseError,
            GradeError::Config { .. } => GradeErrorKind::ConfigError,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GradeError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body, when one was received.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            GradeError::Transport { body, .. } => body.as_deref(),
            GradeError::Parse { body, .. } => Some(body),
            GradeError::Config { .. } => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GradeError::Transport { timed_out: true, .. })
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        GradeError::Transport {
            status: err.status().map(|s| s.as_u16()),
            body: None,
            timed_out: err.is_timeout(),
            detail: err.to_string(),
        }
    }
}

fn http_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Invalid configuration value read from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name} has invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: &'static str,
}
