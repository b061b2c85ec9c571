//! Error codes for the grader API.
//!
//! Every failure response carries one of these in its `x-error-code`
//! header. Add new codes here; never pass ad-hoc strings as error codes.

use core::fmt;

/// Canonical SCREAMING_SNAKE_CASE error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Malformed or unreadable JSON body
    BadRequest,
    /// Body has no usable `piles` field
    MissingPiles,
    /// `piles` is neither an array nor an object
    InvalidPiles,
    /// Body exceeds the configured JSON limit
    PayloadTooLarge,

    // Judging
    /// The language model call failed or answered with a non-2xx status
    UpstreamJudge,
    /// The language model answered with text that is not a JSON object
    InvalidJudgeOutput,

    // System
    /// Internal server error
    Internal,
    /// Server misconfiguration
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::MissingPiles => "MISSING_PILES",
            Self::InvalidPiles => "INVALID_PILES",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::UpstreamJudge => "UPSTREAM_JUDGE_ERROR",
            Self::InvalidJudgeOutput => "INVALID_JUDGE_OUTPUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    pub const ALL: [ErrorCode; 8] = [
        Self::BadRequest,
        Self::MissingPiles,
        Self::InvalidPiles,
        Self::PayloadTooLarge,
        Self::UpstreamJudge,
        Self::InvalidJudgeOutput,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
