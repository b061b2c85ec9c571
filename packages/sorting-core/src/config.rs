//! Round and client configuration, loaded from environment variables.
//!
//! Every value has a default, so an empty environment yields a playable
//! six-pile round against a grader on `localhost:3000`. Values are read
//! through a lookup function so tests never touch the process environment.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PILE_COUNT: usize = 6;
pub const DEFAULT_NEXT_ITEM_DELAY_SECS: f64 = 1.5;
pub const DEFAULT_AUTO_SKIP_DELAY_SECS: f64 = 3.0;
pub const DEFAULT_GRADE_URL: &str = "http://localhost:3000/grade";
pub const DEFAULT_HEALTH_URL: &str = "http://localhost:3000/health";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Settings fixed before a round starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundConfig {
    pub shuffle_on_start: bool,
    /// 0 presents every item; otherwise only the first N after shuffling.
    pub item_limit: usize,
    pub pile_count: usize,
    /// Pause after each assignment or skip, and before the first item.
    pub next_item_delay: Duration,
    /// `None` disables auto-skip.
    pub auto_skip_delay: Option<Duration>,
    /// Shuffle seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            shuffle_on_start: true,
            item_limit: 0,
            pile_count: DEFAULT_PILE_COUNT,
            next_item_delay: delay_from_secs(DEFAULT_NEXT_ITEM_DELAY_SECS),
            auto_skip_delay: auto_skip_from_secs(DEFAULT_AUTO_SKIP_DELAY_SECS),
            seed: None,
        }
    }
}

impl RoundConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let next_item_delay = parse_secs_or(
            &lookup,
            "SORTING_NEXT_ITEM_DELAY_SECS",
            DEFAULT_NEXT_ITEM_DELAY_SECS,
        )?;
        let auto_skip_delay = parse_secs_or(
            &lookup,
            "SORTING_AUTO_SKIP_DELAY_SECS",
            DEFAULT_AUTO_SKIP_DELAY_SECS,
        )?;

        Ok(Self {
            shuffle_on_start: parse_bool_or(&lookup, "SORTING_SHUFFLE", defaults.shuffle_on_start)?,
            item_limit: parse_or(&lookup, "SORTING_ITEM_LIMIT", defaults.item_limit)?,
            pile_count: parse_or(&lookup, "SORTING_PILE_COUNT", defaults.pile_count)?.max(1),
            next_item_delay: delay_from_secs(next_item_delay),
            auto_skip_delay: auto_skip_from_secs(auto_skip_delay),
            seed: parse_optional(&lookup, "SORTING_SEED")?,
        })
    }
}

/// Where and how the grading client talks to the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub grade_url: String,
    pub health_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            grade_url: DEFAULT_GRADE_URL.to_string(),
            health_url: DEFAULT_HEALTH_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let grade_url = lookup("SORTING_GRADE_URL").unwrap_or_else(|| DEFAULT_GRADE_URL.into());
        let health_url = lookup("SORTING_HEALTH_URL").unwrap_or_else(|| DEFAULT_HEALTH_URL.into());
        let timeout_secs = parse_or(&lookup, "SORTING_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        for (name, value) in [
            ("SORTING_GRADE_URL", &grade_url),
            ("SORTING_HEALTH_URL", &health_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError {
                    name,
                    value: value.clone(),
                    reason: "must be an http:// or https:// URL",
                });
            }
        }

        Ok(Self {
            grade_url,
            health_url,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}

/// Accept a seconds value only if it fits in a [`Duration`]. Negative,
/// zero and non-finite values pass; the helpers below map them to "no delay".
pub fn validate_delay_secs(secs: f64) -> Result<f64, &'static str> {
    if secs.is_finite() && secs > 0.0 && Duration::try_from_secs_f64(secs).is_err() {
        return Err("out of range");
    }
    Ok(secs)
}

/// Seconds to a delay; negative or non-finite values become zero and values
/// too large for a `Duration` saturate.
pub fn delay_from_secs(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Seconds to an auto-skip delay; anything not strictly positive disables it.
pub fn auto_skip_from_secs(secs: f64) -> Option<Duration> {
    (secs.is_finite() && secs > 0.0).then(|| delay_from_secs(secs))
}

fn parse_secs_or<F>(lookup: &F, name: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = parse_or(lookup, name, default)?;
    validate_delay_secs(secs).map_err(|reason| ConfigError {
        name,
        value: lookup(name).unwrap_or_default(),
        reason,
    })
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_optional(lookup, name)?.unwrap_or(default))
}

fn parse_optional<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| ConfigError {
            name,
            value: raw,
            reason: "could not be parsed",
        }),
    }
}

fn parse_bool_or<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            name,
            value: raw,
            reason: "expected true/false",
        }),
    }
}
