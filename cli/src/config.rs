//! Numeric knobs read from the environment.
//!
//! Paths and dates come in through clap flags with env fallbacks; the values
//! here have no flag and fall back to a default when unset or unparsable.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use itinerary::consts::SEED_BOARD_COUNT;

/// Default state file, relative to the working directory.
pub(crate) const DEFAULT_STATE_PATH: &str = "itinerary.json";

/// Upper bound on seeded boards; larger values are clamped.
const MAX_SEED_BOARDS: usize = 366;

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Settings for `init`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SeedConfig {
    /// Number of boards placed on a fresh timeline.
    pub(crate) boards: usize,
}

impl SeedConfig {
    pub(crate) fn from_env() -> Self {
        Self { boards: env_parse("ITINERARY_SEED_BOARDS", SEED_BOARD_COUNT).min(MAX_SEED_BOARDS) }
    }
}
