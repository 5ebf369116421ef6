// src/clam/error.rs
//! Error taxonomy. Only `EventError` ever aborts an operation; the rest are
//! collected per entry or per slot and logged.

use thiserror::Error;

/// A malformed reward entry or event parameter. Per entry, never fatal to a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("reward #{index}: missing `type`")]
    MissingType { index: usize },
    #[error("reward #{index}: unknown type '{kind}'")]
    UnknownType { index: usize, kind: String },
    #[error("reward #{index}: chance must be > 0 (got {chance:?})")]
    NonPositiveChance { index: usize, chance: Option<f64> },
    #[error("reward #{index}: invalid material {material:?}")]
    InvalidMaterial { index: usize, material: Option<String> },
    #[error("reward #{index}: amount must be >= 1 (got {amount})")]
    InvalidAmount { index: usize, amount: i64 },
    #[error("reward #{index}: missing `command`")]
    MissingCommand { index: usize },
    #[error("invalid region x[{min_x}..={max_x}] z[{min_z}..={max_z}]")]
    InvalidRegion { min_x: i32, max_x: i32, min_z: i32, max_z: i32 },
    #[error("max_attempts must be >= 1")]
    ZeroAttempts,
    #[error("invalid cooldown: min {min} > max {max}")]
    CooldownRange { min: u32, max: u32 },
    #[error("cooldown unit must be non-zero")]
    ZeroCooldownUnit,
    #[error("cooldown of {max} units of {unit_secs}s does not fit in a duration")]
    CooldownOverflow { max: u32, unit_secs: u64 },
}

/// A placement slot used every attempt without finding a valid spot.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("slot {slot}: no valid location after {attempts} attempts")]
pub struct PlacementExhausted {
    pub slot: usize,
    pub attempts: u32,
}

/// Errors that abort a whole event cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("world '{world}' is not available")]
    WorldUnavailable { world: String },
}

/// Reading the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O while reading settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
}
