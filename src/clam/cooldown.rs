// src/clam/cooldown.rs
//! Per-location rest tracking.
//!
//! Every location gets its own lock. An interaction holds that lock from the
//! rest check until its respawn is scheduled, so two near-simultaneous clicks
//! on the same clam can never both be granted. Locations never share a lock,
//! and records are never removed.

use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::core::{BlockPos, Timestamp};
use super::error::ConfigError;

/// Minimum rest and maximum respawn delay, in whole time units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownWindow {
    min_units: u32,
    max_units: u32,
    unit: Duration,
}

impl CooldownWindow {
    pub fn new(min_units: u32, max_units: u32, unit: Duration) -> Result<Self, ConfigError> {
        if unit.is_zero() {
            return Err(ConfigError::ZeroCooldownUnit);
        }
        if min_units > max_units {
            return Err(ConfigError::CooldownRange { min: min_units, max: max_units });
        }
        // Every later multiply stays at or below this one.
        if unit.checked_mul(max_units).is_none() {
            return Err(ConfigError::CooldownOverflow { max: max_units, unit_secs: unit.as_secs() });
        }
        Ok(Self { min_units, max_units, unit })
    }

    pub fn min(&self) -> Duration { self.unit * self.min_units }

    pub fn max(&self) -> Duration { self.unit * self.max_units }

    pub fn unit(&self) -> Duration { self.unit }

    /// `min + uniform(0..=max-min)` whole units.
    pub fn draw_respawn_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let units = rng.random_range(self.min_units..=self.max_units);
        self.unit * units
    }
}

impl Default for CooldownWindow {
    fn default() -> Self {
        Self { min_units: 10, max_units: 30, unit: Duration::from_secs(60) }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestState {
    /// Never interacted with.
    #[default]
    Idle,
    Resting { since: Timestamp },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    StillResting { remaining: Duration },
}

impl RestState {
    /// Whether an interaction at `now` may proceed. Does not change state.
    pub fn admit(&self, now: Timestamp, window: &CooldownWindow) -> Admission {
        match *self {
            RestState::Idle => Admission::Accepted,
            RestState::Resting { since } => {
                let elapsed = now.saturating_since(since);
                if elapsed < window.min() {
                    Admission::StillResting { remaining: window.min() - elapsed }
                } else {
                    Admission::Accepted
                }
            }
        }
    }
}

type Slot = Arc<Mutex<RestState>>;

#[derive(Default)]
pub struct CooldownScheduler {
    slots: Mutex<HashMap<BlockPos, Slot>>,
}

impl CooldownScheduler {
    pub fn new() -> Self { Self::default() }

    fn slot(&self, location: BlockPos) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(location).or_default().clone()
    }

    /// Run `f` while holding the lock of `location` only.
    pub fn with_location<T>(&self, location: BlockPos, f: impl FnOnce(&mut RestState) -> T) -> T {
        let slot = self.slot(location);
        let mut state = slot.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Check and, when accepted, start resting at `now`.
    pub fn try_begin(&self, location: BlockPos, now: Timestamp, window: &CooldownWindow) -> Admission {
        self.with_location(location, |state| {
            let admission = state.admit(now, window);
            if admission == Admission::Accepted {
                *state = RestState::Resting { since: now };
            }
            admission
        })
    }

    pub fn state(&self, location: BlockPos) -> RestState {
        let slot = self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&location)
            .cloned();
        match slot {
            Some(slot) => *slot.lock().unwrap_or_else(PoisonError::into_inner),
            None => RestState::Idle,
        }
    }

    /// Locations that have ever been interacted with.
    pub fn tracked_locations(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
