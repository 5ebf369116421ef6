// src/clam/core.rs
//! Core types/traits for the lucky-clam event.
//! Keep this file dependency-light; every other clam module builds on it.
//!
//! The event never owns world objects. It talks to the host through the
//! traits at the bottom of this file and keeps only ids and coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::sync::Arc;
use std::time::Duration;

pub use crate::terrain::{BlockKind, BlockPos};

use super::error::ConfigError;

// ---------- Region ----------

/// Closed XZ rectangle that clams may be placed in. Y is resolved per column.
///
/// Only built through `new`, so every value is ordered and keeps one block of
/// room to the `i32` limits for neighbour checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RegionBounds {
    min_x: i32,
    max_x: i32,
    min_z: i32,
    max_z: i32,
}

impl RegionBounds {
    pub fn new(min_x: i32, max_x: i32, min_z: i32, max_z: i32) -> Result<Self, ConfigError> {
        let inside = |v: i32| v > i32::MIN && v < i32::MAX;
        if min_x > max_x || min_z > max_z || ![min_x, max_x, min_z, max_z].into_iter().all(inside) {
            return Err(ConfigError::InvalidRegion { min_x, max_x, min_z, max_z });
        }
        Ok(Self { min_x, max_x, min_z, max_z })
    }

    pub fn min_x(&self) -> i32 { self.min_x }

    pub fn max_x(&self) -> i32 { self.max_x }

    pub fn min_z(&self) -> i32 { self.min_z }

    pub fn max_z(&self) -> i32 { self.max_z }

    pub fn contains_xz(&self, x: i32, z: i32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    pub fn contains(&self, pos: BlockPos) -> bool { self.contains_xz(pos.x, pos.z) }
}

impl fmt::Display for RegionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x[{}..={}] z[{}..={}]", self.min_x, self.max_x, self.min_z, self.max_z)
    }
}

// ---------- Ids ----------

/// Opaque id of a materialized clam, issued by the host's `EntityMaterializer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// The player interacting with a clam.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }
}

/// Normalized item identifier: namespace stripped, upper-case, `[A-Z0-9_]+`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(String);

impl MaterialId {
    /// Accepts `diamond`, `DIAMOND` and `minecraft:diamond` alike.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix("minecraft:").unwrap_or(trimmed);
        if name.is_empty() {
            return None;
        }
        let upper = name.to_ascii_uppercase();
        if !upper.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(Self(upper))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ---------- Time ----------

/// Milliseconds on the event clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(ms: u64) -> Self { Self(ms) }

    pub const fn as_millis(self) -> u64 { self.0 }

    /// Time since `earlier`; zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        let ms = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(ms))
    }
}

/// Deferred re-materialization of a clam. Carries only the location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RespawnTask {
    pub location: BlockPos,
}

// ---------- Host traits ----------

/// Read-only view of one world's blocks.
pub trait TerrainOracle: Send + Sync + 'static {
    fn block(&self, pos: BlockPos) -> BlockKind;

    fn is_solid(&self, pos: BlockPos) -> bool { self.block(pos).is_solid() }

    fn is_passable(&self, pos: BlockPos) -> bool { self.block(pos).is_passable() }

    /// Lowest buildable Y of the world.
    fn min_height(&self) -> i32;

    /// Make sure the column at (x, z) is loaded before it is scanned.
    fn ensure_loaded(&self, x: i32, z: i32) { let _ = (x, z); }
}

/// Resolves a configured world name to its terrain.
pub trait WorldSource: Send + Sync + 'static {
    fn resolve(&self, world: &str) -> Option<Arc<dyn TerrainOracle>>;
}

/// Creates and removes the visible clam objects.
pub trait EntityMaterializer: Send + Sync + 'static {
    fn spawn(&self, location: BlockPos) -> EntityHandle;

    fn destroy(&self, handle: EntityHandle);

    /// Remove clams left behind by an earlier run. Returns how many were removed.
    fn sweep_strays(&self) -> usize { 0 }
}

/// Executes a resolved reward for a player.
pub trait RewardApplier: Send + Sync + 'static {
    fn grant_item(&self, player: &Player, material: &MaterialId, amount: u32);

    /// `template` still contains the `%player%` placeholder.
    fn run_command(&self, template: &str, player: &Player);
}

/// Event time source and deferred-task sink.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Timestamp;

    fn schedule_after(&self, delay: Duration, task: RespawnTask);
}
