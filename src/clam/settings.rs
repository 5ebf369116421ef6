// src/clam/settings.rs
//! Event settings (data form) + RON loader.
//!
//! Every key is optional; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::cooldown::CooldownWindow;
use super::core::RegionBounds;
use super::error::{ConfigError, SettingsError};
use super::rewards::RewardDef;

/// Whole settings document (`assets/luckyclam.ron`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClamSettings {
    /// World the event runs in.
    pub world: String,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    /// Seconds between automatic event restarts.
    pub restart_interval_secs: u64,
    pub spawn: SpawnDef,
    pub cooldown: CooldownDef,
    /// Order matters, see `RewardTable`.
    pub rewards: Vec<RewardDef>,
}

impl Default for ClamSettings {
    fn default() -> Self {
        Self {
            world: "atlantic".to_string(),
            seed: None,
            restart_interval_secs: 60 * 60,
            spawn: SpawnDef::default(),
            cooldown: CooldownDef::default(),
            rewards: Vec::new(),
        }
    }
}

impl ClamSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let bytes = std::fs::read(path)?;
        ron::de::from_bytes(&bytes).map_err(|e| SettingsError::Ron(e.to_string()))
    }

    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        ron::de::from_str(text).map_err(|e| SettingsError::Ron(e.to_string()))
    }
}

// ---------- spawn ----------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnDef {
    pub max_clams: u32,
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
    /// Attempts per placement slot.
    pub max_attempts: u32,
    /// Surface scans start here and walk down to the world's min height.
    pub surface_ceiling: i32,
}

impl Default for SpawnDef {
    fn default() -> Self {
        Self {
            max_clams: 5,
            min_x: -200,
            max_x: 200,
            min_z: -200,
            max_z: 200,
            max_attempts: 100,
            surface_ceiling: 100,
        }
    }
}

/// Validated spawn parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnParams {
    pub region: RegionBounds,
    pub count: usize,
    pub max_attempts: u32,
    pub surface_ceiling: i32,
}

impl SpawnDef {
    pub fn region(&self) -> Result<RegionBounds, ConfigError> {
        RegionBounds::new(self.min_x, self.max_x, self.min_z, self.max_z)
    }

    pub fn to_params(&self) -> Result<SpawnParams, ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(SpawnParams {
            region: self.region()?,
            count: self.max_clams as usize,
            max_attempts: self.max_attempts,
            surface_ceiling: self.surface_ceiling,
        })
    }
}

// ---------- cooldown ----------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownDef {
    /// Minimum rest, in units.
    pub min: u32,
    /// Maximum respawn delay, in units.
    pub max: u32,
    /// Length of one unit in seconds.
    pub unit_secs: u64,
}

impl Default for CooldownDef {
    fn default() -> Self {
        Self { min: 10, max: 30, unit_secs: 60 }
    }
}

impl CooldownDef {
    pub fn to_window(&self) -> Result<CooldownWindow, ConfigError> {
        CooldownWindow::new(self.min, self.max, Duration::from_secs(self.unit_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_takes_defaults() {
        let s = ClamSettings::from_ron_str("()").unwrap();
        assert_eq!(s, ClamSettings::default());
        let p = s.spawn.to_params().unwrap();
        assert_eq!(p.count, 5);
        assert_eq!(p.region, RegionBounds::new(-200, 200, -200, 200).unwrap());
        assert_eq!(s.cooldown.to_window().unwrap().min(), Duration::from_secs(600));
    }

    #[test]
    fn partial_document_and_type_alias() {
        let text = r#"
            #![enable(implicit_some)]
            (
                world: "reef",
                spawn: (max_clams: 2, min_x: 0, max_x: 10),
                rewards: [
                    (type: "item", chance: 25.0, material: "diamond"),
                    (kind: "command", chance: 5.0, command: "say %player%"),
                ],
            )
        "#;
        let s = ClamSettings::from_ron_str(text).unwrap();
        assert_eq!(s.world, "reef");
        assert_eq!(s.spawn.max_clams, 2);
        assert_eq!(s.spawn.min_z, -200);
        assert_eq!(s.rewards.len(), 2);
        assert_eq!(s.rewards[0].kind.as_deref(), Some("item"));
        assert_eq!(s.rewards[0].material.as_deref(), Some("diamond"));
        assert_eq!(s.rewards[1].kind.as_deref(), Some("command"));
    }

    #[test]
    fn invalid_spawn_params() {
        let bad_region = SpawnDef { min_x: 5, max_x: -5, ..SpawnDef::default() };
        assert!(matches!(bad_region.to_params(), Err(ConfigError::InvalidRegion { .. })));
        let at_limit = SpawnDef { min_x: i32::MAX, max_x: i32::MAX, ..SpawnDef::default() };
        assert!(matches!(at_limit.to_params(), Err(ConfigError::InvalidRegion { .. })));
        let no_attempts = SpawnDef { max_attempts: 0, ..SpawnDef::default() };
        assert_eq!(no_attempts.to_params(), Err(ConfigError::ZeroAttempts));
    }

    #[test]
    fn syntax_errors_surface_as_ron() {
        assert!(matches!(ClamSettings::from_ron_str("(world: )"), Err(SettingsError::Ron(_))));
    }
}
