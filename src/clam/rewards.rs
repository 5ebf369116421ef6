// src/clam/rewards.rs
//! Data-driven reward list + weighted selection.
//!
//! Chances are percentage points. Each accepted entry owns the window
//! `[threshold, threshold + chance)` where `threshold` is the sum of the
//! chances accepted before it, so entry order is part of the configuration:
//! reordering the list moves the windows. A roll past the last window is an
//! empty clam.

use bevy::log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::core::{MaterialId, Player};
use super::error::ConfigError;

/// Rolls are drawn uniformly from `[0, ROLL_SPAN)`.
pub const ROLL_SPAN: f64 = 100.0;

/// Placeholder replaced with the player's name in command rewards.
pub const PLAYER_PLACEHOLDER: &str = "%player%";

// ---------- Data form ----------

/// One raw `rewards` entry as written in the settings file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardDef {
    /// `"item"` or `"command"`, case-insensitive.
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub chance: Option<f64>,
    #[serde(default)]
    pub material: Option<String>,
    /// Item count; defaults to 1.
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub command: Option<String>,
}

impl RewardDef {
    pub fn item(material: &str, amount: i64, chance: f64) -> Self {
        Self {
            kind: Some("item".into()),
            chance: Some(chance),
            material: Some(material.into()),
            amount: Some(amount),
            command: None,
        }
    }

    pub fn command(command: &str, chance: f64) -> Self {
        Self {
            kind: Some("command".into()),
            chance: Some(chance),
            command: Some(command.into()),
            ..Default::default()
        }
    }
}

// ---------- Runtime form ----------

#[derive(Clone, Debug, PartialEq)]
pub enum RewardKind {
    Item { material: MaterialId, amount: u32 },
    /// Console command; still contains `%player%`.
    Command { template: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reward {
    pub kind: RewardKind,
    pub chance: f64,
    cumulative_threshold: f64,
}

impl Reward {
    /// Sum of the chances of every entry before this one.
    pub fn cumulative_threshold(&self) -> f64 { self.cumulative_threshold }

    pub fn window(&self) -> Range<f64> {
        self.cumulative_threshold..self.cumulative_threshold + self.chance
    }
}

/// Ordered, immutable reward list.
#[derive(Clone, Debug, Default)]
pub struct RewardTable {
    rewards: Vec<Reward>,
    total_chance: f64,
}

impl RewardTable {
    /// Build a table, logging and skipping every malformed entry.
    pub fn load(defs: &[RewardDef]) -> Self {
        Self::load_with_errors(defs).0
    }

    /// Like [`RewardTable::load`], also returning the rejected entries' errors.
    pub fn load_with_errors(defs: &[RewardDef]) -> (Self, Vec<ConfigError>) {
        let mut rewards = Vec::with_capacity(defs.len());
        let mut errors = Vec::new();
        let mut total = 0.0;

        for (index, def) in defs.iter().enumerate() {
            match parse_def(index, def) {
                Ok((kind, chance)) => {
                    rewards.push(Reward { kind, chance, cumulative_threshold: total });
                    total += chance;
                }
                Err(e) => {
                    warn!("LuckyClam: skipping reward: {e} ({def:?})");
                    errors.push(e);
                }
            }
        }

        if total > ROLL_SPAN {
            warn!(
                "LuckyClam: total reward chance {total} exceeds {ROLL_SPAN}; entries past {ROLL_SPAN} are unreachable"
            );
        }

        (Self { rewards, total_chance: total }, errors)
    }

    /// Roll once and return the reward whose window holds the roll.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Reward> {
        let roll = rng.random_range(0.0..ROLL_SPAN);
        self.select_with_roll(roll)
    }

    /// First entry with `roll < threshold + chance`; `None` past the last window.
    pub fn select_with_roll(&self, roll: f64) -> Option<&Reward> {
        self.rewards
            .iter()
            .find(|r| roll < r.cumulative_threshold + r.chance)
    }

    pub fn total_chance(&self) -> f64 { self.total_chance }

    pub fn len(&self) -> usize { self.rewards.len() }

    pub fn is_empty(&self) -> bool { self.rewards.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Reward> { self.rewards.iter() }
}

fn parse_def(index: usize, def: &RewardDef) -> Result<(RewardKind, f64), ConfigError> {
    let Some(kind) = def.kind.as_deref() else {
        return Err(ConfigError::MissingType { index });
    };
    let chance = match def.chance {
        Some(c) if c > 0.0 && c.is_finite() => c,
        other => return Err(ConfigError::NonPositiveChance { index, chance: other }),
    };

    let kind = if kind.eq_ignore_ascii_case("item") {
        let material = def
            .material
            .as_deref()
            .and_then(MaterialId::parse)
            .ok_or_else(|| ConfigError::InvalidMaterial { index, material: def.material.clone() })?;
        let raw_amount = def.amount.unwrap_or(1);
        let amount = u32::try_from(raw_amount)
            .ok()
            .filter(|a| *a >= 1)
            .ok_or(ConfigError::InvalidAmount { index, amount: raw_amount })?;
        RewardKind::Item { material, amount }
    } else if kind.eq_ignore_ascii_case("command") {
        let template = def
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingCommand { index })?;
        RewardKind::Command { template: template.to_string() }
    } else {
        return Err(ConfigError::UnknownType { index, kind: kind.to_string() });
    };

    Ok((kind, chance))
}

/// Substitute the player's name into a command template.
pub fn render_command(template: &str, player: &Player) -> String {
    template.replace(PLAYER_PLACEHOLDER, &player.name)
}
