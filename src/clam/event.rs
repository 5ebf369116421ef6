// src/clam/event.rs
//! The event coordinator.
//!
//! `ClamEvent` owns all mutable event state (live clams, rest records, the
//! active config snapshot, the RNG) and is shared by reference with whatever
//! drives it. It is `Send + Sync`; interactions may arrive from any thread.
//!
//! Respawns already scheduled when a cycle restarts are not cancelled. When
//! they fire they add a clam on top of the new cycle's count. This is the
//! long-standing behavior of the event and is kept on purpose.

use bevy::log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use super::cooldown::{Admission, CooldownScheduler, CooldownWindow, RestState};
use super::core::{
    BlockPos, Clock, EntityHandle, EntityMaterializer, Player, RegionBounds, RespawnTask,
    RewardApplier, TerrainOracle, Timestamp, WorldSource,
};
use super::error::{ConfigError, EventError};
use super::placement::{find_locations, PlacementContext, PlacementReport};
use super::registry::{LocationSnapshot, SpawnRegistry};
use super::rewards::{Reward, RewardDef, RewardKind, RewardTable};
use super::settings::{ClamSettings, SpawnDef, SpawnParams};

/// Everything `ReloadConfig` replaces, swapped as one unit.
#[derive(Clone, Debug)]
pub struct EventConfig {
    pub world: String,
    pub rewards: RewardTable,
    pub spawn: SpawnParams,
    pub cooldown: CooldownWindow,
}

impl EventConfig {
    pub fn from_settings(settings: &ClamSettings) -> Result<(Self, Vec<ConfigError>), ConfigError> {
        let spawn = settings.spawn.to_params()?;
        let cooldown = settings.cooldown.to_window()?;
        let (rewards, rejected) = RewardTable::load_with_errors(&settings.rewards);
        Ok((Self { world: settings.world.clone(), rewards, spawn, cooldown }, rejected))
    }
}

/// The services the event borrows from its host.
#[derive(Clone)]
pub struct ClamHost {
    pub worlds: Arc<dyn WorldSource>,
    pub materializer: Arc<dyn EntityMaterializer>,
    pub rewards: Arc<dyn RewardApplier>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InteractionOutcome {
    Rewarded(Reward),
    /// The clam was accepted but the roll fell outside every reward window.
    Empty,
    StillResting { remaining: Duration },
    /// The handle is not a live clam.
    NotTracked,
}

impl InteractionOutcome {
    /// Accepted interactions consume the clam and schedule a respawn.
    pub fn is_accepted(&self) -> bool {
        matches!(self, InteractionOutcome::Rewarded(_) | InteractionOutcome::Empty)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StartReport {
    pub cleared: usize,
    pub placement: PlacementReport,
    pub spawned: Vec<EntityHandle>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReloadReport {
    pub rewards: usize,
    pub rejected: Vec<ConfigError>,
}

pub struct ClamEvent {
    host: ClamHost,
    config: RwLock<Arc<EventConfig>>,
    registry: SpawnRegistry,
    cooldowns: CooldownScheduler,
    rng: Mutex<ChaCha8Rng>,
    /// Held across clear + search + spawn.
    cycle: Mutex<()>,
}

impl ClamEvent {
    pub fn new(host: ClamHost, settings: &ClamSettings) -> Result<Self, ConfigError> {
        let (config, _) = EventConfig::from_settings(settings)?;
        let rng = match settings.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
        };
        log_config(&config);
        Ok(Self {
            host,
            config: RwLock::new(Arc::new(config)),
            registry: SpawnRegistry::new(),
            cooldowns: CooldownScheduler::new(),
            rng: Mutex::new(rng),
            cycle: Mutex::new(()),
        })
    }

    /// Current config snapshot. Stays valid even if a reload swaps it out.
    pub fn config(&self) -> Arc<EventConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn registry(&self) -> &SpawnRegistry { &self.registry }

    pub fn cooldowns(&self) -> &CooldownScheduler { &self.cooldowns }

    /// Independent RNG stream for work that runs off the coordinator.
    pub fn fork_rng(&self) -> ChaCha8Rng {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        ChaCha8Rng::seed_from_u64(rng.random())
    }

    // ---------- lifecycle ----------

    pub fn sweep_strays(&self) -> usize {
        let removed = self.host.materializer.sweep_strays();
        info!("LuckyClam: cleared {removed} stray clam entities");
        removed
    }

    pub fn resolve_world(&self, world: &str) -> Result<Arc<dyn TerrainOracle>, EventError> {
        self.host.worlds.resolve(world).ok_or_else(|| {
            warn!("LuckyClam: world {world} not found");
            EventError::WorldUnavailable { world: world.to_string() }
        })
    }

    /// Run one clear → search → spawn cycle with the configured region and count.
    pub fn start_configured_event(&self) -> Result<StartReport, EventError> {
        let spawn = self.config().spawn;
        self.start_event(spawn.region, spawn.count)
    }

    /// Clear every live clam, then search for and spawn up to `count` new ones.
    ///
    /// An unknown world aborts before anything is cleared. Respawns still
    /// pending from earlier cycles are left alone and will add to `count`.
    pub fn start_event(&self, region: RegionBounds, count: usize) -> Result<StartReport, EventError> {
        let config = self.config();
        let terrain = self.resolve_world(&config.world)?;
        let params = SpawnParams { region, count, ..config.spawn };

        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        let cleared = self.clear_active();
        let mut rng = self.fork_rng();
        let placement = find_locations(&PlacementContext { params, terrain: terrain.as_ref() }, &mut rng);
        let spawned = self.populate(&placement.locations);

        Ok(StartReport { cleared, placement, spawned })
    }

    /// Destroy and forget every live clam.
    pub fn clear_active(&self) -> usize {
        let removed = self.registry.clear(self.host.materializer.as_ref());
        info!("LuckyClam: cleared {removed} active clams");
        removed
    }

    /// Materialize and track a clam at each location.
    pub fn populate(&self, locations: &[BlockPos]) -> Vec<EntityHandle> {
        let handles: Vec<_> = locations
            .iter()
            .map(|&loc| {
                let handle = self.host.materializer.spawn(loc);
                self.registry.register(loc, handle);
                handle
            })
            .collect();
        info!(
            "LuckyClam: spawned {} clams in {}. Active clams: {}",
            handles.len(),
            self.config().world,
            self.registry.len()
        );
        handles
    }

    /// Put a clam back where one was taken. The spot is not re-validated.
    pub fn respawn(&self, task: RespawnTask) -> EntityHandle {
        let handle = self.host.materializer.spawn(task.location);
        self.registry.register(task.location, handle);
        info!(
            "LuckyClam: respawned clam at {}. Active clams: {}",
            task.location,
            self.registry.len()
        );
        handle
    }

    // ---------- config ----------

    /// Replace rewards and spawn parameters; world and cooldown are kept.
    pub fn reload_config(&self, rewards: &[RewardDef], spawn: &SpawnDef) -> Result<ReloadReport, ConfigError> {
        let current = self.config();
        let spawn = spawn.to_params().inspect_err(|e| warn!("LuckyClam: reload rejected: {e}"))?;
        let (rewards, rejected) = RewardTable::load_with_errors(rewards);
        Ok(self.swap_config(
            EventConfig { world: current.world.clone(), rewards, spawn, cooldown: current.cooldown },
            rejected,
        ))
    }

    /// Replace the whole config from a settings document.
    pub fn reload_settings(&self, settings: &ClamSettings) -> Result<ReloadReport, ConfigError> {
        let (config, rejected) = EventConfig::from_settings(settings)
            .inspect_err(|e| warn!("LuckyClam: reload rejected: {e}"))?;
        Ok(self.swap_config(config, rejected))
    }

    fn swap_config(&self, config: EventConfig, rejected: Vec<ConfigError>) -> ReloadReport {
        log_config(&config);
        let report = ReloadReport { rewards: config.rewards.len(), rejected };
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        report
    }

    // ---------- queries ----------

    pub fn list_active_locations(&self) -> LocationSnapshot {
        let snapshot = self.registry.snapshot();
        let listed: Vec<String> = snapshot.iter().map(|p| format!("({p})")).collect();
        info!("LuckyClam: listing {} clams: [{}]", snapshot.len(), listed.join(", "));
        snapshot
    }

    // ---------- interaction ----------

    /// A player opened the clam behind `handle` at time `now`.
    ///
    /// The whole decision runs under the location's lock: rest check, taking
    /// the clam out of the registry, the reward roll and the respawn schedule.
    pub fn handle_interaction(&self, handle: EntityHandle, player: &Player, now: Timestamp) -> InteractionOutcome {
        let Some(location) = self.registry.location_of(handle) else {
            return InteractionOutcome::NotTracked;
        };
        let config = self.config();

        self.cooldowns.with_location(location, |state| {
            if let Admission::StillResting { remaining } = state.admit(now, &config.cooldown) {
                return InteractionOutcome::StillResting { remaining };
            }
            // Someone else may have taken it while we waited for the lock.
            if self.registry.unregister(handle).is_none() {
                return InteractionOutcome::NotTracked;
            }
            *state = RestState::Resting { since: now };
            self.host.materializer.destroy(handle);

            let (reward, delay) = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                let reward = config.rewards.select(&mut *rng).cloned();
                (reward, config.cooldown.draw_respawn_delay(&mut *rng))
            };
            if let Some(reward) = &reward {
                self.apply_reward(reward, player);
            }
            self.host.clock.schedule_after(delay, RespawnTask { location });

            info!(
                "LuckyClam: {} opened clam at {} ({}); respawn in {:?}",
                player.name,
                location,
                if reward.is_some() { "reward" } else { "empty" },
                delay
            );

            match reward {
                Some(reward) => InteractionOutcome::Rewarded(reward),
                None => InteractionOutcome::Empty,
            }
        })
    }

    fn apply_reward(&self, reward: &Reward, player: &Player) {
        match &reward.kind {
            RewardKind::Item { material, amount } => {
                self.host.rewards.grant_item(player, material, *amount);
            }
            RewardKind::Command { template } => {
                self.host.rewards.run_command(template, player);
            }
        }
    }
}

fn log_config(config: &EventConfig) {
    info!(
        "LuckyClam: config loaded: world={}, maxClams={}, rewards={}, region {}",
        config.world,
        config.spawn.count,
        config.rewards.len(),
        config.spawn.region
    );
}
