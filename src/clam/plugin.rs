// src/clam/plugin.rs
//! Clam plugin wiring (glue).
//! - Settings file + event coordinator resources
//! - Host queues (materialize requests, applied rewards) drained into the ECS
//! - Restart timer, event clock, respawns
//! - Start / reload / list / interaction events

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::core::{BlockPos, EntityHandle, Player, Timestamp, WorldSource};
use super::event::{ClamEvent, ClamHost, InteractionOutcome};
use super::host::{AppliedReward, MaterializeQueue, MaterializeRequest, RewardOutbox};
use super::respawn::EventClock;
use super::settings::ClamSettings;
use super::tasks::{begin_event_cycle, collect_search_results, ClamSearchTask};
use crate::clam::core::Clock;
use crate::terrain::WorldSet;

/// Where the settings document lives.
#[derive(Resource, Clone)]
pub struct ClamPluginSettings {
    pub settings_path: String,
}

impl Default for ClamPluginSettings {
    fn default() -> Self {
        Self { settings_path: "assets/luckyclam.ron".to_string() }
    }
}

/// Worlds the event may target. Insert before startup; missing means none.
#[derive(Resource, Clone)]
pub struct ClamWorlds(pub Arc<dyn WorldSource>);

#[derive(Resource, Clone)]
pub struct ClamEventHandle(pub Arc<ClamEvent>);

#[derive(Resource, Clone)]
pub struct ClamClock(pub Arc<EventClock>);

#[derive(Resource, Clone)]
pub struct ClamMaterializer(pub Arc<MaterializeQueue>);

#[derive(Resource, Clone)]
pub struct ClamRewardOutbox(pub Arc<RewardOutbox>);

/// Fires `StartClamEvent` every `restart_interval_secs`.
#[derive(Resource)]
pub struct RestartTimer(pub Timer);

/// Marker on every materialized clam.
#[derive(Component, Clone, Copy, Debug)]
pub struct Clam {
    pub handle: EntityHandle,
    pub location: BlockPos,
}

/// Arena handle → ECS entity.
#[derive(Resource, Default)]
pub struct ClamEntities(pub HashMap<EntityHandle, Entity>);

/// Run a clear → search → spawn cycle.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct StartClamEvent;

/// Re-read the settings file and swap the config.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ReloadClamSettings;

/// Log the live clam locations.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ListClamLocations;

/// A player used a clam.
#[derive(Event, Clone, Debug)]
pub struct ClamInteraction {
    pub handle: EntityHandle,
    pub player: Player,
}

#[derive(Event, Clone, Debug)]
pub struct ClamInteractionResolved {
    pub handle: EntityHandle,
    pub player: Player,
    pub outcome: InteractionOutcome,
}

#[derive(Event, Clone, Debug)]
pub struct ClamRewardApplied(pub AppliedReward);

pub struct ClamPlugin;
impl Plugin for ClamPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClamPluginSettings>()
            .init_resource::<ClamEntities>()
            .init_resource::<ClamSearchTask>()
            .add_event::<StartClamEvent>()
            .add_event::<ReloadClamSettings>()
            .add_event::<ListClamLocations>()
            .add_event::<ClamInteraction>()
            .add_event::<ClamInteractionResolved>()
            .add_event::<ClamRewardApplied>()
            .add_systems(Startup, (init_clam_event, sweep_stray_clams, request_first_cycle).chain())
            .add_systems(
                Update,
                (
                    tick_event_clock,
                    tick_restart_timer,
                    reload_on_request,
                    begin_event_cycle,
                    collect_search_results,
                    fire_due_respawns,
                    handle_interactions,
                    list_on_request,
                    apply_materialize_requests,
                    forward_applied_rewards,
                )
                    .chain()
                    .run_if(resource_exists::<ClamEventHandle>),
            );
    }
}

/// Startup: read settings and build the coordinator with queue-backed host services.
fn init_clam_event(
    mut commands: Commands,
    plugin_settings: Res<ClamPluginSettings>,
    worlds: Option<Res<ClamWorlds>>,
) {
    let settings = match ClamSettings::load(&plugin_settings.settings_path) {
        Ok(s) => s,
        Err(e) => {
            warn!(
                "LuckyClam: could not read '{}' ({e}); using defaults",
                plugin_settings.settings_path
            );
            ClamSettings::default()
        }
    };

    let worlds: Arc<dyn WorldSource> = match worlds {
        Some(w) => w.0.clone(),
        None => {
            warn!("LuckyClam: no worlds registered; every cycle will fail");
            Arc::new(WorldSet::default())
        }
    };
    let clock = Arc::new(EventClock::new());
    let materializer = Arc::new(MaterializeQueue::new());
    let outbox = Arc::new(RewardOutbox::new());
    let host = ClamHost {
        worlds,
        materializer: materializer.clone(),
        rewards: outbox.clone(),
        clock: clock.clone(),
    };

    let event = match ClamEvent::new(host.clone(), &settings) {
        Ok(event) => event,
        Err(e) => {
            error!("LuckyClam: invalid settings ({e}); falling back to defaults");
            let fallback = ClamSettings { world: settings.world.clone(), ..ClamSettings::default() };
            match ClamEvent::new(host, &fallback) {
                Ok(event) => event,
                Err(e) => {
                    error!("LuckyClam: default settings rejected ({e}); event disabled");
                    return;
                }
            }
        }
    };

    commands.insert_resource(RestartTimer(Timer::new(
        Duration::from_secs(settings.restart_interval_secs.max(1)),
        TimerMode::Repeating,
    )));
    commands.insert_resource(ClamEventHandle(Arc::new(event)));
    commands.insert_resource(ClamClock(clock));
    commands.insert_resource(ClamMaterializer(materializer));
    commands.insert_resource(ClamRewardOutbox(outbox));
}

/// Startup: remove clam entities that the registry does not know about.
fn sweep_stray_clams(
    mut commands: Commands,
    event: Option<Res<ClamEventHandle>>,
    clams: Query<(Entity, &Clam)>,
) {
    let Some(event) = event else { return };
    let mut removed = event.0.sweep_strays();
    for (entity, clam) in &clams {
        if event.0.registry().location_of(clam.handle).is_none() {
            commands.entity(entity).despawn();
            removed += 1;
        }
    }
    if removed > 0 {
        info!("LuckyClam: removed {removed} untracked clam entities");
    }
}

fn request_first_cycle(mut starts: EventWriter<StartClamEvent>) {
    info!("LuckyClam: starting initial spawn");
    starts.write(StartClamEvent);
}

fn tick_event_clock(time: Res<Time>, clock: Option<Res<ClamClock>>) {
    let Some(clock) = clock else { return };
    let ms = u64::try_from(time.elapsed().as_millis()).unwrap_or(u64::MAX);
    clock.0.set_now(Timestamp::from_millis(ms));
}

fn tick_restart_timer(
    time: Res<Time>,
    timer: Option<ResMut<RestartTimer>>,
    mut starts: EventWriter<StartClamEvent>,
) {
    let Some(mut timer) = timer else { return };
    if timer.0.tick(time.delta()).just_finished() {
        starts.write(StartClamEvent);
    }
}

fn reload_on_request(
    mut requests: EventReader<ReloadClamSettings>,
    plugin_settings: Res<ClamPluginSettings>,
    event: Res<ClamEventHandle>,
    mut timer: ResMut<RestartTimer>,
) {
    if requests.read().count() == 0 {
        return;
    }
    let settings = match ClamSettings::load(&plugin_settings.settings_path) {
        Ok(s) => s,
        Err(e) => {
            warn!("LuckyClam: reload failed: {e}");
            return;
        }
    };
    if let Ok(report) = event.0.reload_settings(&settings) {
        timer.0.set_duration(Duration::from_secs(settings.restart_interval_secs.max(1)));
        info!(
            "LuckyClam: reloaded {} rewards ({} rejected)",
            report.rewards,
            report.rejected.len()
        );
    }
}

fn fire_due_respawns(clock: Res<ClamClock>, event: Res<ClamEventHandle>) {
    for task in clock.0.drain_due() {
        event.0.respawn(task);
    }
}

fn handle_interactions(
    mut interactions: EventReader<ClamInteraction>,
    event: Res<ClamEventHandle>,
    clock: Res<ClamClock>,
    mut resolved: EventWriter<ClamInteractionResolved>,
) {
    for ev in interactions.read() {
        let outcome = event.0.handle_interaction(ev.handle, &ev.player, clock.0.now());
        resolved.write(ClamInteractionResolved {
            handle: ev.handle,
            player: ev.player.clone(),
            outcome,
        });
    }
}

fn list_on_request(mut requests: EventReader<ListClamLocations>, event: Res<ClamEventHandle>) {
    for _ in requests.read() {
        event.0.list_active_locations();
    }
}

fn apply_materialize_requests(
    mut commands: Commands,
    queue: Res<ClamMaterializer>,
    mut entities: ResMut<ClamEntities>,
) {
    for request in queue.0.drain() {
        match request {
            MaterializeRequest::Spawn { handle, location } => {
                let entity = commands.spawn((Clam { handle, location }, Name::new("LuckyClam"))).id();
                entities.0.insert(handle, entity);
            }
            MaterializeRequest::Destroy { handle } => {
                if let Some(entity) = entities.0.remove(&handle) {
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}

fn forward_applied_rewards(outbox: Res<ClamRewardOutbox>, mut applied: EventWriter<ClamRewardApplied>) {
    for reward in outbox.0.drain() {
        match &reward {
            AppliedReward::Item { player, material, amount } => {
                info!("LuckyClam: {} received {amount} x {material}", player.name);
            }
            AppliedReward::Command { player, command } => {
                info!("LuckyClam: running '{command}' for {}", player.name);
            }
        }
        applied.write(ClamRewardApplied(reward));
    }
}
