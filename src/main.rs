use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use lucky_clam::clam::core::Player;
use lucky_clam::clam::plugin::{
    Clam, ClamInteraction, ClamInteractionResolved, ClamPlugin, ClamRewardApplied, ClamWorlds,
    ListClamLocations,
};
use lucky_clam::clam::InteractionOutcome;
use lucky_clam::terrain::{BlockKind, Column, ColumnWorld, WorldSet};

const DIVERS: &[&str] = &["Alex", "Steve", "Noor", "Kai"];

/// Headless run: how long, and how often a diver opens a clam.
#[derive(Resource)]
struct DemoClock {
    dive: Timer,
    listing: Timer,
    shutdown: Timer,
}

impl Default for DemoClock {
    fn default() -> Self {
        Self {
            dive: Timer::from_seconds(1.5, TimerMode::Repeating),
            listing: Timer::from_seconds(10.0, TimerMode::Repeating),
            shutdown: Timer::from_seconds(45.0, TimerMode::Once),
        }
    }
}

/// Shallow seabed with dry sandbanks; deep columns stay under water.
fn atlantic_seabed() -> ColumnWorld {
    ColumnWorld::with_generator(-64, |x, z| {
        let h = (x.wrapping_mul(73_856_093) ^ z.wrapping_mul(19_349_663)).rem_euclid(16);
        let top = match h % 4 {
            0 => BlockKind::Sand,
            1 => BlockKind::Gravel,
            2 => BlockKind::Stone,
            _ => BlockKind::BlueStainedGlass,
        };
        if h < 5 {
            Some(Column::flooded(48 + h, top, 62))
        } else {
            Some(Column::dry(58 + h / 3, top))
        }
    })
}

fn main() {
    let worlds = WorldSet::default().with_world("atlantic", Arc::new(atlantic_seabed()));

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 30.0))),
        )
        .add_plugins(LogPlugin::default())
        .insert_resource(ClamWorlds(Arc::new(worlds)))
        .add_plugins(ClamPlugin)
        .init_resource::<DemoClock>()
        .add_systems(Update, (send_divers, report_outcomes, report_rewards, shut_down))
        .run();
}

fn send_divers(
    time: Res<Time>,
    mut clock: ResMut<DemoClock>,
    clams: Query<&Clam>,
    mut interactions: EventWriter<ClamInteraction>,
    mut listing: EventWriter<ListClamLocations>,
) {
    if clock.listing.tick(time.delta()).just_finished() {
        listing.write(ListClamLocations);
    }
    if !clock.dive.tick(time.delta()).just_finished() {
        return;
    }
    let live: Vec<&Clam> = clams.iter().collect();
    if live.is_empty() {
        return;
    }
    let mut rng = rand::rng();
    let clam = live[rng.random_range(0..live.len())];
    let diver = DIVERS[rng.random_range(0..DIVERS.len())];
    interactions.write(ClamInteraction { handle: clam.handle, player: Player::new(diver) });
}

fn report_outcomes(mut resolved: EventReader<ClamInteractionResolved>) {
    for ev in resolved.read() {
        match &ev.outcome {
            InteractionOutcome::Rewarded(_) | InteractionOutcome::Empty => {}
            InteractionOutcome::StillResting { remaining } => {
                info!("{} found the clam shut, {:.1}s to go", ev.player.name, remaining.as_secs_f32());
            }
            InteractionOutcome::NotTracked => {
                info!("{} reached for a clam that was already gone", ev.player.name);
            }
        }
    }
}

fn report_rewards(mut applied: EventReader<ClamRewardApplied>) {
    for ev in applied.read() {
        debug!("reward delivered: {:?}", ev.0);
    }
}

fn shut_down(time: Res<Time>, mut clock: ResMut<DemoClock>, mut exit: EventWriter<AppExit>) {
    if clock.shutdown.tick(time.delta()).just_finished() {
        info!("demo finished");
        exit.write(AppExit::Success);
    }
}
