mod common;

use std::time::Duration;

use lucky_clam::clam::core::{BlockPos, Clock, EntityHandle, Player, RegionBounds, Timestamp};
use lucky_clam::clam::error::EventError;
use lucky_clam::clam::host::AppliedReward;
use lucky_clam::clam::rewards::{RewardDef, RewardKind};
use lucky_clam::clam::settings::{ClamSettings, SpawnDef};
use lucky_clam::clam::InteractionOutcome;

use common::{cooldown, settings, single_column, Harness};

const MINUTE: u64 = 60_000;

#[test]
fn start_event_spawns_the_configured_count_inside_the_region() {
    let h = Harness::new(&settings());
    let report = h.event.start_configured_event().unwrap();

    assert_eq!(report.spawned.len(), 5);
    assert!(report.placement.exhausted.is_empty());
    let region = RegionBounds::new(-200, 200, -200, 200).unwrap();
    for loc in h.event.list_active_locations().iter() {
        assert!(region.contains(loc));
        assert_eq!(loc.y, 63);
    }
    assert_eq!(h.event.registry().len(), 5);
    assert_eq!(h.spawned_handles().len(), 5);
}

#[test]
fn start_event_clears_the_previous_cycle() {
    let h = Harness::new(&settings());
    let first = h.event.start_configured_event().unwrap();
    let region = RegionBounds::new(-10, 10, -10, 10).unwrap();
    let second = h.event.start_event(region, 3).unwrap();

    assert_eq!(second.cleared, 5);
    assert_eq!(h.event.registry().len(), 3);
    for handle in first.spawned {
        assert_eq!(h.event.registry().location_of(handle), None);
    }
    for loc in h.event.list_active_locations().iter() {
        assert!(region.contains(loc));
    }
}

#[test]
fn unknown_world_leaves_live_clams_alone() {
    let h = Harness::new(&ClamSettings { world: "pacific".into(), ..settings() });
    h.event.populate(&[BlockPos::new(1, 63, 1)]);

    let err = h.event.start_configured_event().unwrap_err();
    assert_eq!(err, EventError::WorldUnavailable { world: "pacific".into() });
    assert_eq!(h.event.registry().len(), 1);
}

#[test]
fn unknown_handle_is_not_tracked() {
    let h = Harness::new(&settings());
    h.event.start_configured_event().unwrap();
    let outcome = h.event.handle_interaction(EntityHandle(9_999), &Player::new("Alex"), Timestamp::ZERO);
    assert_eq!(outcome, InteractionOutcome::NotTracked);
    assert_eq!(h.clock.pending(), 0);
}

#[test]
fn accepted_interaction_rewards_destroys_and_schedules_respawn() {
    let h = Harness::new(&settings());
    let report = h.event.start_configured_event().unwrap();
    h.materializer.drain();
    let handle = report.spawned[0];

    let outcome = h.event.handle_interaction(handle, &Player::new("Alex"), h.clock.now());
    let InteractionOutcome::Rewarded(reward) = &outcome else { panic!("expected a reward, got {outcome:?}") };
    assert!(matches!(reward.kind, RewardKind::Item { amount: 2, .. }));

    assert_eq!(h.event.registry().len(), 4);
    assert_eq!(h.event.registry().location_of(handle), None);
    assert_eq!(h.clock.pending(), 1);
    let applied = h.outbox.drain();
    assert_eq!(applied.len(), 1);
    assert!(matches!(&applied[0], AppliedReward::Item { player, amount: 2, .. } if player.name == "Alex"));

    // A second click on the consumed handle does nothing.
    let again = h.event.handle_interaction(handle, &Player::new("Steve"), h.clock.now());
    assert_eq!(again, InteractionOutcome::NotTracked);
    assert_eq!(h.clock.pending(), 1);
}

#[test]
fn empty_table_still_consumes_the_clam() {
    let h = Harness::new(&ClamSettings { rewards: Vec::new(), ..settings() });
    let report = h.event.start_configured_event().unwrap();
    let outcome = h.event.handle_interaction(report.spawned[0], &Player::new("Alex"), Timestamp::ZERO);
    assert_eq!(outcome, InteractionOutcome::Empty);
    assert!(outcome.is_accepted());
    assert_eq!(h.clock.pending(), 1);
    assert!(h.outbox.drain().is_empty());
}

#[test]
fn coincident_clams_share_one_rest_period() {
    let h = Harness::new(&ClamSettings {
        spawn: single_column(3),
        cooldown: cooldown(10, 30),
        ..settings()
    });
    let spawned = h.event.start_configured_event().unwrap().spawned;
    assert_eq!(spawned.len(), 3);
    let alex = Player::new("Alex");

    assert!(h.event.handle_interaction(spawned[0], &alex, Timestamp::ZERO).is_accepted());

    let just_before = Timestamp::from_millis(10 * MINUTE - 1);
    assert_eq!(
        h.event.handle_interaction(spawned[1], &alex, just_before),
        InteractionOutcome::StillResting { remaining: Duration::from_millis(1) }
    );
    // Refused clams stay live.
    assert_eq!(h.event.registry().location_of(spawned[1]), Some(BlockPos::new(0, 63, 0)));

    let at_min = Timestamp::from_millis(10 * MINUTE);
    assert!(h.event.handle_interaction(spawned[1], &alex, at_min).is_accepted());
    assert_eq!(
        h.event.handle_interaction(spawned[2], &alex, at_min),
        InteractionOutcome::StillResting { remaining: Duration::from_secs(600) }
    );
}

#[test]
fn respawn_fires_within_the_delay_window_at_the_same_spot() {
    let h = Harness::new(&ClamSettings { cooldown: cooldown(10, 30), ..settings() });
    let spawned = h.event.start_configured_event().unwrap().spawned;
    let location = h.event.registry().location_of(spawned[0]).unwrap();
    h.event.handle_interaction(spawned[0], &Player::new("Alex"), h.clock.now());

    let due = h.clock.next_due().unwrap();
    assert!(due >= Timestamp::from_millis(10 * MINUTE));
    assert!(due <= Timestamp::from_millis(30 * MINUTE));
    assert_eq!(due.as_millis() % MINUTE, 0);

    h.clock.advance(Duration::from_millis(10 * MINUTE - 1));
    assert!(h.clock.drain_due().is_empty());

    h.clock.advance(Duration::from_secs(20 * 60) + Duration::from_millis(1));
    let tasks = h.clock.drain_due();
    assert_eq!(tasks.len(), 1);
    let handle = h.event.respawn(tasks[0]);
    assert_eq!(h.event.registry().location_of(handle), Some(location));
    assert_eq!(h.event.registry().len(), 5);
}

#[test]
fn pending_respawns_outlive_a_restart() {
    let h = Harness::new(&settings());
    let spawned = h.event.start_configured_event().unwrap().spawned;
    h.event.handle_interaction(spawned[0], &Player::new("Alex"), h.clock.now());

    h.event.start_configured_event().unwrap();
    assert_eq!(h.event.registry().len(), 5);
    assert_eq!(h.clock.pending(), 1);

    h.clock.advance(Duration::from_secs(30 * 60));
    for task in h.clock.drain_due() {
        h.event.respawn(task);
    }
    assert_eq!(h.event.registry().len(), 6);
}

#[test]
fn reload_replaces_rewards_without_leftovers() {
    let h = Harness::new(&settings());
    let spawned = h.event.start_configured_event().unwrap().spawned;

    let report = h
        .event
        .reload_config(&[RewardDef::command("give %player% trident 1", 100.0)], &SpawnDef::default())
        .unwrap();
    assert_eq!(report.rewards, 1);
    assert!(report.rejected.is_empty());
    assert_eq!(h.event.config().rewards.len(), 1);

    for (i, handle) in spawned.iter().enumerate() {
        let player = Player::new(format!("diver{i}"));
        let outcome = h.event.handle_interaction(*handle, &player, h.clock.now());
        let InteractionOutcome::Rewarded(reward) = &outcome else { panic!("expected a reward, got {outcome:?}") };
        assert!(matches!(reward.kind, RewardKind::Command { .. }));
    }
    let commands: Vec<_> = h.outbox.drain();
    assert_eq!(commands.len(), 5);
    assert!(matches!(&commands[0], AppliedReward::Command { command, .. } if command == "give diver0 trident 1"));
}

#[test]
fn reload_with_bad_region_keeps_the_old_config() {
    let h = Harness::new(&settings());
    let bad = SpawnDef { min_x: 10, max_x: -10, ..SpawnDef::default() };
    assert!(h.event.reload_config(&[], &bad).is_err());
    assert_eq!(h.event.config().rewards.len(), 1);
    assert_eq!(h.event.config().spawn.count, 5);
}

#[test]
fn reload_reports_rejected_entries() {
    let h = Harness::new(&settings());
    let defs = vec![
        RewardDef::item("diamond", 1, 10.0),
        RewardDef { kind: Some("potion".into()), chance: Some(5.0), ..RewardDef::default() },
        RewardDef::item("cod", 0, 10.0),
    ];
    let report = h.event.reload_config(&defs, &single_column(1)).unwrap();
    assert_eq!(report.rewards, 1);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(h.event.config().spawn.count, 1);
}
