#![allow(dead_code)]

use std::sync::Arc;

use lucky_clam::clam::core::EntityHandle;
use lucky_clam::clam::host::{MaterializeQueue, MaterializeRequest, RewardOutbox};
use lucky_clam::clam::respawn::EventClock;
use lucky_clam::clam::rewards::RewardDef;
use lucky_clam::clam::settings::{ClamSettings, CooldownDef, SpawnDef};
use lucky_clam::clam::{ClamEvent, ClamHost};
use lucky_clam::terrain::{BlockKind, ColumnWorld, WorldSet};

/// Event wired to in-memory host services over a flat sand floor at y=62.
pub struct Harness {
    pub event: ClamEvent,
    pub clock: Arc<EventClock>,
    pub materializer: Arc<MaterializeQueue>,
    pub outbox: Arc<RewardOutbox>,
}

impl Harness {
    pub fn new(settings: &ClamSettings) -> Self {
        let worlds = WorldSet::default()
            .with_world("atlantic", Arc::new(ColumnWorld::flat(-64, 62, BlockKind::Sand)));
        let clock = Arc::new(EventClock::new());
        let materializer = Arc::new(MaterializeQueue::new());
        let outbox = Arc::new(RewardOutbox::new());
        let host = ClamHost {
            worlds: Arc::new(worlds),
            materializer: materializer.clone(),
            rewards: outbox.clone(),
            clock: clock.clone(),
        };
        let event = ClamEvent::new(host, settings).unwrap();
        Self { event, clock, materializer, outbox }
    }

    pub fn spawned_handles(&self) -> Vec<EntityHandle> {
        self.materializer
            .drain()
            .into_iter()
            .filter_map(|r| match r {
                MaterializeRequest::Spawn { handle, .. } => Some(handle),
                MaterializeRequest::Destroy { .. } => None,
            })
            .collect()
    }
}

pub fn settings() -> ClamSettings {
    ClamSettings {
        seed: Some(7),
        rewards: vec![RewardDef::item("diamond", 2, 100.0)],
        ..ClamSettings::default()
    }
}

/// Every slot lands on the one column at (0, 0).
pub fn single_column(count: u32) -> SpawnDef {
    SpawnDef { max_clams: count, min_x: 0, max_x: 0, min_z: 0, max_z: 0, ..SpawnDef::default() }
}

pub fn cooldown(min: u32, max: u32) -> CooldownDef {
    CooldownDef { min, max, unit_secs: 60 }
}
