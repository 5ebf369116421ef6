// src/clam/tasks.rs
//! Event cycle split across frames: clear + launch the search now, collect
//! and spawn when the search finishes on the async compute pool.

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, TaskPool};
use futures_lite::future;

use super::placement::{find_locations, PlacementContext, PlacementReport};
use super::plugin::{ClamEventHandle, StartClamEvent};

/// The search of the cycle in flight, if any. One cycle at a time.
#[derive(Resource, Default)]
pub struct ClamSearchTask {
    task: Option<Task<PlacementReport>>,
}

impl ClamSearchTask {
    pub fn in_flight(&self) -> bool { self.task.is_some() }
}

pub fn begin_event_cycle(
    mut starts: EventReader<StartClamEvent>,
    event: Res<ClamEventHandle>,
    mut search: ResMut<ClamSearchTask>,
) {
    // Several requests in one frame make one cycle.
    if starts.read().count() == 0 {
        return;
    }
    if search.in_flight() {
        debug!("LuckyClam: cycle already running, start request ignored");
        return;
    }

    let event = event.0.clone();
    let config = event.config();
    let Ok(terrain) = event.resolve_world(&config.world) else { return };

    // Old clams go before the search is even queued.
    event.clear_active();

    let params = config.spawn;
    let mut rng = event.fork_rng();
    let pool = AsyncComputeTaskPool::get_or_init(TaskPool::default);
    search.task = Some(pool.spawn(async move {
        find_locations(&PlacementContext { params, terrain: terrain.as_ref() }, &mut rng)
    }));
}

pub fn collect_search_results(mut search: ResMut<ClamSearchTask>, event: Res<ClamEventHandle>) {
    let Some(task) = search.task.as_mut() else { return };
    if !task.is_finished() {
        return;
    }
    if let Some(report) = future::block_on(future::poll_once(task)) {
        search.task = None;
        if !report.exhausted.is_empty() {
            info!(
                "LuckyClam: {} placement slots found nothing this cycle",
                report.exhausted.len()
            );
        }
        event.0.populate(&report.locations);
    }
}
