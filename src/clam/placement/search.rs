// src/clam/placement/search.rs
use bevy::log::{debug, info, warn};
use rand::Rng;

use crate::clam::core::{BlockPos, TerrainOracle};
use crate::clam::error::PlacementExhausted;
use crate::clam::settings::SpawnParams;

use super::rules::{evaluate_column, Rejection};

/// Input to a placement search.
pub struct PlacementContext<'a> {
    pub params: SpawnParams,
    pub terrain: &'a dyn TerrainOracle,
}

/// Result of a search: the accepted spots plus one record per slot that gave up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementReport {
    pub locations: Vec<BlockPos>,
    pub exhausted: Vec<PlacementExhausted>,
}

/// Find up to `params.count` locations by rejection sampling.
///
/// Slots are independent: each gets its own attempt budget, takes the first
/// candidate that passes every rule, and is not retried once the budget is
/// spent. Two slots may land on the same spot.
pub fn find_locations<R: Rng + ?Sized>(ctx: &PlacementContext, rng: &mut R) -> PlacementReport {
    let mut report = PlacementReport {
        locations: Vec::with_capacity(ctx.params.count),
        exhausted: Vec::new(),
    };

    for slot in 0..ctx.params.count {
        match search_slot(ctx, slot, rng) {
            Ok(pos) => report.locations.push(pos),
            Err(e) => {
                warn!("LuckyClam: {e}");
                report.exhausted.push(e);
            }
        }
    }

    info!(
        "LuckyClam: found {} of {} locations in {}",
        report.locations.len(),
        ctx.params.count,
        ctx.params.region
    );

    report
}

fn search_slot<R: Rng + ?Sized>(
    ctx: &PlacementContext,
    slot: usize,
    rng: &mut R,
) -> Result<BlockPos, PlacementExhausted> {
    let region = ctx.params.region;

    for attempt in 1..=ctx.params.max_attempts {
        let x = rng.random_range(region.min_x()..=region.max_x());
        let z = rng.random_range(region.min_z()..=region.max_z());
        ctx.terrain.ensure_loaded(x, z);

        match evaluate_column(ctx.terrain, x, z, ctx.params.surface_ceiling) {
            Ok(pos) => {
                debug!("LuckyClam: slot {slot} attempt {attempt}: accepted {pos}");
                return Ok(pos);
            }
            Err(Rejection::NoSurface) => {
                debug!("LuckyClam: slot {slot} attempt {attempt}: no surface at x={x}, z={z}");
            }
            Err(Rejection::BaseBlock(kind)) => {
                debug!("LuckyClam: slot {slot} attempt {attempt}: invalid base block {kind:?} at x={x}, z={z}");
            }
            Err(Rejection::Enclosed) => {
                debug!("LuckyClam: slot {slot} attempt {attempt}: unsafe spawn at x={x}, z={z}");
            }
        }
    }

    Err(PlacementExhausted { slot, attempts: ctx.params.max_attempts })
}
