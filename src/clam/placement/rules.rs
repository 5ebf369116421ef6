// src/clam/placement/rules.rs
//! Placement rules: surface scan, base block gate, enclosure check.

use crate::clam::core::{BlockKind, BlockPos, TerrainOracle};

/// Materials a clam may rest on.
pub const BASE_BLOCKS: &[BlockKind] = &[
    BlockKind::Sand,
    BlockKind::Gravel,
    BlockKind::Stone,
    BlockKind::Diorite,
    BlockKind::Andesite,
    BlockKind::Granite,
    BlockKind::Dirt,
    BlockKind::GrassBlock,
    BlockKind::BlueStainedGlass,
];

#[inline]
pub fn is_valid_base(kind: BlockKind) -> bool {
    BASE_BLOCKS.contains(&kind)
}

/// Why a candidate column was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NoSurface,
    BaseBlock(BlockKind),
    Enclosed,
}

/// Walk down from `ceiling` to the world's min height and return the first Y
/// that is passable with a solid block right below it.
///
/// The scan keeps one block clear of the `i32` limits so the block below and
/// the one above a candidate always exist.
pub fn surface_height(terrain: &dyn TerrainOracle, x: i32, z: i32, ceiling: i32) -> Option<i32> {
    let floor = terrain.min_height().max(i32::MIN + 1);
    let ceiling = ceiling.min(i32::MAX - 1);
    (floor..=ceiling).rev().find(|&y| {
        let at = BlockPos::new(x, y, z);
        terrain.is_passable(at) && terrain.is_solid(at.below())
    })
}

/// No solid block on any side or directly above.
pub fn is_enclosure_clear(terrain: &dyn TerrainOracle, pos: BlockPos) -> bool {
    pos.enclosure().iter().all(|p| !terrain.is_solid(*p))
}

/// Run the whole rule chain for the column at (x, z).
pub fn evaluate_column(
    terrain: &dyn TerrainOracle,
    x: i32,
    z: i32,
    ceiling: i32,
) -> Result<BlockPos, Rejection> {
    let y = surface_height(terrain, x, z, ceiling).ok_or(Rejection::NoSurface)?;
    let pos = BlockPos::new(x, y, z);

    let base = terrain.block(pos.below());
    if !is_valid_base(base) {
        return Err(Rejection::BaseBlock(base));
    }

    if !is_enclosure_clear(terrain, pos) {
        return Err(Rejection::Enclosed);
    }

    Ok(pos)
}
