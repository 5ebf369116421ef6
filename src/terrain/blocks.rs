// src/terrain/blocks.rs
//! Block coordinates and the block kinds the clam event cares about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer block coordinate. Used as the stable key for a clam location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self { Self { x, y, z } }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    #[inline]
    pub const fn below(self) -> Self { self.offset(0, -1, 0) }

    #[inline]
    pub const fn above(self) -> Self { self.offset(0, 1, 0) }

    /// The four horizontal neighbours plus the block directly above.
    pub const fn enclosure(self) -> [BlockPos; 5] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
            self.offset(0, 1, 0),
        ]
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}, z={}", self.x, self.y, self.z)
    }
}

/// Terrain material at a block position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Air,
    CaveAir,
    Water,
    Seagrass,
    Kelp,
    Sand,
    Gravel,
    Stone,
    Diorite,
    Andesite,
    Granite,
    Dirt,
    GrassBlock,
    BlueStainedGlass,
    Prismarine,
    Bedrock,
}

impl BlockKind {
    /// Blocks an entity cannot occupy.
    pub const fn is_solid(self) -> bool {
        !matches!(
            self,
            BlockKind::Air | BlockKind::CaveAir | BlockKind::Water | BlockKind::Seagrass | BlockKind::Kelp
        )
    }

    /// Air-equivalent blocks only; water and plants do not count.
    pub const fn is_passable(self) -> bool {
        matches!(self, BlockKind::Air | BlockKind::CaveAir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plants_are_neither_solid_nor_passable() {
        assert!(!BlockKind::Kelp.is_solid());
        assert!(!BlockKind::Kelp.is_passable());
        assert!(!BlockKind::Water.is_passable());
        assert!(BlockKind::CaveAir.is_passable());
        assert!(BlockKind::BlueStainedGlass.is_solid());
    }

    #[test]
    fn enclosure_covers_sides_and_top_only() {
        let p = BlockPos::new(4, 10, -2);
        let around = p.enclosure();
        assert!(around.contains(&BlockPos::new(5, 10, -2)));
        assert!(around.contains(&BlockPos::new(4, 11, -2)));
        assert!(!around.contains(&p.below()));
    }
}
