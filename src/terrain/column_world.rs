// src/terrain/column_world.rs
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::clam::core::TerrainOracle;
use super::blocks::{BlockKind, BlockPos};

/// One vertical column of terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    /// Y of the topmost solid block.
    pub surface_y: i32,
    /// Material at `surface_y`.
    pub top: BlockKind,
    /// Material below `surface_y`.
    pub filler: BlockKind,
    /// Water fills from `surface_y + 1` up to this Y (inclusive), if set.
    pub water_level: Option<i32>,
}

impl Column {
    pub const fn dry(surface_y: i32, top: BlockKind) -> Self {
        Self { surface_y, top, filler: BlockKind::Stone, water_level: None }
    }

    pub const fn flooded(surface_y: i32, top: BlockKind, water_level: i32) -> Self {
        Self { surface_y, top, filler: BlockKind::Stone, water_level: Some(water_level) }
    }

    fn block_at(&self, y: i32) -> BlockKind {
        if y == self.surface_y {
            self.top
        } else if y < self.surface_y {
            self.filler
        } else {
            match self.water_level {
                Some(level) if y <= level => BlockKind::Water,
                _ => BlockKind::Air,
            }
        }
    }
}

/// Lazily produces the column at (x, z); `None` means void.
pub type ColumnGenerator = dyn Fn(i32, i32) -> Option<Column> + Send + Sync;

/// Column-based block world. Columns come from a generator and are cached on
/// first touch; individual blocks can be overridden on top.
pub struct ColumnWorld {
    min_height: i32,
    generator: Option<Box<ColumnGenerator>>,
    /// Loaded columns by (x, z). `None` caches a void column.
    columns: RwLock<HashMap<(i32, i32), Option<Column>>>,
    overrides: HashMap<BlockPos, BlockKind>,
}

impl ColumnWorld {
    /// Empty (all void) world.
    pub fn new(min_height: i32) -> Self {
        Self {
            min_height,
            generator: None,
            columns: RwLock::new(HashMap::new()),
            overrides: HashMap::new(),
        }
    }

    pub fn with_generator(
        min_height: i32,
        generator: impl Fn(i32, i32) -> Option<Column> + Send + Sync + 'static,
    ) -> Self {
        Self { generator: Some(Box::new(generator)), ..Self::new(min_height) }
    }

    /// Flat, dry world with the same top block everywhere.
    pub fn flat(min_height: i32, surface_y: i32, top: BlockKind) -> Self {
        Self::with_generator(min_height, move |_, _| Some(Column::dry(surface_y, top)))
    }

    pub fn set_column(&mut self, x: i32, z: i32, column: Column) {
        self.columns
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((x, z), Some(column));
    }

    pub fn set_block(&mut self, pos: BlockPos, kind: BlockKind) {
        self.overrides.insert(pos, kind);
    }

    /// Number of columns touched so far.
    pub fn loaded_columns(&self) -> usize {
        self.columns.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn get_or_load(&self, x: i32, z: i32) -> Option<Column> {
        // Loaded columns only need the shared lock.
        if let Some(column) = self.columns.read().unwrap_or_else(PoisonError::into_inner).get(&(x, z)) {
            return *column;
        }
        let mut columns = self.columns.write().unwrap_or_else(PoisonError::into_inner);
        *columns
            .entry((x, z))
            .or_insert_with(|| self.generator.as_ref().and_then(|g| g(x, z)))
    }
}

impl TerrainOracle for ColumnWorld {
    fn block(&self, pos: BlockPos) -> BlockKind {
        if let Some(kind) = self.overrides.get(&pos) {
            return *kind;
        }
        if pos.y < self.min_height {
            return BlockKind::Air;
        }
        match self.get_or_load(pos.x, pos.z) {
            Some(column) => column.block_at(pos.y),
            None => BlockKind::Air,
        }
    }

    fn min_height(&self) -> i32 { self.min_height }

    fn ensure_loaded(&self, x: i32, z: i32) {
        self.get_or_load(x, z);
    }
}
