mod blocks;
mod column_world;

use std::collections::HashMap;
use std::sync::Arc;

use crate::clam::core::{TerrainOracle, WorldSource};

pub use blocks::{BlockKind, BlockPos};
pub use column_world::{Column, ColumnGenerator, ColumnWorld};

/// Named worlds the event can target.
#[derive(Clone, Default)]
pub struct WorldSet {
    worlds: HashMap<String, Arc<dyn TerrainOracle>>,
}

impl WorldSet {
    pub fn with_world(mut self, name: impl Into<String>, terrain: Arc<dyn TerrainOracle>) -> Self {
        self.insert(name, terrain);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, terrain: Arc<dyn TerrainOracle>) {
        self.worlds.insert(name.into(), terrain);
    }
}

impl WorldSource for WorldSet {
    fn resolve(&self, world: &str) -> Option<Arc<dyn TerrainOracle>> {
        self.worlds.get(world).cloned()
    }
}
