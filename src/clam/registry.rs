// src/clam/registry.rs
use std::iter::Copied;
use std::slice::Iter;
use std::sync::{Arc, PoisonError, RwLock};

use super::core::{BlockPos, EntityHandle, EntityMaterializer};

/// One live clam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    pub location: BlockPos,
    /// Non-owning; the materializer owns the object.
    pub handle: EntityHandle,
}

/// Live clams. A set of entries, not a map: two clams may share a location.
#[derive(Default)]
pub struct SpawnRegistry {
    entries: RwLock<Vec<SpawnEntry>>,
}

impl SpawnRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&self, location: BlockPos, handle: EntityHandle) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SpawnEntry { location, handle });
    }

    /// Remove the entry for `handle` from bookkeeping (does not destroy).
    pub fn unregister(&self, handle: EntityHandle) -> Option<SpawnEntry> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let i = entries.iter().position(|e| e.handle == handle)?;
        Some(entries.swap_remove(i))
    }

    pub fn location_of(&self, handle: EntityHandle) -> Option<BlockPos> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.location)
    }

    /// Drop every entry and ask the materializer to destroy each one.
    pub fn clear(&self, materializer: &dyn EntityMaterializer) -> usize {
        let drained = std::mem::take(&mut *self.entries.write().unwrap_or_else(PoisonError::into_inner));
        for entry in &drained {
            materializer.destroy(entry.handle);
        }
        drained.len()
    }

    /// Copy of the current locations.
    pub fn snapshot(&self) -> LocationSnapshot {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        LocationSnapshot { locations: entries.iter().map(|e| e.location).collect() }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Locations captured at one instant. Cheap to clone; iterate as often as needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationSnapshot {
    locations: Arc<[BlockPos]>,
}

impl LocationSnapshot {
    pub fn iter(&self) -> Copied<Iter<'_, BlockPos>> { self.locations.iter().copied() }

    pub fn len(&self) -> usize { self.locations.len() }

    pub fn is_empty(&self) -> bool { self.locations.is_empty() }
}

impl<'a> IntoIterator for &'a LocationSnapshot {
    type Item = BlockPos;
    type IntoIter = Copied<Iter<'a, BlockPos>>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EntityHandle>>);

    impl EntityMaterializer for Recorder {
        fn spawn(&self, _location: BlockPos) -> EntityHandle { EntityHandle(0) }
        fn destroy(&self, handle: EntityHandle) { self.0.lock().unwrap().push(handle); }
    }

    #[test]
    fn coincident_entries_are_both_kept() {
        let reg = SpawnRegistry::new();
        let p = BlockPos::new(1, 2, 3);
        reg.register(p, EntityHandle(1));
        reg.register(p, EntityHandle(2));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.unregister(EntityHandle(1)).map(|e| e.location), Some(p));
        assert_eq!(reg.location_of(EntityHandle(2)), Some(p));
        assert_eq!(reg.unregister(EntityHandle(1)), None);
    }

    #[test]
    fn clear_destroys_everything_and_tolerates_empty() {
        let reg = SpawnRegistry::new();
        let rec = Recorder::default();
        assert_eq!(reg.clear(&rec), 0);
        reg.register(BlockPos::new(0, 0, 0), EntityHandle(7));
        reg.register(BlockPos::new(1, 0, 0), EntityHandle(8));
        assert_eq!(reg.clear(&rec), 2);
        assert!(reg.is_empty());
        assert_eq!(*rec.0.lock().unwrap(), vec![EntityHandle(7), EntityHandle(8)]);
    }

    #[test]
    fn snapshot_is_detached_and_restartable() {
        let reg = SpawnRegistry::new();
        reg.register(BlockPos::new(5, 6, 7), EntityHandle(1));
        let snap = reg.snapshot();
        reg.register(BlockPos::new(8, 9, 10), EntityHandle(2));
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.iter().count(), 1);
        assert_eq!((&snap).into_iter().collect::<Vec<_>>(), vec![BlockPos::new(5, 6, 7)]);
        assert_eq!(reg.snapshot().len(), 2);
    }
}
