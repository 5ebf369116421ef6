// src/clam/host.rs
//! Queue-backed implementations of the host traits.
//!
//! The event core may be called from any thread, but world objects can only
//! be touched from the app's own systems. These queues collect the requests;
//! the plugin drains them once per frame.

use bevy::log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::core::{BlockPos, EntityHandle, EntityMaterializer, MaterialId, Player, RewardApplier};
use super::rewards::render_command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterializeRequest {
    Spawn { handle: EntityHandle, location: BlockPos },
    Destroy { handle: EntityHandle },
}

/// Hands out arena ids immediately and defers the actual spawn/despawn.
pub struct MaterializeQueue {
    next_handle: AtomicU64,
    requests: Mutex<Vec<MaterializeRequest>>,
}

impl Default for MaterializeQueue {
    fn default() -> Self {
        Self { next_handle: AtomicU64::new(1), requests: Mutex::new(Vec::new()) }
    }
}

impl MaterializeQueue {
    pub fn new() -> Self { Self::default() }

    pub fn drain(&self) -> Vec<MaterializeRequest> {
        std::mem::take(&mut *self.requests.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn push(&self, request: MaterializeRequest) {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
    }
}

impl EntityMaterializer for MaterializeQueue {
    fn spawn(&self, location: BlockPos) -> EntityHandle {
        let handle = EntityHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.push(MaterializeRequest::Spawn { handle, location });
        debug!("LuckyClam: queued spawn {handle:?} at {location}");
        handle
    }

    fn destroy(&self, handle: EntityHandle) {
        self.push(MaterializeRequest::Destroy { handle });
        debug!("LuckyClam: queued destroy {handle:?}");
    }
}

/// A reward that has been resolved and handed to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppliedReward {
    Item { player: Player, material: MaterialId, amount: u32 },
    /// Command with the player's name already substituted.
    Command { player: Player, command: String },
}

#[derive(Default)]
pub struct RewardOutbox {
    applied: Mutex<Vec<AppliedReward>>,
}

impl RewardOutbox {
    pub fn new() -> Self { Self::default() }

    pub fn drain(&self) -> Vec<AppliedReward> {
        std::mem::take(&mut *self.applied.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push(&self, reward: AppliedReward) {
        self.applied.lock().unwrap_or_else(PoisonError::into_inner).push(reward);
    }
}

impl RewardApplier for RewardOutbox {
    fn grant_item(&self, player: &Player, material: &MaterialId, amount: u32) {
        self.push(AppliedReward::Item { player: player.clone(), material: material.clone(), amount });
    }

    fn run_command(&self, template: &str, player: &Player) {
        let command = render_command(template, player);
        self.push(AppliedReward::Command { player: player.clone(), command });
    }
}
