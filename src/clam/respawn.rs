// src/clam/respawn.rs
//! The event clock: a settable "now" plus a queue of deferred respawns.
//!
//! Whoever owns the loop (the bevy plugin, or a test) moves the clock forward
//! and feeds `drain_due` back into `ClamEvent::respawn`.

use bevy::log::debug;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::core::{BlockPos, Clock, RespawnTask, Timestamp};

/// (due, insertion order, location); min-heap through `Reverse`.
type Pending = Reverse<(Timestamp, u64, BlockPos)>;

#[derive(Default)]
pub struct EventClock {
    now_ms: AtomicU64,
    next_seq: AtomicU64,
    pending: Mutex<BinaryHeap<Pending>>,
}

impl EventClock {
    pub fn new() -> Self { Self::default() }

    pub fn starting_at(now: Timestamp) -> Self {
        let clock = Self::default();
        clock.set_now(now);
        clock
    }

    /// Never moves backwards.
    pub fn set_now(&self, now: Timestamp) {
        self.now_ms.fetch_max(now.as_millis(), Ordering::AcqRel);
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        let t = self.now() + by;
        self.set_now(t);
        self.now()
    }

    /// Pop every task whose due time has passed, earliest first.
    pub fn drain_due(&self) -> Vec<RespawnTask> {
        let now = self.now();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let mut due = Vec::new();
        while let Some(Reverse((at, _, _))) = pending.peek() {
            if *at > now {
                break;
            }
            if let Some(Reverse((_, _, location))) = pending.pop() {
                due.push(RespawnTask { location });
            }
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn next_due(&self) -> Option<Timestamp> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .peek()
            .map(|Reverse((at, _, _))| *at)
    }
}

impl Clock for EventClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now_ms.load(Ordering::Acquire))
    }

    fn schedule_after(&self, delay: Duration, task: RespawnTask) {
        let due = self.now() + delay;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Reverse((due, seq, task.location)));
        debug!("LuckyClam: respawn at {} due in {:?}", task.location, delay);
    }
}
