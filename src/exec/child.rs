// src/exec/child.rs

use std::sync::{Mutex, MutexGuard};

/// Identity of a launched run-process.
///
/// `generation` increases with every launch, so an exit notification from
/// an old child can be told apart from the current one even if the OS
/// reuses its pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRecord {
    pub pid: u32,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct SlotState {
    current: Option<ChildRecord>,
    launches: u64,
}

/// The one supervised child, if any.
///
/// Only the rebuild pipeline writes here (`record` on launch, `clear_if` on
/// exit); the shutdown handler only reads.
#[derive(Debug, Default)]
pub struct ChildSlot {
    state: Mutex<SlotState>,
}

impl ChildSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // A panic while holding this lock cannot leave the two fields
        // inconsistent, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a freshly launched child, replacing whatever was there.
    pub fn record(&self, pid: u32) -> ChildRecord {
        let mut state = self.lock();
        state.launches += 1;
        let record = ChildRecord {
            pid,
            generation: state.launches,
        };
        state.current = Some(record);
        record
    }

    pub fn current(&self) -> Option<ChildRecord> {
        self.lock().current
    }

    pub fn pid(&self) -> Option<u32> {
        self.current().map(|r| r.pid)
    }

    /// Clear the slot, but only if it still holds `generation`.
    ///
    /// Returns whether anything was cleared.
    pub fn clear_if(&self, generation: u64) -> bool {
        let mut state = self.lock();
        match state.current {
            Some(record) if record.generation == generation => {
                state.current = None;
                true
            }
            _ => false,
        }
    }
}
