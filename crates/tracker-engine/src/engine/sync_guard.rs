//! Sync guard - coarse skip-flag between attribution and full sync
//!
//! Join attribution holds the guard for its whole computation; the periodic
//! full sync only *consults* it and skips the cycle when held. This is not a
//! lock: nothing queues, nothing waits, and two attributions may interleave.
//! The one hard requirement is cleanup - the guard must drop on every exit
//! path of the attribution procedure, including error paths, because a stuck
//! flag would permanently disable both syncs and attributions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared skip-flag consulted by the periodic sync
#[derive(Debug, Clone, Default)]
pub struct SyncGuard {
    holders: Arc<AtomicUsize>,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a permit for the duration of an attribution
    ///
    /// Never blocks; overlapping permits stack, and the guard reads as held
    /// until the last one drops.
    pub fn hold(&self) -> SyncPermit {
        self.holders.fetch_add(1, Ordering::AcqRel);
        SyncPermit {
            holders: Arc::clone(&self.holders),
        }
    }

    /// Check whether any attribution is in flight
    pub fn is_held(&self) -> bool {
        self.holders.load(Ordering::Acquire) > 0
    }
}

/// RAII permit; releases its hold on drop
#[derive(Debug)]
pub struct SyncPermit {
    holders: Arc<AtomicUsize>,
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::AcqRel);
    }
}
