//! # tracker-engine
//!
//! The invite-ledger reconciliation engine: full syncs against the remote
//! invite list, incremental create/delete handling, and join attribution.

pub mod engine;

// Re-export commonly used types at crate root
pub use engine::{
    spawn_periodic_sync, EngineContext, EngineContextBuilder, EngineError, EngineResult,
    JoinNotifier, RateLimiter, ReconciliationEngine, SyncGuard, SyncPermit,
};
