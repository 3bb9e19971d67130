//! Reconciliation engine internals
//!
//! The engine keeps the durable invite ledger consistent with the remote
//! platform's live invite list. Two protocols feed it: periodic full syncs
//! and incremental platform events, with join attribution layered on top.

mod attribution;
pub mod context;
pub mod error;
mod notifier;
mod rate_limiter;
mod reconciler;
mod sync_guard;

pub use context::{EngineContext, EngineContextBuilder};
pub use error::{EngineError, EngineResult};
pub use notifier::JoinNotifier;
pub use rate_limiter::RateLimiter;
pub use reconciler::{spawn_periodic_sync, ReconciliationEngine};
pub use sync_guard::{SyncGuard, SyncPermit};
