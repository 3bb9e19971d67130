//! Platform ports - the remote chat platform as seen by the engine
//!
//! Every method here is a suspension point: other handlers may run and
//! mutate shared state between call and return. All remote calls can fail
//! and the engine treats those failures as per-cycle degradation, never as
//! fatal conditions.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::LiveInvite;
use crate::events::LedgerEvent;
use crate::value_objects::{Capabilities, Snowflake};

/// Remote platform failure classes
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Platform unavailable: {0}")]
    Unavailable(String),

    #[error("Not found on platform: {0}")]
    NotFound(String),

    #[error("Platform denied the request: missing access")]
    Forbidden,

    #[error("Platform rate limit hit")]
    RateLimited,
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Options for creating an invite on the platform
#[derive(Debug, Clone, Default)]
pub struct CreateInviteOptions {
    /// Maximum number of uses; 0 means unlimited
    pub max_uses: i32,
    /// Lifetime in seconds; 0 means never expires
    pub max_age: i32,
    /// Audit-log reason attached to the creation
    pub reason: Option<String>,
}

impl CreateInviteOptions {
    /// A single-use invite that never expires on its own
    pub fn single_use(reason: impl Into<String>) -> Self {
        Self {
            max_uses: 1,
            max_age: 0,
            reason: Some(reason.into()),
        }
    }
}

// ============================================================================
// Invite API
// ============================================================================

#[async_trait]
pub trait InviteApi: Send + Sync {
    /// List all live invites for a guild
    async fn list_invites(&self, guild_id: Snowflake) -> PlatformResult<Vec<LiveInvite>>;

    /// Fetch a single invite by code, with approximate counts populated
    async fn fetch_invite(&self, code: &str) -> PlatformResult<LiveInvite>;

    /// Create a new invite in a channel
    async fn create_invite(
        &self,
        channel_id: Snowflake,
        options: CreateInviteOptions,
    ) -> PlatformResult<LiveInvite>;

    /// Delete an invite by code
    async fn delete_invite(&self, code: &str) -> PlatformResult<()>;
}

// ============================================================================
// Capability Gate
// ============================================================================

#[async_trait]
pub trait CapabilityGate: Send + Sync {
    /// Check whether the bot holds all of the given capabilities in a guild
    async fn has_capabilities(
        &self,
        guild_id: Snowflake,
        capabilities: Capabilities,
    ) -> PlatformResult<bool>;
}

// ============================================================================
// Event Sink
// ============================================================================

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver a derived event to downstream consumers
    async fn emit(&self, event: LedgerEvent) -> PlatformResult<()>;
}

// ============================================================================
// Messenger
// ============================================================================

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a log line to a guild channel
    async fn send_log(&self, channel_id: Snowflake, text: &str) -> PlatformResult<()>;
}
