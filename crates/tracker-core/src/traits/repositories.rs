//! Storage ports - define the interface for durable invite state
//!
//! The domain layer defines what it needs from storage; the host process
//! provides the implementation. The engine requires point lookups and
//! guild-scoped scans but no multi-row transactional guarantees: it is
//! written to tolerate lost updates and re-derive state from the remote
//! source on the next cycle.

use async_trait::async_trait;

use crate::entities::{GuildConfig, InviteRecord};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for storage operations
pub type LedgerResult<T> = Result<T, DomainError>;

// ============================================================================
// Invite Ledger
// ============================================================================

#[async_trait]
pub trait InviteLedger: Send + Sync {
    /// Find a ledger entry by invite code
    async fn find_by_code(&self, code: &str) -> LedgerResult<Option<InviteRecord>>;

    /// List all ledger entries for a guild
    async fn find_by_guild(&self, guild_id: Snowflake) -> LedgerResult<Vec<InviteRecord>>;

    /// Insert a new ledger entry
    async fn create(&self, record: &InviteRecord) -> LedgerResult<()>;

    /// Overwrite the recorded use count for a code
    async fn update_uses(&self, code: &str, uses: i32) -> LedgerResult<()>;

    /// Delete a ledger entry
    ///
    /// Deleting a code that is not present is a no-op, not an error.
    async fn delete(&self, code: &str) -> LedgerResult<()>;
}

// ============================================================================
// Guild Config Store
// ============================================================================

#[async_trait]
pub trait GuildConfigStore: Send + Sync {
    /// Find the invite logging configuration for a guild
    async fn find(&self, guild_id: Snowflake) -> LedgerResult<Option<GuildConfig>>;

    /// List all guilds that have invite logging enabled
    async fn list_logging_enabled(&self) -> LedgerResult<Vec<Snowflake>>;
}
