//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invite not found: {0}")]
    InviteNotFound(String),

    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Malformed invite payload: {0}")]
    MalformedInvite(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and external reporting
    pub fn code(&self) -> &'static str {
        match self {
            Self::InviteNotFound(_) => "UNKNOWN_INVITE",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MalformedInvite(_) => "MALFORMED_INVITE",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InviteNotFound(_) | Self::GuildNotFound(_))
    }
}
