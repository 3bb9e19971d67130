//! Guild configuration - per-guild invite logging settings
//!
//! Read-only to the engine. A guild with no log channel configured is
//! invisible to ledger maintenance entirely.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Per-guild invite logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub guild_id: Snowflake,
    pub log_channel_id: Option<Snowflake>,
}

impl GuildConfig {
    /// Create a config with logging directed at a channel
    pub fn with_log_channel(guild_id: Snowflake, log_channel_id: Snowflake) -> Self {
        Self {
            guild_id,
            log_channel_id: Some(log_channel_id),
        }
    }

    /// Create a config with invite logging disabled
    pub fn disabled(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            log_channel_id: None,
        }
    }

    /// Check if invite logging (and therefore ledger maintenance) is enabled
    #[inline]
    pub fn logging_enabled(&self) -> bool {
        self.log_channel_id.is_some()
    }
}
