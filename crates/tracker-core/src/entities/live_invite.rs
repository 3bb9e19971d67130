//! Live invite - an invite as reported by the remote platform
//!
//! Platform payloads are not trusted: inside the platform's
//! eventual-consistency window the guild or inviter reference can arrive
//! unpopulated, so both are explicit optionals rather than assumed fields.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Invite payload received from the remote platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveInvite {
    pub code: String,
    pub guild_id: Option<Snowflake>,
    pub channel_id: Option<Snowflake>,
    pub inviter_id: Option<Snowflake>,
    pub uses: i32,
    /// Present only on single-invite fetches that requested counts
    pub approximate_presence_count: Option<i32>,
}

impl LiveInvite {
    /// Create a live invite with the fields every well-formed payload has
    pub fn new(code: String, guild_id: Snowflake, uses: i32) -> Self {
        Self {
            code,
            guild_id: Some(guild_id),
            channel_id: None,
            inviter_id: None,
            uses,
            approximate_presence_count: None,
        }
    }

    /// Attach the inviter reference
    pub fn with_inviter(mut self, inviter_id: Snowflake) -> Self {
        self.inviter_id = Some(inviter_id);
        self
    }

    /// Attach the channel reference
    pub fn with_channel(mut self, channel_id: Snowflake) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    /// Check whether the payload carries enough structure to be tracked
    ///
    /// A missing inviter is tolerated (it can be recovered by a re-fetch);
    /// a missing code or guild reference is not.
    pub fn is_trackable(&self) -> bool {
        !self.code.is_empty() && self.guild_id.is_some()
    }
}
