//! Invite record entity - one row of the durable invite ledger
//!
//! The ledger is a lagging cache of the platform's live invite list: `uses`
//! reflects the last value observed at or before the last successful
//! reconciliation, never a value the engine computed itself.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Ledger entry for one known invite code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRecord {
    pub code: String,
    pub guild_id: Snowflake,
    pub uses: i32,
    pub inviter_id: Snowflake,
}

impl InviteRecord {
    /// Create a new ledger entry
    ///
    /// Freshly tracked invites always start at zero uses; the next
    /// reconciliation pass catches the record up with the live count.
    pub fn new(code: String, guild_id: Snowflake, inviter_id: Snowflake) -> Self {
        Self {
            code,
            guild_id,
            uses: 0,
            inviter_id,
        }
    }

    /// Record a newly observed use count from the live source
    pub fn observe_uses(&mut self, uses: i32) {
        self.uses = uses;
    }
}
