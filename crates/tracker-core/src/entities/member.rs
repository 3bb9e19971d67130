//! Joined member - the payload of a member-join signal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A member who just joined a guild
///
/// The platform gives no direct signal of which invite was used; attribution
/// is inferred afterwards from invite use-count deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedMember {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub joined_at: DateTime<Utc>,
}

impl JoinedMember {
    /// Create a join signal timestamped now
    pub fn new(guild_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            guild_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}
