//! Ledger events - derived events the engine publishes for consumers
//!
//! The only consumer today is the join notifier, but the event contract is
//! the boundary: the engine never formats or sends user-facing output.

use serde::{Deserialize, Serialize};

use crate::entities::JoinedMember;
use crate::value_objects::Snowflake;

/// One attribution candidate for a member join
///
/// `inviter_id` may be absent when the live payload never resolved an
/// inviter; candidates derived from the ledger always carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteCandidate {
    pub code: String,
    pub inviter_id: Option<Snowflake>,
}

impl InviteCandidate {
    pub fn new(code: impl Into<String>, inviter_id: Option<Snowflake>) -> Self {
        Self {
            code: code.into(),
            inviter_id,
        }
    }
}

/// All events emitted by the reconciliation engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEvent {
    /// A member joined and these invites may have been used
    ///
    /// The candidate list can be empty (no delta and no vanished codes) or
    /// ambiguous (several single-use invites vanished at once); consumers
    /// decide how to present that.
    MemberJoinedWithInvites {
        member: JoinedMember,
        candidates: Vec<InviteCandidate>,
    },
}

impl LedgerEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MemberJoinedWithInvites { .. } => "MEMBER_JOINED_WITH_INVITES",
        }
    }

    /// Get the guild the event belongs to
    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::MemberJoinedWithInvites { member, .. } => member.guild_id,
        }
    }
}
