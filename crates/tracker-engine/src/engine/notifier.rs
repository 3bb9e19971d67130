//! Join notifier - turns attribution events into log-channel messages
//!
//! Deliberately thin: the engine owns the attribution contract, this only
//! formats and forwards. Send failures are logged and swallowed; attribution
//! has no user-visible failure mode by design.

use std::sync::Arc;

use tracing::warn;

use tracker_core::events::LedgerEvent;
use tracker_core::traits::{GuildConfigStore, Messenger};

use super::error::EngineResult;

/// Consumer of `MemberJoinedWithInvites` events
pub struct JoinNotifier {
    guild_configs: Arc<dyn GuildConfigStore>,
    messenger: Arc<dyn Messenger>,
}

impl JoinNotifier {
    pub fn new(guild_configs: Arc<dyn GuildConfigStore>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            guild_configs,
            messenger,
        }
    }

    /// Handle one attribution event
    ///
    /// No log channel configured means no-op; otherwise one message per
    /// candidate invite.
    pub async fn handle(&self, event: &LedgerEvent) -> EngineResult<()> {
        match event {
            LedgerEvent::MemberJoinedWithInvites { member, candidates } => {
                let config = self.guild_configs.find(member.guild_id).await?;
                let Some(channel_id) = config.and_then(|c| c.log_channel_id) else {
                    return Ok(());
                };

                for candidate in candidates {
                    let text = match candidate.inviter_id {
                        Some(inviter_id) => format!(
                            "Member {} may have joined via invite {} (created by {})",
                            member.user_id, candidate.code, inviter_id
                        ),
                        None => format!(
                            "Member {} may have joined via invite {} (inviter unknown)",
                            member.user_id, candidate.code
                        ),
                    };
                    if let Err(err) = self.messenger.send_log(channel_id, &text).await {
                        warn!(
                            channel_id = %channel_id,
                            code = %candidate.code,
                            error = %err,
                            "failed to send join notification"
                        );
                    }
                }
                Ok(())
            }
        }
    }
}
