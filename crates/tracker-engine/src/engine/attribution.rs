//! Join attribution
//!
//! The platform gives no direct signal of which invite a new member used.
//! Attribution compares the live invite list against the ledger's last
//! observed state: a use-count delta is the primary signal, a recorded code
//! that vanished from the live list is the fallback (most likely a consumed
//! single-use invite the platform already removed).

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use tracker_core::entities::{InviteRecord, JoinedMember};
use tracker_core::events::{InviteCandidate, LedgerEvent};

use super::error::EngineResult;
use super::reconciler::ReconciliationEngine;

impl ReconciliationEngine {
    /// Attribute a member join to the invite most likely used
    ///
    /// Holds the sync guard for the whole computation so the periodic full
    /// sync cannot rewrite use counts mid-diff. The guard releases on every
    /// exit path, including early `?` propagation - a stuck guard would
    /// permanently disable both syncs and attributions.
    #[instrument(skip(self, member), fields(guild_id = %member.guild_id, user_id = %member.user_id))]
    pub async fn handle_member_join(
        &self,
        member: JoinedMember,
    ) -> EngineResult<Vec<InviteCandidate>> {
        let _permit = self.sync_guard().hold();

        let config = self.ctx().guild_configs().find(member.guild_id).await?;
        if !config.is_some_and(|c| c.logging_enabled()) {
            debug!("invite logging disabled, skipping attribution");
            return Ok(Vec::new());
        }

        let live = self.ctx().invite_api().list_invites(member.guild_id).await?;
        let recorded = self.ctx().ledger().find_by_guild(member.guild_id).await?;
        let recorded_by_code: HashMap<&str, &InviteRecord> =
            recorded.iter().map(|r| (r.code.as_str(), r)).collect();

        let mut candidates = Vec::new();

        // Primary strategy: the first live invite whose count outgrew the
        // ledger wins. Remote list order is not guaranteed stable, so
        // first-delta-wins is a heuristic; at most one invite is attributed
        // even when several deltas exist at once.
        for invite in &live {
            let Some(record) = recorded_by_code.get(invite.code.as_str()) else {
                // Live invite the ledger has not caught up with yet
                continue;
            };
            if invite.uses > record.uses {
                candidates.push(InviteCandidate::new(
                    &invite.code,
                    invite.inviter_id.or(Some(record.inviter_id)),
                ));
                self.ctx()
                    .ledger()
                    .update_uses(&invite.code, invite.uses)
                    .await?;
                break;
            }
        }

        // Fallback strategy: recorded codes that are no longer live. The
        // ledger's remembered inviter is the only attribution left, and the
        // entry is dropped to match the platform's deletion. Several codes
        // can vanish between two joins; all of them become candidates.
        if candidates.is_empty() {
            let live_codes: HashSet<&str> = live.iter().map(|i| i.code.as_str()).collect();
            for record in &recorded {
                if !live_codes.contains(record.code.as_str()) {
                    candidates.push(InviteCandidate::new(&record.code, Some(record.inviter_id)));
                    self.ctx().ledger().delete(&record.code).await?;
                }
            }
        }

        let event = LedgerEvent::MemberJoinedWithInvites {
            member,
            candidates: candidates.clone(),
        };
        if let Err(err) = self.ctx().events().emit(event).await {
            warn!(error = %err, "failed to emit join attribution event");
        }

        Ok(candidates)
    }
}
