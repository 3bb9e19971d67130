//! Reconciliation engine
//!
//! Handles full syncs against the remote invite list, incremental
//! create/delete events, and the presence probe. Join attribution lives in
//! the `attribution` module as a separate impl block.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use tracker_core::entities::{InviteRecord, LiveInvite};
use tracker_core::traits::{CreateInviteOptions, PlatformError};
use tracker_core::value_objects::{Capabilities, Snowflake};

use super::context::EngineContext;
use super::error::EngineResult;
use super::rate_limiter::RateLimiter;
use super::sync_guard::SyncGuard;

/// The invite-ledger reconciliation engine
///
/// One instance per host process; all event handlers and the periodic sync
/// task share it behind an `Arc`.
pub struct ReconciliationEngine {
    ctx: EngineContext,
    guard: SyncGuard,
    limiter: RateLimiter,
}

impl ReconciliationEngine {
    /// Create a new engine with its outbound rate limiter
    pub fn new(ctx: EngineContext, limiter: RateLimiter) -> Self {
        Self {
            ctx,
            guard: SyncGuard::new(),
            limiter,
        }
    }

    pub(crate) fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    /// The skip-flag shared between attribution and the periodic sync
    ///
    /// Exposed so hosts can consult it from their own handlers.
    pub fn sync_guard(&self) -> &SyncGuard {
        &self.guard
    }

    /// Reconcile the whole ledger against the remote source
    ///
    /// Skipped entirely while a join attribution is in flight. One guild's
    /// failure never aborts the pass for the others; the failed guild simply
    /// contributes nothing this cycle and is retried next period.
    #[instrument(skip(self))]
    pub async fn sync_invites(&self) -> EngineResult<()> {
        if self.guard.is_held() {
            debug!("join attribution in flight, skipping full sync");
            return Ok(());
        }

        let guilds = self.ctx.guild_configs().list_logging_enabled().await?;
        for guild_id in guilds {
            if let Err(err) = self.sync_guild(guild_id).await {
                warn!(guild_id = %guild_id, error = %err, "guild sync degraded for this cycle");
            }
        }
        Ok(())
    }

    /// Reconcile a single guild's ledger entries against its live invites
    async fn sync_guild(&self, guild_id: Snowflake) -> EngineResult<()> {
        let allowed = self
            .ctx
            .capabilities()
            .has_capabilities(guild_id, Capabilities::SYNC_REQUIRED)
            .await?;
        if !allowed {
            debug!(guild_id = %guild_id, "insufficient capabilities, skipping guild");
            return Ok(());
        }

        if !self.limiter.try_acquire() {
            debug!(guild_id = %guild_id, "rate limit budget exhausted, deferring guild");
            return Ok(());
        }

        let live = self.ctx.invite_api().list_invites(guild_id).await?;

        let mut live_codes = HashSet::with_capacity(live.len());
        for invite in live {
            live_codes.insert(invite.code.clone());
            match self.ctx.ledger().find_by_code(&invite.code).await? {
                Some(_) => {
                    self.ctx
                        .ledger()
                        .update_uses(&invite.code, invite.uses)
                        .await?;
                }
                None => self.track_invite(invite).await?,
            }
        }

        // Deletion is scoped to this guild and only runs after a successful
        // fetch: a guild that failed to list keeps its entries this cycle.
        let recorded = self.ctx.ledger().find_by_guild(guild_id).await?;
        for record in recorded {
            if !live_codes.contains(&record.code) {
                self.ctx.ledger().delete(&record.code).await?;
                info!(code = %record.code, guild_id = %guild_id, "dropped invite no longer live");
            }
        }

        Ok(())
    }

    /// Start tracking a candidate invite in the ledger
    ///
    /// Malformed payloads, guilds without logging, and capability gaps all
    /// return without effect. A missing inviter is recovered by re-fetching
    /// the guild's invite list; the platform may not populate it
    /// synchronously at creation time.
    #[instrument(skip(self, invite), fields(code = %invite.code))]
    pub async fn track_invite(&self, invite: LiveInvite) -> EngineResult<()> {
        if !invite.is_trackable() {
            debug!("ignoring malformed invite payload");
            return Ok(());
        }
        let Some(guild_id) = invite.guild_id else {
            return Ok(());
        };

        let config = self.ctx.guild_configs().find(guild_id).await?;
        if !config.is_some_and(|c| c.logging_enabled()) {
            return Ok(());
        }

        let allowed = self
            .ctx
            .capabilities()
            .has_capabilities(guild_id, Capabilities::SYNC_REQUIRED)
            .await?;
        if !allowed {
            return Ok(());
        }

        let inviter_id = match invite.inviter_id {
            Some(id) => Some(id),
            None => self.recover_inviter(guild_id, &invite.code).await?,
        };
        let Some(inviter_id) = inviter_id else {
            debug!(guild_id = %guild_id, "inviter unresolved after re-fetch, skipping invite");
            return Ok(());
        };

        let record = InviteRecord::new(invite.code, guild_id, inviter_id);
        self.ctx.ledger().create(&record).await?;

        info!(
            code = %record.code,
            guild_id = %guild_id,
            inviter_id = %inviter_id,
            "invite tracked"
        );
        Ok(())
    }

    /// Re-fetch the live list to backfill an inviter the create payload lacked
    async fn recover_inviter(
        &self,
        guild_id: Snowflake,
        code: &str,
    ) -> EngineResult<Option<Snowflake>> {
        let live = self.ctx.invite_api().list_invites(guild_id).await?;
        Ok(live
            .into_iter()
            .find(|invite| invite.code == code)
            .and_then(|invite| invite.inviter_id))
    }

    /// Handle an invite-create event from the platform
    pub async fn handle_invite_create(&self, invite: LiveInvite) -> EngineResult<()> {
        self.track_invite(invite).await
    }

    /// Handle an invite-delete event from the platform
    ///
    /// Idempotent: the event may arrive after a full sync already dropped
    /// the entry, or for a code that was never tracked.
    #[instrument(skip(self))]
    pub async fn handle_invite_delete(&self, code: &str) -> EngineResult<()> {
        self.ctx.ledger().delete(code).await?;
        debug!(code = %code, "invite deleted from ledger");
        Ok(())
    }

    /// Estimate how many members are online but presence-hidden
    ///
    /// Creates a throwaway single-use invite, reads its approximate presence
    /// count back, and deletes it. The probe invite is deleted even when the
    /// intermediate fetch fails.
    #[instrument(skip(self))]
    pub async fn probe_presence(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> EngineResult<i32> {
        let allowed = self
            .ctx
            .capabilities()
            .has_capabilities(guild_id, Capabilities::SYNC_REQUIRED)
            .await?;
        if !allowed {
            return Err(PlatformError::Forbidden.into());
        }

        if !self.limiter.try_acquire() {
            return Err(PlatformError::RateLimited.into());
        }

        let probe = self
            .ctx
            .invite_api()
            .create_invite(channel_id, CreateInviteOptions::single_use("presence probe"))
            .await?;

        let fetched = self.ctx.invite_api().fetch_invite(&probe.code).await;

        if let Err(err) = self.ctx.invite_api().delete_invite(&probe.code).await {
            warn!(code = %probe.code, error = %err, "failed to delete probe invite");
        }

        Ok(fetched?.approximate_presence_count.unwrap_or(0))
    }
}

/// Spawn the periodic full-sync driver
///
/// Ticks immediately on spawn (startup sync) and then every `interval`.
/// Returns the task handle so the host can abort it on shutdown.
pub fn spawn_periodic_sync(
    engine: Arc<ReconciliationEngine>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = engine.sync_invites().await {
                warn!(error = %err, "periodic invite sync failed");
            }
        }
    })
}
