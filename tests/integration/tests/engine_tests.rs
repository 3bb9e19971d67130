//! Reconciliation engine integration tests
//!
//! Exercises the engine end to end against in-memory collaborator fakes:
//! full sync convergence, incremental events, join attribution, and the
//! guard/rate-limit interplay.
//!
//! Run with: cargo test -p integration-tests --test engine_tests

use std::time::Duration;

use integration_tests::{
    live_invite, logging_guild, record, unique_id, RecordingMessenger, TestHarness,
};
use std::sync::Arc;
use tracker_core::entities::{GuildConfig, JoinedMember, LiveInvite};
use tracker_core::events::LedgerEvent;
use tracker_core::traits::{GuildConfigStore, Messenger};
use tracker_core::value_objects::{Capabilities, Snowflake};
use tracker_engine::JoinNotifier;

// ============================================================================
// Full Sync
// ============================================================================

#[tokio::test]
async fn test_full_sync_converges_ledger_to_live_set() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));

    // Ledger knows A (stale count) and C (no longer live); remote has A and B
    harness.ledger.insert(record("codeA", guild, inviter, 1));
    harness.ledger.insert(record("codeC", guild, inviter, 5));
    harness.api.set_live(
        guild,
        vec![
            live_invite("codeA", guild, inviter, 3),
            live_invite("codeB", guild, inviter, 7),
        ],
    );

    harness.engine.sync_invites().await.unwrap();

    let codes = harness.ledger.codes_for_guild(guild);
    assert_eq!(codes.len(), 2);
    assert!(codes.contains("codeA"));
    assert!(codes.contains("codeB"));

    // Existing entries get only their count refreshed
    assert_eq!(harness.ledger.get("codeA").unwrap().uses, 3);
    // Newly tracked invites start at zero; the next pass catches them up
    assert_eq!(harness.ledger.get("codeB").unwrap().uses, 0);
    // C vanished remotely and is dropped
    assert!(harness.ledger.get("codeC").is_none());
}

#[tokio::test]
async fn test_full_sync_skips_guild_without_capabilities() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));
    harness.gate.grant(guild, Capabilities::MANAGE_GUILD); // missing the rest

    harness.ledger.insert(record("codeA", guild, inviter, 1));
    harness
        .api
        .set_live(guild, vec![live_invite("codeB", guild, inviter, 0)]);

    harness.engine.sync_invites().await.unwrap();

    // No remote call, ledger untouched: a capability gap is a skip, not an error
    assert_eq!(harness.api.list_calls(guild), 0);
    assert_eq!(harness.ledger.codes_for_guild(guild).len(), 1);
    assert!(harness.ledger.get("codeA").is_some());
}

#[tokio::test]
async fn test_full_sync_never_fetches_unconfigured_guild() {
    let harness = TestHarness::new();
    let guild = unique_id();
    harness.configs.insert(GuildConfig::disabled(guild));
    harness
        .api
        .set_live(guild, vec![live_invite("codeA", guild, unique_id(), 0)]);

    harness.engine.sync_invites().await.unwrap();

    assert_eq!(harness.api.list_calls(guild), 0);
    assert!(harness.ledger.is_empty());
}

#[tokio::test]
async fn test_failed_guild_keeps_entries_and_does_not_abort_pass() {
    let harness = TestHarness::new();
    let healthy = unique_id();
    let broken = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(healthy));
    harness.configs.insert(logging_guild(broken));

    harness.api.set_live(
        healthy,
        vec![live_invite("codeA", healthy, inviter, 2)],
    );
    harness.ledger.insert(record("codeA", healthy, inviter, 0));
    harness.ledger.insert(record("codeZ", broken, inviter, 1));
    harness.api.fail_guild(broken);

    harness.engine.sync_invites().await.unwrap();

    // Healthy guild converged despite the broken one
    assert_eq!(harness.ledger.get("codeA").unwrap().uses, 2);
    // The broken guild's entries survive the cycle: deletion is per guild
    // and only runs after a successful fetch
    assert!(harness.ledger.get("codeZ").is_some());
}

#[tokio::test]
async fn test_full_sync_defers_guilds_beyond_rate_budget() {
    let harness = TestHarness::with_rate_limit(1, Duration::from_secs(60));
    let first = Snowflake::new(1);
    let second = Snowflake::new(2);
    harness.configs.insert(logging_guild(first));
    harness.configs.insert(logging_guild(second));

    harness.engine.sync_invites().await.unwrap();

    // One permit per window: the second guild waits for the next cycle
    assert_eq!(harness.api.total_list_calls(), 1);
    assert_eq!(harness.api.list_calls(first), 1);
    assert_eq!(harness.api.list_calls(second), 0);
}

#[tokio::test]
async fn test_full_sync_is_noop_while_attribution_in_flight() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));
    harness.ledger.insert(record("codeA", guild, inviter, 1));
    harness
        .api
        .set_live(guild, vec![live_invite("codeA", guild, inviter, 9)]);

    let _permit = harness.engine.sync_guard().hold();
    harness.engine.sync_invites().await.unwrap();

    assert_eq!(harness.api.total_list_calls(), 0);
    assert_eq!(harness.ledger.get("codeA").unwrap().uses, 1);
}

// ============================================================================
// Incremental Events
// ============================================================================

#[tokio::test]
async fn test_invite_create_tracks_with_zero_uses() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));

    harness
        .engine
        .handle_invite_create(live_invite("fresh", guild, inviter, 4))
        .await
        .unwrap();

    let stored = harness.ledger.get("fresh").unwrap();
    assert_eq!(stored.uses, 0);
    assert_eq!(stored.inviter_id, inviter);
}

#[tokio::test]
async fn test_invite_create_recovers_missing_inviter_by_refetch() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));

    // The create payload arrives inside the eventual-consistency window,
    // before the platform populated the inviter; the live list has it
    harness
        .api
        .set_live(guild, vec![live_invite("lagged", guild, inviter, 0)]);
    let payload = LiveInvite::new("lagged".to_string(), guild, 0);
    assert!(payload.inviter_id.is_none());

    harness.engine.handle_invite_create(payload).await.unwrap();

    assert_eq!(harness.api.list_calls(guild), 1);
    assert_eq!(harness.ledger.get("lagged").unwrap().inviter_id, inviter);
}

#[tokio::test]
async fn test_invite_create_ignores_malformed_payloads() {
    let harness = TestHarness::new();
    let guild = unique_id();
    harness.configs.insert(logging_guild(guild));

    // Empty code
    harness
        .engine
        .handle_invite_create(LiveInvite::new(String::new(), guild, 0))
        .await
        .unwrap();

    // Missing guild reference
    let mut no_guild = LiveInvite::new("orphan".to_string(), guild, 0);
    no_guild.guild_id = None;
    harness.engine.handle_invite_create(no_guild).await.unwrap();

    assert!(harness.ledger.is_empty());
}

#[tokio::test]
async fn test_invite_create_noop_when_logging_disabled() {
    let harness = TestHarness::new();
    let guild = unique_id();
    harness.configs.insert(GuildConfig::disabled(guild));

    harness
        .engine
        .handle_invite_create(live_invite("unwatched", guild, unique_id(), 0))
        .await
        .unwrap();

    assert!(harness.ledger.is_empty());
}

#[tokio::test]
async fn test_invite_delete_is_idempotent() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.ledger.insert(record("gone", guild, inviter, 2));
    harness.ledger.insert(record("kept", guild, inviter, 0));

    harness.engine.handle_invite_delete("gone").await.unwrap();
    // Second delete of the same code, and a code never tracked
    harness.engine.handle_invite_delete("gone").await.unwrap();
    harness.engine.handle_invite_delete("never").await.unwrap();

    assert!(harness.ledger.get("gone").is_none());
    assert!(harness.ledger.get("kept").is_some());
    assert_eq!(harness.ledger.len(), 1);
}

// ============================================================================
// Join Attribution
// ============================================================================

#[tokio::test]
async fn test_attribution_selects_invite_with_usage_delta() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter_a = unique_id();
    let inviter_b = unique_id();
    harness.configs.insert(logging_guild(guild));

    harness.ledger.insert(record("codeA", guild, inviter_a, 3));
    harness.ledger.insert(record("codeB", guild, inviter_b, 7));
    harness.api.set_live(
        guild,
        vec![
            live_invite("codeB", guild, inviter_b, 7), // unchanged
            live_invite("codeA", guild, inviter_a, 4), // one new use
        ],
    );

    let candidates = harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].code, "codeA");
    assert_eq!(candidates[0].inviter_id, Some(inviter_a));
    // The ledger caught up with the observed count
    assert_eq!(harness.ledger.get("codeA").unwrap().uses, 4);
    assert_eq!(harness.ledger.get("codeB").unwrap().uses, 7);

    let events = harness.sink.events();
    assert_eq!(events.len(), 1);
    let LedgerEvent::MemberJoinedWithInvites { candidates, .. } = &events[0];
    assert_eq!(candidates.len(), 1);
}

#[tokio::test]
async fn test_attribution_stops_at_first_delta() {
    // First-delta-wins is a heuristic: when several counts moved at once
    // (e.g. retroactive corrections), only the first in remote list order
    // is attributed. Preserved behavior, known limitation.
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));

    harness.ledger.insert(record("codeA", guild, inviter, 1));
    harness.ledger.insert(record("codeB", guild, inviter, 1));
    harness.api.set_live(
        guild,
        vec![
            live_invite("codeA", guild, inviter, 2),
            live_invite("codeB", guild, inviter, 2),
        ],
    );

    let candidates = harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].code, "codeA");
    // The unattributed delta stays stale until the next full sync
    assert_eq!(harness.ledger.get("codeB").unwrap().uses, 1);
}

#[tokio::test]
async fn test_attribution_falls_back_to_vanished_codes() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));

    // Single-use invite: consumed invites disappear from the live list
    harness.ledger.insert(record("codeC", guild, inviter, 1));
    harness.api.set_live(guild, vec![]);

    let candidates = harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].code, "codeC");
    // The inviter comes from the ledger's last-known state
    assert_eq!(candidates[0].inviter_id, Some(inviter));
    // The entry follows the platform's deletion
    assert!(harness.ledger.get("codeC").is_none());
}

#[tokio::test]
async fn test_attribution_emits_all_vanished_codes_as_candidates() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));

    harness.ledger.insert(record("codeX", guild, inviter, 1));
    harness.ledger.insert(record("codeY", guild, inviter, 1));
    harness.api.set_live(guild, vec![]);

    let candidates = harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await
        .unwrap();

    // Ambiguous by design: both vanished codes are reported
    assert_eq!(candidates.len(), 2);
    assert!(harness.ledger.is_empty());
}

#[tokio::test]
async fn test_attribution_short_circuits_without_log_channel() {
    let harness = TestHarness::new();
    let guild = unique_id();
    harness.configs.insert(GuildConfig::disabled(guild));
    harness
        .api
        .set_live(guild, vec![live_invite("codeA", guild, unique_id(), 5)]);

    let candidates = harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await
        .unwrap();

    assert!(candidates.is_empty());
    // Fast path: no remote call, no derived event
    assert_eq!(harness.api.list_calls(guild), 0);
    assert!(harness.sink.events().is_empty());
}

#[tokio::test]
async fn test_attribution_emits_event_even_with_no_candidates() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    harness.configs.insert(logging_guild(guild));

    harness.ledger.insert(record("codeA", guild, inviter, 3));
    harness
        .api
        .set_live(guild, vec![live_invite("codeA", guild, inviter, 3)]);

    let candidates = harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await
        .unwrap();

    assert!(candidates.is_empty());
    let events = harness.sink.events();
    assert_eq!(events.len(), 1);
    let LedgerEvent::MemberJoinedWithInvites { candidates, .. } = &events[0];
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn test_guard_releases_when_attribution_fails() {
    let harness = TestHarness::new();
    let guild = unique_id();
    harness.configs.insert(logging_guild(guild));
    harness.api.fail_guild(guild);

    let result = harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await;

    assert!(result.is_err());
    // A stuck guard would permanently disable syncs and attributions
    assert!(!harness.engine.sync_guard().is_held());

    // And the next full sync actually runs
    harness.engine.sync_invites().await.unwrap();
    assert!(harness.api.list_calls(guild) >= 2);
}

// ============================================================================
// Presence Probe
// ============================================================================

#[tokio::test]
async fn test_probe_presence_creates_fetches_and_deletes() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let channel = unique_id();
    harness.api.set_presence_count(42);

    let count = harness.engine.probe_presence(guild, channel).await.unwrap();

    assert_eq!(count, 42);
    let created = harness.api.created_invites();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, channel);
    assert_eq!(created[0].1.max_uses, 1);
    // The throwaway invite never outlives the probe
    assert_eq!(harness.api.deleted_codes().len(), 1);
}

#[tokio::test]
async fn test_probe_presence_deletes_invite_even_when_fetch_fails() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let channel = unique_id();
    harness.api.fail_fetch();

    let result = harness.engine.probe_presence(guild, channel).await;

    assert!(result.is_err());
    assert_eq!(harness.api.deleted_codes().len(), 1);
}

#[tokio::test]
async fn test_probe_presence_requires_capabilities() {
    let harness = TestHarness::new();
    let guild = unique_id();
    harness.gate.grant(guild, Capabilities::empty());

    let result = harness.engine.probe_presence(guild, unique_id()).await;

    assert!(result.is_err());
    assert!(harness.api.created_invites().is_empty());
}

// ============================================================================
// Notifier
// ============================================================================

#[tokio::test]
async fn test_notifier_sends_one_message_per_candidate() {
    let harness = TestHarness::new();
    let guild = unique_id();
    let inviter = unique_id();
    let config = logging_guild(guild);
    let channel = config.log_channel_id.unwrap();
    harness.configs.insert(config);

    harness.ledger.insert(record("codeX", guild, inviter, 1));
    harness.ledger.insert(record("codeY", guild, inviter, 1));
    harness.api.set_live(guild, vec![]);

    let messenger = Arc::new(RecordingMessenger::new());
    let notifier = JoinNotifier::new(
        Arc::clone(&harness.configs) as Arc<dyn GuildConfigStore>,
        Arc::clone(&messenger) as Arc<dyn Messenger>,
    );

    harness
        .engine
        .handle_member_join(JoinedMember::new(guild, unique_id()))
        .await
        .unwrap();

    for event in harness.sink.events() {
        notifier.handle(&event).await.unwrap();
    }

    let sent = messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|(ch, _)| *ch == channel));
    assert!(sent.iter().any(|(_, text)| text.contains("codeX")));
    assert!(sent.iter().any(|(_, text)| text.contains("codeY")));
}

#[tokio::test]
async fn test_notifier_noop_without_log_channel() {
    let harness = TestHarness::new();
    let guild = unique_id();
    harness.configs.insert(GuildConfig::disabled(guild));

    let messenger = Arc::new(RecordingMessenger::new());
    let notifier = JoinNotifier::new(
        Arc::clone(&harness.configs) as Arc<dyn GuildConfigStore>,
        Arc::clone(&messenger) as Arc<dyn Messenger>,
    );

    let event = LedgerEvent::MemberJoinedWithInvites {
        member: JoinedMember::new(guild, unique_id()),
        candidates: vec![],
    };
    notifier.handle(&event).await.unwrap();

    assert!(messenger.sent().is_empty());
}
