//! Engine context - dependency container for the reconciliation engine
//!
//! Holds the collaborator ports the engine talks to: durable storage, the
//! remote invite API, the capability gate, and the event sink.

use std::sync::Arc;

use tracker_core::traits::{CapabilityGate, EventSink, GuildConfigStore, InviteApi, InviteLedger};

use super::error::{EngineError, EngineResult};

/// Dependency container passed to the engine
#[derive(Clone)]
pub struct EngineContext {
    ledger: Arc<dyn InviteLedger>,
    guild_configs: Arc<dyn GuildConfigStore>,
    invite_api: Arc<dyn InviteApi>,
    capabilities: Arc<dyn CapabilityGate>,
    events: Arc<dyn EventSink>,
}

impl EngineContext {
    /// Create a new engine context with all dependencies
    pub fn new(
        ledger: Arc<dyn InviteLedger>,
        guild_configs: Arc<dyn GuildConfigStore>,
        invite_api: Arc<dyn InviteApi>,
        capabilities: Arc<dyn CapabilityGate>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            ledger,
            guild_configs,
            invite_api,
            capabilities,
            events,
        }
    }

    /// Get the invite ledger
    pub fn ledger(&self) -> &dyn InviteLedger {
        self.ledger.as_ref()
    }

    /// Get the guild config store
    pub fn guild_configs(&self) -> &dyn GuildConfigStore {
        self.guild_configs.as_ref()
    }

    /// Get the remote invite API
    pub fn invite_api(&self) -> &dyn InviteApi {
        self.invite_api.as_ref()
    }

    /// Get the capability gate
    pub fn capabilities(&self) -> &dyn CapabilityGate {
        self.capabilities.as_ref()
    }

    /// Get the event sink
    pub fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("ledger", &"dyn InviteLedger")
            .field("guild_configs", &"dyn GuildConfigStore")
            .field("invite_api", &"dyn InviteApi")
            .finish()
    }
}

/// Builder for creating an EngineContext
#[derive(Default)]
pub struct EngineContextBuilder {
    ledger: Option<Arc<dyn InviteLedger>>,
    guild_configs: Option<Arc<dyn GuildConfigStore>>,
    invite_api: Option<Arc<dyn InviteApi>>,
    capabilities: Option<Arc<dyn CapabilityGate>>,
    events: Option<Arc<dyn EventSink>>,
}

impl EngineContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(mut self, ledger: Arc<dyn InviteLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn guild_configs(mut self, store: Arc<dyn GuildConfigStore>) -> Self {
        self.guild_configs = Some(store);
        self
    }

    pub fn invite_api(mut self, api: Arc<dyn InviteApi>) -> Self {
        self.invite_api = Some(api);
        self
    }

    pub fn capabilities(mut self, gate: Arc<dyn CapabilityGate>) -> Self {
        self.capabilities = Some(gate);
        self
    }

    pub fn events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Build the EngineContext
    ///
    /// # Errors
    /// Returns `EngineError::Internal` if any required dependency is missing
    pub fn build(self) -> EngineResult<EngineContext> {
        Ok(EngineContext::new(
            self.ledger
                .ok_or_else(|| EngineError::internal("ledger is required"))?,
            self.guild_configs
                .ok_or_else(|| EngineError::internal("guild_configs is required"))?,
            self.invite_api
                .ok_or_else(|| EngineError::internal("invite_api is required"))?,
            self.capabilities
                .ok_or_else(|| EngineError::internal("capabilities is required"))?,
            self.events
                .ok_or_else(|| EngineError::internal("events is required"))?,
        ))
    }
}
