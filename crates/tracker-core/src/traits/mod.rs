//! Collaborator ports - trait seams between the engine and the outside world

mod platform;
mod repositories;

pub use platform::{
    CapabilityGate, CreateInviteOptions, EventSink, InviteApi, Messenger, PlatformError,
    PlatformResult,
};
pub use repositories::{GuildConfigStore, InviteLedger, LedgerResult};
