//! # tracker-core
//!
//! Domain layer for the invite ledger: entities, value objects, collaborator
//! ports, and domain events. This crate has zero dependencies on
//! infrastructure (storage backend, platform client, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{GuildConfig, InviteRecord, JoinedMember, LiveInvite};
pub use error::DomainError;
pub use events::{InviteCandidate, LedgerEvent};
pub use traits::{
    CapabilityGate, CreateInviteOptions, EventSink, GuildConfigStore, InviteApi, InviteLedger,
    LedgerResult, Messenger, PlatformError, PlatformResult,
};
pub use value_objects::{Capabilities, Snowflake, SnowflakeParseError};
