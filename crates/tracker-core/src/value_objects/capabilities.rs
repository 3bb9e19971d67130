//! Capability bitflags - what the bot is allowed to do inside a guild
//!
//! The engine never enforces these itself; it asks the platform's capability
//! gate and treats an insufficient set as a skip condition, not an error.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Guild-scoped capability flags held by an actor
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u64 {
        /// Read channels and member lists
        const VIEW_CHANNEL          = 1 << 0;
        /// Post messages to text channels
        const SEND_MESSAGES         = 1 << 1;
        /// Create instant invites
        const CREATE_INSTANT_INVITE = 1 << 2;
        /// Create, edit, delete channels
        const MANAGE_CHANNELS       = 1 << 3;
        /// Edit guild settings and list guild invites
        const MANAGE_GUILD          = 1 << 4;
        /// Bypass all capability checks
        const ADMINISTRATOR         = 1 << 5;

        /// Everything invite tracking needs: listing invites requires
        /// MANAGE_GUILD, while the presence probe also creates and deletes
        /// invites on the fly.
        const SYNC_REQUIRED = Self::MANAGE_GUILD.bits()
            | Self::CREATE_INSTANT_INVITE.bits()
            | Self::MANAGE_CHANNELS.bits();
    }
}

impl Capabilities {
    /// Check if the set contains all of the given capabilities
    ///
    /// Administrators bypass all capability checks.
    #[inline]
    pub fn has_all(&self, capabilities: Capabilities) -> bool {
        if self.contains(Capabilities::ADMINISTRATOR) {
            return true;
        }
        self.contains(capabilities)
    }

    /// Get the raw bits as i64 (for storage)
    #[inline]
    pub fn to_i64(self) -> i64 {
        self.bits() as i64
    }

    /// Create from raw i64 bits (from storage)
    #[inline]
    pub fn from_i64(bits: i64) -> Self {
        Capabilities::from_bits_truncate(bits as u64)
    }

    /// Get a list of all individual capabilities that are set
    pub fn list(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.contains(Self::VIEW_CHANNEL) {
            result.push("VIEW_CHANNEL");
        }
        if self.contains(Self::SEND_MESSAGES) {
            result.push("SEND_MESSAGES");
        }
        if self.contains(Self::CREATE_INSTANT_INVITE) {
            result.push("CREATE_INSTANT_INVITE");
        }
        if self.contains(Self::MANAGE_CHANNELS) {
            result.push("MANAGE_CHANNELS");
        }
        if self.contains(Self::MANAGE_GUILD) {
            result.push("MANAGE_GUILD");
        }
        if self.contains(Self::ADMINISTRATOR) {
            result.push("ADMINISTRATOR");
        }
        result
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.list().join(" | "))
    }
}
