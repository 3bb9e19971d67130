//! Domain entities - core business objects

mod guild_config;
mod invite_record;
mod live_invite;
mod member;

pub use guild_config::GuildConfig;
pub use invite_record::InviteRecord;
pub use live_invite::LiveInvite;
pub use member::JoinedMember;
