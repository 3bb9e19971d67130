//! Value objects - immutable domain primitives

mod capabilities;
mod snowflake;

pub use capabilities::Capabilities;
pub use snowflake::{Snowflake, SnowflakeParseError};
