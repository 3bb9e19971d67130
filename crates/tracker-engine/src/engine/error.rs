//! Engine error types
//!
//! Most failures never surface here: transient remote failures degrade the
//! affected guild for one cycle, malformed payloads are validated away, and
//! capability gaps are skip conditions. What remains is storage trouble and
//! platform failures that happen mid-attribution.

use thiserror::Error;

use tracker_core::{DomainError, PlatformError};

/// Engine layer error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// Durable storage failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Remote platform failure
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Invariant breakage inside the engine itself
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a transient remote failure worth retrying next cycle
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Platform(PlatformError::Unavailable(_) | PlatformError::RateLimited)
        )
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
