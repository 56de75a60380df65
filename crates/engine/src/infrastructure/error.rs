//! Unified engine error types.
//!
//! Structural simulation calls never fail; these errors come from the
//! boundaries around them (configuration, wire decoding, identity lookup).

use thiserror::Error;
use vessel_domain::DomainError;

use crate::sync::SyncError;

/// Unified engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A configuration value failed domain validation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Synchronization failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl EngineError {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Domain(DomainError::Validation(_)))
    }
}
