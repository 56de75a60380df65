//! Unified error types for the domain layer
//!
//! The containment core itself follows a precondition discipline and never
//! fails; these errors only surface at the boundaries (configuration
//! validation, identity resolution, graph audits).

use thiserror::Error;

use crate::EntityId;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid configuration values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found in the live population
    #[error("Entity not found: {0}")]
    NotFound(EntityId),

    /// The containment graph broke one of its invariants
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl DomainError {
    /// Creates a validation error for configuration or value-object input.
    ///
    /// # Example
    /// ```ignore
    /// if weight < 0.0 {
    ///     return Err(DomainError::validation("effect weight cannot be negative"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(id: EntityId) -> Self {
        Self::NotFound(id)
    }

    /// Create an invariant violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}
