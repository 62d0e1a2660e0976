//! Cross-cutting error types for Trackway.
//!
//! Domain-specific errors (`DatabaseError`, `ConfigError`, `AuthError`) live in
//! their respective crates and wrap `CoreError` where the domain rules surface.

use thiserror::Error;

use crate::enums::EntityType;

/// Errors that can be raised by any Trackway crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: EntityType, id: String },

    /// Input failed validation (range, ownership, lifecycle preconditions).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored facts do not map to exactly one lifecycle state.
    ///
    /// Indicates upstream data corruption. Never recovered from by guessing.
    #[error("Integrity violation: {entity_type} {id}: {reason}")]
    IntegrityViolation {
        entity_type: EntityType,
        id: String,
        reason: String,
    },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity_type: EntityType, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
