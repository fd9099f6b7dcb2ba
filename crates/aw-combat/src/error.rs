//! Error types for the combat engine.

use aw_core::TableError;
use uuid::Uuid;

/// Errors that can occur while creating or driving an encounter.
#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    /// The tables cannot support the requested encounter. Fatal to creation.
    #[error("configuration error: {0}")]
    Configuration(#[from] TableError),

    /// The action is not valid for the current turn or state. The session
    /// is left untouched.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// An external collaborator failed to consume a resource or persist a
    /// reward. Retryable; the in-memory outcome is never rolled back.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// No session is registered under this id.
    #[error("unknown session: {0}")]
    UnknownSession(Uuid),
}

impl CombatError {
    /// Shorthand for an [`CombatError::InvalidAction`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidAction(reason.into())
    }

    /// Returns true if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// Convenience result type for combat operations.
pub type CombatResult<T> = Result<T, CombatError>;
