//! Error types for the Hive authorization core.
//!
//! Every fallible operation returns `HiveResult<T>`. Collaborators report
//! lookups that found nothing with `NotFound`; the guard propagates those
//! unchanged so the surrounding framework can turn them into client errors.

use thiserror::Error;

/// The unified error type for the Hive crates.
#[derive(Debug, Error)]
pub enum HiveError {
    /// A slug or id lookup matched no entity.
    #[error("{entity} '{key}' not found")]
    NotFound { entity: String, key: String },

    /// The caller is not permitted to perform the action.
    ///
    /// The guard itself never returns this; it answers `false`. Callers that
    /// need an error shape for a denied decision construct it themselves.
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// An unexpected failure that must not leak collaborator details.
    #[error("internal error: {reason}")]
    Internal { reason: String },

    /// A policy or route document is missing, malformed, or inconsistent.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A collaborator could not be reached (storage down, lock poisoned).
    #[error("collaborator unavailable: {reason}")]
    Unavailable { reason: String },
}

impl HiveError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Return true for lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias used throughout the Hive crates.
pub type HiveResult<T> = Result<T, HiveError>;
