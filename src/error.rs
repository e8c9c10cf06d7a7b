//! Error types for wikiperm

use thiserror::Error;

/// The main error type for permission construction and policy loading.
///
/// Implication queries never fail; a comparison that cannot succeed is simply `false`.
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("Invalid {kind} action '{action}'")]
    InvalidAction { kind: &'static str, action: String },

    #[error("Invalid target '{0}'")]
    InvalidTarget(String),

    #[error("Permission collection is sealed (read-only)")]
    CollectionSealed,

    #[error("Invalid policy: {0}")]
    Policy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PermissionError {
    pub(crate) fn invalid_action(kind: &'static str, action: impl Into<String>) -> Self {
        Self::InvalidAction { kind, action: action.into() }
    }

    pub(crate) fn invalid_target(target: impl Into<String>) -> Self {
        Self::InvalidTarget(target.into())
    }
}

/// Result type alias for wikiperm operations
pub type Result<T> = std::result::Result<T, PermissionError>;
