//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type CoreResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Element not found in scene.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Invalid operation on the session state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The replacement token does not match the pending replacement.
    #[error("Stale replacement token: {0}")]
    StaleToken(String),

    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
