//! Error types for the administration layer.

use thiserror::Error;

use filegrant_store::StoreError;

/// Errors that can occur during administration operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// A non-"all" specifier that matched no user. The operation was
    /// aborted with no partial mutation.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Export document serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for administration operations.
pub type Result<T> = std::result::Result<T, AdminError>;
