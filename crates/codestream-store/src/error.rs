//! Store error types

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store could not be reached; callers degrade gracefully
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document could not be decoded into its expected shape
    #[error("malformed document in {collection}: {reason}")]
    MalformedDocument {
        /// Collection the document came from
        collection: String,
        /// Failure reason
        reason: String,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
