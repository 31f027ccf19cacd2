//! Error types for directory operations.

use thiserror::Error;

/// Errors that can occur during directory operations.
///
/// Directory failures are fatal to the calling operation: the store never
/// retries and never buffers a write it could not complete.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The persistence backend failed.
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// A persisted record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An operation referenced an identity the roster does not contain.
    #[error("Unknown identity: {0}")]
    UnknownIdentity(String),
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
