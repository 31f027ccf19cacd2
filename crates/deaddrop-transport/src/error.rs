//! Error types for transport operations.

use thiserror::Error;

/// Errors that can occur while talking to a drop endpoint.
///
/// Transport errors are never fatal to a fan-out or a retrieval batch:
/// callers record them per endpoint and continue.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP client failed (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The endpoint answered a pull with an unexpected status.
    #[error("Unexpected response status {code}")]
    UnexpectedStatus {
        /// The HTTP status code received.
        code: u16,
    },

    /// A pulled batch body could not be split into blobs.
    #[error("Malformed batch: {0}")]
    MalformedBatch(String),

    /// The endpoint is unreachable.
    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
