//! Error types for identity operations.

use thiserror::Error;

/// Errors that can occur when constructing identity primitives.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// A key identifier or key was built from a slice of the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// A hex string could not be parsed.
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// A drop endpoint URL was rejected.
    #[error("Invalid drop endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Result type for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;
