//! Error types for exchange operations.

use thiserror::Error;

/// Errors surfaced by the dispatcher and reconciler.
///
/// Per-endpoint and per-blob conditions never appear here: they are
/// recorded in delivery outcomes or skipped with a log line. Only
/// call-boundary validation and persistence failures are hard errors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Envelope encoding failed (payload too large, codec failure).
    #[error("Encode error: {0}")]
    Encode(#[from] deaddrop_wire::EncodeError),

    /// The directory store failed; nothing is retried.
    #[error("Directory error: {0}")]
    Directory(#[from] deaddrop_directory::DirectoryError),

    /// The dispatcher's worker pool has been torn down.
    #[error("Dispatcher is shut down")]
    DispatcherClosed,
}

/// Result type for exchange operations.
pub type Result<T> = std::result::Result<T, CoreError>;
