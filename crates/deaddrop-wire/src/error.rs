//! Error types for envelope encoding and decoding.

use thiserror::Error;

/// Errors raised while encoding a message into an envelope.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The message payload exceeds the wire format's bound.
    ///
    /// Raised synchronously at the send boundary, before any I/O.
    #[error("Payload too large: max {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum allowed payload size in bytes.
        max: usize,
        /// Actual payload size in bytes.
        actual: usize,
    },

    /// The codec failed to assemble the envelope.
    #[error("Codec failure: {0}")]
    Codec(String),
}

/// Errors raised while decoding an envelope blob.
///
/// All of these are per-blob conditions: a retrieval batch never aborts on
/// any of them. `SpoofedSender` additionally stops further identity trials
/// for the offending blob.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The blob is empty; there is no version tag to read.
    #[error("Empty envelope")]
    Empty,

    /// The leading version tag names no registered decoder.
    #[error("Unsupported envelope version {version}")]
    UnsupportedVersion {
        /// The unrecognized version tag.
        version: u8,
    },

    /// The blob is structurally invalid for its declared version.
    ///
    /// Crafted or corrupted uploads land here; they are skipped, not fatal.
    #[error("Invalid envelope size for version {version}: {size} bytes")]
    InvalidSize {
        /// Declared envelope version.
        version: u8,
        /// Observed blob size in bytes.
        size: usize,
    },

    /// The embedded sender authentication failed verification against the
    /// key identifier it claims.
    #[error("Envelope sender authentication failed")]
    SpoofedSender,

    /// The envelope could not be opened by the candidate identity.
    ///
    /// Not an attack signal: envelopes carry no cleartext recipient, so
    /// every identity but the real recipient sees this during trial decode.
    #[error("Envelope is not addressed to the candidate identity")]
    NotForRecipient,

    /// The envelope body failed to parse after decryption.
    #[error("Malformed envelope: {0}")]
    Malformed(String),
}
