//! Protocol limits and constants.
//!
//! All wire-level bounds are defined here for consistent enforcement.

/// Version tag of the first-generation envelope format.
pub const ENVELOPE_VERSION_0: u8 = 0;

/// Maximum message payload size in bytes.
///
/// Enforced at the send boundary before any envelope is built; codecs
/// enforce the same bound internally.
pub const MAX_PAYLOAD_BYTES: usize = 2048;

/// Maximum length of a message type tag in bytes.
pub const MAX_PAYLOAD_TYPE_BYTES: usize = 64;

/// Upper bound on a raw envelope blob accepted from an endpoint.
///
/// Checked before any per-version parsing so a hostile endpoint cannot
/// force large allocations with a fabricated size field.
pub const MAX_ENVELOPE_BYTES: usize = 8192;
