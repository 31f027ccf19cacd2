//! # deaddrop-wire
//!
//! Message model and wire seams for the deaddrop protocol.
//!
//! This crate provides:
//! - **DropMessage**: the logical payload carried inside an envelope
//! - **DropEncoder / DropDecoder**: the seams behind which the concrete
//!   cryptographic envelope implementation lives
//! - **CodecRegistry**: version-tag dispatch to the right decoder
//! - **limits**: protocol size bounds
//!
//! ## Envelope Versioning
//!
//! An envelope is an opaque byte blob whose first byte is a version tag.
//! Everything past that tag belongs to the codec that owns the version:
//! this crate never interprets envelope bodies. Adding a wire version is a
//! [`CodecRegistry::register`] call, not an edit to a central switch.
//!
//! ## Trust Model
//!
//! Decoding is only the first trust boundary: a successful decode proves
//! the envelope was decryptable by some local identity, not that the
//! claimed sender is known. Sender authentication against a contact book
//! happens above this crate, in the reconciler.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod limits;
pub mod message;

pub use codec::{peek_version, CodecRegistry, DropDecoder, DropEncoder};
pub use error::{DecodeError, EncodeError};
pub use message::DropMessage;
