//! # deaddrop-transport
//!
//! Transports for dumb drop endpoints.
//!
//! A drop endpoint stores opaque blobs and returns them on request; it
//! enforces nothing about authenticity or ordering. This crate provides:
//! - **DropTransport**: the async seam the dispatcher and reconciler use
//! - **HttpDropTransport**: the production HTTP(S) adapter
//! - **InMemoryDropTransport**: a deterministic double for tests and
//!   offline operation
//!
//! ## Security Model
//!
//! Endpoints are untrusted relays. Nothing a transport returns is believed
//! until it survives envelope decoding and sender authentication upstream;
//! transports themselves only move bytes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod memory;
pub mod transport;

pub use error::{Result, TransportError};
pub use http::HttpDropTransport;
pub use memory::InMemoryDropTransport;
pub use transport::{DropTransport, SendStatus, TransportConfig};
