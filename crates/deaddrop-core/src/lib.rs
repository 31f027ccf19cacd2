//! # deaddrop-core
//!
//! The drop message exchange and reconciliation engine.
//!
//! This is the orchestration layer of the deaddrop protocol: it owns no
//! cryptography and no wire format of its own, but decides what gets sent
//! where, which pulled blobs are believed, and which decoded messages are
//! surfaced to the application.
//!
//! ## Components
//!
//! - [`ExchangeContext`]: explicit handle bundle (directory, transport,
//!   codecs) built once at startup and shared by reference. There is no
//!   process-wide singleton to look up
//! - [`Dispatcher`]: encodes one envelope per send and fans it out to
//!   every endpoint of the recipient on a bounded worker pool
//! - [`Reconciler`]: pulls batches per identity/endpoint, trial-decodes
//!   against every local identity, authenticates claimed senders against
//!   the decoding identity's contact book, and yields the accepted set
//!
//! ## Trust Boundaries
//!
//! Retrieval crosses two independent boundaries. Decoding proves an
//! envelope was decryptable by a local identity; it proves nothing about
//! the sender. Sender authentication then requires the claimed key
//! identifier to match a contact of the *decoding* identity. A message
//! from an unknown sender is dropped silently, and a spoofed-sender signal
//! discards the blob outright.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use deaddrop_core::{Dispatcher, DispatcherConfig, ExchangeContext, Reconciler};
//!
//! let ctx = Arc::new(ExchangeContext::new(directory, transport, encoder, registry));
//! let dispatcher = Dispatcher::new(ctx.clone(), DispatcherConfig::default());
//! let reconciler = Reconciler::new(ctx);
//!
//! let handle = dispatcher.send(&message, &recipient, &sender).await?;
//! let outcome = handle.outcome().await;
//!
//! let accepted = reconciler.retrieve_all().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod authenticated;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod reconciler;

pub use authenticated::AuthenticatedDropMessage;
pub use context::ExchangeContext;
pub use dispatcher::{DeliveryHandle, Dispatcher, DispatcherConfig};
pub use error::{CoreError, Result};
pub use outcome::DeliveryOutcome;
pub use reconciler::Reconciler;
