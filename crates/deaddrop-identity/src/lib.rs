//! # deaddrop-identity
//!
//! Identity and contact primitives for the deaddrop protocol.
//!
//! This crate provides:
//! - **KeyId**: public-key-derived identifier for local and remote principals
//! - **Keypair / PublicKey / SecretKey**: opaque key material containers
//! - **DropEndpoint**: validated HTTP(S) drop location
//! - **Identity**: a local principal (keypair, alias, monitored endpoints)
//! - **Contact**: a remote principal known to one local identity
//!
//! ## Key Identifiers
//!
//! Principals are identified by a 256-bit BLAKE3 hash of their public key,
//! computed with a domain-separation prefix. Two contacts are the same
//! contact exactly when their key identifiers match; aliases and endpoint
//! sets carry no identity semantics.
//!
//! Key *use* (envelope encryption, signing) is owned by the codec layer.
//! The types here only carry material and identifiers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod contact;
pub mod endpoint;
pub mod error;
pub mod identity;
pub mod key_id;
pub mod keys;

pub use contact::Contact;
pub use endpoint::DropEndpoint;
pub use error::{IdentityError, Result};
pub use identity::Identity;
pub use key_id::KeyId;
pub use keys::{Keypair, PublicKey, SecretKey};
