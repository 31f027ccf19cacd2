//! Codec seams and version-tag dispatch.
//!
//! The concrete envelope implementation (encryption, sender signing, key
//! agreement) lives behind [`DropEncoder`] and [`DropDecoder`]. This module
//! owns only what every version shares: the leading version tag and the
//! gross size bound on inbound blobs.
//!
//! Decoders are looked up through a [`CodecRegistry`] keyed by version tag,
//! so a new wire version is a registration at startup rather than an edit
//! to a central conditional.

use std::collections::BTreeMap;
use std::sync::Arc;

use deaddrop_identity::{Contact, Identity};

use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_ENVELOPE_BYTES;
use crate::message::DropMessage;

/// Read the leading version tag of an envelope blob.
///
/// Returns `None` for an empty blob.
pub fn peek_version(blob: &[u8]) -> Option<u8> {
    blob.first().copied()
}

/// Assembles envelopes for one wire version.
///
/// `encode` produces the complete blob (version tag included), encrypted
/// for the `(recipient, sender)` pair. One encode call yields one
/// ciphertext; broadcasting it to several endpoints is the dispatcher's
/// business, not the codec's.
pub trait DropEncoder: Send + Sync {
    /// The version tag this encoder writes.
    fn version(&self) -> u8;

    /// Encode `message` for `recipient`, authenticated as `sender`.
    ///
    /// # Errors
    ///
    /// [`EncodeError::PayloadTooLarge`] if the content exceeds the format
    /// bound; [`EncodeError::Codec`] for internal assembly failures.
    fn encode(
        &self,
        message: &DropMessage,
        recipient: &Contact,
        sender: &Identity,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Opens envelopes of one wire version.
///
/// Envelopes carry no cleartext recipient, so the caller discovers the
/// recipient by trial: the same blob is offered to each local identity in
/// turn. The decoder distinguishes "not addressed to this identity"
/// ([`DecodeError::NotForRecipient`]) from a failed sender-authentication
/// check ([`DecodeError::SpoofedSender`]); the latter must stop further
/// trials for the blob.
pub trait DropDecoder: Send + Sync {
    /// The version tag this decoder accepts.
    fn version(&self) -> u8;

    /// Attempt to open `blob` as `candidate`.
    ///
    /// `blob` includes the version tag; the registry has already matched it
    /// against [`DropDecoder::version`]. Structural validation (sizes,
    /// framing) happens here, before any cryptographic work.
    fn decode(&self, blob: &[u8], candidate: &Identity) -> Result<DropMessage, DecodeError>;
}

/// Version-tag dispatch table for envelope decoders.
///
/// ```
/// use deaddrop_wire::CodecRegistry;
///
/// let mut registry = CodecRegistry::new();
/// // registry.register(Arc::new(V0Codec::new()));
/// # let _ = &mut registry;
/// ```
#[derive(Clone, Default)]
pub struct CodecRegistry {
    decoders: BTreeMap<u8, Arc<dyn DropDecoder>>,
}

impl CodecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder under its version tag.
    ///
    /// A later registration for the same version replaces the earlier one.
    pub fn register(&mut self, decoder: Arc<dyn DropDecoder>) {
        self.decoders.insert(decoder.version(), decoder);
    }

    /// Look up the decoder for a version tag.
    pub fn decoder_for(&self, version: u8) -> Option<&Arc<dyn DropDecoder>> {
        self.decoders.get(&version)
    }

    /// The registered version tags, ascending.
    pub fn versions(&self) -> impl Iterator<Item = u8> + '_ {
        self.decoders.keys().copied()
    }

    /// Dispatch a raw blob to the decoder its version tag names and try to
    /// open it as `candidate`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Empty`] for a zero-length blob,
    /// [`DecodeError::InvalidSize`] for a blob over the gross bound,
    /// [`DecodeError::UnsupportedVersion`] when no decoder is registered
    /// for the tag, otherwise whatever the version decoder returns.
    pub fn decode(&self, blob: &[u8], candidate: &Identity) -> Result<DropMessage, DecodeError> {
        let version = peek_version(blob).ok_or(DecodeError::Empty)?;
        if blob.len() > MAX_ENVELOPE_BYTES {
            // Bound the blob before any per-version parsing
            return Err(DecodeError::InvalidSize {
                version,
                size: blob.len(),
            });
        }
        let decoder = self
            .decoders
            .get(&version)
            .ok_or(DecodeError::UnsupportedVersion { version })?;
        decoder.decode(blob, candidate)
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("versions", &self.versions().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deaddrop_identity::{KeyId, Keypair};

    /// Decoder that accepts any blob of its version and echoes a fixed
    /// message.
    struct FixedDecoder {
        version: u8,
        message_type: &'static str,
    }

    impl DropDecoder for FixedDecoder {
        fn version(&self) -> u8 {
            self.version
        }

        fn decode(&self, blob: &[u8], _candidate: &Identity) -> Result<DropMessage, DecodeError> {
            if blob.len() < 2 {
                return Err(DecodeError::InvalidSize {
                    version: self.version,
                    size: blob.len(),
                });
            }
            Ok(DropMessage::with_timestamp(
                KeyId::from_public_key(b"fixed-decoder-sender"),
                self.message_type,
                "payload",
                0,
            ))
        }
    }

    fn candidate() -> Identity {
        Identity::new("local", Keypair::generate(), vec![])
    }

    #[test]
    fn test_peek_version() {
        assert_eq!(peek_version(&[7, 1, 2]), Some(7));
        assert_eq!(peek_version(&[0]), Some(0));
        assert_eq!(peek_version(&[]), None);
    }

    #[test]
    fn test_registry_dispatches_by_version() {
        let mut registry = CodecRegistry::new();
        registry.register(Arc::new(FixedDecoder {
            version: 0,
            message_type: "v0",
        }));
        registry.register(Arc::new(FixedDecoder {
            version: 1,
            message_type: "v1",
        }));

        let m0 = registry.decode(&[0, 0xAA], &candidate()).unwrap();
        let m1 = registry.decode(&[1, 0xAA], &candidate()).unwrap();

        assert_eq!(m0.message_type(), "v0");
        assert_eq!(m1.message_type(), "v1");
    }

    #[test]
    fn test_registry_rejects_unknown_version() {
        let mut registry = CodecRegistry::new();
        registry.register(Arc::new(FixedDecoder {
            version: 0,
            message_type: "v0",
        }));

        let result = registry.decode(&[99, 0xAA], &candidate());

        assert!(matches!(
            result,
            Err(DecodeError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn test_registry_rejects_empty_blob() {
        let registry = CodecRegistry::new();

        assert!(matches!(
            registry.decode(&[], &candidate()),
            Err(DecodeError::Empty)
        ));
    }

    #[test]
    fn test_registry_rejects_oversized_blob() {
        let mut registry = CodecRegistry::new();
        registry.register(Arc::new(FixedDecoder {
            version: 0,
            message_type: "v0",
        }));

        let oversized = vec![0u8; MAX_ENVELOPE_BYTES + 1];
        let result = registry.decode(&oversized, &candidate());

        assert!(matches!(result, Err(DecodeError::InvalidSize { .. })));
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let mut registry = CodecRegistry::new();
        registry.register(Arc::new(FixedDecoder {
            version: 0,
            message_type: "old",
        }));
        registry.register(Arc::new(FixedDecoder {
            version: 0,
            message_type: "new",
        }));

        let message = registry.decode(&[0, 0xAA], &candidate()).unwrap();

        assert_eq!(message.message_type(), "new");
        assert_eq!(registry.versions().collect::<Vec<_>>(), vec![0]);
    }
}
