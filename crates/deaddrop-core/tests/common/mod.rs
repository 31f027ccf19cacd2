//! Shared fixtures for exchange integration tests.
//!
//! `TestCodec` implements the version-0 envelope seams without any real
//! cryptography: the "ciphertext" is a transparent frame carrying the
//! recipient and sender key identifiers in the clear, plus a spoof marker
//! byte that simulates a failed sender-authentication check. This keeps
//! every decode path of the reconciler reachable from tests:
//!
//! ```text
//! [version: 1][recipient id: 32][sender id: 32][spoof: 1]
//! [created_at: i64 BE][type len: u16 BE][type][content len: u32 BE][content]
//! ```

use std::sync::Arc;

use deaddrop_core::ExchangeContext;
use deaddrop_directory::DirectoryStore;
use deaddrop_identity::{Contact, DropEndpoint, Identity, Keypair};
use deaddrop_transport::{DropTransport, InMemoryDropTransport};
use deaddrop_wire::limits::MAX_PAYLOAD_BYTES;
use deaddrop_wire::{
    CodecRegistry, DecodeError, DropDecoder, DropEncoder, DropMessage, EncodeError,
};

/// Byte offset of the spoof marker in a version-0 test envelope.
pub const SPOOF_FLAG_OFFSET: usize = 65;

/// Fixed-size prefix before the variable-length fields.
const HEADER_LEN: usize = 1 + 32 + 32 + 1 + 8;

/// Envelope codec for tests: version 0, no encryption.
pub struct TestCodec;

impl DropEncoder for TestCodec {
    fn version(&self) -> u8 {
        0
    }

    fn encode(
        &self,
        message: &DropMessage,
        recipient: &Contact,
        _sender: &Identity,
    ) -> Result<Vec<u8>, EncodeError> {
        let content = message.content().as_bytes();
        if content.len() > MAX_PAYLOAD_BYTES {
            return Err(EncodeError::PayloadTooLarge {
                max: MAX_PAYLOAD_BYTES,
                actual: content.len(),
            });
        }
        let message_type = message.message_type().as_bytes();

        let mut blob = Vec::with_capacity(HEADER_LEN + 6 + message_type.len() + content.len());
        blob.push(DropEncoder::version(self));
        blob.extend_from_slice(recipient.key_id().as_bytes());
        blob.extend_from_slice(message.sender().as_bytes());
        blob.push(0); // spoof marker clear
        blob.extend_from_slice(&message.created_at().to_be_bytes());
        blob.extend_from_slice(&(message_type.len() as u16).to_be_bytes());
        blob.extend_from_slice(message_type);
        blob.extend_from_slice(&(content.len() as u32).to_be_bytes());
        blob.extend_from_slice(content);
        Ok(blob)
    }
}

impl DropDecoder for TestCodec {
    fn version(&self) -> u8 {
        0
    }

    fn decode(&self, blob: &[u8], candidate: &Identity) -> Result<DropMessage, DecodeError> {
        if blob.len() < HEADER_LEN + 6 {
            return Err(DecodeError::InvalidSize {
                version: 0,
                size: blob.len(),
            });
        }

        let recipient = &blob[1..33];
        if recipient != candidate.key_id().as_bytes() {
            return Err(DecodeError::NotForRecipient);
        }
        if blob[SPOOF_FLAG_OFFSET] != 0 {
            return Err(DecodeError::SpoofedSender);
        }

        let sender = deaddrop_identity::KeyId::from_bytes(&blob[33..65])
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let created_at = i64::from_be_bytes(
            blob[66..74]
                .try_into()
                .map_err(|_| DecodeError::Malformed("timestamp".to_string()))?,
        );

        let type_len = u16::from_be_bytes([blob[74], blob[75]]) as usize;
        let type_end = 76 + type_len;
        if blob.len() < type_end + 4 {
            return Err(DecodeError::InvalidSize {
                version: 0,
                size: blob.len(),
            });
        }
        let message_type = std::str::from_utf8(&blob[76..type_end])
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let content_len = u32::from_be_bytes(
            blob[type_end..type_end + 4]
                .try_into()
                .map_err(|_| DecodeError::Malformed("content length".to_string()))?,
        ) as usize;
        let content_end = type_end + 4 + content_len;
        if blob.len() != content_end {
            return Err(DecodeError::InvalidSize {
                version: 0,
                size: blob.len(),
            });
        }
        let content = std::str::from_utf8(&blob[type_end + 4..content_end])
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        Ok(DropMessage::with_timestamp(
            sender,
            message_type,
            content,
            created_at,
        ))
    }
}

/// Flip the spoof marker so the decoder reports a failed sender check.
pub fn mark_spoofed(blob: &mut [u8]) {
    blob[SPOOF_FLAG_OFFSET] = 1;
}

/// One simulated device: its own directory, sharing a transport fleet.
pub struct Device {
    pub store: Arc<DirectoryStore>,
    pub ctx: Arc<ExchangeContext>,
}

/// Build a device over a shared in-memory endpoint fleet.
pub fn device(transport: Arc<InMemoryDropTransport>) -> Device {
    let store = Arc::new(DirectoryStore::temporary().expect("temporary store"));
    let transport: Arc<dyn DropTransport> = transport;
    let mut registry = CodecRegistry::new();
    registry.register(Arc::new(TestCodec));
    let ctx = Arc::new(ExchangeContext::new(
        Arc::clone(&store),
        transport,
        Arc::new(TestCodec),
        registry,
    ));
    Device { store, ctx }
}

pub fn endpoint(path: &str) -> DropEndpoint {
    DropEndpoint::parse(format!("http://drop.example.org/{}", path)).expect("endpoint")
}

pub fn identity(alias: &str, endpoints: &[DropEndpoint]) -> Identity {
    Identity::new(alias, Keypair::generate(), endpoints.to_vec())
}

/// The contact other devices store for `identity`.
pub fn contact_for(identity: &Identity, alias: &str) -> Contact {
    Contact::new(
        alias,
        identity.public_key().clone(),
        identity.endpoints().to_vec(),
    )
}

/// A text message claiming `sender` as its author.
pub fn text_message(sender: &Identity, content: &str) -> DropMessage {
    DropMessage::new(sender.key_id().clone(), "text", content)
}

/// Encode a message for a recipient contact, as a remote sender would.
pub fn encode_for(message: &DropMessage, recipient: &Contact, sender: &Identity) -> Vec<u8> {
    TestCodec
        .encode(message, recipient, sender)
        .expect("encode test envelope")
}
