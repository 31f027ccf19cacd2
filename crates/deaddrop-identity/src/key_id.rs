//! Key identifier generation and comparison.
//!
//! A `KeyId` is a unique identifier derived from a principal's public key
//! using BLAKE3 hashing. It is the sole notion of identity in the protocol:
//! contact-book lookups, sender authentication, and store keys all operate
//! on key identifiers, never on aliases.
//!
//! ## Security Properties
//!
//! - **Collision Resistance**: BLAKE3 provides strong collision resistance
//! - **Pre-image Resistance**: The public key cannot be recovered from the id
//! - **Constant-Time Comparison**: Prevents timing attacks during the
//!   sender-authentication scan
//! - **Domain Separation**: A context prefix prevents cross-protocol reuse

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::IdentityError;
use crate::Result;

/// Domain separator for key identifier derivation.
///
/// Ensures a key identifier can never collide with any other hash
/// computed over the same public key bytes elsewhere in the protocol.
const KEY_ID_DOMAIN: &[u8] = b"DEADDROP-KEY-ID-v1";

/// A unique identifier for a principal, derived from its public key.
///
/// The `KeyId` is a 256-bit (32-byte) value computed as:
/// ```text
/// BLAKE3(len(KEY_ID_DOMAIN) || KEY_ID_DOMAIN || len(public_key) || public_key)
/// ```
/// with each input length-prefixed to prevent ambiguity.
///
/// ## Usage
///
/// ```
/// use deaddrop_identity::KeyId;
///
/// let id = KeyId::from_public_key(b"some public key bytes");
/// let hex = id.to_hex();
/// let restored = KeyId::from_hex(&hex).unwrap();
/// assert_eq!(id, restored);
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyId([u8; 32]);

impl KeyId {
    /// Size of a key identifier in bytes.
    pub const SIZE: usize = 32;

    /// Derive a key identifier from raw public key bytes.
    ///
    /// Accepts any key representation that can provide its bytes; the
    /// identifier is stable across serializations of the same key.
    pub fn from_public_key(public_key_bytes: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        // Length-prefix each input for domain separation
        hasher.update(&(KEY_ID_DOMAIN.len() as u64).to_le_bytes());
        hasher.update(KEY_ID_DOMAIN);
        hasher.update(&(public_key_bytes.len() as u64).to_le_bytes());
        hasher.update(public_key_bytes);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create a key identifier from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidLength`] if the input is not exactly
    /// 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(IdentityError::InvalidLength {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Get the identifier as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to an owned byte array.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Format as a lowercase hexadecimal string (64 characters).
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for byte in &self.0 {
            s.push_str(&format!("{:02x}", byte));
        }
        s
    }

    /// Parse from a 64-character hexadecimal string.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidHex`] if the input is not valid
    /// 64-character hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != 64 {
            return Err(IdentityError::InvalidHex(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = hex_nibble(chunk[0])?;
            let lo = hex_nibble(chunk[1])?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }

    /// Get a truncated representation for display purposes.
    ///
    /// Returns the first 16 hex characters followed by "...". Useful for
    /// logging where the full identifier would be noise.
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        format!("{}...", &hex[..16])
    }

    /// Compare two key identifiers in constant time.
    ///
    /// Use this in security-sensitive contexts (sender authentication)
    /// rather than `==`, which may short-circuit.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

fn hex_nibble(c: u8) -> Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(IdentityError::InvalidHex(format!(
            "invalid hex character {:?}",
            c as char
        ))),
    }
}

impl ConstantTimeEq for KeyId {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for KeyId {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time even for the convenience operator
        bool::from(self.0.ct_eq(&other.0))
    }
}

impl Eq for KeyId {}

impl std::hash::Hash for KeyId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::fmt::Debug for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyId({})", self.short())
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for KeyId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_public_key_deterministic() {
        let pubkey = b"test-public-key-bytes-1234567890";

        let id1 = KeyId::from_public_key(pubkey);
        let id2 = KeyId::from_public_key(pubkey);

        assert_eq!(id1, id2);
    }

    #[test]
    fn test_different_keys_produce_different_ids() {
        let id1 = KeyId::from_public_key(b"public-key-1");
        let id2 = KeyId::from_public_key(b"public-key-2");

        assert_ne!(id1, id2);
    }

    #[test]
    fn test_from_bytes_invalid_length() {
        assert!(KeyId::from_bytes(&[0u8; 16]).is_err());
        assert!(KeyId::from_bytes(&[0u8; 64]).is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let id = KeyId::from_public_key(b"hex-roundtrip-key");

        let hex = id.to_hex();
        assert_eq!(hex.len(), 64);

        let restored = KeyId::from_hex(&hex).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(KeyId::from_hex("abcd").is_err());
        assert!(KeyId::from_hex(&"g".repeat(64)).is_err());
        assert!(KeyId::from_hex(&"a".repeat(128)).is_err());
    }

    #[test]
    fn test_short_format() {
        let id = KeyId::from_public_key(b"short-format-key");

        let short = id.short();
        assert_eq!(short.len(), 19); // 16 hex chars + "..."
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_constant_time_eq() {
        let id1 = KeyId::from_public_key(b"key1");
        let id2 = KeyId::from_public_key(b"key1");
        let id3 = KeyId::from_public_key(b"key2");

        assert!(id1.ct_eq(&id2));
        assert!(!id1.ct_eq(&id3));
    }

    #[test]
    fn test_domain_separation() {
        let pubkey = b"test-public-key";

        let id = KeyId::from_public_key(pubkey);
        let plain = blake3::hash(pubkey);

        assert_ne!(id.as_bytes(), plain.as_bytes());
    }

    #[test]
    fn test_std_hash_dedup() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(KeyId::from_public_key(b"key1"));
        set.insert(KeyId::from_public_key(b"key2"));
        set.insert(KeyId::from_public_key(b"key1"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let id = KeyId::from_public_key(b"serialization-test-key");

        let serialized = bincode::serialize(&id).unwrap();
        let deserialized: KeyId = bincode::deserialize(&serialized).unwrap();

        assert_eq!(id, deserialized);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn from_public_key_always_produces_valid_id(key_bytes: Vec<u8>) {
            let id = KeyId::from_public_key(&key_bytes);
            prop_assert_eq!(id.as_bytes().len(), 32);
            prop_assert_eq!(id.to_hex().len(), 64);
        }

        #[test]
        fn hex_roundtrip_always_succeeds(key_bytes: Vec<u8>) {
            let id = KeyId::from_public_key(&key_bytes);
            let restored = KeyId::from_hex(&id.to_hex()).unwrap();
            prop_assert_eq!(id, restored);
        }

        #[test]
        fn bytes_roundtrip_always_succeeds(key_bytes: Vec<u8>) {
            let id = KeyId::from_public_key(&key_bytes);
            let restored = KeyId::from_bytes(&id.to_bytes()).unwrap();
            prop_assert_eq!(id, restored);
        }

        #[test]
        fn different_keys_usually_produce_different_ids(
            key1 in any::<Vec<u8>>(),
            key2 in any::<Vec<u8>>()
        ) {
            prop_assume!(key1 != key2);

            let id1 = KeyId::from_public_key(&key1);
            let id2 = KeyId::from_public_key(&key2);

            prop_assert_ne!(id1, id2);
        }
    }
}
