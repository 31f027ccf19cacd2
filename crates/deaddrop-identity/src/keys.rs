//! Opaque asymmetric key material containers.
//!
//! The deaddrop core never signs, encrypts, or derives session keys itself;
//! that belongs to the envelope codec. These types exist so identities and
//! contacts can carry key material, persist it, and derive [`KeyId`]s from
//! the public half.
//!
//! The secret half is zeroized on drop and never printed.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::IdentityError;
use crate::key_id::KeyId;
use crate::Result;

/// Size of public and secret key material in bytes.
pub const KEY_SIZE: usize = 32;

/// A public verification/encryption key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey([u8; KEY_SIZE]);

impl PublicKey {
    /// Create a public key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidLength`] if the input is not exactly
    /// 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(IdentityError::InvalidLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Derive the key identifier for this key.
    pub fn key_id(&self) -> KeyId {
        KeyId::from_public_key(&self.0)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.key_id().short())
    }
}

/// A secret key, zeroized on drop.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    /// Create a secret key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidLength`] if the input is not exactly
    /// 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(IdentityError::InvalidLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Expose the raw key bytes.
    ///
    /// Only the codec layer should need this; callers must not copy the
    /// bytes into long-lived buffers.
    pub fn expose_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

/// An asymmetric keypair owned by a local identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Keypair {
    public: PublicKey,
    secret: SecretKey,
}

impl Keypair {
    /// Generate a fresh keypair from OS randomness.
    pub fn generate() -> Self {
        let mut secret = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut secret);
        // Opaque material: the codec defines the public-key relation. For
        // locally generated pairs the public half is derived by keyed hash
        // so it is stable and non-invertible.
        let public = *blake3::keyed_hash(b"DEADDROP-KEYPAIR-PUBLIC-DERIVE-1", &secret).as_bytes();
        let pair = Self {
            public: PublicKey(public),
            secret: SecretKey(secret),
        };
        secret.zeroize();
        pair
    }

    /// Reassemble a keypair from its halves (identity import).
    pub fn from_parts(public: PublicKey, secret: SecretKey) -> Self {
        Self { public, secret }
    }

    /// Get the public half.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// Get the secret half.
    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// Derive the key identifier for the public half.
    pub fn key_id(&self) -> KeyId {
        self.public.key_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_distinct_pairs() {
        let a = Keypair::generate();
        let b = Keypair::generate();

        assert_ne!(a.public().as_bytes(), b.public().as_bytes());
        assert_ne!(a.key_id(), b.key_id());
    }

    #[test]
    fn test_key_id_stable_across_clones() {
        let pair = Keypair::generate();
        let clone = pair.clone();

        assert_eq!(pair.key_id(), clone.key_id());
    }

    #[test]
    fn test_public_key_from_bytes_roundtrip() {
        let pair = Keypair::generate();
        let restored = PublicKey::from_bytes(pair.public().as_bytes()).unwrap();

        assert_eq!(&restored, pair.public());
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        assert!(PublicKey::from_bytes(&[0u8; 31]).is_err());
        assert!(SecretKey::from_bytes(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_from_parts_reassembles_imported_pair() {
        let pair = Keypair::generate();
        let public = PublicKey::from_bytes(pair.public().as_bytes()).unwrap();
        let secret = SecretKey::from_bytes(pair.secret().expose_bytes()).unwrap();

        let imported = Keypair::from_parts(public, secret);

        assert_eq!(imported.public(), pair.public());
        assert_eq!(imported.key_id(), pair.key_id());
    }

    #[test]
    fn test_secret_key_debug_is_redacted() {
        let pair = Keypair::generate();
        let debug = format!("{:?}", pair.secret());

        assert_eq!(debug, "SecretKey([REDACTED])");
    }

    #[test]
    fn test_keypair_serialization_roundtrip() {
        let pair = Keypair::generate();

        let bytes = bincode::serialize(&pair).unwrap();
        let restored: Keypair = bincode::deserialize(&bytes).unwrap();

        assert_eq!(restored.public(), pair.public());
        assert_eq!(restored.key_id(), pair.key_id());
    }
}
