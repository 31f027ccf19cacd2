//! Local identities.

use serde::{Deserialize, Serialize};

use crate::endpoint::DropEndpoint;
use crate::key_id::KeyId;
use crate::keys::{Keypair, PublicKey};

/// A local cryptographic principal controlled by this device.
///
/// An identity owns an asymmetric keypair, a human-readable alias, and the
/// set of drop endpoints it monitors for incoming envelopes. Its [`KeyId`]
/// is derived from the public key at construction and identifies the
/// identity everywhere (persistence keys, trial-decode bookkeeping).
///
/// Identities are created by external generation or import flows; deleting
/// one also deletes its contact book (enforced by the directory store).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    alias: String,
    keypair: Keypair,
    key_id: KeyId,
    endpoints: Vec<DropEndpoint>,
}

impl Identity {
    /// Create an identity from a keypair, alias, and monitored endpoints.
    pub fn new(alias: impl Into<String>, keypair: Keypair, endpoints: Vec<DropEndpoint>) -> Self {
        let key_id = keypair.key_id();
        Self {
            alias: alias.into(),
            keypair,
            key_id,
            endpoints,
        }
    }

    /// The identity's alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Rename the identity. Aliases carry no identity semantics.
    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = alias.into();
    }

    /// The identity's keypair.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// The public half of the keypair.
    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public()
    }

    /// The identifier derived from the public key.
    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    /// The drop endpoints this identity monitors.
    pub fn endpoints(&self) -> &[DropEndpoint] {
        &self.endpoints
    }

    /// Add an endpoint to monitor, ignoring exact duplicates.
    pub fn add_endpoint(&mut self, endpoint: DropEndpoint) {
        if !self.endpoints.contains(&endpoint) {
            self.endpoints.push(endpoint);
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.key_id == other.key_id
    }
}

impl Eq for Identity {}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key_id.hash(state);
    }
}
