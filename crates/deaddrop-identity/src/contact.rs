//! Remote contacts.

use serde::{Deserialize, Serialize};

use crate::endpoint::DropEndpoint;
use crate::key_id::KeyId;
use crate::keys::PublicKey;

/// A remote principal known to one local identity.
///
/// A contact belongs to exactly one identity's contact book; the same
/// remote principal (same [`KeyId`]) may independently appear in several
/// identities' books. Equality is by key identifier: alias and endpoints
/// are mutable presentation/routing data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    alias: String,
    public_key: PublicKey,
    key_id: KeyId,
    endpoints: Vec<DropEndpoint>,
}

impl Contact {
    /// Create a contact from its verification key, alias, and endpoints.
    pub fn new(
        alias: impl Into<String>,
        public_key: PublicKey,
        endpoints: Vec<DropEndpoint>,
    ) -> Self {
        let key_id = public_key.key_id();
        Self {
            alias: alias.into(),
            public_key,
            key_id,
            endpoints,
        }
    }

    /// The contact's alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Rename the contact.
    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = alias.into();
    }

    /// The contact's verification public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The identifier derived from the verification key.
    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    /// The drop endpoints this contact receives envelopes on.
    pub fn endpoints(&self) -> &[DropEndpoint] {
        &self.endpoints
    }

    /// Replace the contact's endpoint set.
    pub fn set_endpoints(&mut self, endpoints: Vec<DropEndpoint>) {
        self.endpoints = endpoints;
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.key_id == other.key_id
    }
}

impl Eq for Contact {}

impl std::hash::Hash for Contact {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key_id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;

    fn test_endpoint(path: &str) -> DropEndpoint {
        DropEndpoint::parse(format!("https://drop.example.org/{}", path)).unwrap()
    }

    #[test]
    fn test_key_id_derived_from_public_key() {
        let keypair = Keypair::generate();
        let contact = Contact::new("bob", keypair.public().clone(), vec![]);

        assert_eq!(contact.key_id(), &keypair.key_id());
    }

    #[test]
    fn test_equality_ignores_alias_and_endpoints() {
        let keypair = Keypair::generate();
        let a = Contact::new("bob", keypair.public().clone(), vec![test_endpoint("u1")]);
        let b = Contact::new("robert", keypair.public().clone(), vec![]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_keys_are_distinct_contacts() {
        let a = Contact::new("bob", Keypair::generate().public().clone(), vec![]);
        let b = Contact::new("bob", Keypair::generate().public().clone(), vec![]);

        assert_ne!(a, b);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let contact = Contact::new(
            "bob",
            Keypair::generate().public().clone(),
            vec![test_endpoint("u1"), test_endpoint("u2")],
        );

        let bytes = bincode::serialize(&contact).unwrap();
        let restored: Contact = bincode::deserialize(&bytes).unwrap();

        assert_eq!(restored, contact);
        assert_eq!(restored.alias(), contact.alias());
        assert_eq!(restored.endpoints(), contact.endpoints());
    }
}
