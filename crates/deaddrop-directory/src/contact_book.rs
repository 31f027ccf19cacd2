//! Per-identity contact books.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use deaddrop_identity::{Contact, KeyId};

/// The set of contacts known to one local identity.
///
/// Exactly one book exists per identity; it is created lazily on first
/// access and persisted from then on. Membership is scoped to the owner:
/// the same remote principal may independently appear in several
/// identities' books.
///
/// Contacts are keyed by [`KeyId`], so inserting a contact whose key
/// identifier is already present replaces the stored entry: a book never
/// holds two contacts with the same identifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactBook {
    owner: KeyId,
    contacts: HashMap<KeyId, Contact>,
}

impl ContactBook {
    /// Create an empty book owned by `owner`.
    pub fn new(owner: KeyId) -> Self {
        Self {
            owner,
            contacts: HashMap::new(),
        }
    }

    /// Key identifier of the identity that owns this book.
    pub fn owner(&self) -> &KeyId {
        &self.owner
    }

    /// Insert a contact, replacing any entry with the same key identifier.
    ///
    /// Returns the replaced contact, if any.
    pub fn put(&mut self, contact: Contact) -> Option<Contact> {
        self.contacts.insert(contact.key_id().clone(), contact)
    }

    /// Remove a contact by key identifier.
    ///
    /// Returns the removed contact, if it was present.
    pub fn remove(&mut self, key_id: &KeyId) -> Option<Contact> {
        self.contacts.remove(key_id)
    }

    /// Look up a contact by key identifier.
    pub fn get(&self, key_id: &KeyId) -> Option<&Contact> {
        self.contacts.get(key_id)
    }

    /// Whether a contact with this key identifier is present.
    pub fn contains(&self, key_id: &KeyId) -> bool {
        self.contacts.contains_key(key_id)
    }

    /// Iterate over the contacts in unspecified order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    /// Collect the contacts into a vector, in unspecified order.
    pub fn to_vec(&self) -> Vec<Contact> {
        self.contacts.values().cloned().collect()
    }

    /// Number of contacts in the book.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether the book holds no contacts.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
