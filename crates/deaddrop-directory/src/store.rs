//! The sled-backed directory store.

use std::path::Path;
use std::sync::Mutex;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use deaddrop_identity::{Contact, Identity, KeyId};

use crate::contact_book::ContactBook;
use crate::error::DirectoryError;
use crate::Result;

/// Tree holding identity records keyed by key identifier.
const IDENTITIES_TREE: &str = "identities";

/// Tree holding contact books keyed by owner key identifier.
const CONTACT_BOOKS_TREE: &str = "contact_books";

/// Tree holding store-wide metadata.
const META_TREE: &str = "meta";

/// Meta key for the active-identity marker.
const ACTIVE_IDENTITY_KEY: &[u8] = b"active_identity";

/// Meta key for the device identifier.
const DEVICE_ID_KEY: &[u8] = b"device_id";

/// Size of the device identifier in bytes.
const DEVICE_ID_LEN: usize = 16;

/// Persisted directory of identities and their contact books.
///
/// Every mutation flushes before returning; a successful call is durable.
/// Read-modify-write sequences are serialized by an internal lock so
/// concurrent callers cannot interleave edits to the same record.
pub struct DirectoryStore {
    db: sled::Db,
    identities: sled::Tree,
    books: sled::Tree,
    meta: sled::Tree,
    write_lock: Mutex<()>,
}

impl DirectoryStore {
    /// Open (or create) a directory store at `path`.
    ///
    /// Generates and persists the device identifier on first open.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Database`] if the backend cannot be
    /// opened.
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Open an in-memory store that is discarded on drop.
    ///
    /// Intended for tests and ephemeral sessions.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let identities = db.open_tree(IDENTITIES_TREE)?;
        let books = db.open_tree(CONTACT_BOOKS_TREE)?;
        let meta = db.open_tree(META_TREE)?;

        let store = Self {
            db,
            identities,
            books,
            meta,
            write_lock: Mutex::new(()),
        };
        store.ensure_device_id()?;
        debug!("directory store opened");
        Ok(store)
    }

    /// Generate the device identifier on first open.
    fn ensure_device_id(&self) -> Result<()> {
        if self.meta.get(DEVICE_ID_KEY)?.is_none() {
            let mut id = [0u8; DEVICE_ID_LEN];
            OsRng.fill_bytes(&mut id);
            self.meta.insert(DEVICE_ID_KEY, &id[..])?;
            self.db.flush()?;
            info!("generated new device id");
        }
        Ok(())
    }

    /// Serialize writers, recovering the lock if a writer panicked.
    fn write_guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// The persisted device identifier.
    pub fn device_id(&self) -> Result<Vec<u8>> {
        let id = self
            .meta
            .get(DEVICE_ID_KEY)?
            .ok_or_else(|| DirectoryError::Serialization("device id missing".to_string()))?;
        Ok(id.to_vec())
    }

    // ========================================================================
    // Identity roster
    // ========================================================================

    /// Insert or update an identity record.
    pub fn add_identity(&self, identity: &Identity) -> Result<()> {
        let _guard = self.write_guard();
        self.identities
            .insert(identity.key_id().as_bytes(), encode(identity)?)?;
        self.db.flush()?;
        Ok(())
    }

    /// Update an existing identity record in place.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::UnknownIdentity`] if the identity was
    /// never added.
    pub fn update_identity(&self, identity: &Identity) -> Result<()> {
        let _guard = self.write_guard();
        if self.identities.get(identity.key_id().as_bytes())?.is_none() {
            return Err(DirectoryError::UnknownIdentity(identity.key_id().short()));
        }
        self.identities
            .insert(identity.key_id().as_bytes(), encode(identity)?)?;
        self.db.flush()?;
        Ok(())
    }

    /// Remove an identity and its contact book.
    pub fn remove_identity(&self, identity: &Identity) -> Result<()> {
        let _guard = self.write_guard();
        self.identities.remove(identity.key_id().as_bytes())?;
        // An identity's book dies with it
        self.books.remove(identity.key_id().as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    /// All identities in the roster, in key-identifier order.
    pub fn identities(&self) -> Result<Vec<Identity>> {
        let mut out = Vec::new();
        for entry in self.identities.iter() {
            let (_, value) = entry?;
            out.push(decode(&value)?);
        }
        Ok(out)
    }

    /// Look up an identity by key identifier.
    pub fn identity(&self, key_id: &KeyId) -> Result<Option<Identity>> {
        match self.identities.get(key_id.as_bytes())? {
            Some(value) => Ok(Some(decode(&value)?)),
            None => Ok(None),
        }
    }

    /// Mark an identity as the active one.
    pub fn set_active_identity(&self, identity: &Identity) -> Result<()> {
        self.meta
            .insert(ACTIVE_IDENTITY_KEY, &identity.key_id().to_bytes()[..])?;
        self.db.flush()?;
        Ok(())
    }

    /// The active identity, if one is marked and still present.
    pub fn active_identity(&self) -> Result<Option<Identity>> {
        let Some(raw) = self.meta.get(ACTIVE_IDENTITY_KEY)? else {
            return Ok(None);
        };
        let key_id = KeyId::from_bytes(&raw)
            .map_err(|e| DirectoryError::Serialization(e.to_string()))?;
        self.identity(&key_id)
    }

    // ========================================================================
    // Contact books
    // ========================================================================

    /// Get an identity's contact book, creating and persisting an empty one
    /// on first access.
    pub fn contact_book(&self, identity: &Identity) -> Result<ContactBook> {
        if let Some(value) = self.books.get(identity.key_id().as_bytes())? {
            return decode(&value);
        }
        let _guard = self.write_guard();
        // Re-check under the lock: another caller may have created it
        if let Some(value) = self.books.get(identity.key_id().as_bytes())? {
            return decode(&value);
        }
        let book = ContactBook::new(identity.key_id().clone());
        self.books
            .insert(identity.key_id().as_bytes(), encode(&book)?)?;
        self.db.flush()?;
        debug!(identity = %identity.key_id().short(), "created contact book");
        Ok(book)
    }

    /// Add a contact to an identity's book.
    pub fn put_contact(&self, identity: &Identity, contact: Contact) -> Result<()> {
        self.mutate_book(identity, |book| {
            book.put(contact);
        })
    }

    /// Remove a contact from an identity's book.
    pub fn remove_contact(&self, identity: &Identity, contact: &Contact) -> Result<()> {
        self.mutate_book(identity, |book| {
            book.remove(contact.key_id());
        })
    }

    /// Replace any contact sharing `contact`'s key identifier, then insert.
    ///
    /// Edit semantics: after this call exactly one entry exists for the
    /// identifier, carrying the new alias and endpoints.
    pub fn replace_contact(&self, identity: &Identity, contact: Contact) -> Result<()> {
        self.mutate_book(identity, |book| {
            book.remove(contact.key_id());
            book.put(contact);
        })
    }

    /// Every identity paired with its contact book.
    ///
    /// Identities whose book was never touched appear with an empty book.
    pub fn all_contact_books(&self) -> Result<Vec<(Identity, ContactBook)>> {
        let mut out = Vec::new();
        for identity in self.identities()? {
            let book = self.contact_book(&identity)?;
            out.push((identity, book));
        }
        Ok(out)
    }

    /// Load-mutate-store an identity's book under the write lock.
    fn mutate_book(&self, identity: &Identity, f: impl FnOnce(&mut ContactBook)) -> Result<()> {
        let _guard = self.write_guard();
        let mut book = match self.books.get(identity.key_id().as_bytes())? {
            Some(value) => decode(&value)?,
            None => ContactBook::new(identity.key_id().clone()),
        };
        f(&mut book);
        self.books
            .insert(identity.key_id().as_bytes(), encode(&book)?)?;
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryStore")
            .field("identities", &self.identities.len())
            .field("contact_books", &self.books.len())
            .finish()
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| DirectoryError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| DirectoryError::Serialization(e.to_string()))
}
