//! The logical drop message.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use deaddrop_identity::KeyId;

/// A decoded drop message.
///
/// Carries the *claimed* sender key identifier, a short type tag, the
/// content, and the sender-side creation timestamp. The sender claim is
/// exactly that, a claim: it is established by the codec during decode and
/// must still be matched against the receiving identity's contact book
/// before the message is surfaced.
///
/// A `DropMessage` is immutable once constructed. Authentication binds it
/// to a verified contact in a separate value rather than mutating it, so
/// decoded messages are safe to share across concurrent retrieval paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropMessage {
    sender: KeyId,
    message_type: String,
    content: String,
    created_at: i64,
}

impl DropMessage {
    /// Create a message stamped with the current time.
    pub fn new(
        sender: KeyId,
        message_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            message_type: message_type.into(),
            content: content.into(),
            created_at: Utc::now().timestamp(),
        }
    }

    /// Create a message with an explicit creation timestamp.
    ///
    /// Used by codecs reconstructing a message from an envelope body.
    pub fn with_timestamp(
        sender: KeyId,
        message_type: impl Into<String>,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            sender,
            message_type: message_type.into(),
            content: content.into(),
            created_at,
        }
    }

    /// The claimed sender key identifier.
    pub fn sender(&self) -> &KeyId {
        &self.sender
    }

    /// The message type tag.
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// The message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Unix timestamp of creation, as stamped by the sender.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}
