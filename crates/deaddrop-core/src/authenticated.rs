//! Messages bound to a verified contact.

use deaddrop_identity::Contact;
use deaddrop_wire::DropMessage;

/// A decoded message whose claimed sender matched a contact of the
/// decoding identity.
///
/// Authentication produces this binding as a new value instead of marking
/// the message in place, so [`DropMessage`] stays immutable and safely
/// shareable across concurrent retrieval paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedDropMessage {
    message: DropMessage,
    contact: Contact,
}

impl AuthenticatedDropMessage {
    /// Bind a message to the contact its sender claim matched.
    ///
    /// Callers must have already verified that `contact`'s key identifier
    /// equals the message's claimed sender.
    pub fn new(message: DropMessage, contact: Contact) -> Self {
        debug_assert!(contact.key_id().ct_eq(message.sender()));
        Self { message, contact }
    }

    /// The decoded message.
    pub fn message(&self) -> &DropMessage {
        &self.message
    }

    /// The verified sender.
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Split into the message and its verified sender.
    pub fn into_parts(self) -> (DropMessage, Contact) {
        (self.message, self.contact)
    }
}
