//! Retrieval and reconciliation engine.
//!
//! Pulls raw blobs from every monitored endpoint, decodes them by trial
//! against every local identity, and authenticates claimed senders against
//! the decoding identity's contact book. Only messages that survive both
//! boundaries are surfaced; everything else is skipped without aborting
//! the surrounding batch.
//!
//! ## Per-blob Decision Flow
//!
//! ```text
//! blob ──> version tag ──────────── unknown ──> skip (warn)
//!            │
//!            ▼
//!          trial decode per identity
//!            ├─ decoded ──────────────────────> authenticate sender
//!            ├─ spoofed sender ───────────────> skip blob (warn, no
//!            │                                  further identity trials)
//!            ├─ structurally invalid ─────────> skip (info)
//!            └─ no identity could open it ────> skip
//!
//! authenticate: shuffle the decoding identity's contacts, first contact
//! whose key id equals the claim wins; no match ──> drop silently
//! ```
//!
//! The contact scan is shuffled per retrieval so no contact is
//! deterministically compared first across runs.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, trace, warn};

use deaddrop_identity::{DropEndpoint, Identity};
use deaddrop_wire::limits::MAX_ENVELOPE_BYTES;
use deaddrop_wire::{peek_version, DecodeError, DropMessage};

use crate::authenticated::AuthenticatedDropMessage;
use crate::context::ExchangeContext;
use crate::Result;

/// Decodes pulled blobs and authenticates their senders.
pub struct Reconciler {
    ctx: Arc<ExchangeContext>,
}

impl Reconciler {
    /// Create a reconciler over a shared context.
    pub fn new(ctx: Arc<ExchangeContext>) -> Self {
        Self { ctx }
    }

    /// Retrieve and reconcile from every endpoint of every identity.
    ///
    /// Identities and endpoints are visited in enumeration order; the
    /// accepted set accumulates across all of them. Each call produces a
    /// fresh set; there is no cross-call deduplication.
    ///
    /// # Errors
    ///
    /// Only directory failures are fatal; endpoint and blob problems are
    /// skipped.
    pub async fn retrieve_all(&self) -> Result<Vec<AuthenticatedDropMessage>> {
        let identities = self.ctx.directory().identities()?;
        let mut accepted = Vec::new();
        for identity in &identities {
            for endpoint in identity.endpoints() {
                let messages = self.reconcile_endpoint(&identities, endpoint).await?;
                accepted.extend(messages);
            }
        }
        Ok(accepted)
    }

    /// Retrieve and reconcile from a single endpoint.
    ///
    /// The trial-decode still runs over every local identity: an endpoint
    /// does not reveal which identity its blobs are addressed to.
    pub async fn retrieve_from(
        &self,
        endpoint: &DropEndpoint,
    ) -> Result<Vec<AuthenticatedDropMessage>> {
        let identities = self.ctx.directory().identities()?;
        self.reconcile_endpoint(&identities, endpoint).await
    }

    /// Pull one endpoint's batch and run every blob through the decision
    /// flow. A failed pull skips the endpoint for this pass.
    async fn reconcile_endpoint(
        &self,
        identities: &[Identity],
        endpoint: &DropEndpoint,
    ) -> Result<Vec<AuthenticatedDropMessage>> {
        let batch = match self.ctx.transport().pull_batch(endpoint).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "endpoint pull failed, skipping batch");
                return Ok(Vec::new());
            }
        };

        debug!(endpoint = %endpoint, blobs = batch.len(), "reconciling batch");

        let mut accepted = Vec::new();
        for blob in &batch {
            let Some((message, decoded_by)) = self.decode_blob(identities, blob) else {
                continue;
            };
            if let Some(bound) = self.authenticate(decoded_by, message)? {
                accepted.push(bound);
            }
        }
        Ok(accepted)
    }

    /// Trial-decode one blob against every identity.
    ///
    /// Returns the decoded message together with the identity that opened
    /// it, or `None` when the blob is discarded. A spoofed-sender signal
    /// discards the blob immediately: the conservative reading is that a
    /// tampered envelope is not given a second chance against the
    /// remaining identities.
    fn decode_blob<'a>(
        &self,
        identities: &'a [Identity],
        blob: &[u8],
    ) -> Option<(DropMessage, &'a Identity)> {
        let Some(version) = peek_version(blob) else {
            info!("discarding empty blob");
            return None;
        };
        let Some(decoder) = self.ctx.decoders().decoder_for(version) else {
            warn!(version, "unknown envelope version, discarding blob");
            return None;
        };
        if blob.len() > MAX_ENVELOPE_BYTES {
            // Bounded before any per-version parsing
            info!(version, size = blob.len(), "discarding oversized envelope");
            return None;
        }

        for identity in identities {
            match decoder.decode(blob, identity) {
                Ok(message) => {
                    trace!(
                        identity = %identity.key_id().short(),
                        "envelope decoded"
                    );
                    return Some((message, identity));
                }
                Err(DecodeError::NotForRecipient) => continue,
                Err(DecodeError::SpoofedSender) => {
                    warn!(
                        identity = %identity.key_id().short(),
                        "spoofed sender in envelope, discarding blob"
                    );
                    return None;
                }
                Err(e) => {
                    // Structural rejections hold for every identity.
                    // Crafted or corrupted uploads land here.
                    info!(version, error = %e, "discarding invalid envelope");
                    return None;
                }
            }
        }
        debug!(version, "no identity could open envelope, discarding");
        None
    }

    /// Match the claimed sender against the decoding identity's contacts.
    ///
    /// The book is shuffled before scanning so no contact is
    /// deterministically compared first; key identifiers are unique per
    /// book, so scan order cannot change the result.
    fn authenticate(
        &self,
        identity: &Identity,
        message: DropMessage,
    ) -> Result<Option<AuthenticatedDropMessage>> {
        let book = self.ctx.directory().contact_book(identity)?;
        let mut contacts = book.to_vec();
        contacts.shuffle(&mut OsRng);

        for contact in contacts {
            if contact.key_id().ct_eq(message.sender()) {
                return Ok(Some(AuthenticatedDropMessage::new(message, contact)));
            }
        }
        // Unknown senders are a normal condition, not an error
        trace!(
            identity = %identity.key_id().short(),
            sender = %message.sender().short(),
            "decoded message from unknown sender, dropping"
        );
        Ok(None)
    }
}
