//! Per-send delivery outcomes.

use std::collections::BTreeMap;

use deaddrop_identity::DropEndpoint;

/// The result of one fan-out: endpoint → delivered.
///
/// Exactly one outcome exists per send call, completed only after every
/// endpoint attempt has finished. `true` means the endpoint answered the
/// transport-defined accepted status; transport errors, timeouts, and any
/// other status record `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryOutcome {
    results: BTreeMap<DropEndpoint, bool>,
}

impl DeliveryOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one endpoint attempt.
    pub fn record(&mut self, endpoint: DropEndpoint, delivered: bool) {
        self.results.insert(endpoint, delivered);
    }

    /// Whether a specific endpoint accepted the envelope.
    pub fn delivered_to(&self, endpoint: &DropEndpoint) -> Option<bool> {
        self.results.get(endpoint).copied()
    }

    /// Whether at least one endpoint accepted the envelope.
    ///
    /// This is the useful notion of success for a redundant broadcast:
    /// the recipient pulls from all of its endpoints, so one accepted
    /// deposit suffices.
    pub fn any_delivered(&self) -> bool {
        self.results.values().any(|&ok| ok)
    }

    /// Whether every endpoint accepted the envelope.
    pub fn all_delivered(&self) -> bool {
        !self.results.is_empty() && self.results.values().all(|&ok| ok)
    }

    /// Number of endpoints attempted.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no endpoints were attempted.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over `(endpoint, delivered)` pairs in endpoint order.
    pub fn iter(&self) -> impl Iterator<Item = (&DropEndpoint, bool)> {
        self.results.iter().map(|(e, &ok)| (e, ok))
    }
}
