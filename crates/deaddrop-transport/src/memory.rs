//! In-memory transport double.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use deaddrop_identity::DropEndpoint;

use crate::error::TransportError;
use crate::transport::{DropTransport, SendStatus};
use crate::Result;

#[derive(Default)]
struct EndpointState {
    blobs: Vec<Vec<u8>>,
    unreachable: bool,
    reject_with: Option<u16>,
}

/// A process-local drop endpoint fleet.
///
/// Behaves like a set of dumb blob stores: deposited blobs accumulate per
/// endpoint and every pull returns the full current snapshot (endpoints
/// are non-draining). Tests use the control methods to seed blobs as a
/// remote sender would, to knock an endpoint offline, or to make it reject
/// deposits with a chosen status.
#[derive(Default)]
pub struct InMemoryDropTransport {
    state: Mutex<HashMap<DropEndpoint, EndpointState>>,
}

impl InMemoryDropTransport {
    /// Create an empty fleet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit a blob directly, as a remote sender would.
    pub fn deposit(&self, endpoint: &DropEndpoint, blob: Vec<u8>) {
        let mut state = self.lock();
        state.entry(endpoint.clone()).or_default().blobs.push(blob);
    }

    /// Make an endpoint unreachable (sends and pulls error) or reachable
    /// again.
    pub fn set_unreachable(&self, endpoint: &DropEndpoint, unreachable: bool) {
        let mut state = self.lock();
        state.entry(endpoint.clone()).or_default().unreachable = unreachable;
    }

    /// Make an endpoint answer deposits with `code` instead of storing
    /// them, or restore normal behavior with `None`.
    pub fn set_reject_status(&self, endpoint: &DropEndpoint, code: Option<u16>) {
        let mut state = self.lock();
        state.entry(endpoint.clone()).or_default().reject_with = code;
    }

    /// The blobs currently stored at an endpoint.
    pub fn stored(&self, endpoint: &DropEndpoint) -> Vec<Vec<u8>> {
        let state = self.lock();
        state
            .get(endpoint)
            .map(|e| e.blobs.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DropEndpoint, EndpointState>> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl DropTransport for InMemoryDropTransport {
    async fn send_blob(&self, endpoint: &DropEndpoint, blob: &[u8]) -> Result<SendStatus> {
        let mut state = self.lock();
        let entry = state.entry(endpoint.clone()).or_default();
        if entry.unreachable {
            return Err(TransportError::Unreachable(endpoint.to_string()));
        }
        if let Some(code) = entry.reject_with {
            return Ok(SendStatus::new(code));
        }
        entry.blobs.push(blob.to_vec());
        Ok(SendStatus::new(SendStatus::ACCEPTED))
    }

    async fn pull_batch(&self, endpoint: &DropEndpoint) -> Result<Vec<Vec<u8>>> {
        let state = self.lock();
        match state.get(endpoint) {
            Some(entry) if entry.unreachable => {
                Err(TransportError::Unreachable(endpoint.to_string()))
            }
            Some(entry) => Ok(entry.blobs.clone()),
            None => Ok(Vec::new()),
        }
    }
}
