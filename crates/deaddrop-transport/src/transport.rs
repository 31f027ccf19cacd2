//! The transport seam.

use std::time::Duration;

use async_trait::async_trait;

use deaddrop_identity::DropEndpoint;

use crate::Result;

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of depositing a blob at an endpoint.
///
/// Wraps the endpoint's HTTP status code. Delivery bookkeeping treats a
/// deposit as successful only when [`SendStatus::accepted`] holds; every
/// other status, and every transport error, counts as a failed endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendStatus {
    code: u16,
}

impl SendStatus {
    /// Status code a drop endpoint answers a stored blob with.
    pub const ACCEPTED: u16 = 200;

    /// Wrap a raw status code.
    pub fn new(code: u16) -> Self {
        Self { code }
    }

    /// The raw status code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Whether the endpoint accepted and stored the blob.
    pub fn accepted(&self) -> bool {
        self.code == Self::ACCEPTED
    }
}

/// Configuration shared by transport implementations.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Upper bound on any single send or pull request.
    ///
    /// A timed-out attempt is a failed attempt; it never blocks the rest
    /// of a fan-out or a retrieval pass.
    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Byte-moving interface to drop endpoints.
///
/// Implementations must be safe to share across tasks: the dispatcher
/// fans a single ciphertext out to many endpoints concurrently with
/// retrieval passes pulling from others.
#[async_trait]
pub trait DropTransport: Send + Sync {
    /// Deposit an envelope blob at an endpoint.
    ///
    /// # Errors
    ///
    /// Transport-level failures (unreachable, timeout) are errors; an
    /// unexpected-but-received status is a non-accepted [`SendStatus`],
    /// not an error.
    async fn send_blob(&self, endpoint: &DropEndpoint, blob: &[u8]) -> Result<SendStatus>;

    /// Pull one finite snapshot of the blobs currently stored at an
    /// endpoint.
    ///
    /// Endpoints are non-draining: the same blob may appear in later
    /// snapshots.
    async fn pull_batch(&self, endpoint: &DropEndpoint) -> Result<Vec<Vec<u8>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_status_accepted() {
        assert!(SendStatus::new(200).accepted());
        assert!(!SendStatus::new(202).accepted());
        assert!(!SendStatus::new(404).accepted());
        assert!(!SendStatus::new(500).accepted());
    }

    #[test]
    fn test_default_config_has_timeout() {
        let config = TransportConfig::default();
        assert!(config.request_timeout > Duration::ZERO);
    }
}
