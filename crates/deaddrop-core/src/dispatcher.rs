//! Fan-out delivery dispatcher.
//!
//! One send call produces one envelope, broadcast unchanged to every drop
//! endpoint the recipient owns. The broadcast runs on a fixed-size worker
//! pool fed by a bounded queue: under load, sends queue instead of
//! spawning unbounded concurrency.
//!
//! ## Contract
//!
//! - Payload validation and envelope encoding happen synchronously inside
//!   [`Dispatcher::send`]; `PayloadTooLarge` surfaces before any I/O.
//! - `send` resolves as soon as the job is queued and hands back a
//!   [`DeliveryHandle`] that completes exactly once, after every endpoint
//!   attempt has finished.
//! - Endpoint attempts are independent: one failure never aborts the
//!   others, and a failed or unreachable endpoint records `false` in the
//!   outcome, never success.
//! - Delivery mutates no persisted state.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};

use deaddrop_identity::{Contact, DropEndpoint, Identity};
use deaddrop_wire::limits::MAX_PAYLOAD_BYTES;
use deaddrop_wire::{DropMessage, EncodeError};

use crate::context::ExchangeContext;
use crate::error::CoreError;
use crate::outcome::DeliveryOutcome;
use crate::Result;

/// Default number of broadcast workers.
const DEFAULT_WORKERS: usize = 4;

/// Default depth of the pending-send queue.
const DEFAULT_QUEUE_DEPTH: usize = 64;

/// Configuration for the dispatcher's worker pool.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Number of concurrent broadcast workers.
    pub workers: usize,

    /// Sends that may wait in the queue before callers block.
    pub queue_depth: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

/// A queued broadcast: one ciphertext, many endpoints, one reply slot.
struct BroadcastJob {
    blob: Vec<u8>,
    endpoints: Vec<DropEndpoint>,
    reply: oneshot::Sender<DeliveryOutcome>,
}

/// Completion handle for one send call.
///
/// Resolves exactly once with the full [`DeliveryOutcome`]. Dropping the
/// handle discards the outcome but does not cancel the broadcast.
pub struct DeliveryHandle {
    rx: oneshot::Receiver<DeliveryOutcome>,
}

impl DeliveryHandle {
    /// Wait for the broadcast to finish.
    ///
    /// Returns `None` only if the dispatcher was torn down before the
    /// broadcast completed.
    pub async fn outcome(self) -> Option<DeliveryOutcome> {
        self.rx.await.ok()
    }
}

/// Broadcasts envelopes to recipient endpoints.
///
/// Construct once (inside a tokio runtime) and share; dropping the
/// dispatcher closes the queue and lets idle workers exit.
pub struct Dispatcher {
    ctx: Arc<ExchangeContext>,
    jobs: mpsc::Sender<BroadcastJob>,
}

impl Dispatcher {
    /// Start the worker pool.
    pub fn new(ctx: Arc<ExchangeContext>, config: DispatcherConfig) -> Self {
        let (tx, rx) = mpsc::channel::<BroadcastJob>(config.queue_depth.max(1));
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..config.workers.max(1) {
            let rx = Arc::clone(&rx);
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                loop {
                    let job = { rx.lock().await.recv().await };
                    let Some(job) = job else {
                        break; // queue closed
                    };
                    debug!(worker, endpoints = job.endpoints.len(), "broadcasting envelope");
                    let outcome = broadcast(&ctx, &job.blob, &job.endpoints).await;
                    // Receiver may be gone; the outcome is then discarded
                    let _ = job.reply.send(outcome);
                }
            });
        }

        Self { ctx, jobs: tx }
    }

    /// Send a message to a contact from one of our identities.
    ///
    /// Validates the payload bound and encodes exactly one envelope for
    /// the `(recipient, sender)` pair before queueing; the same ciphertext
    /// is deposited at every endpoint the recipient owns. Waits only for
    /// queue capacity, never for the network.
    ///
    /// # Errors
    ///
    /// [`CoreError::Encode`] if the payload exceeds
    /// [`MAX_PAYLOAD_BYTES`] or the codec fails;
    /// [`CoreError::DispatcherClosed`] if the pool is torn down.
    pub async fn send(
        &self,
        message: &DropMessage,
        recipient: &Contact,
        sender: &Identity,
    ) -> Result<DeliveryHandle> {
        // Fail fast, before the codec and before any I/O
        let payload_len = message.content().len();
        if payload_len > MAX_PAYLOAD_BYTES {
            return Err(EncodeError::PayloadTooLarge {
                max: MAX_PAYLOAD_BYTES,
                actual: payload_len,
            }
            .into());
        }

        let blob = self.ctx.encoder().encode(message, recipient, sender)?;

        let (reply, rx) = oneshot::channel();
        let job = BroadcastJob {
            blob,
            endpoints: recipient.endpoints().to_vec(),
            reply,
        };
        self.jobs
            .send(job)
            .await
            .map_err(|_| CoreError::DispatcherClosed)?;

        Ok(DeliveryHandle { rx })
    }
}

/// Deposit one ciphertext at every endpoint, collecting per-endpoint
/// outcomes exhaustively.
async fn broadcast(
    ctx: &ExchangeContext,
    blob: &[u8],
    endpoints: &[DropEndpoint],
) -> DeliveryOutcome {
    let mut outcome = DeliveryOutcome::new();
    for endpoint in endpoints {
        let delivered = match ctx.transport().send_blob(endpoint, blob).await {
            Ok(status) => status.accepted(),
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "endpoint send failed");
                false
            }
        };
        outcome.record(endpoint.clone(), delivered);
    }
    outcome
}
