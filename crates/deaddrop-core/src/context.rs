//! The exchange context.

use std::sync::Arc;

use deaddrop_directory::DirectoryStore;
use deaddrop_transport::DropTransport;
use deaddrop_wire::{CodecRegistry, DropEncoder};

/// Handle bundle for the exchange engine.
///
/// Built once at process start and passed by `Arc` into the [`Dispatcher`]
/// and [`Reconciler`]; torn down at shutdown. Nothing in this crate
/// reaches for ambient global state.
///
/// [`Dispatcher`]: crate::Dispatcher
/// [`Reconciler`]: crate::Reconciler
pub struct ExchangeContext {
    directory: Arc<DirectoryStore>,
    transport: Arc<dyn DropTransport>,
    encoder: Arc<dyn DropEncoder>,
    decoders: CodecRegistry,
}

impl ExchangeContext {
    /// Assemble a context from its collaborators.
    ///
    /// `encoder` writes outgoing envelopes in the current wire version;
    /// `decoders` must cover every version this device is willing to read
    /// (including the encoder's own).
    pub fn new(
        directory: Arc<DirectoryStore>,
        transport: Arc<dyn DropTransport>,
        encoder: Arc<dyn DropEncoder>,
        decoders: CodecRegistry,
    ) -> Self {
        Self {
            directory,
            transport,
            encoder,
            decoders,
        }
    }

    /// The persisted directory of identities and contact books.
    pub fn directory(&self) -> &DirectoryStore {
        &self.directory
    }

    /// The drop endpoint transport.
    pub fn transport(&self) -> &Arc<dyn DropTransport> {
        &self.transport
    }

    /// The encoder for outgoing envelopes.
    pub fn encoder(&self) -> &Arc<dyn DropEncoder> {
        &self.encoder
    }

    /// The decoder registry for inbound envelopes.
    pub fn decoders(&self) -> &CodecRegistry {
        &self.decoders
    }
}

impl std::fmt::Debug for ExchangeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeContext")
            .field("directory", &self.directory)
            .field("decoders", &self.decoders)
            .finish()
    }
}
