//! Transport-backed emitter.

use licdata_core::{BusScope, DomainEvent, DynTransport, Emitter, PublishError};
use std::sync::Arc;

/// An emitter that publishes through a transport.
///
/// Several outbound routes usually share one instance.
#[derive(Clone)]
pub struct TransportEmitter {
    transport: Arc<dyn DynTransport>,
}

impl TransportEmitter {
    /// Wrap a shared transport.
    pub fn new(transport: Arc<dyn DynTransport>) -> Self {
        Self { transport }
    }
}

impl std::fmt::Debug for TransportEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportEmitter").finish_non_exhaustive()
    }
}

impl Emitter for TransportEmitter {
    async fn emit(&self, event: &DomainEvent, scope: BusScope) -> Result<(), PublishError> {
        self.transport.publish_dyn(event, scope).await
    }
}
