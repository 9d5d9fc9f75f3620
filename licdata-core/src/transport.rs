//! Transport collaborator contract.
//!
//! The router relies on two primitives only: subscribing to an event kind on
//! a bus scope, and publishing an event on a bus scope. Wire encoding is the
//! transport's business.

use crate::{
    error::PublishError,
    event::{DomainEvent, InboundSignal},
    kind::{BusScope, EventKind},
};
use futures::stream::BoxStream;
use std::{future::Future, pin::Pin};

/// Stream of decoded inbound signals for one subscription.
pub type SignalStream = BoxStream<'static, InboundSignal>;

/// A pub/sub transport.
pub trait Transport: Send + Sync + 'static {
    /// Subscribe to `kind` on `scope`.
    ///
    /// The stream ends when the transport shuts down.
    fn subscribe(&self, kind: EventKind, scope: BusScope) -> SignalStream;

    /// Publish `event` on `scope`.
    fn publish(
        &self,
        event: &DomainEvent,
        scope: BusScope,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Dynamic object-safe version of [`Transport`].
pub trait DynTransport: Send + Sync + 'static {
    /// Subscribe to `kind` on `scope`.
    fn subscribe_dyn(&self, kind: EventKind, scope: BusScope) -> SignalStream;

    /// Publish `event` on `scope` (dynamic dispatch version).
    fn publish_dyn<'a>(
        &'a self,
        event: &'a DomainEvent,
        scope: BusScope,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>>;
}

impl<T: Transport> DynTransport for T {
    fn subscribe_dyn(&self, kind: EventKind, scope: BusScope) -> SignalStream {
        self.subscribe(kind, scope)
    }

    fn publish_dyn<'a>(
        &'a self,
        event: &'a DomainEvent,
        scope: BusScope,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>> {
        Box::pin(self.publish(event, scope))
    }
}
