//! # Emission (Emitter)
//!
//! The last stage of a pipeline: an emitter publishes one result event on the
//! bus scope its outbound route was configured with. Publication is
//! fire-and-forget from the router's point of view; the returned error is only
//! reported, never retried.

use crate::{
    error::PublishError,
    event::DomainEvent,
    kind::BusScope,
};
use std::{future::Future, pin::Pin};

/// Publishes result events.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Emitter`",
    label = "missing `Emitter` implementation",
    note = "Emitters must implement `emit` to publish a domain event on a bus scope."
)]
pub trait Emitter: Send + Sync + 'static {
    /// Publish `event` on `scope`.
    fn emit(
        &self,
        event: &DomainEvent,
        scope: BusScope,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Dynamic object-safe version of [`Emitter`].
///
/// Routing tables hold emitters as `Arc<dyn DynEmitter>`.
pub trait DynEmitter: Send + Sync + 'static {
    /// Publish `event` on `scope` (dynamic dispatch version).
    fn emit_dyn<'a>(
        &'a self,
        event: &'a DomainEvent,
        scope: BusScope,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>>;
}

impl<T: Emitter> DynEmitter for T {
    fn emit_dyn<'a>(
        &'a self,
        event: &'a DomainEvent,
        scope: BusScope,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>> {
        Box::pin(self.emit(event, scope))
    }
}
