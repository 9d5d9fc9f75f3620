//! # Domain Invocation (DomainHandler)
//!
//! The business decision for a domain event lives behind this trait. The
//! router does not interpret what a handler does; it only relies on the
//! output being convertible into an ordered sequence of result events.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|event| async move { ... }`
//! 2. **Struct implementation**: `impl DomainHandler for MyArtifact`
//! 3. **Type-erased**: `Arc<dyn DynDomainHandler>` inside a registry

use crate::{error::BoxError, event::DomainEvent, response::IntoResultEvents};
use std::{future::Future, pin::Pin};

/// The domain-level handler for one or more event kinds.
///
/// Handlers receive the event by value: every domain event is consumed
/// exactly once.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for static dispatch.
/// For registries keyed at runtime, use [`DynDomainHandler`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `DomainHandler`",
    label = "missing `DomainHandler` implementation",
    note = "Domain handlers must implement `handle` returning something `IntoResultEvents`."
)]
pub trait DomainHandler: Send + Sync + 'static {
    /// The raw output, normalized through [`IntoResultEvents`].
    type Output: IntoResultEvents + Send;

    /// Executes the business logic.
    fn handle(&self, event: DomainEvent) -> impl Future<Output = Self::Output> + Send;
}

// Blanket impl for closures
impl<F, Out, Fut> DomainHandler for F
where
    Out: IntoResultEvents + Send,
    F: Fn(DomainEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
{
    type Output = Out;

    fn handle(&self, event: DomainEvent) -> impl Future<Output = Self::Output> + Send {
        (self)(event)
    }
}

/// Dynamic object-safe version of [`DomainHandler`].
///
/// The output is already normalized into result events.
pub trait DynDomainHandler: Send + Sync + 'static {
    /// Executes the business logic (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        event: DomainEvent,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DomainEvent>, BoxError>> + Send + 'a>>;
}

// Blanket implementation: Any type implementing DomainHandler implements DynDomainHandler automatically.
impl<T: DomainHandler> DynDomainHandler for T {
    fn handle_dyn<'a>(
        &'a self,
        event: DomainEvent,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DomainEvent>, BoxError>> + Send + 'a>> {
        Box::pin(async move { self.handle(event).await.into_result_events() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{CredentialRequested, DockerImageAvailable},
        options::Metadata,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_closure_handler_through_dyn() {
        let handler: Arc<dyn DynDomainHandler> = Arc::new(|event: DomainEvent| async move {
            match event {
                DomainEvent::DockerImageRequested(req) => Some(DomainEvent::from(
                    DockerImageAvailable {
                        image_name: req.image_name,
                        image_version: req.image_version,
                        metadata: req.metadata,
                    },
                )),
                _ => None,
            }
        });

        let unrelated = CredentialRequested {
            name: "x".into(),
            metadata: Metadata::empty(),
        };
        let events = handler.handle_dyn(unrelated.into()).await.unwrap();
        assert!(events.is_empty());
    }
}
