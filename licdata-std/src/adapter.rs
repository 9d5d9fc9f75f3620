//! Domain invocation adapter.
//!
//! This module provides a builder pattern for registering domain handlers per
//! event kind, and a frozen adapter that invokes them and normalizes their
//! output into an ordered sequence of result events.

use licdata_core::{
    DispatchError, DomainEvent, DomainHandler, DynDomainHandler, EventKind, RoutingError,
};
use std::{collections::HashMap, fmt, sync::Arc};

/// Builder for a [`DomainAdapter`].
///
/// # Example
/// ```ignore
/// let artifact = Arc::new(LicdataArtifact::default());
/// let adapter = HandlerRegistryBuilder::new()
///     .register_shared(EventKind::DockerImageRequested, artifact.clone())?
///     .register_shared(EventKind::DockerImagePushRequested, artifact)?
///     .build();
/// ```
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<EventKind, Arc<dyn DynDomainHandler>>,
}

impl HandlerRegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `kind`.
    pub fn register<H: DomainHandler>(
        self,
        kind: EventKind,
        handler: H,
    ) -> Result<Self, RoutingError> {
        self.register_shared(kind, Arc::new(handler))
    }

    /// Register an already shared handler for `kind`.
    ///
    /// One handler instance may serve several kinds.
    pub fn register_shared(
        mut self,
        kind: EventKind,
        handler: Arc<dyn DynDomainHandler>,
    ) -> Result<Self, RoutingError> {
        if self.handlers.contains_key(&kind) {
            return Err(RoutingError::DuplicateHandler(kind));
        }
        self.handlers.insert(kind, handler);
        Ok(self)
    }

    /// Get the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the builder has no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Build the immutable adapter.
    pub fn build(self) -> DomainAdapter {
        DomainAdapter {
            handlers: self.handlers,
        }
    }
}

/// Invokes the domain handler registered for an event's kind.
///
/// The adapter never interprets the handler's output beyond normalizing it;
/// an empty sequence is a normal outcome, and handler errors propagate.
pub struct DomainAdapter {
    handlers: HashMap<EventKind, Arc<dyn DynDomainHandler>>,
}

impl DomainAdapter {
    /// Whether a handler is registered for `kind`.
    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Invoke the handler for `event`'s kind.
    pub async fn invoke(&self, event: DomainEvent) -> Result<Vec<DomainEvent>, DispatchError> {
        let kind = event.kind();
        let handler = self
            .handlers
            .get(&kind)
            .ok_or(DispatchError::NoHandler(kind))?;

        handler
            .handle_dyn(event)
            .await
            .map_err(|source| DispatchError::Domain { kind, source })
    }
}

impl fmt::Debug for DomainAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<EventKind> = self.handlers.keys().copied().collect();
        kinds.sort();
        f.debug_struct("DomainAdapter")
            .field("kinds", &kinds)
            .finish()
    }
}
