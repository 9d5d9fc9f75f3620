#![allow(dead_code)]

use licdata::{
    Acceptor, BusScope, DockerImageAvailable, DomainAdapter, DomainEvent, EventKind, EventRouter,
    HandlerRegistryBuilder, InboundSignal, Metadata, MissingOptionPolicy, RequestOptions,
    RoutingTable, TranslationError,
    emitters::TransportEmitter,
    testing::{RecordingTransport, ScriptedHandler},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Request Options
// ============================================================================

pub fn build_options() -> RequestOptions {
    RequestOptions::new()
        .with("variant", "slim")
        .with("python_version", "3.12")
        .with("image_version", "1.0")
}

pub fn push_options() -> RequestOptions {
    build_options().with("docker_registry_url", "registry.example.com")
}

pub fn build_request() -> InboundSignal {
    InboundSignal::DockerImageRequested(build_options())
}

pub fn push_request() -> InboundSignal {
    InboundSignal::DockerImagePushRequested(push_options())
}

// ============================================================================
// Result Events
// ============================================================================

pub fn available(version: &str) -> DomainEvent {
    DockerImageAvailable {
        image_name: "licdata-slim-python3.12".into(),
        image_version: Some(version.into()),
        metadata: Metadata::empty(),
    }
    .into()
}

// ============================================================================
// Routers
// ============================================================================

/// The standard table on the system bus, publishing through `transport`.
pub fn standard_table(transport: &RecordingTransport) -> RoutingTable {
    RoutingTable::standard(
        MissingOptionPolicy::Reject,
        Arc::new(TransportEmitter::new(Arc::new(transport.clone()))),
        BusScope::System,
    )
    .unwrap()
}

pub fn adapter_for(kind: EventKind, handler: &ScriptedHandler) -> DomainAdapter {
    HandlerRegistryBuilder::new()
        .register(kind, handler.clone())
        .unwrap()
        .build()
}

/// A standard router whose only handler is `handler`, registered for `kind`.
pub fn scripted_router(
    transport: &RecordingTransport,
    kind: EventKind,
    handler: &ScriptedHandler,
) -> EventRouter {
    EventRouter::new(standard_table(transport), adapter_for(kind, handler))
}

// ============================================================================
// Test Acceptors
// ============================================================================

/// Counts calls before delegating to an inner acceptor.
pub struct CountingAcceptor<A> {
    pub inner: A,
    pub calls: Arc<AtomicUsize>,
}

impl<A> CountingAcceptor<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl<A: Acceptor> Acceptor for CountingAcceptor<A> {
    fn accept(&self, signal: &InboundSignal) -> Result<Option<DomainEvent>, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.accept(signal)
    }
}
