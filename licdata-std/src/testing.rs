//! Testing utilities for licdata.
//!
//! This module provides test doubles for the router's collaborators.
//!
//! # Features
//!
//! - [`RecordingTransport`]: A transport that records every publish and can be told to fail
//! - [`RecordingEmitter`]: An emitter that records what it was asked to emit
//! - [`ScriptedHandler`]: A domain handler that returns scripted events and records its inputs

use crate::bus::MemoryBus;
use licdata_core::{
    BoxError, BusScope, DomainEvent, DomainHandler, Emitter, EventKind, InboundSignal,
    PublishError, SignalStream, Transport,
};
use parking_lot::Mutex;
use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Transport
// ============================================================================

/// A transport that records every published event.
///
/// Subscriptions are served by an internal [`MemoryBus`], so tests can feed
/// signals in with [`deliver`](Self::deliver).
///
/// # Example
///
/// ```rust,ignore
/// let transport = RecordingTransport::new();
/// let router = EventRouter::new(table_for(&transport), adapter);
///
/// router.dispatch(signal).await?;
/// assert_eq!(transport.published_kinds(), vec![EventKind::DockerImageAvailable]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingTransport {
    published: Arc<Mutex<Vec<(DomainEvent, BusScope)>>>,
    failing: Arc<Mutex<HashSet<EventKind>>>,
    attempts: Arc<AtomicUsize>,
    bus: MemoryBus,
}

impl RecordingTransport {
    /// Create a new recording transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every publish of `kind` fail.
    pub fn fail_on(&self, kind: EventKind) {
        self.failing.lock().insert(kind);
    }

    /// Deliver a signal to subscribers.
    pub fn deliver(&self, signal: InboundSignal, scope: BusScope) -> usize {
        self.bus.deliver(signal, scope)
    }

    /// End every subscription stream.
    pub fn close(&self) {
        self.bus.close();
    }

    /// Successfully published events, in publish order.
    pub fn published(&self) -> Vec<(DomainEvent, BusScope)> {
        self.published.lock().clone()
    }

    /// Kinds of the successfully published events, in publish order.
    pub fn published_kinds(&self) -> Vec<EventKind> {
        self.published.lock().iter().map(|(e, _)| e.kind()).collect()
    }

    /// Number of publish calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Transport for RecordingTransport {
    fn subscribe(&self, kind: EventKind, scope: BusScope) -> SignalStream {
        self.bus.subscribe(kind, scope)
    }

    async fn publish(&self, event: &DomainEvent, scope: BusScope) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(&event.kind()) {
            return Err(PublishError::Transport(
                format!("refusing to publish {}", event.kind()).into(),
            ));
        }
        self.published.lock().push((event.clone(), scope));
        Ok(())
    }
}

// ============================================================================
// Recording Emitter
// ============================================================================

/// An emitter that records what it emits.
#[derive(Clone, Default)]
pub struct RecordingEmitter {
    emitted: Arc<Mutex<Vec<(DomainEvent, BusScope)>>>,
}

impl RecordingEmitter {
    /// Create a new recording emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the emitted events.
    pub fn emitted(&self) -> Vec<(DomainEvent, BusScope)> {
        self.emitted.lock().clone()
    }
}

impl Emitter for RecordingEmitter {
    async fn emit(&self, event: &DomainEvent, scope: BusScope) -> Result<(), PublishError> {
        self.emitted.lock().push((event.clone(), scope));
        Ok(())
    }
}

// ============================================================================
// Scripted Handler
// ============================================================================

/// A domain handler that returns a fixed sequence of events.
///
/// # Example
///
/// ```rust,ignore
/// let handler = ScriptedHandler::returning(vec![available_event]);
/// let adapter = HandlerRegistryBuilder::new()
///     .register(EventKind::DockerImageRequested, handler.clone())?
///     .build();
///
/// adapter.invoke(requested_event).await?;
/// assert_eq!(handler.call_count(), 1);
/// ```
#[derive(Clone)]
pub struct ScriptedHandler {
    output: Arc<Mutex<Vec<DomainEvent>>>,
    error: Arc<Mutex<Option<String>>>,
    inputs: Arc<Mutex<Vec<DomainEvent>>>,
}

impl ScriptedHandler {
    /// Create a handler returning `events` on every call.
    pub fn returning(events: Vec<DomainEvent>) -> Self {
        Self {
            output: Arc::new(Mutex::new(events)),
            error: Arc::new(Mutex::new(None)),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every call with `error`.
    pub fn set_error(&self, error: impl Into<String>) {
        *self.error.lock() = Some(error.into());
    }

    /// Clear error state.
    pub fn clear_error(&self) {
        *self.error.lock() = None;
    }

    /// Get recorded inputs.
    pub fn inputs(&self) -> Vec<DomainEvent> {
        self.inputs.lock().clone()
    }

    /// Get the number of times the handler was called.
    pub fn call_count(&self) -> usize {
        self.inputs.lock().len()
    }
}

impl DomainHandler for ScriptedHandler {
    type Output = Result<Vec<DomainEvent>, BoxError>;

    async fn handle(&self, event: DomainEvent) -> Self::Output {
        self.inputs.lock().push(event);

        if let Some(err) = self.error.lock().clone() {
            return Err(err.into());
        }

        Ok(self.output.lock().clone())
    }
}
