//! In-process bus transport.
//!
//! [`MemoryBus`] keeps one `tokio::sync::broadcast` channel per subscribed
//! (scope, inbound kind) pair and one per scope for published events. It is
//! what the binary listens on when no external bus is wired, and what the
//! integration tests drive.

use futures::StreamExt;
use licdata_core::{
    BusScope, DomainEvent, EventKind, InboundSignal, PublishError, SignalStream, Transport,
};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

/// A safe default for channel buffers.
const DEFAULT_CAPACITY: usize = 128;

#[derive(Debug)]
struct Channels {
    signals: RwLock<HashMap<(BusScope, EventKind), broadcast::Sender<InboundSignal>>>,
    events: RwLock<HashMap<BusScope, broadcast::Sender<DomainEvent>>>,
    capacity: usize,
    closed: AtomicBool,
}

/// A cloneable handle to an in-process bus.
#[derive(Debug, Clone)]
pub struct MemoryBus {
    channels: Arc<Channels>,
}

impl MemoryBus {
    /// Create a bus with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus whose channels buffer up to `capacity` messages.
    ///
    /// A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Channels {
                signals: RwLock::new(HashMap::new()),
                events: RwLock::new(HashMap::new()),
                capacity: capacity.max(1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Deliver an inbound signal to every subscriber of its kind on `scope`.
    ///
    /// Returns the number of subscribers reached; unsubscribed kinds reach
    /// nobody.
    pub fn deliver(&self, signal: InboundSignal, scope: BusScope) -> usize {
        let kind = signal.kind();
        let sender = self.channels.signals.read().get(&(scope, kind)).cloned();
        match sender.map(|tx| tx.send(signal)) {
            Some(Ok(receivers)) => {
                trace!(%kind, %scope, receivers, "signal delivered");
                receivers
            }
            _ => {
                debug!(%kind, %scope, "no subscriber for signal");
                0
            }
        }
    }

    /// Observe every event published on `scope` from now on.
    pub fn observe(&self, scope: BusScope) -> broadcast::Receiver<DomainEvent> {
        self.channels
            .events
            .write()
            .entry(scope)
            .or_insert_with(|| broadcast::channel(self.channels.capacity).0)
            .subscribe()
    }

    /// Close the bus.
    ///
    /// Subscription streams end once drained, and later publishes fail with
    /// [`PublishError::Closed`].
    pub fn close(&self) {
        self.channels.closed.store(true, Ordering::Release);
        self.channels.signals.write().clear();
        self.channels.events.write().clear();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.channels.closed.load(Ordering::Acquire)
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryBus {
    fn subscribe(&self, kind: EventKind, scope: BusScope) -> SignalStream {
        if self.is_closed() {
            return futures::stream::empty().boxed();
        }

        let rx = self
            .channels
            .signals
            .write()
            .entry((scope, kind))
            .or_insert_with(|| broadcast::channel(self.channels.capacity).0)
            .subscribe();

        futures::stream::unfold(rx, move |mut rx| async move {
            let mut skipped = 0u64;
            loop {
                match rx.recv().await {
                    Ok(signal) => {
                        if skipped > 0 {
                            warn!(%kind, %scope, skipped, "subscriber lagged; continuing from latest signal");
                        }
                        return Some((signal, rx));
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        skipped = skipped.saturating_add(n);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }

    async fn publish(&self, event: &DomainEvent, scope: BusScope) -> Result<(), PublishError> {
        if self.is_closed() {
            return Err(PublishError::Closed { scope });
        }

        let sender = self.channels.events.read().get(&scope).cloned();
        match sender.map(|tx| tx.send(event.clone())) {
            Some(Ok(observers)) => trace!(kind = %event.kind(), %scope, observers, "event published"),
            _ => debug!(kind = %event.kind(), %scope, "no observer for event"),
        }
        Ok(())
    }
}
