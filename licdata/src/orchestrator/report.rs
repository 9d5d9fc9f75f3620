//! Outcome of one inbound pipeline.

use licdata_core::{EventKind, PublishError};

/// A result event that could not be published.
#[derive(Debug)]
pub struct PublishFailure {
    /// Kind of the event.
    pub kind: EventKind,
    /// What the emitter reported.
    pub error: PublishError,
}

/// What happened to one inbound signal.
///
/// A pipeline that reaches the publish stage always succeeds; publish
/// problems are collected here instead of aborting the remaining results.
#[derive(Debug, Default)]
pub struct DispatchReport {
    accepted: bool,
    published: Vec<EventKind>,
    unrouted: Vec<EventKind>,
    failures: Vec<PublishFailure>,
}

impl DispatchReport {
    /// The signal had no inbound route, or its acceptor declined it.
    pub fn ignored() -> Self {
        Self::default()
    }

    pub(crate) fn accepted() -> Self {
        Self {
            accepted: true,
            ..Self::default()
        }
    }

    pub(crate) fn record_published(&mut self, kind: EventKind) {
        self.published.push(kind);
    }

    pub(crate) fn record_unrouted(&mut self, kind: EventKind) {
        self.unrouted.push(kind);
    }

    pub(crate) fn record_failure(&mut self, kind: EventKind, error: PublishError) {
        self.failures.push(PublishFailure { kind, error });
    }

    /// Whether the signal never reached the domain handler.
    pub fn is_ignored(&self) -> bool {
        !self.accepted
    }

    /// Kinds published, in the order the domain handler returned them.
    pub fn published(&self) -> &[EventKind] {
        &self.published
    }

    /// Result kinds with no outbound route.
    pub fn unrouted(&self) -> &[EventKind] {
        &self.unrouted
    }

    /// Publish failures, in result order.
    pub fn failures(&self) -> &[PublishFailure] {
        &self.failures
    }

    /// Total number of result events the domain handler returned.
    pub fn result_count(&self) -> usize {
        self.published.len() + self.unrouted.len() + self.failures.len()
    }

    /// Accepted, and every result event was published.
    pub fn is_clean(&self) -> bool {
        self.accepted && self.unrouted.is_empty() && self.failures.is_empty()
    }
}
