//! # Acceptance (Acceptor)
//!
//! An acceptor is the entry point for one inbound event kind. It interprets
//! the decoded signal and builds the domain event the handler will consume.
//!
//! # Responsibilities
//!
//! 1. **Interpretation**: Turn free-form request options into a typed event.
//! 2. **Gatekeeping**: Decline signals it does not understand (`Ok(None)`).
//! 3. **Derivation**: Compute composite fields such as image names.
//!
//! Acceptance is pure and synchronous; anything that may suspend belongs to
//! the domain handler.

use crate::{
    error::TranslationError,
    event::{DomainEvent, InboundSignal},
};

/// Turns an inbound signal into a domain event.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Acceptor`",
    label = "missing `Acceptor` implementation",
    note = "Acceptors must implement `accept` to build a domain event from an inbound signal."
)]
pub trait Acceptor: Send + Sync + 'static {
    /// Build the domain event for `signal`.
    ///
    /// Returns `Ok(None)` when the signal is not one this acceptor handles.
    fn accept(&self, signal: &InboundSignal) -> Result<Option<DomainEvent>, TranslationError>;
}

// Blanket impl for closures
impl<F> Acceptor for F
where
    F: Fn(&InboundSignal) -> Result<Option<DomainEvent>, TranslationError> + Send + Sync + 'static,
{
    fn accept(&self, signal: &InboundSignal) -> Result<Option<DomainEvent>, TranslationError> {
        (self)(signal)
    }
}
