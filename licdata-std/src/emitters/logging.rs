//! Logging emitter for dry runs.

use licdata_core::{BusScope, DomainEvent, Emitter, PublishError};

/// An emitter that logs events instead of publishing them.
///
/// # Example
///
/// ```rust,ignore
/// let table = RoutingTable::standard(policy, Arc::new(LoggingEmitter::named("dry-run")), scope)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingEmitter {
    name: &'static str,
}

impl LoggingEmitter {
    /// Create a new `LoggingEmitter` with a default name.
    pub const fn new() -> Self {
        Self { name: "emitter" }
    }

    /// Create a new `LoggingEmitter` with a custom name.
    ///
    /// The name is used in log messages to identify the emitter.
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for LoggingEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for LoggingEmitter {
    async fn emit(&self, event: &DomainEvent, scope: BusScope) -> Result<(), PublishError> {
        tracing::info!(
            name = %self.name,
            kind = %event.kind(),
            %scope,
            ?event,
            "emitting event"
        );
        Ok(())
    }
}
