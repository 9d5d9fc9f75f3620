//! Error types for licdata.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`LicdataError`] - Top-level error type for all licdata operations
//! - [`TranslationError`] - Errors turning request options into domain events
//! - [`DispatchError`] - Errors during one inbound pipeline
//! - [`RoutingError`] - Errors building the routing table or handler registry
//! - [`PublishError`] - Errors delivering an outbound event
//! - [`ConfigError`] - Invalid configuration

use crate::kind::{BusScope, EventKind};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all licdata operations.
#[derive(Error, Debug)]
pub enum LicdataError {
    /// An inbound pipeline failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// The routing table could not be built.
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    /// The configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// A required derivation input was missing from the request options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// The option was absent or null.
    #[error("{kind} requires option `{key}`")]
    MissingOption {
        /// Kind of the event being translated.
        kind: EventKind,
        /// Missing option key.
        key: &'static str,
    },
}

/// Errors that abort a single inbound pipeline.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The request options could not be translated.
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// No domain handler is registered for the event kind.
    #[error("no domain handler registered for {0}")]
    NoHandler(EventKind),

    /// The domain handler failed.
    #[error("domain handler failed for {kind}")]
    Domain {
        /// Kind of the event the handler was invoked with.
        kind: EventKind,
        /// The handler's error.
        #[source]
        source: BoxError,
    },
}

/// Errors that can occur while building routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The kind already has a route in this direction.
    #[error("route already exists for {0}")]
    DuplicateRoute(EventKind),

    /// The kind already has a domain handler.
    #[error("domain handler already registered for {0}")]
    DuplicateHandler(EventKind),
}

/// Errors delivering an event to a transport.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Nobody can receive events on this scope any more.
    #[error("{scope} bus is closed")]
    Closed {
        /// Scope the event was published on.
        scope: BusScope,
    },

    /// The event could not be encoded for the wire.
    #[error("could not encode {kind}")]
    Encode {
        /// Kind of the event.
        kind: EventKind,
        /// Encoder error.
        #[source]
        source: BoxError,
    },

    /// The transport reported an error.
    #[error(transparent)]
    Transport(BoxError),
}

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value was out of range.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid {
        /// Configuration key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
