//! # licdata-core
//!
//! Core vocabulary and traits for the licdata artifact event router.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! transports, domain handlers and test doubles that don't need the standard
//! implementations in `licdata-std`.
//!
//! # Four-Stage Pipeline
//!
//! Every inbound request travels through the same four stages:
//!
//! ## Stage 1: Acceptance ([`Acceptor`])
//!
//! Interprets a decoded [`InboundSignal`] and turns its free-form
//! [`RequestOptions`] into a fully constructed [`DomainEvent`].
//!
//! ## Stage 2: Domain Invocation ([`DomainHandler`])
//!
//! The business decision. A handler receives the domain event and returns
//! anything that implements [`IntoResultEvents`], which is normalized into an
//! ordered, possibly empty sequence of follow-up events.
//!
//! ## Stage 3: Routing ([`Router`])
//!
//! A pure lookup from [`EventKind`] to a route entry. Both directions of the
//! routing table (inbound acceptors, outbound emitters) are routers.
//!
//! ## Stage 4: Emission ([`Emitter`])
//!
//! Publishes a result event on its [`BusScope`], usually by handing it to a
//! [`Transport`].
//!
//! # Error Types
//!
//! - [`LicdataError`] - Top-level error type
//! - [`TranslationError`] - Missing derivation inputs
//! - [`DispatchError`] - Pipeline failures
//! - [`PublishError`] - Outbound delivery failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod acceptor;
mod emitter;
mod error;
mod event;
mod handler;
mod kind;
mod options;
mod response;
mod router;
mod transport;

// Re-exports
pub use acceptor::Acceptor;
pub use emitter::{DynEmitter, Emitter};
pub use error::{
    BoxError, ConfigError, DispatchError, LicdataError, PublishError, RoutingError,
    TranslationError,
};
pub use event::{
    CredentialProvided, CredentialRequested, DockerImageAvailable, DockerImagePushRequested,
    DockerImagePushed, DockerImageRequested, DomainEvent, InboundSignal,
};
pub use handler::{DomainHandler, DynDomainHandler};
pub use kind::{BusScope, EventKind, ParseKindError};
pub use options::{Metadata, OptionKey, ParsePairError, RequestOptions, sanitize};
pub use response::IntoResultEvents;
pub use router::{RouteResult, Router};
pub use transport::{DynTransport, SignalStream, Transport};
