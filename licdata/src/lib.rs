//! # licdata - artifact event translation and routing
//!
//! Turns build and push requests for licdata container images into domain
//! events, hands them to the artifact domain handler, and publishes whatever
//! the handler returns.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use licdata::prelude::*;
//! use std::sync::Arc;
//!
//! let bus = MemoryBus::new();
//! let config = RouterConfig::default();
//! let emitter = Arc::new(TransportEmitter::new(Arc::new(bus.clone())));
//!
//! let router = EventRouter::from_config(&config, emitter, Arc::new(LicdataArtifact::new()).adapter()?)?;
//! Service::new(router, &config)?.run(&bus, tokio::signal::ctrl_c().map(drop)).await;
//! ```
//!
//! ## Crates
//!
//! - `licdata-core`: vocabulary, traits and errors
//! - `licdata-std`: translation, routing table, adapter, emitters, in-memory bus
//! - `licdata` (this crate): router, service loop, configuration, telemetry

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod artifact;
pub mod config;
pub mod console;
pub mod orchestrator;
pub mod service;
pub mod telemetry;

pub use licdata_core::{
    Acceptor, BoxError, BusScope, ConfigError, CredentialProvided, CredentialRequested,
    DispatchError, DockerImageAvailable, DockerImagePushRequested, DockerImagePushed,
    DockerImageRequested, DomainEvent, DomainHandler, DynDomainHandler, DynEmitter,
    DynTransport, Emitter, EventKind, InboundSignal, IntoResultEvents, LicdataError, Metadata,
    OptionKey, ParsePairError, PublishError, RequestOptions, RouteResult, Router, RoutingError, Transport,
    TranslationError, sanitize,
};
pub use licdata_std::{
    DomainAdapter, HandlerRegistryBuilder, InboundRoute, MemoryBus, MissingOptionPolicy,
    OutboundRoute, RoutingTable, RoutingTableBuilder,
};

pub use artifact::LicdataArtifact;
pub use config::RouterConfig;
pub use console::ConsoleTransport;
pub use orchestrator::{DispatchReport, EventRouter, PublishFailure};
pub use service::{Service, ServiceStats};

/// Standard acceptors.
pub mod acceptors {
    pub use licdata_std::acceptors::{
        CredentialProvidedAcceptor, ImagePushRequestedAcceptor, ImageRequestedAcceptor,
    };
}

/// Standard emitters.
pub mod emitters {
    pub use licdata_std::emitters::{LoggingEmitter, TransportEmitter};
}

/// Translation functions and constants.
pub mod translate {
    pub use licdata_std::translate::{
        IMAGE_METADATA_EXCLUSIONS, image_name, image_url, translate_image_push_requested,
        translate_image_requested,
    };
}

/// Testing utilities.
pub mod testing {
    pub use licdata_std::testing::{RecordingEmitter, RecordingTransport, ScriptedHandler};
}

/// Prelude module - common imports for licdata.
///
/// # Usage
///
/// ```rust,ignore
/// use licdata::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BusScope, DomainEvent, DomainHandler, EventKind, EventRouter, InboundSignal,
        LicdataArtifact, LicdataError, MemoryBus, MissingOptionPolicy, RequestOptions,
        RouterConfig, RoutingTable, Service, Transport, emitters::TransportEmitter,
    };
}
