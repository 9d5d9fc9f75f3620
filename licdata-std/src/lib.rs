//! # licdata-std
//!
//! Standard implementations for the licdata artifact event router.
//!
//! This crate provides:
//! - **Translation**: [`translate`] builds image events from request options
//! - **Acceptors**: one per inbound event kind, see [`acceptors`]
//! - **Routing**: the [`RoutingTable`] and its builder
//! - **Domain invocation**: [`DomainAdapter`] and [`HandlerRegistryBuilder`]
//! - **Emitters**: transport-backed and logging-only, see [`emitters`]
//! - **Transport**: the in-process [`MemoryBus`]
//! - **Testing**: recording doubles in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use licdata_core;

// Modules
pub mod acceptors;
pub mod adapter;
pub mod bus;
pub mod emitters;
pub mod routing;
pub mod testing;
pub mod translate;

pub use adapter::{DomainAdapter, HandlerRegistryBuilder};
pub use bus::MemoryBus;
pub use routing::{InboundRoute, OutboundRoute, RoutingTable, RoutingTableBuilder};
pub use translate::MissingOptionPolicy;
