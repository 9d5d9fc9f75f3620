//! # Routing Table
//!
//! Static association of event kinds with bus scopes and pipeline stages, in
//! two independent directions:
//!
//! | Direction | Key | Value |
//! |-----------|-----|-------|
//! | Inbound | [`EventKind`] | [`InboundRoute`]: scope + acceptor |
//! | Outbound | [`EventKind`] | [`OutboundRoute`]: scope + emitter |
//!
//! The table is assembled once with a [`RoutingTableBuilder`] and is
//! immutable afterwards. Lookups are exact-kind matches; a miss is not an
//! error.
//!
//! [`EventKind`]: licdata_core::EventKind

mod kind_router;
mod table;

pub use kind_router::KindRouter;
pub use table::{InboundRoute, OutboundRoute, RoutingTable, RoutingTableBuilder};
