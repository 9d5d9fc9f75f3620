//! The two-directional routing table.
//!
//! Inbound routes say which kinds are subscribed, on which scope, and which
//! acceptor builds the domain event. Outbound routes say where each result
//! kind is published. The two directions are independent.

use super::kind_router::KindRouter;
use crate::{
    acceptors::{CredentialProvidedAcceptor, ImagePushRequestedAcceptor, ImageRequestedAcceptor},
    translate::MissingOptionPolicy,
};
use licdata_core::{Acceptor, BusScope, DynEmitter, EventKind, RouteResult, Router, RoutingError};
use std::{fmt, sync::Arc};

/// Where an inbound kind is subscribed, and who accepts it.
#[derive(Clone)]
pub struct InboundRoute {
    /// Scope the subscription is made on.
    pub scope: BusScope,
    /// Builds the domain event.
    pub acceptor: Arc<dyn Acceptor>,
}

impl fmt::Debug for InboundRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundRoute")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Where an outbound kind is published, and by whom.
#[derive(Clone)]
pub struct OutboundRoute {
    /// Scope the event is published on.
    pub scope: BusScope,
    /// Publishes the event.
    pub emitter: Arc<dyn DynEmitter>,
}

impl fmt::Debug for OutboundRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundRoute")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// The frozen, two-directional routing table.
///
/// Created by [`RoutingTableBuilder::build`] and shared read-only by every
/// pipeline, typically behind an `Arc`.
#[derive(Default)]
pub struct RoutingTable {
    inbound: KindRouter<InboundRoute>,
    outbound: KindRouter<OutboundRoute>,
}

impl RoutingTable {
    /// Start building a table.
    pub fn builder() -> RoutingTableBuilder {
        RoutingTableBuilder::default()
    }

    /// The licdata artifact application's table.
    ///
    /// Inbound: image requested, image push requested, credential provided.
    /// Outbound: credential requested, image available, image pushed.
    /// Every route uses `scope`, and every outbound kind goes to `emitter`.
    pub fn standard(
        policy: MissingOptionPolicy,
        emitter: Arc<dyn DynEmitter>,
        scope: BusScope,
    ) -> Result<Self, RoutingError> {
        let builder = Self::builder()
            .inbound(
                EventKind::DockerImageRequested,
                scope,
                ImageRequestedAcceptor::new(policy),
            )?
            .inbound(
                EventKind::DockerImagePushRequested,
                scope,
                ImagePushRequestedAcceptor::new(policy),
            )?
            .inbound(EventKind::CredentialProvided, scope, CredentialProvidedAcceptor)?;

        [
            EventKind::CredentialRequested,
            EventKind::DockerImageAvailable,
            EventKind::DockerImagePushed,
        ]
        .into_iter()
        .try_fold(builder, |builder, kind| {
            builder.outbound(kind, scope, emitter.clone())
        })
        .map(RoutingTableBuilder::build)
    }

    /// Look up the inbound route for `kind`.
    pub fn inbound(&self, kind: EventKind) -> RouteResult<'_, InboundRoute> {
        self.inbound.route(&kind)
    }

    /// Look up the outbound route for `kind`.
    pub fn outbound(&self, kind: EventKind) -> RouteResult<'_, OutboundRoute> {
        self.outbound.route(&kind)
    }

    /// All inbound routes, ordered by kind.
    pub fn inbound_routes(&self) -> impl Iterator<Item = (EventKind, &InboundRoute)> {
        self.inbound.iter()
    }

    /// All outbound routes, ordered by kind.
    pub fn outbound_routes(&self) -> impl Iterator<Item = (EventKind, &OutboundRoute)> {
        self.outbound.iter()
    }
}

impl fmt::Debug for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingTable")
            .field("inbound", &self.inbound_routes().collect::<Vec<_>>())
            .field("outbound", &self.outbound_routes().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for a [`RoutingTable`].
///
/// # Example
/// ```ignore
/// let table = RoutingTable::builder()
///     .inbound(EventKind::DockerImageRequested, BusScope::System, ImageRequestedAcceptor::default())?
///     .outbound(EventKind::DockerImageAvailable, BusScope::System, emitter.clone())?
///     .build();
/// ```
#[derive(Default)]
pub struct RoutingTableBuilder {
    inbound: KindRouter<InboundRoute>,
    outbound: KindRouter<OutboundRoute>,
}

impl RoutingTableBuilder {
    /// Subscribe `kind` on `scope`, accepted by `acceptor`.
    pub fn inbound<A: Acceptor>(
        mut self,
        kind: EventKind,
        scope: BusScope,
        acceptor: A,
    ) -> Result<Self, RoutingError> {
        self.inbound.insert(
            kind,
            InboundRoute {
                scope,
                acceptor: Arc::new(acceptor),
            },
        )?;
        Ok(self)
    }

    /// Publish `kind` on `scope` through `emitter`.
    pub fn outbound(
        mut self,
        kind: EventKind,
        scope: BusScope,
        emitter: Arc<dyn DynEmitter>,
    ) -> Result<Self, RoutingError> {
        self.outbound.insert(kind, OutboundRoute { scope, emitter })?;
        Ok(self)
    }

    /// Freeze the table.
    pub fn build(self) -> RoutingTable {
        RoutingTable {
            inbound: self.inbound,
            outbound: self.outbound,
        }
    }
}
