//! The event router.
//!
//! One call to [`EventRouter::dispatch`] runs one inbound signal through the
//! whole pipeline:
//!
//! 1. inbound lookup (a miss is a no-op)
//! 2. acceptance, which sanitizes and translates the request options
//! 3. domain invocation
//! 4. outbound lookup and publication of every result, in order

use super::report::DispatchReport;
use crate::config::RouterConfig;
use licdata_core::{DispatchError, DynEmitter, InboundSignal, LicdataError, RouteResult};
use licdata_std::{DomainAdapter, RoutingTable};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

/// Routes inbound signals to the domain handler and its results back out.
///
/// Cheap to clone; clones share the same frozen table and adapter.
#[derive(Debug, Clone)]
pub struct EventRouter {
    table: Arc<RoutingTable>,
    adapter: Arc<DomainAdapter>,
}

impl EventRouter {
    /// Create a router over a routing table and a domain adapter.
    pub fn new(table: RoutingTable, adapter: DomainAdapter) -> Self {
        Self {
            table: Arc::new(table),
            adapter: Arc::new(adapter),
        }
    }

    /// Create a router over the standard table configured by `config`.
    ///
    /// Every result kind is published through `emitter`.
    pub fn from_config(
        config: &RouterConfig,
        emitter: Arc<dyn DynEmitter>,
        adapter: DomainAdapter,
    ) -> Result<Self, LicdataError> {
        let config = config.validate()?;
        let table = RoutingTable::standard(config.missing_options, emitter, config.bus_scope)?;
        Ok(Self::new(table, adapter))
    }

    /// The routing table.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// The domain adapter.
    pub fn adapter(&self) -> &DomainAdapter {
        &self.adapter
    }

    /// Run one inbound signal to completion.
    ///
    /// Translation and domain handler failures abort this pipeline only.
    /// Publish failures do not: they are logged, recorded in the report, and
    /// the remaining results are still published.
    pub async fn dispatch(&self, signal: InboundSignal) -> Result<DispatchReport, DispatchError> {
        let span = info_span!("pipeline", kind = %signal.kind());
        self.pipeline(signal).instrument(span).await
    }

    /// Run a locally built request, as the CLI does.
    ///
    /// Same pipeline as [`dispatch`](Self::dispatch); errors are widened to
    /// [`LicdataError`].
    pub async fn submit(&self, signal: InboundSignal) -> Result<DispatchReport, LicdataError> {
        debug!(kind = %signal.kind(), "submitting local request");
        Ok(self.dispatch(signal).await?)
    }

    async fn pipeline(&self, signal: InboundSignal) -> Result<DispatchReport, DispatchError> {
        let kind = signal.kind();

        let RouteResult::Matched(route) = self.table.inbound(kind) else {
            debug!("no inbound route, ignoring");
            return Ok(DispatchReport::ignored());
        };

        let Some(event) = route.acceptor.accept(&signal)? else {
            debug!("acceptor declined signal");
            return Ok(DispatchReport::ignored());
        };

        let results = self.adapter.invoke(event).await?;
        debug!(results = results.len(), "domain handler returned");

        let mut report = DispatchReport::accepted();
        for result in results {
            let result_kind = result.kind();
            match self.table.outbound(result_kind) {
                RouteResult::Matched(out) => {
                    match out.emitter.emit_dyn(&result, out.scope).await {
                        Ok(()) => {
                            info!(kind = %result_kind, scope = %out.scope, "published");
                            report.record_published(result_kind);
                        }
                        Err(err) => {
                            warn!(kind = %result_kind, scope = %out.scope, error = %err, "publish failed");
                            report.record_failure(result_kind, err);
                        }
                    }
                }
                RouteResult::NotFound => {
                    debug!(kind = %result_kind, "no outbound route, dropping result");
                    report.record_unrouted(result_kind);
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licdata_core::{
        BusScope, DockerImageAvailable, DockerImageRequested, DomainEvent, EventKind, Metadata,
        RequestOptions, TranslationError,
    };
    use licdata_std::{
        HandlerRegistryBuilder, MissingOptionPolicy,
        emitters::TransportEmitter,
        testing::{RecordingTransport, ScriptedHandler},
    };

    fn available(version: &str) -> DomainEvent {
        DockerImageAvailable {
            image_name: "licdata-slim-python3.12".into(),
            image_version: Some(version.into()),
            metadata: Metadata::empty(),
        }
        .into()
    }

    fn router(transport: &RecordingTransport, handler: &ScriptedHandler) -> EventRouter {
        let table = RoutingTable::standard(
            MissingOptionPolicy::Reject,
            Arc::new(TransportEmitter::new(Arc::new(transport.clone()))),
            BusScope::System,
        )
        .unwrap();
        let adapter = HandlerRegistryBuilder::new()
            .register(EventKind::DockerImageRequested, handler.clone())
            .unwrap()
            .build();
        EventRouter::new(table, adapter)
    }

    fn build_request() -> InboundSignal {
        InboundSignal::DockerImageRequested(
            RequestOptions::new()
                .with("variant", "slim")
                .with("python_version", "3.12")
                .with("image_version", "1.0"),
        )
    }

    #[tokio::test]
    async fn test_handler_receives_translated_event() {
        let transport = RecordingTransport::new();
        let handler = ScriptedHandler::returning(vec![]);
        let router = router(&transport, &handler);

        router.dispatch(build_request()).await.unwrap();

        match handler.inputs().as_slice() {
            [DomainEvent::DockerImageRequested(DockerImageRequested { image_name, image_version, metadata })] => {
                assert_eq!(image_name, "licdata-slim-python3.12");
                assert_eq!(image_version.as_deref(), Some("1.0"));
                assert!(!metadata.contains_key("image_version"));
            }
            other => panic!("unexpected inputs: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_results_published_in_order() {
        let transport = RecordingTransport::new();
        let handler = ScriptedHandler::returning(vec![available("1"), available("2")]);
        let router = router(&transport, &handler);

        let report = router.dispatch(build_request()).await.unwrap();

        assert!(report.is_clean());
        assert_eq!(
            transport.published(),
            vec![
                (available("1"), BusScope::System),
                (available("2"), BusScope::System)
            ]
        );
    }

    #[tokio::test]
    async fn test_translation_failure_skips_handler() {
        let transport = RecordingTransport::new();
        let handler = ScriptedHandler::returning(vec![available("1")]);
        let router = router(&transport, &handler);

        let err = router
            .dispatch(InboundSignal::DockerImageRequested(
                RequestOptions::new().with("variant", "slim"),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Translation(TranslationError::MissingOption {
                key: "python_version",
                ..
            })
        ));
        assert_eq!(handler.call_count(), 0);
        assert_eq!(transport.attempts(), 0);
    }

    #[tokio::test]
    async fn test_submit_widens_errors() {
        let transport = RecordingTransport::new();
        let handler = ScriptedHandler::returning(vec![]);
        handler.set_error("build failed");
        let router = router(&transport, &handler);

        let err = router.submit(build_request()).await.unwrap_err();
        assert!(matches!(
            err,
            LicdataError::Dispatch(DispatchError::Domain { .. })
        ));
    }

    #[test]
    fn test_from_config_builds_standard_table() {
        let transport = RecordingTransport::new();
        let config = RouterConfig::default().with_bus_scope(BusScope::Session);
        let router = EventRouter::from_config(
            &config,
            Arc::new(TransportEmitter::new(Arc::new(transport))),
            HandlerRegistryBuilder::new().build(),
        )
        .unwrap();

        assert_eq!(router.table().inbound_routes().count(), 3);
        assert!(router
            .table()
            .outbound_routes()
            .all(|(_, route)| route.scope == BusScope::Session));
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let err = EventRouter::from_config(
            &RouterConfig::default().with_max_in_flight(0),
            Arc::new(TransportEmitter::new(Arc::new(RecordingTransport::new()))),
            HandlerRegistryBuilder::new().build(),
        )
        .unwrap_err();

        assert!(matches!(err, LicdataError::Config(_)));
    }
}
