//! The long-running event loop.
//!
//! [`Service::run`] subscribes every inbound route of the router's table on
//! the route's bus scope and merges the subscriptions into one stream. Each
//! delivery becomes an independent pipeline task; at most `max_in_flight`
//! pipelines run at once. Ordering is only guaranteed within one pipeline.

use crate::{config::RouterConfig, orchestrator::EventRouter};
use futures::{
    Stream, StreamExt,
    stream::{SelectAll, select_all},
};
use licdata_core::{ConfigError, DynTransport, InboundSignal, SignalStream};
use std::{future::Future, sync::Arc};
use tokio::{
    sync::Semaphore,
    task::{JoinError, JoinSet},
};
use tracing::{debug, error, info, warn};

/// How a single pipeline task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    Ignored,
    Failed,
}

/// Counters for one [`Service::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Signals taken off the transport.
    pub received: usize,
    /// Pipelines that reached the domain handler and finished.
    pub completed: usize,
    /// Signals with no inbound route, or declined by their acceptor.
    pub ignored: usize,
    /// Pipelines that failed or panicked.
    pub failed: usize,
    /// Pipelines cancelled by shutdown.
    pub aborted: usize,
}

impl ServiceStats {
    fn record(&mut self, joined: Result<Outcome, JoinError>) {
        match joined {
            Ok(Outcome::Completed) => self.completed += 1,
            Ok(Outcome::Ignored) => self.ignored += 1,
            Ok(Outcome::Failed) => self.failed += 1,
            Err(err) if err.is_panic() => {
                error!(error = %err, "pipeline panicked");
                self.failed += 1;
            }
            Err(_) => self.aborted += 1,
        }
    }
}

/// Hosts an [`EventRouter`] on a transport.
#[derive(Debug, Clone)]
pub struct Service {
    router: EventRouter,
    max_in_flight: usize,
}

impl Service {
    /// Create a service running `router` with the limits in `config`.
    pub fn new(router: EventRouter, config: &RouterConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self {
            router,
            max_in_flight: config.max_in_flight,
        })
    }

    /// The hosted router.
    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Subscribe every inbound route of the routing table on its scope.
    ///
    /// The returned stream ends once every subscription has ended.
    pub fn subscribe(&self, transport: &dyn DynTransport) -> SelectAll<SignalStream> {
        select_all(self.router.table().inbound_routes().map(|(kind, route)| {
            info!(%kind, scope = %route.scope, "subscribing");
            transport.subscribe_dyn(kind, route.scope)
        }))
    }

    /// Subscribe on `transport` and [`serve`](Self::serve) the deliveries.
    pub async fn run<F>(&self, transport: &dyn DynTransport, shutdown: F) -> ServiceStats
    where
        F: Future<Output = ()>,
    {
        self.serve(self.subscribe(transport), shutdown).await
    }

    /// Serve `signals` until `shutdown` resolves or the stream ends.
    ///
    /// When the stream ends, in-flight pipelines are awaited. When
    /// `shutdown` resolves first, nothing new is accepted and in-flight
    /// pipelines are aborted; their remaining publishes are dropped.
    pub async fn serve<S, F>(&self, mut signals: S, shutdown: F) -> ServiceStats
    where
        S: Stream<Item = InboundSignal> + Unpin,
        F: Future<Output = ()>,
    {
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks: JoinSet<Outcome> = JoinSet::new();
        let mut stats = ServiceStats::default();
        tokio::pin!(shutdown);

        let interrupted = loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break true,
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => stats.record(joined),
                next = signals.next() => {
                    let Some(signal) = next else {
                        debug!("signal stream ended");
                        break false;
                    };
                    stats.received += 1;

                    let permit = tokio::select! {
                        biased;
                        () = &mut shutdown => {
                            warn!(kind = %signal.kind(), "shutdown while waiting for capacity, dropping signal");
                            stats.aborted += 1;
                            break true;
                        }
                        permit = permits.clone().acquire_owned() => permit,
                    };
                    let Ok(permit) = permit else {
                        break false;
                    };

                    let router = self.router.clone();
                    tasks.spawn(async move {
                        let _permit = permit;
                        let kind = signal.kind();
                        match router.dispatch(signal).await {
                            Ok(report) if report.is_ignored() => Outcome::Ignored,
                            Ok(_) => Outcome::Completed,
                            Err(err) => {
                                error!(%kind, error = %err, "pipeline failed");
                                Outcome::Failed
                            }
                        }
                    });
                }
            }
        };

        if interrupted {
            info!(in_flight = tasks.len(), "shutdown requested, aborting in-flight pipelines");
            abort_in_flight(&mut tasks, &mut stats).await;
        } else {
            loop {
                tokio::select! {
                    biased;
                    () = &mut shutdown => {
                        abort_in_flight(&mut tasks, &mut stats).await;
                        break;
                    }
                    joined = tasks.join_next() => match joined {
                        Some(joined) => stats.record(joined),
                        None => break,
                    },
                }
            }
        }

        info!(?stats, "service stopped");
        stats
    }
}

async fn abort_in_flight(tasks: &mut JoinSet<Outcome>, stats: &mut ServiceStats) {
    while let Some(joined) = tasks.try_join_next() {
        stats.record(joined);
    }
    stats.aborted += tasks.len();
    tasks.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use licdata_core::{BusScope, EventKind, RequestOptions};
    use licdata_std::{
        HandlerRegistryBuilder, MissingOptionPolicy, RoutingTable, emitters::LoggingEmitter,
        testing::{RecordingTransport, ScriptedHandler},
    };

    fn service(handler: &ScriptedHandler) -> Service {
        let table = RoutingTable::standard(
            MissingOptionPolicy::Reject,
            Arc::new(LoggingEmitter::new()),
            BusScope::System,
        )
        .unwrap();
        let adapter = HandlerRegistryBuilder::new()
            .register(EventKind::DockerImageRequested, handler.clone())
            .unwrap()
            .build();
        Service::new(EventRouter::new(table, adapter), &RouterConfig::default()).unwrap()
    }

    #[test]
    fn test_zero_in_flight_is_rejected() {
        let handler = ScriptedHandler::returning(vec![]);
        let router = service(&handler).router().clone();

        let err = Service::new(router, &RouterConfig::default().with_max_in_flight(0)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "max_in_flight", .. }));
    }

    #[tokio::test]
    async fn test_returns_when_subscriptions_end() {
        let handler = ScriptedHandler::returning(vec![]);
        let transport = RecordingTransport::new();
        transport.close();

        let stats = service(&handler)
            .run(&transport, std::future::pending())
            .await;
        assert_eq!(stats, ServiceStats::default());
    }

    #[tokio::test]
    async fn test_shutdown_stops_idle_loop() {
        let handler = ScriptedHandler::returning(vec![]);
        let transport = RecordingTransport::new();

        let stats = service(&handler).run(&transport, async {}).await;
        assert_eq!(stats.received, 0);
    }

    #[tokio::test]
    async fn test_failed_pipeline_is_counted() {
        let handler = ScriptedHandler::returning(vec![]);
        let transport = RecordingTransport::new();
        let service = service(&handler);

        let run = service.run(&transport, std::future::pending());
        let feed = async {
            tokio::task::yield_now().await;
            transport.deliver(
                InboundSignal::DockerImageRequested(RequestOptions::new()),
                BusScope::System,
            );
            transport.close();
        };
        let (stats, ()) = tokio::join!(run, feed);

        assert_eq!(stats.received, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(handler.call_count(), 0);
    }
}
