//! Licdata Artifact - build and push licdata container images
//!
//! The `licdata-artifact` command turns image requests into domain events
//! and prints every resulting event as a JSON line on stdout.
//!
//! ## Commands
//!
//! - `build`: request a Docker image build
//! - `push`: request a Docker image push
//! - `listen`: serve JSON-line signals read from stdin until Ctrl-C

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use licdata::{
    BusScope, ConsoleTransport, CredentialProvided, DispatchReport, DynTransport, EventRouter,
    InboundSignal, LicdataArtifact, MemoryBus, Metadata, MissingOptionPolicy, OptionKey,
    RequestOptions, RouterConfig, Service, config::DEFAULT_MAX_IN_FLIGHT,
    emitters::TransportEmitter, telemetry::init_tracing,
};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{Level, debug, error, info, warn};

#[derive(Parser)]
#[command(name = "licdata-artifact")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and push licdata container images", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Bus scope every route subscribes and publishes on
    #[arg(long, global = true, env = "LICDATA_BUS_SCOPE", default_value = "system")]
    bus_scope: BusScope,

    /// Fill missing derivation options with empty strings instead of failing
    #[arg(long, global = true, env = "LICDATA_LENIENT_OPTIONS")]
    lenient_options: bool,

    /// Maximum number of requests processed at once
    #[arg(long, global = true, env = "LICDATA_MAX_IN_FLIGHT", default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a Docker image build
    Build {
        #[command(flatten)]
        image: ImageArgs,

        /// Version tag of the image
        #[arg(long)]
        image_version: Option<String>,
    },

    /// Request a Docker image push
    Push {
        #[command(flatten)]
        image: ImageArgs,

        /// Version tag to push
        #[arg(long)]
        image_version: String,

        /// Registry to push to
        #[arg(long = "registry")]
        docker_registry_url: String,

        /// Registry credential; without it the push stops at the credential request
        #[arg(long, env = "LICDATA_REGISTRY_CREDENTIAL", hide_env_values = true)]
        credential: Option<String>,
    },

    /// Serve JSON-line signals from stdin until Ctrl-C or end of input
    Listen,
}

#[derive(Args)]
struct ImageArgs {
    /// Image variant, e.g. `slim`
    #[arg(long)]
    variant: String,

    /// Python version, e.g. `3.12`
    #[arg(long)]
    python_version: String,

    /// Azure base image version
    #[arg(long)]
    azure_base_version: Option<String>,

    /// Extra request option (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = RequestOptions::parse_pair)]
    options: Vec<(String, String)>,
}

impl ImageArgs {
    fn into_options(self) -> RequestOptions {
        let mut options: RequestOptions = self.options.into_iter().collect();
        options.insert(OptionKey::Variant.as_str(), self.variant);
        options.insert(OptionKey::PythonVersion.as_str(), self.python_version);
        if let Some(version) = self.azure_base_version {
            options.insert(OptionKey::AzureBaseVersion.as_str(), version);
        }
        options
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let policy = if cli.lenient_options {
        MissingOptionPolicy::Coerce
    } else {
        MissingOptionPolicy::Reject
    };
    let config = RouterConfig::default()
        .with_bus_scope(cli.bus_scope)
        .with_missing_options(policy)
        .with_max_in_flight(cli.max_in_flight)
        .validate()
        .context("Invalid router configuration")?;

    let console: Arc<dyn DynTransport> = Arc::new(ConsoleTransport::stdout());
    let router = build_router(&config, console)?;

    match cli.command {
        Commands::Build {
            image,
            image_version,
        } => cmd_build(&router, image, image_version).await,
        Commands::Push {
            image,
            image_version,
            docker_registry_url,
            credential,
        } => cmd_push(&router, image, image_version, docker_registry_url, credential).await,
        Commands::Listen => cmd_listen(router, &config).await,
    }
}

fn build_router(config: &RouterConfig, publisher: Arc<dyn DynTransport>) -> Result<EventRouter> {
    let adapter = Arc::new(LicdataArtifact::new())
        .adapter()
        .context("Failed to register the artifact handler")?;
    EventRouter::from_config(config, Arc::new(TransportEmitter::new(publisher)), adapter)
        .context("Failed to build the router")
}

async fn cmd_build(
    router: &EventRouter,
    image: ImageArgs,
    image_version: Option<String>,
) -> Result<()> {
    let mut options = image.into_options();
    if let Some(version) = image_version {
        options.insert(OptionKey::ImageVersion.as_str(), version);
    }

    let report = router
        .submit(InboundSignal::DockerImageRequested(options))
        .await
        .context("Build request failed")?;
    check_report("build", &report)
}

async fn cmd_push(
    router: &EventRouter,
    image: ImageArgs,
    image_version: String,
    docker_registry_url: String,
    credential: Option<String>,
) -> Result<()> {
    let mut options = image.into_options();
    options.insert(OptionKey::ImageVersion.as_str(), image_version);
    options.insert(
        OptionKey::DockerRegistryUrl.as_str(),
        docker_registry_url.clone(),
    );

    let report = router
        .submit(InboundSignal::DockerImagePushRequested(options))
        .await
        .context("Push request failed")?;
    check_report("push", &report)?;

    let Some(value) = credential else {
        info!("no credential given, push is waiting for one");
        return Ok(());
    };

    let report = router
        .submit(InboundSignal::CredentialProvided(CredentialProvided {
            name: docker_registry_url,
            value,
            metadata: Metadata::empty(),
        }))
        .await
        .context("Credential could not be delivered")?;
    check_report("credential", &report)
}

fn check_report(request: &str, report: &DispatchReport) -> Result<()> {
    if report.is_ignored() {
        bail!("{request} request was not routed");
    }
    if !report.failures().is_empty() {
        bail!(
            "{request} request: {} of {} result event(s) could not be published",
            report.failures().len(),
            report.result_count()
        );
    }
    debug!(%request, published = ?report.published(), "request processed");
    Ok(())
}

async fn cmd_listen(router: EventRouter, config: &RouterConfig) -> Result<()> {
    let bus = MemoryBus::new();
    let service = Service::new(router, config)?;
    let signals = service.subscribe(&bus);

    let stdin = BufReader::new(tokio::io::stdin());
    let feeder = tokio::spawn(feed(stdin, bus.clone(), config.bus_scope));
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    info!(scope = %config.bus_scope, "listening");
    let stats = service.serve(signals, shutdown).await;
    feeder.abort();

    if stats.failed > 0 {
        warn!(failed = stats.failed, "some requests failed");
    }
    match feeder.await {
        Ok(read) => read.map(drop),
        Err(err) if err.is_cancelled() => Ok(()),
        Err(err) => Err(err).context("Input reader panicked"),
    }
}

/// Deliver every JSON-line signal read from `reader` onto `bus`.
///
/// The bus is closed when input ends, whether it ends cleanly or not.
async fn feed<R>(reader: R, bus: MemoryBus, scope: BusScope) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let read = deliver_lines(reader, &bus, scope).await;
    bus.close();
    read
}

async fn deliver_lines<R>(reader: R, bus: &MemoryBus, scope: BusScope) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut delivered = 0;
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InboundSignal>(&line) {
            Ok(signal) => {
                bus.deliver(signal, scope);
                delivered += 1;
            }
            Err(err) => warn!(error = %err, "skipping malformed signal"),
        }
    }
    debug!(delivered, "end of input");
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use licdata::{EventKind, Transport};

    #[tokio::test]
    async fn test_feed_skips_malformed_lines_and_closes_bus() {
        let bus = MemoryBus::new();
        let mut signals = bus.subscribe(EventKind::DockerImageRequested, BusScope::System);
        let input: &[u8] =
            b"{\"kind\":\"docker-image-requested\",\"payload\":{\"variant\":\"slim\"}}\nnot json\n\n";

        let delivered = feed(input, bus.clone(), BusScope::System).await.unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(
            signals.next().await.map(|signal| signal.kind()),
            Some(EventKind::DockerImageRequested)
        );
        assert!(signals.next().await.is_none());
    }

    #[tokio::test]
    async fn test_feed_read_error_closes_bus() {
        let bus = MemoryBus::new();
        let mut signals = bus.subscribe(EventKind::DockerImageRequested, BusScope::System);
        let input: &[u8] = b"\xff\xfe\n";

        let err = feed(input, bus.clone(), BusScope::System).await.unwrap_err();

        assert!(format!("{err:#}").starts_with("Failed to read input"));
        assert!(bus.is_closed());
        assert!(signals.next().await.is_none());
    }
}
