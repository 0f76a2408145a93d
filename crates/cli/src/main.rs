use clap::{Parser, Subcommand};
use tandem_doh_domain::{CliOverrides, RelayTier};
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "tandem-doh")]
#[command(version)]
#[command(about = "Two-hop DNS-over-HTTPS forwarding relay")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// Listen port
    #[arg(short = 'p', long, global = true)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also log per-query diagnostics (domains, latencies). Off by default
    /// for privacy.
    #[arg(long, global = true)]
    log_queries: bool,

    #[command(subcommand)]
    tier: TierCommand,
}

#[derive(Subcommand)]
enum TierCommand {
    /// Serve the worker tier, forwarding to a pool of upstream DoH resolvers
    Worker {
        /// Upstream DoH resolver URL (repeatable; overrides config/env)
        #[arg(long = "upstream", value_name = "URL")]
        upstreams: Vec<String>,
    },
    /// Serve the edge tier, forwarding to a single worker relay
    Edge {
        /// Base URL of the worker relay
        #[arg(long, value_name = "URL")]
        worker_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (tier, upstreams, worker_url) = match cli.tier {
        TierCommand::Worker { upstreams } => (RelayTier::Worker, upstreams, None),
        TierCommand::Edge { worker_url } => (RelayTier::Edge, Vec::new(), worker_url),
    };

    let overrides = CliOverrides {
        bind_address: cli.bind,
        port: cli.port,
        upstreams,
        worker_url,
        log_level: cli.log_level,
        log_queries: cli.log_queries,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), overrides, tier)?;
    bootstrap::init_logging(&config);

    info!(
        tier = %tier,
        version = env!("CARGO_PKG_VERSION"),
        "Starting tandem-doh relay"
    );

    let app = match tier {
        RelayTier::Worker => tandem_doh_api::worker_routes(di::worker_state(&config)),
        RelayTier::Edge => tandem_doh_api::edge_routes(di::edge_state(&config)?),
    };

    server::serve(&config, tier, app).await
}
