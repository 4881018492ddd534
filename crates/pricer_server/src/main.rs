//! Heston Pricer Server
//!
//! REST API server for the Heston Monte Carlo option pricer.

use clap::Parser;
use pricer_server::config::{build_config, CliArgs as ConfigCliArgs};
use pricer_server::server::Server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Heston Pricer Server - REST API for Monte Carlo option pricing
#[derive(Parser, Debug)]
#[command(name = "pricer_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "PRICER_SERVER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PRICER_SERVER_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PRICER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Wall-clock limit per pricing request, in seconds
    #[arg(long, env = "PRICER_COMPUTE_TIMEOUT_SECS")]
    compute_timeout_secs: Option<u64>,

    /// Maximum numSims accepted per request
    #[arg(long, env = "PRICER_MAX_SIMS")]
    max_sims: Option<usize>,

    /// Seed used when a request carries none
    #[arg(long, env = "PRICER_DEFAULT_SEED")]
    default_seed: Option<u64>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            compute_timeout_secs: args.compute_timeout_secs,
            max_sims: args.max_sims,
            default_seed: args.default_seed,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args)?;

    init_tracing(config.log_level.as_filter_str());

    tracing::info!("Heston Pricer Server v{}", pricer_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        compute_timeout_secs = config.compute_timeout_secs,
        max_sims = config.max_sims,
        default_seed = ?config.default_seed,
        "Server configuration loaded"
    );

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}
