//! Vouch Node — entry point.
//!
//! Starts the verification API with configuration from a TOML file or defaults.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use vouch_node::{start_api_server, NodeState, VouchConfig};

/// Vouch verification node
#[derive(Parser, Debug)]
#[command(name = "vouch-node", version, about = "Vouch trust-chain verification node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "vouch.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the registry file path.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Override the ledger gateway URL.
    #[arg(long)]
    gateway: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle --init flag
    if args.init {
        init_tracing(args.log_level.as_deref().unwrap_or("info"), "text");
        let config = VouchConfig::default();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration
    let mut config = VouchConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(ref registry) = args.registry {
        config.registry.path = registry.clone();
    }
    if let Some(gateway) = args.gateway {
        config.ledger.gateway_url = Some(gateway);
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.json_logs {
        config.logging.format = "json".into();
    }

    init_tracing(&config.logging.level, &config.logging.format);
    config.validate()?;

    tracing::info!("Vouch Node v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        roots = config.trust.root_dids.len(),
        max_depth = config.chain.max_depth,
        hop_timeout_ms = config.chain.hop_timeout_ms,
        chain_timeout_ms = config.chain.chain_timeout_ms,
        "trust policy"
    );

    let state = Arc::new(NodeState::from_config(&config)?);
    let listen_addr = config.api_socket_addr()?;

    tokio::select! {
        result = start_api_server(listen_addr, state) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "API server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
        }
    }

    tracing::info!("Vouch node exited cleanly");
    Ok(())
}
