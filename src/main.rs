//! Minter Gate
//!
//! Sits between a Minter node and downstream clients.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────────┐
//!                    │                     MINTER GATE                    │
//!                    │                                                    │
//!   ┌──────────┐     │  ┌─────────────┐  publish   ┌──────────────┐      │
//!   │          │◀────┼──│  ingest     │──────────▶ │     bus      │      │
//!   │   node   │     │  │ (cursor)    │   NewTx    │ (broadcast)  │      │
//!   │ REST API │     │  └─────────────┘            └──────┬───────┘      │
//!   │          │     │                                     │ subscribe    │
//!   │          │◀────┼──┌─────────────┐           ┌───────▼───────┐      │
//!   └──────────┘     │  │ gate facade │◀──────────│  http / ws    │◀─────┼── clients
//!                    │  └─────────────┘           └───────────────┘      │
//!                    └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use minter_gate::bus::InMemoryEventBus;
use minter_gate::config::load_config;
use minter_gate::ingest::BlockIngestor;
use minter_gate::node::{HttpNodeClient, SharedNodeClient};
use minter_gate::observability::{logging, metrics};
use minter_gate::{Gate, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "minter-gate", version, about = "Gateway between a Minter node and its clients", disable_version_flag = true)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print version and exit.
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    if dotenv.is_err() {
        tracing::info!(".env file not found");
    }

    tracing::info!(app = "Minter Gate", version = env!("CARGO_PKG_VERSION"), "Starting");
    tracing::info!(
        node_api = %config.node.api_url,
        bind_address = %config.listener.bind_address,
        ingestion = config.ingestion.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let node: SharedNodeClient = Arc::new(HttpNodeClient::new(&config.node)?);

    let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus.capacity));
    bus.start();

    let shutdown = Arc::new(Shutdown::new());

    // Without a starting height there is nothing to follow: fail startup.
    let ingestion = if config.ingestion.enabled {
        let ingestor = BlockIngestor::start(node.clone(), bus.clone(), config.ingestion.clone()).await?;
        Some(tokio::spawn(ingestor.run(shutdown.subscribe())))
    } else {
        tracing::info!("Block ingestion disabled");
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(
        config.listener.clone(),
        config.ingestion.topic.clone(),
        Gate::new(node),
        bus.clone(),
    );

    let signal = shutdown.clone();
    tokio::spawn(async move { signal.on_ctrl_c().await });

    server.run(listener, shutdown.subscribe()).await?;

    if let Some(handle) = ingestion {
        let _ = handle.await;
    }
    bus.stop();

    tracing::info!("Shutdown complete");
    Ok(())
}
