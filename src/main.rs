//! langneg: Accept-Language negotiation server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ routing ──▶ scope (merged directives)
//!                                                   │
//!                                                   ▼
//!     Client Response                      response assembly
//!     ◀────────────── add_header / return ◀── templates read $variables
//!                                                   │ (lazy, per request)
//!                                                   ▼
//!                                           negotiation engine
//!                                     (Accept-Language × scope tags)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use langneg::config::loader::read_config;
use langneg::config::watcher::ConfigWatcher;
use langneg::config::Configuration;
use langneg::lifecycle::{signals, Shutdown};
use langneg::observability::{logging, metrics};
use langneg::HttpServer;

#[derive(Parser)]
#[command(name = "langneg")]
#[command(version, about = "Serve content-language negotiation from a scoped configuration", long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "langneg.toml")]
    config: PathBuf,

    /// Load and validate the configuration, then exit.
    #[arg(short = 't', long)]
    test: bool,

    /// Reload the configuration when the file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let server_config = read_config(&cli.config)?;
    logging::init_logging(&server_config.observability)?;

    tracing::info!("langneg v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match Configuration::compile(server_config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = ?cli.config, error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    if cli.test {
        println!("configuration file {} test is successful", cli.config.display());
        return Ok(());
    }

    let settings = config.server().clone();
    tracing::info!(
        bind_address = %settings.listener.bind_address,
        max_connections = settings.listener.max_connections,
        request_timeout_secs = settings.timeouts.request_secs,
        variables = config.variables().len(),
        "Configuration loaded"
    );

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&settings.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Without --watch the sender is dropped and no update ever arrives.
    let (_watcher, config_updates) = if cli.watch {
        let (watcher, updates) = ConfigWatcher::new(&cli.config);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config)
        .run(listener, config_updates, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
