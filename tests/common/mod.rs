//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use langneg::config::loader::parse_config;
use langneg::{Configuration, HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Compile a TOML configuration, panicking on errors.
pub fn configuration(toml: &str) -> Configuration {
    let server = parse_config(toml).expect("config parses");
    Configuration::compile(server).expect("config compiles")
}

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct RunningServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<Configuration>,
    pub shutdown: Shutdown,
}

/// Start a server for `toml` and wait until it accepts connections.
#[allow(dead_code)]
pub async fn start_server(toml: &str) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(configuration(toml));
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningServer {
        addr,
        updates,
        shutdown,
    }
}

/// HTTP client that never pools or proxies.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
