//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the scope handler
//! - Wire up middleware (request ID, tracing, timeout, concurrency limit)
//! - Resolve each request's scope and build its response
//! - Swap in reloaded configurations without dropping requests

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Configuration, ServerConfig};
use crate::http::request::{request_id, MakeRequestUuid};
use crate::http::response;
use crate::observability::metrics;
use crate::variables::{RequestVariables, RequestView};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<Configuration>>,
}

/// HTTP server answering from the configured scopes.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Configuration) -> Self {
        let router_config = config.server().clone();
        let state = AppState {
            config: Arc::new(ArcSwap::from_pointee(config)),
        };

        let router = Self::build_router(&router_config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(scope_handler)
            .with_state(state)
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, e.g. for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the current one;
    /// requests already in flight finish with the configuration they started
    /// with. Listener, timeout and limit settings are fixed at startup.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<Configuration>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let swap = self.state.config.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let current = swap.load();
                let (old, new) = (current.server(), config.server());
                if old.listener != new.listener
                    || old.timeouts != new.timeouts
                    || old.observability != new.observability
                {
                    tracing::warn!("Listener, timeout and observability changes need a restart");
                }
                drop(current);
                swap.store(Arc::new(config));
                tracing::info!("Configuration reloaded");
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request's scope and answer from its directives.
async fn scope_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let config = state.config.load_full();
    let scope = config.router().resolve(&request);

    let mut vars = RequestVariables::new(
        config.variables(),
        RequestView {
            headers: request.headers(),
            scope,
        },
    );
    let response = response::respond(scope, &mut vars);

    tracing::debug!(
        request_id = %request_id(request.headers()),
        method = %request.method(),
        path = %request.uri().path(),
        scope = scope.name(),
        status = response.status().as_u16(),
        "Request served"
    );
    metrics::record_request(response.status().as_u16());

    response
}
