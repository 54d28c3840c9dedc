//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener and stop on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::bus::InMemoryEventBus;
use crate::config::ListenerConfig;
use crate::gate::Gate;
use crate::http::{handlers, websocket};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: Gate,
    pub bus: Arc<InMemoryEventBus>,
    /// Topic the ingestion loop publishes new transactions on.
    pub topic: String,
    pub push_wait: Duration,
}

/// HTTP server for the gateway API.
pub struct HttpServer {
    router: Router,
    config: ListenerConfig,
}

impl HttpServer {
    pub fn new(config: ListenerConfig, topic: String, gate: Gate, bus: Arc<InMemoryEventBus>) -> Self {
        let state = AppState {
            gate,
            bus,
            topic,
            push_wait: Duration::from_secs(config.push_wait_timeout_secs),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/transaction/push", post(handlers::push_transaction))
            .route("/estimate/tx-commission", get(handlers::estimate_tx_commission))
            .route("/estimate/coin-buy", get(handlers::estimate_coin_buy))
            .route("/estimate/coin-sell", get(handlers::estimate_coin_sell))
            .route("/nonce/{address}", get(handlers::nonce))
            .route("/min-gas", get(handlers::min_gas_price))
            .route("/ws", get(websocket::subscribe));

        Router::new()
            .nest("/api/v1", api)
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, configured = %self.config.bind_address, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
