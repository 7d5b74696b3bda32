//! HTTP API server for Morse speech synthesis

pub mod health;
pub mod rate_limit;
pub mod speech;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Config, SynthesisConfig};
use crate::Result;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Per-request synthesis limits
    pub synthesis: SynthesisConfig,
    /// Per-client limiter for speech requests
    pub rate_limiter: Option<rate_limit::SharedLimiter>,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    host: String,
    port: u16,
    synthesis: SynthesisConfig,
    rate_limit_rpm: Option<u32>,
}

impl ApiServerBuilder {
    /// Create a new API server builder from loaded configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            synthesis: config.synthesis,
            rate_limit_rpm: config.server.rate_limit_rpm,
        }
    }

    /// Override the bind address
    #[must_use]
    pub fn host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Override the listening port
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the per-client speech rate limit, `None` disables limiting
    #[must_use]
    pub fn rate_limit_rpm(mut self, rpm: Option<u32>) -> Self {
        self.rate_limit_rpm = rpm;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let rate_limiter = self.rate_limit_rpm.map(rate_limit::create_limiter);

        ApiServer {
            state: Arc::new(ApiState {
                synthesis: self.synthesis,
                rate_limiter,
            }),
            host: self.host,
            port: self.port,
            rate_limit_rpm: self.rate_limit_rpm,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    host: String,
    port: u16,
    rate_limit_rpm: Option<u32>,
}

impl ApiServer {
    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let router = Router::new()
            .nest("/v1/audio", speech::router(self.state.clone()))
            .merge(health::router());

        // CORS layer for browser clients of the speech endpoint
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let pruner = self.state.rate_limiter.clone().map(|limiter| {
            tracing::info!(rpm = self.rate_limit_rpm, "per-client rate limiting active");
            rate_limit::spawn_pruner(limiter)
        });

        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server on {addr}: {e}")))?;

        tracing::info!(
            %addr,
            max_input_chars = self.state.synthesis.max_input_chars,
            max_samples = self.state.synthesis.max_samples,
            "API server listening"
        );

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        if let Some(pruner) = pruner {
            pruner.abort();
        }
        served.map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

/// Resolve on Ctrl-C, or never if the signal handler cannot be installed
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
