//! HTTP API server for the talk relay

mod error;
pub mod health;
pub mod talk;
pub mod transcript;

pub use error::ApiError;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Config, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, SynthesisFailurePolicy};
use crate::turn::TurnOrchestrator;
use crate::Result;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: TurnOrchestrator,
    pub on_synthesis_failure: SynthesisFailurePolicy,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    orchestrator: TurnOrchestrator,
    port: u16,
    max_upload_bytes: usize,
    on_synthesis_failure: SynthesisFailurePolicy,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(orchestrator: TurnOrchestrator) -> Self {
        Self {
            orchestrator,
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            on_synthesis_failure: SynthesisFailurePolicy::default(),
        }
    }

    /// Apply server and voice settings from loaded configuration
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.port = config.server.port;
        self.max_upload_bytes = config.server.max_upload_bytes;
        self.on_synthesis_failure = config.voice.on_failure;
        self
    }

    /// Set the port to listen on
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the maximum accepted request body
    #[must_use]
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Set the reply used when speech synthesis fails
    #[must_use]
    pub fn on_synthesis_failure(mut self, policy: SynthesisFailurePolicy) -> Self {
        self.on_synthesis_failure = policy;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let state = Arc::new(ApiState {
            orchestrator: self.orchestrator,
            on_synthesis_failure: self.on_synthesis_failure,
        });

        ApiServer {
            state,
            port: self.port,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    max_upload_bytes: usize,
}

impl ApiServer {
    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(health::router())
            .merge(talk::router(self.state.clone()))
            .merge(transcript::router(self.state.clone()))
            .layer(DefaultBodyLimit::max(self.max_upload_bytes))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(
            port = self.port,
            transcript = %self.state.orchestrator.store().path().display(),
            "API server listening"
        );

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
