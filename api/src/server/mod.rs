//! API Server Module
//!
//! Router construction and the listener loop.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use planforge_core::llm::adapters::Provider;
use planforge_core::AiService;

use crate::handlers::{
    chat, functional_blocks, health_check, project_suggestions, schedule, validate_assumptions,
    ApiState,
};
use crate::models::ApiConfig;

/// Build the application router
pub fn router<P: Provider + 'static>(state: Arc<ApiState<P>>) -> Router {
    Router::new()
        .route(
            "/api/ai/assumptions/validate",
            post(validate_assumptions::<P>),
        )
        .route("/api/ai/suggestions", post(project_suggestions::<P>))
        .route("/api/ai/functional-blocks", post(functional_blocks::<P>))
        .route("/api/ai/schedule", post(schedule::<P>))
        .route("/api/ai/chat", post(chat::<P>))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server
pub struct ApiServer<P> {
    /// Server configuration
    config: ApiConfig,
    /// Shared state
    state: Arc<ApiState<P>>,
}

impl<P: Provider + 'static> ApiServer<P> {
    /// Create a new API server
    pub fn new(config: ApiConfig, ai: AiService<P>) -> Self {
        Self {
            config,
            state: Arc::new(ApiState::new(ai)),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Serve until Ctrl-C
    pub async fn start(&self) -> Result<()> {
        self.start_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes; in-flight requests are drained
    pub async fn start_with_shutdown<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
        info!("Planforge API server listening on {}", listener.local_addr()?);

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start API server: {}", e))?;

        info!("Planforge API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
