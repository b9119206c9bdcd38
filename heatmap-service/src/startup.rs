//! Application startup and lifecycle management.

use crate::config::HeatmapConfig;
use crate::handlers;
use crate::services::{HazardRepository, StaticHazardRepository};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors_layer, make_request_span, metrics_middleware, request_id_middleware,
    security_headers_middleware,
};
use service_core::observability::metrics_handler;
use service_core::shutdown::shutdown_signal;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: HeatmapConfig,
    pub repository: Arc<dyn HazardRepository>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(metrics_handler))
        .route("/heatmap-data", post(handlers::query_hazards))
        .route("/heatmap-data/options", get(handlers::filter_options))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    /// Build the application over the embedded seed catalog.
    pub async fn build(config: HeatmapConfig) -> Result<Self, AppError> {
        let repository = StaticHazardRepository::seeded()?;
        Self::build_with_repository(config, Arc::new(repository)).await
    }

    pub async fn build_with_repository(
        config: HeatmapConfig,
        repository: Arc<dyn HazardRepository>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            repository,
        };

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Heatmap service listening on port {}", port);

        let server = axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::pin(server),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
