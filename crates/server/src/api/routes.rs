use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, lines, middleware::metrics_middleware, scheduler, status};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Line catalog
        .route("/lines", get(lines::list_lines))
        // Status, history, forecast
        .route("/status", get(status::get_status))
        .route("/history", get(status::get_history))
        .route("/forecast", get(status::get_forecast))
        // Ingest scheduler
        .route("/scheduler", get(scheduler::get_status))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        // Liveness probe path kept at the root for container health checks
        .route("/healthz", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(metrics_middleware)),
        )
}
