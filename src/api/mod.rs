//! API module for the shipment delay dashboard
//!
//! REST interface over the dashboard pipeline.

pub mod handlers;
pub mod service;

pub use service::DashboardService;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(service: Arc<DashboardService>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/date-range", get(handlers::get_date_range))
        .route("/api/v1/dashboard", get(handlers::get_dashboard))
        .route("/api/v1/summary", get(handlers::get_summary))
        .route("/api/v1/cache/invalidate", post(handlers::invalidate_cache))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
