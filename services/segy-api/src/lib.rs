//! SEG-Y extraction HTTP service.
//!
//! JSON endpoints under `/api` for single-file, batch and folder header
//! extraction, coordinate conversion, LAS well logs and file info, plus a
//! Prometheus `/metrics` endpoint.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health and metrics
        .route("/api/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // SEG-Y extraction
        .route(
            "/api/segy_manual_read",
            get(handlers::segy::manual_read_query_handler).post(handlers::segy::manual_read_handler),
        )
        .route("/api/segy_extract_batch", post(handlers::segy::extract_batch_handler))
        .route("/api/segy_extract_folder", post(handlers::segy::extract_folder_handler))
        .route("/api/ebcdic_header", get(handlers::segy::ebcdic_header_handler))
        .route("/api/binary_header", get(handlers::segy::binary_header_handler))
        // Coordinate conversion
        .route(
            "/api/convert_coordinates",
            post(handlers::coordinates::convert_coordinates_handler),
        )
        .route(
            "/api/convert_single_file",
            post(handlers::coordinates::convert_single_file_handler),
        )
        // LAS well logs
        .route("/api/las/metadata", post(handlers::las::metadata_handler))
        .route("/api/las/summary", post(handlers::las::summary_handler))
        .route("/api/las/report", post(handlers::las::report_handler))
        .route("/api/las/status", get(handlers::las::status_handler))
        // Files
        .route("/api/file_info", get(handlers::files::file_info_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
