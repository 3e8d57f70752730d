//! finscan-lambda
//!
//! HTTP entry point: receives a PDF reference, runs the extraction pipeline
//! and returns where the artifacts were written.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Build the application router over the given state.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", post(routes::process::process_pdf))
        .route("/process", post(routes::process::process_pdf))
        .route("/outputs/latest", get(routes::outputs::latest_csv))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
