pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Reports API
        .route("/api/v1/reports", post(handlers::handle_generate_report))
        .route("/api/v1/reports/pdf", post(handlers::handle_download_report))
        .with_state(state)
}
