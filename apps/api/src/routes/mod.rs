pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::layout::handlers;
use crate::state::AppState;

async fn not_found() -> Result<(), AppError> {
    Err(AppError::NotFound("No such route".to_string()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Layout API
        .route("/api/v1/layout", post(handlers::handle_layout))
        .route("/api/v1/layout/evaluate", post(handlers::handle_evaluate))
        .fallback(not_found)
        .with_state(state)
}
