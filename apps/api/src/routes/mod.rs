pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::income::handlers as income;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Income API
        .route("/api/v1/income/analyze", post(income::handle_analyze_income))
        // Jobs API
        .route(
            "/api/v1/jobs/advancement",
            post(jobs::handle_find_advancement_jobs),
        )
        .with_state(state)
}
