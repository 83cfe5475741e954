pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::parsing::handlers as parsing_handlers;
use crate::skills::handlers as skills_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Parsing API
        .route("/api/v1/parse", post(parsing_handlers::handle_parse))
        .route(
            "/api/v1/parse/:job_id",
            get(parsing_handlers::handle_job_status),
        )
        .route("/api/v1/metrics", get(parsing_handlers::handle_metrics))
        // Skills API
        .route(
            "/api/v1/skills/suggest",
            get(skills_handlers::handle_suggest),
        )
        .route(
            "/api/v1/skills/normalize",
            post(skills_handlers::handle_normalize),
        )
        .route(
            "/api/v1/skills/aliases",
            post(skills_handlers::handle_register_alias),
        )
        .with_state(state)
}
