//! Route definitions.

pub mod health;
pub mod scan;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/scan", scan::router())
        .route("/ai/models", get(handlers::ai_models::get_ai_models))
        .route(
            "/recommendations",
            post(handlers::recommendations::get_recommendations),
        )
}
