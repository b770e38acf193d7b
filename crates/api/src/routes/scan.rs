//! Route definitions for the scan pipeline.
//!
//! Mounted at `/scan` by `api_routes()`.

use axum::routing::post;
use axum::Router;

use crate::handlers::scan;
use crate::state::AppState;

/// Scan routes.
///
/// ```text
/// POST /                   -> scan_single
/// POST /batch              -> scan_batch
/// POST /check              -> check_duplicate
/// POST /{scan_id}/refine   -> refine
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scan::scan_single))
        .route("/batch", post(scan::scan_batch))
        .route("/check", post(scan::check_duplicate))
        .route("/{scan_id}/refine", post(scan::refine))
}
