//! Handler for the AI model info endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Current AI model configuration for scan and recommendation tasks,
/// including the scan model's capability tier.
pub async fn get_ai_models(
    CurrentUser(_user_id): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: json!({
            "scan": state.ai.scan_model_info(),
            "recommendation": state.ai.recommendation_model_info(),
        }),
    }))
}
