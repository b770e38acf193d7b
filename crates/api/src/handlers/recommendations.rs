//! Handler for pairing recommendations against the caller's collection.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use cellar_db::repositories::UserWineRepo;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on collection entries fed into the pairing prompt.
const MAX_WINES_FOR_PAIRING: i64 = 50;

/// Request body for pairing recommendations.
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationRequest {
    /// Free-text request, e.g. "wine for grilled lamb tonight".
    #[validate(length(min = 1, max = 500))]
    pub query: String,
}

/// Recommend wines from the caller's collection for a free-text request.
pub async fn get_recommendations(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<RecommendationRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid request: {e}")))?;

    let wines =
        UserWineRepo::list_owned_with_wine(&state.pool, user_id, MAX_WINES_FOR_PAIRING).await?;
    let wines_json: Vec<Value> = wines
        .iter()
        .map(|w| serde_json::to_value(w).unwrap_or(Value::Null))
        .collect();

    let result = state
        .ai
        .pairing_recommendations(&input.query, &wines_json)
        .await;

    Ok(Json(DataResponse { data: result }))
}
