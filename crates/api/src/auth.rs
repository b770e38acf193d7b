//! Caller identity extractor.
//!
//! Authentication (token issuance and validation) lives in the upstream
//! gateway, which forwards the authenticated user's id in the
//! `x-user-id` header. This extractor only reads that contract; requests
//! without a parseable id are rejected with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use cellar_core::types::DbId;

use crate::error::AppError;

/// Header carrying the authenticated user's id, set by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller's user id.
pub struct CurrentUser(pub DbId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))?;

        let user_id = header
            .to_str()
            .ok()
            .and_then(|v| v.parse::<DbId>().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("Invalid {USER_ID_HEADER} header")))?;

        Ok(CurrentUser(user_id))
    }
}
