//! Handlers for the scan endpoints.
//!
//! All endpoints take a multipart body with a single `image` file field
//! (jpeg/png/webp, at most 10 MiB) and require the authenticated caller.

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Upload validation
// ---------------------------------------------------------------------------

pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

struct UploadedImage {
    bytes: Vec<u8>,
    filename: String,
}

fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    if ALLOWED_CONTENT_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid file type '{content_type}'. Allowed: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        )))
    }
}

fn validate_size(len: usize) -> Result<(), AppError> {
    if len > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size: {}MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Pull the `image` part out of the multipart body and validate it.
async fn read_image_part(
    multipart: &mut Multipart,
    default_filename: &str,
) -> Result<UploadedImage, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(default_filename)
            .to_string();

        let content_type = field.content_type().unwrap_or_default().to_string();
        validate_content_type(&content_type)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        validate_size(bytes.len())?;

        return Ok(UploadedImage {
            bytes: bytes.to_vec(),
            filename,
        });
    }

    Err(AppError::BadRequest(
        "Missing 'image' file field in multipart body".to_string(),
    ))
}

// ---------------------------------------------------------------------------
// POST /scan
// ---------------------------------------------------------------------------

/// Scan a single wine label and extract structured information.
pub async fn scan_single(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let image = read_image_part(&mut multipart, "scan.jpg").await?;
    let result = state
        .orchestrator
        .scan_single(user_id, image.bytes, &image.filename)
        .await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// POST /scan/batch
// ---------------------------------------------------------------------------

/// Scan an image containing multiple wine bottles.
pub async fn scan_batch(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let image = read_image_part(&mut multipart, "batch_scan.jpg").await?;
    let result = state
        .orchestrator
        .scan_batch(user_id, image.bytes, &image.filename)
        .await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// POST /scan/check
// ---------------------------------------------------------------------------

/// Check whether a wine is already in the caller's collection (for use at
/// wine shops). Advisory only; nothing is persisted.
pub async fn check_duplicate(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let image = read_image_part(&mut multipart, "check.jpg").await?;
    let result = state.orchestrator.check_duplicate(user_id, image.bytes).await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// POST /scan/{scan_id}/refine
// ---------------------------------------------------------------------------

/// Refine an existing scan session with an additional image.
pub async fn refine(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let image = read_image_part(&mut multipart, "refine.jpg").await?;
    let result = state
        .orchestrator
        .refine(user_id, &scan_id, image.bytes, &image.filename)
        .await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
