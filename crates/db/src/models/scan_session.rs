//! Scan session models: stateful accumulation of recognition observations
//! across one or more uploaded images of the same bottle.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use cellar_core::types::{DbId, Timestamp};
use cellar_core::wine_data::WineData;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `scan_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanSession {
    pub id: DbId,
    pub user_id: DbId,
    /// Opaque, URL-safe id generated server-side; the caller-facing handle.
    pub scan_id: String,
    /// JSONB array of image URLs in upload order.
    pub image_urls: Value,
    /// JSONB object of accumulated wine observations.
    pub wine_data: Value,
    pub confidence: Option<f64>,
    pub existing_wine_id: Option<DbId>,
    pub is_duplicate: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScanSession {
    /// Accumulated wine data as a map; empty when the column somehow holds
    /// a non-object.
    pub fn wine_data_map(&self) -> WineData {
        match &self.wine_data {
            Value::Object(map) => map.clone(),
            _ => WineData::new(),
        }
    }

    /// Accumulated image URLs in upload order; non-string entries are
    /// skipped.
    pub fn image_url_list(&self) -> Vec<String> {
        match &self.image_urls {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// DTO for persisting the initial scan snapshot.
#[derive(Debug)]
pub struct CreateScanSession {
    pub user_id: DbId,
    pub scan_id: String,
    pub image_urls: Value,
    pub wine_data: Value,
    pub confidence: f64,
    pub existing_wine_id: Option<DbId>,
    pub is_duplicate: bool,
}

/// Fully staged refinement update.
///
/// The merged wine data and URL list are computed in memory before the
/// update runs, and the write is guarded by the previously-read
/// `updated_at` so a concurrent refinement cannot interleave
/// half-merged state.
#[derive(Debug)]
pub struct RefineScanSession {
    pub image_urls: Value,
    pub wine_data: Value,
    pub confidence: f64,
    pub existing_wine_id: Option<DbId>,
    pub is_duplicate: bool,
    pub expected_updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
