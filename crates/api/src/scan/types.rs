//! Response DTOs for the scan endpoints.

use serde::Serialize;

use cellar_core::batch::BatchScanItem;
use cellar_core::types::DbId;
use cellar_core::wine_data::ScannedWine;

/// Result of a single-label scan.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub scan_id: String,
    pub confidence: f64,
    pub wine: ScannedWine,
    pub image_url: String,
    pub existing_wine_id: Option<DbId>,
    pub is_duplicate: bool,
}

/// Result of refining an existing scan session with an additional image.
#[derive(Debug, Serialize)]
pub struct RefineResponse {
    pub scan_id: String,
    pub confidence: f64,
    pub wine: ScannedWine,
    /// Full accumulated URL list, in upload order.
    pub image_urls: Vec<String>,
    pub existing_wine_id: Option<DbId>,
    pub is_duplicate: bool,
}

/// Result of a multi-bottle batch scan.
#[derive(Debug, Serialize)]
pub struct BatchScanResponse {
    pub scan_session_id: String,
    pub total_detected: usize,
    pub successfully_recognized: usize,
    pub failed: usize,
    /// Per-bottle results in detection order (the correlation key back to
    /// bounding boxes).
    pub wines: Vec<BatchScanItem>,
}

/// Current-holdings summary attached to a positive duplicate check.
#[derive(Debug, Serialize)]
pub struct OwnedInfo {
    pub user_wine_id: DbId,
    pub quantity: i32,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<chrono::NaiveDate>,
}

/// Result of an advisory duplicate check.
#[derive(Debug, Serialize)]
pub struct DuplicateCheckResponse {
    pub wine: ScannedWine,
    pub is_owned: bool,
    pub owned_info: Option<OwnedInfo>,
    /// Informational purchase-advice text; no numeric commitment is made
    /// to storage.
    pub recommendation: Option<String>,
}
