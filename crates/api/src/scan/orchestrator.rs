//! Recognition orchestrator.
//!
//! Drives the four scan flows -- single-image scan, multi-bottle batch
//! scan, advisory duplicate check, and progressive refinement -- against
//! the AI facade, object storage, and the catalog/session repositories.
//! Held in [`AppState`](crate::state::AppState) as an
//! `Arc<ScanOrchestrator>`.

use std::sync::Arc;

use serde_json::Value;

use cellar_ai::{AiService, LabelAnalysis};
use cellar_cloud::StorageClient;
use cellar_core::batch::classify_batch_items;
use cellar_core::error::CoreError;
use cellar_core::ids;
use cellar_core::types::DbId;
use cellar_core::wine_data::{self, ScannedWine, WineData};
use cellar_db::models::scan_session::{CreateScanSession, RefineScanSession};
use cellar_db::repositories::{ScanSessionRepo, UserWineRepo, WineRepo};
use cellar_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::scan::types::{
    BatchScanResponse, DuplicateCheckResponse, OwnedInfo, RefineResponse, ScanResponse,
};

/// Orchestrates wine-label recognition flows.
pub struct ScanOrchestrator {
    pool: DbPool,
    ai: Arc<AiService>,
    storage: Arc<StorageClient>,
}

/// Catalog match outcome for an observation: the matched wine id (if any)
/// and whether the caller already owns it.
struct CatalogMatch {
    existing_wine_id: Option<DbId>,
    is_duplicate: bool,
}

impl ScanOrchestrator {
    pub fn new(pool: DbPool, ai: Arc<AiService>, storage: Arc<StorageClient>) -> Self {
        Self { pool, ai, storage }
    }

    // -----------------------------------------------------------------------
    // Single scan
    // -----------------------------------------------------------------------

    /// Scan a single wine label: upload the image, run recognition,
    /// reconcile against the catalog, and persist the session snapshot.
    pub async fn scan_single(
        &self,
        user_id: DbId,
        image: Vec<u8>,
        filename: &str,
    ) -> AppResult<ScanResponse> {
        let scan_id = ids::new_scan_id();

        // Upload failures are infrastructure-level and fatal for the request.
        let image_url = self
            .storage
            .upload_scan_image(image.clone(), &scan_id, filename)
            .await?;

        let data = match self.ai.analyze_wine_label(&image).await {
            LabelAnalysis::Data(data) => data,
            LabelAnalysis::Unavailable => return Err(AppError::RecognitionUnavailable),
        };

        let wine = ScannedWine::from_wine_data(&data).ok_or(AppError::Unrecognized)?;
        let confidence = wine_data::extract_confidence(&data);
        let catalog = self.match_catalog(user_id, &wine.name, wine.vintage).await?;

        ScanSessionRepo::create(
            &self.pool,
            &CreateScanSession {
                user_id,
                scan_id: scan_id.clone(),
                image_urls: Value::Array(vec![Value::String(image_url.clone())]),
                wine_data: Value::Object(data),
                confidence,
                existing_wine_id: catalog.existing_wine_id,
                is_duplicate: catalog.is_duplicate,
            },
        )
        .await?;

        tracing::info!(
            user_id,
            scan_id = %scan_id,
            confidence,
            matched = catalog.existing_wine_id.is_some(),
            "Single scan completed"
        );

        Ok(ScanResponse {
            scan_id,
            confidence,
            wine,
            image_url,
            existing_wine_id: catalog.existing_wine_id,
            is_duplicate: catalog.is_duplicate,
        })
    }

    // -----------------------------------------------------------------------
    // Batch scan
    // -----------------------------------------------------------------------

    /// Scan an image containing multiple bottles.
    ///
    /// Degraded mode (no vision provider) and unparseable responses both
    /// yield zero detections rather than an error. Batch results are not
    /// persisted; each recognized bottle can be confirmed individually.
    pub async fn scan_batch(
        &self,
        user_id: DbId,
        image: Vec<u8>,
        filename: &str,
    ) -> AppResult<BatchScanResponse> {
        let session_id = ids::new_batch_session_id();

        let _image_url = self
            .storage
            .upload_scan_image(image.clone(), &session_id, filename)
            .await?;

        let raw_items = self.ai.analyze_batch_wine_labels(&image).await;
        let classified = classify_batch_items(&raw_items);

        tracing::info!(
            user_id,
            scan_session_id = %session_id,
            total = classified.total_detected,
            recognized = classified.successfully_recognized,
            failed = classified.failed,
            "Batch scan completed"
        );

        Ok(BatchScanResponse {
            scan_session_id: session_id,
            total_detected: classified.total_detected,
            successfully_recognized: classified.successfully_recognized,
            failed: classified.failed,
            wines: classified.items,
        })
    }

    // -----------------------------------------------------------------------
    // Duplicate check
    // -----------------------------------------------------------------------

    /// Advisory check whether a label is already in the caller's
    /// collection. Mutates nothing: no upload, no session, no counts.
    pub async fn check_duplicate(
        &self,
        user_id: DbId,
        image: Vec<u8>,
    ) -> AppResult<DuplicateCheckResponse> {
        let data = match self.ai.analyze_wine_label(&image).await {
            LabelAnalysis::Data(data) => data,
            LabelAnalysis::Unavailable => return Err(AppError::RecognitionUnavailable),
        };

        let wine = ScannedWine::from_wine_data(&data).ok_or(AppError::Unrecognized)?;

        let mut owned_info = None;
        let mut recommendation = None;

        if let Some(existing) = WineRepo::find_match(&self.pool, &wine.name, wine.vintage).await? {
            if let Some(user_wine) =
                UserWineRepo::find_owned(&self.pool, user_id, existing.id).await?
            {
                recommendation = Some(format!(
                    "You already own {} bottle(s) of this wine. Buying one more would bring your total to {}.",
                    user_wine.quantity,
                    user_wine.quantity + 1
                ));
                owned_info = Some(OwnedInfo {
                    user_wine_id: user_wine.id,
                    quantity: user_wine.quantity,
                    purchase_price: user_wine.purchase_price,
                    purchase_date: user_wine.purchase_date,
                });
            }
        }

        Ok(DuplicateCheckResponse {
            wine,
            is_owned: owned_info.is_some(),
            owned_info,
            recommendation,
        })
    }

    // -----------------------------------------------------------------------
    // Refine
    // -----------------------------------------------------------------------

    /// Refine an existing scan session with an additional image of the
    /// same bottle.
    ///
    /// The new observation is merged field-by-field into the accumulated
    /// wine data (non-destructively: blanks never erase known values),
    /// confidence rises monotonically, and the catalog is re-matched
    /// against the merged data since the merged name/vintage may differ
    /// from either individual observation. The full merged state is
    /// computed before a single guarded UPDATE commits it.
    pub async fn refine(
        &self,
        user_id: DbId,
        scan_id: &str,
        image: Vec<u8>,
        filename: &str,
    ) -> AppResult<RefineResponse> {
        let session = ScanSessionRepo::find_by_scan_id(&self.pool, user_id, scan_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "ScanSession",
                    id: scan_id.to_string(),
                })
            })?;

        let refine_id = ids::new_refine_image_id(scan_id);
        let image_url = self
            .storage
            .upload_scan_image(image.clone(), &refine_id, filename)
            .await?;

        let observation = match self.ai.analyze_wine_label(&image).await {
            LabelAnalysis::Data(data) => data,
            LabelAnalysis::Unavailable => return Err(AppError::RecognitionUnavailable),
        };

        // Stage the full merged state in memory before committing anything.
        let merged: WineData = wine_data::merge_wine_data(&session.wine_data_map(), &observation);
        let confidence = wine_data::merge_confidence(
            session.confidence,
            wine_data::extract_confidence(&observation),
        );

        let wine = ScannedWine::from_wine_data(&merged).ok_or(AppError::Unrecognized)?;
        let catalog = self.match_catalog(user_id, &wine.name, wine.vintage).await?;

        let mut image_urls = session.image_url_list();
        image_urls.push(image_url);

        let updated = ScanSessionRepo::apply_refinement(
            &self.pool,
            user_id,
            scan_id,
            &RefineScanSession {
                image_urls: Value::Array(
                    image_urls.iter().cloned().map(Value::String).collect(),
                ),
                wine_data: Value::Object(merged),
                confidence,
                existing_wine_id: catalog.existing_wine_id,
                is_duplicate: catalog.is_duplicate,
                expected_updated_at: session.updated_at,
            },
        )
        .await?;

        if updated.is_none() {
            return Err(AppError::Core(CoreError::Conflict(
                "Scan session was modified concurrently; retry the refinement".to_string(),
            )));
        }

        tracing::info!(
            user_id,
            scan_id,
            confidence,
            images = image_urls.len(),
            "Scan refinement applied"
        );

        Ok(RefineResponse {
            scan_id: scan_id.to_string(),
            confidence,
            wine,
            image_urls,
            existing_wine_id: catalog.existing_wine_id,
            is_duplicate: catalog.is_duplicate,
        })
    }

    // -----------------------------------------------------------------------
    // Catalog reconciliation
    // -----------------------------------------------------------------------

    /// Match an observation against the catalog and the caller's holdings.
    async fn match_catalog(
        &self,
        user_id: DbId,
        name: &str,
        vintage: Option<i32>,
    ) -> AppResult<CatalogMatch> {
        let Some(existing) = WineRepo::find_match(&self.pool, name, vintage).await? else {
            return Ok(CatalogMatch {
                existing_wine_id: None,
                is_duplicate: false,
            });
        };

        let owned = UserWineRepo::find_owned(&self.pool, user_id, existing.id).await?;
        Ok(CatalogMatch {
            existing_wine_id: Some(existing.id),
            is_duplicate: owned.is_some(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use cellar_cloud::StorageConfig;
    use sqlx::postgres::PgPoolOptions;

    /// Orchestrator wired with an unconfigured AI service and mock
    /// storage. The pool connects lazily and is never touched by the
    /// degraded-mode paths under test.
    fn degraded_orchestrator() -> ScanOrchestrator {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:5432/cellar_test")
            .expect("lazy pool");
        let ai = Arc::new(AiService::with_providers(
            None,
            None,
            "gemini-2.5-flash",
            "gemini-2.5-flash",
        ));
        let storage = Arc::new(StorageClient::new(&StorageConfig {
            bucket: "cellar".to_string(),
            public_base_url: "https://cdn.example.com".to_string(),
            ..StorageConfig::default()
        }));
        ScanOrchestrator::new(pool, ai, storage)
    }

    #[tokio::test]
    async fn single_scan_without_provider_is_unavailable_not_fabricated() {
        let orchestrator = degraded_orchestrator();
        let result = orchestrator.scan_single(1, vec![0xFF], "label.jpg").await;
        assert_matches!(result, Err(AppError::RecognitionUnavailable));
    }

    #[tokio::test]
    async fn batch_scan_without_provider_returns_zero_results() {
        let orchestrator = degraded_orchestrator();
        let result = orchestrator
            .scan_batch(1, vec![0xFF], "batch.jpg")
            .await
            .expect("batch scan degrades, not errors");

        assert_eq!(result.total_detected, 0);
        assert_eq!(result.successfully_recognized, 0);
        assert_eq!(result.failed, 0);
        assert!(result.wines.is_empty());
        assert!(result.scan_session_id.starts_with("session_"));
    }

    #[tokio::test]
    async fn duplicate_check_without_provider_is_unavailable() {
        let orchestrator = degraded_orchestrator();
        let result = orchestrator.check_duplicate(1, vec![0xFF]).await;
        assert_matches!(result, Err(AppError::RecognitionUnavailable));
    }
}
