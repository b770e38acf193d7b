//! Repository for the `scan_sessions` table.

use sqlx::PgPool;

use cellar_core::types::DbId;

use crate::models::scan_session::{CreateScanSession, RefineScanSession, ScanSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, scan_id, image_urls, wine_data, confidence, \
    existing_wine_id, is_duplicate, created_at, updated_at";

/// Provides persistence for progressive scan sessions.
pub struct ScanSessionRepo;

impl ScanSessionRepo {
    /// Persist the initial scan snapshot.
    pub async fn create(
        pool: &PgPool,
        body: &CreateScanSession,
    ) -> Result<ScanSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO scan_sessions
                (user_id, scan_id, image_urls, wine_data, confidence,
                 existing_wine_id, is_duplicate)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScanSession>(&query)
            .bind(body.user_id)
            .bind(&body.scan_id)
            .bind(&body.image_urls)
            .bind(&body.wine_data)
            .bind(body.confidence)
            .bind(body.existing_wine_id)
            .bind(body.is_duplicate)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its opaque scan id, restricted to the owning user.
    pub async fn find_by_scan_id(
        pool: &PgPool,
        user_id: DbId,
        scan_id: &str,
    ) -> Result<Option<ScanSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scan_sessions
             WHERE user_id = $1 AND scan_id = $2"
        );
        sqlx::query_as::<_, ScanSession>(&query)
            .bind(user_id)
            .bind(scan_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a fully staged refinement in one statement.
    ///
    /// The update is guarded by the `updated_at` value read with the
    /// session, so a concurrent refinement of the same session loses the
    /// race and gets `None` back instead of silently interleaving state.
    pub async fn apply_refinement(
        pool: &PgPool,
        user_id: DbId,
        scan_id: &str,
        body: &RefineScanSession,
    ) -> Result<Option<ScanSession>, sqlx::Error> {
        let query = format!(
            "UPDATE scan_sessions SET
                image_urls       = $1,
                wine_data        = $2,
                confidence       = $3,
                existing_wine_id = $4,
                is_duplicate     = $5,
                updated_at       = NOW()
             WHERE user_id = $6 AND scan_id = $7 AND updated_at = $8
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScanSession>(&query)
            .bind(&body.image_urls)
            .bind(&body.wine_data)
            .bind(body.confidence)
            .bind(body.existing_wine_id)
            .bind(body.is_duplicate)
            .bind(user_id)
            .bind(scan_id)
            .bind(body.expected_updated_at)
            .fetch_optional(pool)
            .await
    }
}
