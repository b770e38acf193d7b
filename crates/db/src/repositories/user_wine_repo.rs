//! Repository for the `user_wines` table.

use sqlx::PgPool;

use cellar_core::types::DbId;

use crate::models::user_wine::{OwnedWine, UserWine, STATUS_OWNED};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, wine_id, quantity, status, purchase_date, purchase_price, \
    purchase_place, personal_note, personal_rating, original_image_url, \
    label_number, created_at, updated_at, consumed_at, deleted_at";

/// Provides ownership lookups for a user's collection.
pub struct UserWineRepo;

impl UserWineRepo {
    /// The caller's active ownership record for a wine, if any.
    ///
    /// Restricted to non-deleted, `owned`-status holdings -- consumed or
    /// gifted bottles do not count as duplicates.
    pub async fn find_owned(
        pool: &PgPool,
        user_id: DbId,
        wine_id: DbId,
    ) -> Result<Option<UserWine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_wines
             WHERE user_id = $1 AND wine_id = $2
               AND deleted_at IS NULL AND status = $3
             LIMIT 1"
        );
        sqlx::query_as::<_, UserWine>(&query)
            .bind(user_id)
            .bind(wine_id)
            .bind(STATUS_OWNED)
            .fetch_optional(pool)
            .await
    }

    /// Owned wines joined with catalog fields, shaped for recommendation
    /// prompts. Most recently added first.
    pub async fn list_owned_with_wine(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<OwnedWine>, sqlx::Error> {
        sqlx::query_as::<_, OwnedWine>(
            "SELECT uw.id AS user_wine_id, w.id AS wine_id, w.name, w.vintage,
                    w.wine_type, uw.quantity, w.food_pairing, w.flavor_notes,
                    w.drinking_window_start, w.drinking_window_end
             FROM user_wines uw
             JOIN wines w ON w.id = uw.wine_id
             WHERE uw.user_id = $1 AND uw.deleted_at IS NULL AND uw.status = $2
             ORDER BY uw.created_at DESC
             LIMIT $3",
        )
        .bind(user_id)
        .bind(STATUS_OWNED)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
