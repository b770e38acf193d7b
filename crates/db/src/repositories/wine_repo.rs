//! Repository for the `wines` table.

use sqlx::PgPool;

use cellar_core::types::DbId;

use crate::models::wine::{CreateWine, Wine};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, producer, vintage, grape_variety, region, country, \
    appellation, abv, wine_type, body, tannin, acidity, sweetness, \
    food_pairing, flavor_notes, serving_temp_min, serving_temp_max, \
    drinking_window_start, drinking_window_end, description, image_url, \
    ai_confidence, created_at, updated_at";

/// Provides catalog lookups and creation for wines.
pub struct WineRepo;

impl WineRepo {
    /// Fuzzy catalog lookup for a scanned label.
    ///
    /// Matches case-insensitively on name containment and exactly on
    /// vintage; a NULL vintage only matches a catalog entry whose vintage
    /// is also NULL. Intentionally cheap and approximate -- false
    /// negatives for differently-transliterated names are accepted.
    pub async fn find_match(
        pool: &PgPool,
        name: &str,
        vintage: Option<i32>,
    ) -> Result<Option<Wine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wines
             WHERE name ILIKE $1 AND vintage IS NOT DISTINCT FROM $2
             LIMIT 1"
        );
        sqlx::query_as::<_, Wine>(&query)
            .bind(format!("%{name}%"))
            .bind(vintage)
            .fetch_optional(pool)
            .await
    }

    /// Find a wine by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Wine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wines WHERE id = $1");
        sqlx::query_as::<_, Wine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new catalog wine.
    pub async fn create(pool: &PgPool, body: &CreateWine) -> Result<Wine, sqlx::Error> {
        let query = format!(
            "INSERT INTO wines
                (name, producer, vintage, grape_variety, region, country,
                 appellation, abv, wine_type, body, tannin, acidity, sweetness,
                 food_pairing, flavor_notes, serving_temp_min, serving_temp_max,
                 drinking_window_start, drinking_window_end, description,
                 image_url, ai_confidence)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     $14, $15, $16, $17, $18, $19, $20, $21, $22)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wine>(&query)
            .bind(&body.name)
            .bind(&body.producer)
            .bind(body.vintage)
            .bind(&body.grape_variety)
            .bind(&body.region)
            .bind(&body.country)
            .bind(&body.appellation)
            .bind(body.abv)
            .bind(&body.wine_type)
            .bind(body.body)
            .bind(body.tannin)
            .bind(body.acidity)
            .bind(body.sweetness)
            .bind(&body.food_pairing)
            .bind(&body.flavor_notes)
            .bind(body.serving_temp_min)
            .bind(body.serving_temp_max)
            .bind(body.drinking_window_start)
            .bind(body.drinking_window_end)
            .bind(&body.description)
            .bind(&body.image_url)
            .bind(body.ai_confidence)
            .fetch_one(pool)
            .await
    }
}
