//! Catalog wine models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cellar_core::types::{DbId, Timestamp};
use cellar_core::wine_data::ScannedWine;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `wines` table -- the canonical, deduplicated wine record,
/// distinct from any user's personal ownership record of it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wine {
    pub id: DbId,
    pub name: String,
    pub producer: Option<String>,
    pub vintage: Option<i32>,
    pub grape_variety: Option<Vec<String>>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub appellation: Option<String>,
    pub abv: Option<f64>,
    pub wine_type: String,
    pub body: Option<i16>,
    pub tannin: Option<i16>,
    pub acidity: Option<i16>,
    pub sweetness: Option<i16>,
    pub food_pairing: Option<Vec<String>>,
    pub flavor_notes: Option<Vec<String>>,
    pub serving_temp_min: Option<i16>,
    pub serving_temp_max: Option<i16>,
    pub drinking_window_start: Option<i32>,
    pub drinking_window_end: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub ai_confidence: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for creating a new catalog wine.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWine {
    pub name: String,
    pub producer: Option<String>,
    pub vintage: Option<i32>,
    pub grape_variety: Option<Vec<String>>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub appellation: Option<String>,
    pub abv: Option<f64>,
    pub wine_type: String,
    pub body: Option<i16>,
    pub tannin: Option<i16>,
    pub acidity: Option<i16>,
    pub sweetness: Option<i16>,
    pub food_pairing: Option<Vec<String>>,
    pub flavor_notes: Option<Vec<String>>,
    pub serving_temp_min: Option<i16>,
    pub serving_temp_max: Option<i16>,
    pub drinking_window_start: Option<i32>,
    pub drinking_window_end: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub ai_confidence: Option<f64>,
}

impl CreateWine {
    /// Build a well-formed catalog creation payload from a confirmed scan.
    pub fn from_scanned(
        scanned: &ScannedWine,
        image_url: Option<String>,
        ai_confidence: Option<f64>,
    ) -> Self {
        let profile = scanned.taste_profile;
        Self {
            name: scanned.name.clone(),
            producer: scanned.producer.clone(),
            vintage: scanned.vintage,
            grape_variety: scanned.grape_variety.clone(),
            region: scanned.region.clone(),
            country: scanned.country.clone(),
            appellation: scanned.appellation.clone(),
            abv: scanned.abv,
            wine_type: scanned.wine_type.name().to_string(),
            body: profile.and_then(|p| p.body),
            tannin: profile.and_then(|p| p.tannin),
            acidity: profile.and_then(|p| p.acidity),
            sweetness: profile.and_then(|p| p.sweetness),
            food_pairing: scanned.food_pairing.clone(),
            flavor_notes: scanned.flavor_notes.clone(),
            serving_temp_min: scanned.serving_temp_min,
            serving_temp_max: scanned.serving_temp_max,
            drinking_window_start: scanned.drinking_window_start,
            drinking_window_end: scanned.drinking_window_end,
            description: scanned.description.clone(),
            image_url,
            ai_confidence,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
