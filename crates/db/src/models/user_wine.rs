//! Ownership models: a user's bottles of a catalog wine.

use serde::Serialize;
use sqlx::FromRow;

use cellar_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status constants (match the `user_wines.status` column values)
// ---------------------------------------------------------------------------

pub const STATUS_OWNED: &str = "owned";
pub const STATUS_CONSUMED: &str = "consumed";
pub const STATUS_GIFTED: &str = "gifted";

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `user_wines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserWine {
    pub id: DbId,
    pub user_id: DbId,
    pub wine_id: DbId,
    pub quantity: i32,
    pub status: String,
    pub purchase_date: Option<chrono::NaiveDate>,
    pub purchase_price: Option<f64>,
    pub purchase_place: Option<String>,
    pub personal_note: Option<String>,
    pub personal_rating: Option<i16>,
    pub original_image_url: Option<String>,
    pub label_number: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Joined projection
// ---------------------------------------------------------------------------

/// Ownership joined with catalog fields, shaped for recommendation prompts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnedWine {
    pub user_wine_id: DbId,
    pub wine_id: DbId,
    pub name: String,
    pub vintage: Option<i32>,
    pub wine_type: String,
    pub quantity: i32,
    pub food_pairing: Option<Vec<String>>,
    pub flavor_notes: Option<Vec<String>>,
    pub drinking_window_start: Option<i32>,
    pub drinking_window_end: Option<i32>,
}
