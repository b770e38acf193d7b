//! Wine-data model: the typed extraction boundary and the refinement
//! merge policy.
//!
//! A scan session accumulates observations as a loosely-typed JSON map
//! ([`WineData`]) because its field set grows incrementally across
//! refinements. The typed [`ScannedWine`] struct is constructed from that
//! map only at the boundary, where values are validated and coerced.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Confidence assumed when the model omits the `confidence` field.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Confidence of the placeholder produced when no JSON could be recovered
/// from the provider response.
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.1;

/// Name carried by the parse-failure placeholder.
pub const PLACEHOLDER_NAME: &str = "Unknown";

/// Accumulated per-session wine observation map.
pub type WineData = Map<String, Value>;

// ---------------------------------------------------------------------------
// Wine type
// ---------------------------------------------------------------------------

/// Wine style classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WineType {
    Red,
    White,
    Rose,
    Sparkling,
    Dessert,
    Fortified,
    Other,
}

impl WineType {
    /// Parse from the lowercase wire/database name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "red" => Some(Self::Red),
            "white" => Some(Self::White),
            "rose" => Some(Self::Rose),
            "sparkling" => Some(Self::Sparkling),
            "dessert" => Some(Self::Dessert),
            "fortified" => Some(Self::Fortified),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Lowercase wire/database name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::White => "white",
            Self::Rose => "rose",
            Self::Sparkling => "sparkling",
            Self::Dessert => "dessert",
            Self::Fortified => "fortified",
            Self::Other => "other",
        }
    }
}

// ---------------------------------------------------------------------------
// Taste profile
// ---------------------------------------------------------------------------

/// 1-5 scale taste dimensions; values outside the scale are dropped at the
/// extraction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TasteProfile {
    pub body: Option<i16>,
    pub tannin: Option<i16>,
    pub acidity: Option<i16>,
    pub sweetness: Option<i16>,
}

impl TasteProfile {
    pub fn is_empty(&self) -> bool {
        self.body.is_none()
            && self.tannin.is_none()
            && self.acidity.is_none()
            && self.sweetness.is_none()
    }
}

// ---------------------------------------------------------------------------
// Scanned wine (typed boundary)
// ---------------------------------------------------------------------------

/// Structured extraction result for one recognized label.
///
/// Never partially valid: construction fails without a usable `name`.
#[derive(Debug, Clone, Serialize)]
pub struct ScannedWine {
    pub name: String,
    pub producer: Option<String>,
    pub vintage: Option<i32>,
    pub grape_variety: Option<Vec<String>>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub appellation: Option<String>,
    pub abv: Option<f64>,
    #[serde(rename = "type")]
    pub wine_type: WineType,
    pub taste_profile: Option<TasteProfile>,
    pub food_pairing: Option<Vec<String>>,
    pub flavor_notes: Option<Vec<String>>,
    pub serving_temp_min: Option<i16>,
    pub serving_temp_max: Option<i16>,
    pub drinking_window_start: Option<i32>,
    pub drinking_window_end: Option<i32>,
    pub description: Option<String>,
}

impl ScannedWine {
    /// Build the typed boundary struct from a raw extraction map.
    ///
    /// Returns `None` when no non-blank `name` is present -- absence of the
    /// required field is an extraction failure, not a partial result. All
    /// other fields are optional; off-scale or mistyped values are dropped
    /// rather than rejected. A missing or unrecognised wine type defaults
    /// to red, matching the catalog column default.
    pub fn from_wine_data(data: &WineData) -> Option<Self> {
        let name = trimmed_str(data, "name")?;

        let taste_profile = TasteProfile {
            body: scale_1_to_5(data, "body"),
            tannin: scale_1_to_5(data, "tannin"),
            acidity: scale_1_to_5(data, "acidity"),
            sweetness: scale_1_to_5(data, "sweetness"),
        };

        Some(Self {
            name,
            producer: trimmed_str(data, "producer"),
            vintage: int_field(data, "vintage"),
            grape_variety: string_list(data, "grape_variety"),
            region: trimmed_str(data, "region"),
            country: trimmed_str(data, "country"),
            appellation: trimmed_str(data, "appellation"),
            abv: data.get("abv").and_then(Value::as_f64),
            wine_type: trimmed_str(data, "type")
                .and_then(|t| WineType::from_name(&t))
                .unwrap_or(WineType::Red),
            taste_profile: (!taste_profile.is_empty()).then_some(taste_profile),
            food_pairing: string_list(data, "food_pairing"),
            flavor_notes: string_list(data, "flavor_notes"),
            serving_temp_min: small_int_field(data, "serving_temp_min"),
            serving_temp_max: small_int_field(data, "serving_temp_max"),
            drinking_window_start: int_field(data, "drinking_window_start"),
            drinking_window_end: int_field(data, "drinking_window_end"),
            description: trimmed_str(data, "description"),
        })
    }
}

// ---------------------------------------------------------------------------
// Field coercion helpers
// ---------------------------------------------------------------------------

fn trimmed_str(data: &WineData, key: &str) -> Option<String> {
    let s = data.get(key)?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn int_field(data: &WineData, key: &str) -> Option<i32> {
    let n = data.get(key)?.as_i64()?;
    i32::try_from(n).ok()
}

fn small_int_field(data: &WineData, key: &str) -> Option<i16> {
    let n = data.get(key)?.as_i64()?;
    i16::try_from(n).ok()
}

fn scale_1_to_5(data: &WineData, key: &str) -> Option<i16> {
    let n = small_int_field(data, key)?;
    (1..=5).contains(&n).then_some(n)
}

fn string_list(data: &WineData, key: &str) -> Option<Vec<String>> {
    let items = data.get(key)?.as_array()?;
    let list: Vec<String> = items
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .collect();
    (!list.is_empty()).then_some(list)
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

/// Low-confidence placeholder used when a provider responded but no JSON
/// object could be recovered. A scan attempt must always be observable to
/// the caller, even as low-confidence.
pub fn placeholder_wine_data() -> WineData {
    let mut data = WineData::new();
    data.insert("name".to_string(), Value::String(PLACEHOLDER_NAME.to_string()));
    data.insert(
        "confidence".to_string(),
        serde_json::json!(PLACEHOLDER_CONFIDENCE),
    );
    data
}

// ---------------------------------------------------------------------------
// Refinement merge
// ---------------------------------------------------------------------------

/// Merge a new observation into accumulated wine data.
///
/// A field is overwritten only when the incoming value carries information:
/// nulls, blank-after-trim strings, and empty lists are skipped, so a later
/// refinement can add or replace-with-better but never erase a known value.
pub fn merge_wine_data(existing: &WineData, incoming: &WineData) -> WineData {
    let mut merged = existing.clone();
    for (key, value) in incoming {
        let informative = match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        };
        if informative {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Session confidence after a refinement: monotonically non-decreasing.
pub fn merge_confidence(existing: Option<f64>, incoming: f64) -> f64 {
    match existing {
        Some(prev) => prev.max(incoming),
        None => incoming,
    }
}

/// Confidence reported by an observation, defaulting when absent or
/// mistyped.
pub fn extract_confidence(data: &WineData) -> f64 {
    data.get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> WineData {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    // -- Merge policy --------------------------------------------------------

    #[test]
    fn merge_empty_observation_is_identity() {
        let existing = map(json!({"name": "Chateau X", "vintage": 2015}));
        let merged = merge_wine_data(&existing, &WineData::new());
        assert_eq!(merged, existing);
    }

    #[test]
    fn merge_all_null_observation_is_identity() {
        let existing = map(json!({"name": "Chateau X", "vintage": 2015}));
        let incoming = map(json!({"name": null, "vintage": null}));
        assert_eq!(merge_wine_data(&existing, &incoming), existing);
    }

    #[test]
    fn merge_never_erases_with_blank_or_empty() {
        let existing = map(json!({"name": "Chateau X", "vintage": 2015}));
        let incoming = map(json!({"name": "", "vintage": null, "region": "Bordeaux"}));
        let merged = merge_wine_data(&existing, &incoming);

        assert_eq!(
            merged,
            map(json!({"name": "Chateau X", "vintage": 2015, "region": "Bordeaux"}))
        );
    }

    #[test]
    fn merge_skips_whitespace_only_strings() {
        let existing = map(json!({"producer": "Vega Sicilia"}));
        let incoming = map(json!({"producer": "   "}));
        assert_eq!(merge_wine_data(&existing, &incoming), existing);
    }

    #[test]
    fn merge_skips_empty_lists() {
        let existing = map(json!({"grape_variety": ["Tempranillo"]}));
        let incoming = map(json!({"grape_variety": []}));
        assert_eq!(merge_wine_data(&existing, &incoming), existing);
    }

    #[test]
    fn merge_replaces_with_better_values() {
        let existing = map(json!({"name": "Unknown", "confidence": 0.1}));
        let incoming = map(json!({"name": "Margaux", "vintage": 2015, "confidence": 0.85}));
        let merged = merge_wine_data(&existing, &incoming);

        assert_eq!(merged.get("name"), Some(&json!("Margaux")));
        assert_eq!(merged.get("vintage"), Some(&json!(2015)));
        assert_eq!(merged.get("confidence"), Some(&json!(0.85)));
    }

    #[test]
    fn merge_keeps_false_and_zero() {
        // Only null / blank string / empty list are uninformative.
        let existing = map(json!({"sweetness": 3}));
        let incoming = map(json!({"sweetness": 0}));
        let merged = merge_wine_data(&existing, &incoming);
        assert_eq!(merged.get("sweetness"), Some(&json!(0)));
    }

    // -- Confidence ----------------------------------------------------------

    #[test]
    fn confidence_is_monotonic() {
        assert_eq!(merge_confidence(Some(0.6), 0.4), 0.6);
        assert_eq!(merge_confidence(Some(0.6), 0.9), 0.9);
        assert_eq!(merge_confidence(None, 0.3), 0.3);
    }

    #[test]
    fn confidence_extraction_defaults() {
        assert_eq!(extract_confidence(&WineData::new()), DEFAULT_CONFIDENCE);
        assert_eq!(
            extract_confidence(&map(json!({"confidence": "high"}))),
            DEFAULT_CONFIDENCE
        );
        assert_eq!(extract_confidence(&map(json!({"confidence": 0.42}))), 0.42);
    }

    // -- Placeholder ---------------------------------------------------------

    #[test]
    fn placeholder_has_unknown_name_and_low_confidence() {
        let data = placeholder_wine_data();
        assert_eq!(data.get("name"), Some(&json!(PLACEHOLDER_NAME)));
        assert_eq!(extract_confidence(&data), PLACEHOLDER_CONFIDENCE);

        // The placeholder still passes boundary construction.
        assert!(ScannedWine::from_wine_data(&data).is_some());
    }

    // -- Typed boundary ------------------------------------------------------

    #[test]
    fn scanned_wine_requires_name() {
        assert!(ScannedWine::from_wine_data(&WineData::new()).is_none());
        assert!(ScannedWine::from_wine_data(&map(json!({"name": ""}))).is_none());
        assert!(ScannedWine::from_wine_data(&map(json!({"name": "  "}))).is_none());
        assert!(ScannedWine::from_wine_data(&map(json!({"name": null}))).is_none());
        assert!(ScannedWine::from_wine_data(&map(json!({"vintage": 2015}))).is_none());
    }

    #[test]
    fn scanned_wine_full_extraction() {
        let data = map(json!({
            "name": "Opus One",
            "producer": "Opus One Winery",
            "vintage": 2018,
            "grape_variety": ["Cabernet Sauvignon", "Merlot"],
            "region": "Napa Valley",
            "country": "USA",
            "appellation": "Oakville AVA",
            "abv": 14.5,
            "type": "red",
            "body": 5,
            "tannin": 4,
            "acidity": 3,
            "sweetness": 1,
            "food_pairing": ["Ribeye", "Lamb"],
            "flavor_notes": ["Cassis", "Mocha"],
            "serving_temp_min": 16,
            "serving_temp_max": 18,
            "drinking_window_start": 2024,
            "drinking_window_end": 2045,
            "description": "Flagship Bordeaux blend.",
            "confidence": 0.95
        }));

        let wine = ScannedWine::from_wine_data(&data).unwrap();
        assert_eq!(wine.name, "Opus One");
        assert_eq!(wine.vintage, Some(2018));
        assert_eq!(wine.wine_type, WineType::Red);
        assert_eq!(
            wine.grape_variety.as_deref(),
            Some(&["Cabernet Sauvignon".to_string(), "Merlot".to_string()][..])
        );
        let profile = wine.taste_profile.unwrap();
        assert_eq!(profile.body, Some(5));
        assert_eq!(profile.sweetness, Some(1));
        assert_eq!(wine.drinking_window_end, Some(2045));
    }

    #[test]
    fn scanned_wine_defaults_type_to_red() {
        let wine = ScannedWine::from_wine_data(&map(json!({"name": "Mystery"}))).unwrap();
        assert_eq!(wine.wine_type, WineType::Red);

        let wine = ScannedWine::from_wine_data(&map(json!({"name": "Mystery", "type": "fizzy"})))
            .unwrap();
        assert_eq!(wine.wine_type, WineType::Red);
    }

    #[test]
    fn scanned_wine_parses_known_types() {
        for (raw, expected) in [
            ("white", WineType::White),
            ("rose", WineType::Rose),
            ("sparkling", WineType::Sparkling),
            ("dessert", WineType::Dessert),
            ("fortified", WineType::Fortified),
            ("other", WineType::Other),
        ] {
            let wine =
                ScannedWine::from_wine_data(&map(json!({"name": "W", "type": raw}))).unwrap();
            assert_eq!(wine.wine_type, expected);
        }
    }

    #[test]
    fn scanned_wine_drops_off_scale_taste_values() {
        let data = map(json!({"name": "W", "body": 9, "tannin": 0, "acidity": 3}));
        let wine = ScannedWine::from_wine_data(&data).unwrap();
        let profile = wine.taste_profile.unwrap();
        assert_eq!(profile.body, None);
        assert_eq!(profile.tannin, None);
        assert_eq!(profile.acidity, Some(3));
    }

    #[test]
    fn scanned_wine_absent_taste_profile_is_none() {
        let wine = ScannedWine::from_wine_data(&map(json!({"name": "W"}))).unwrap();
        assert!(wine.taste_profile.is_none());
    }

    #[test]
    fn scanned_wine_ignores_mistyped_fields() {
        let data = map(json!({
            "name": "W",
            "vintage": "nineteen-eighty",
            "abv": "strong",
            "grape_variety": "Syrah"
        }));
        let wine = ScannedWine::from_wine_data(&data).unwrap();
        assert_eq!(wine.vintage, None);
        assert_eq!(wine.abv, None);
        assert_eq!(wine.grape_variety, None);
    }

    #[test]
    fn scanned_wine_serializes_type_with_wire_name() {
        let wine = ScannedWine::from_wine_data(&map(json!({"name": "W", "type": "rose"}))).unwrap();
        let value = serde_json::to_value(&wine).unwrap();
        assert_eq!(value["type"], json!("rose"));
    }

    #[test]
    fn wine_type_round_trips_names() {
        for t in [
            WineType::Red,
            WineType::White,
            WineType::Rose,
            WineType::Sparkling,
            WineType::Dessert,
            WineType::Fortified,
            WineType::Other,
        ] {
            assert_eq!(WineType::from_name(t.name()), Some(t));
        }
        assert_eq!(WineType::from_name("orange"), None);
    }
}
