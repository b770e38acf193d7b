//! Classification of multi-bottle batch scan results.
//!
//! The batch prompt asks the model for a JSON array with one element per
//! detected bottle, each self-reporting `"status"` and an optional bounding
//! box. Element order is significant: it is the correlation key back to
//! the source image regions and is preserved here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::wine_data::{self, ScannedWine};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ITEM_STATUS_SUCCESS: &str = "success";
pub const ITEM_STATUS_FAILED: &str = "failed";

/// Error reported for items the model marked failed without a reason, or
/// items that claimed success without a usable name.
pub const DEFAULT_ITEM_ERROR: &str = "Could not recognize wine label";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Approximate pixel region of one detected bottle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One classified element of a batch scan, at its original detection index.
#[derive(Debug, Serialize)]
pub struct BatchScanItem {
    pub index: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wine: Option<ScannedWine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated batch classification result.
#[derive(Debug)]
pub struct BatchClassification {
    pub total_detected: usize,
    pub successfully_recognized: usize,
    pub failed: usize,
    pub items: Vec<BatchScanItem>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify raw batch array elements into success/failed items.
///
/// An element counts as success only when it carries `"status":"success"`
/// and enough data for the typed boundary (at minimum a name); everything
/// else becomes a failed item with an error string. Input order is
/// preserved and `total_detected` equals the input length.
pub fn classify_batch_items(raw_items: &[Value]) -> BatchClassification {
    let mut items = Vec::with_capacity(raw_items.len());
    let mut successfully_recognized = 0;
    let mut failed = 0;

    for (index, raw) in raw_items.iter().enumerate() {
        let item = classify_item(index, raw);
        match item.status {
            ITEM_STATUS_SUCCESS => successfully_recognized += 1,
            _ => failed += 1,
        }
        items.push(item);
    }

    BatchClassification {
        total_detected: raw_items.len(),
        successfully_recognized,
        failed,
        items,
    }
}

fn classify_item(index: usize, raw: &Value) -> BatchScanItem {
    let bounding_box = raw
        .get("bounding_box")
        .cloned()
        .and_then(|b| serde_json::from_value(b).ok());

    let object = raw.as_object();
    let status = object
        .and_then(|o| o.get("status"))
        .and_then(Value::as_str)
        .unwrap_or(ITEM_STATUS_FAILED);

    if status == ITEM_STATUS_SUCCESS {
        if let Some(wine) = object.and_then(ScannedWine::from_wine_data) {
            let confidence = object
                .map(wine_data::extract_confidence)
                .unwrap_or(wine_data::DEFAULT_CONFIDENCE);
            return BatchScanItem {
                index,
                status: ITEM_STATUS_SUCCESS,
                confidence: Some(confidence),
                wine: Some(wine),
                bounding_box,
                error: None,
            };
        }
    }

    let error = object
        .and_then(|o| o.get("error"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ITEM_ERROR)
        .to_string();

    BatchScanItem {
        index,
        status: ITEM_STATUS_FAILED,
        confidence: None,
        wine: None,
        bounding_box,
        error: Some(error),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mixed_batch_counts_and_order() {
        let raw = vec![
            json!({"status": "success", "name": "Opus One", "vintage": 2018, "confidence": 0.9}),
            json!({"status": "failed", "error": "Label too blurry"}),
            json!({"status": "success", "name": "Margaux", "confidence": 0.8}),
        ];

        let result = classify_batch_items(&raw);
        assert_eq!(result.total_detected, 3);
        assert_eq!(result.successfully_recognized, 2);
        assert_eq!(result.failed, 1);

        let indices: Vec<usize> = result.items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(result.items[0].status, ITEM_STATUS_SUCCESS);
        assert_eq!(result.items[1].status, ITEM_STATUS_FAILED);
        assert_eq!(result.items[1].error.as_deref(), Some("Label too blurry"));
        assert_eq!(result.items[2].wine.as_ref().unwrap().name, "Margaux");
    }

    #[test]
    fn empty_input_yields_zero_counts() {
        let result = classify_batch_items(&[]);
        assert_eq!(result.total_detected, 0);
        assert_eq!(result.successfully_recognized, 0);
        assert_eq!(result.failed, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn success_without_name_is_reclassified_as_failed() {
        let raw = vec![json!({"status": "success", "vintage": 2015})];
        let result = classify_batch_items(&raw);
        assert_eq!(result.successfully_recognized, 0);
        assert_eq!(result.failed, 1);
        assert_eq!(result.items[0].error.as_deref(), Some(DEFAULT_ITEM_ERROR));
    }

    #[test]
    fn missing_status_is_failed() {
        let raw = vec![json!({"name": "Orphan"})];
        let result = classify_batch_items(&raw);
        assert_eq!(result.failed, 1);
    }

    #[test]
    fn non_object_element_is_failed() {
        let raw = vec![json!("garbage"), json!(42)];
        let result = classify_batch_items(&raw);
        assert_eq!(result.total_detected, 2);
        assert_eq!(result.failed, 2);
    }

    #[test]
    fn bounding_box_is_carried_for_both_statuses() {
        let raw = vec![
            json!({
                "status": "success",
                "name": "Barolo",
                "bounding_box": {"x": 10, "y": 20, "width": 100, "height": 300}
            }),
            json!({
                "status": "failed",
                "error": "Obscured",
                "bounding_box": {"x": 120, "y": 20, "width": 100, "height": 300}
            }),
        ];

        let result = classify_batch_items(&raw);
        assert_eq!(
            result.items[0].bounding_box,
            Some(BoundingBox { x: 10, y: 20, width: 100, height: 300 })
        );
        assert_eq!(result.items[1].bounding_box.map(|b| b.x), Some(120));
    }

    #[test]
    fn malformed_bounding_box_is_dropped() {
        let raw = vec![json!({"status": "success", "name": "W", "bounding_box": "everywhere"})];
        let result = classify_batch_items(&raw);
        assert_eq!(result.successfully_recognized, 1);
        assert!(result.items[0].bounding_box.is_none());
    }

    #[test]
    fn success_without_confidence_gets_default() {
        let raw = vec![json!({"status": "success", "name": "W"})];
        let result = classify_batch_items(&raw);
        assert_eq!(
            result.items[0].confidence,
            Some(wine_data::DEFAULT_CONFIDENCE)
        );
    }
}
