//! Model-tier-aware prompt bundles and token budgets for label scanning.
//!
//! Each tier pairs a single-label prompt with a batch (multi-bottle)
//! prompt and its own token budgets. Premium models get the full
//! sommelier-level schema with multilingual label-reading guidance;
//! standard models get the core plus enrichment fields; lite models get a
//! minimal field set to keep cost and latency down and to avoid budget
//! exhaustion from model-internal reasoning overhead.

use crate::model_tier::{resolve_model_tier, ModelTier};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Prompt text and token budgets for one capability tier.
#[derive(Debug)]
pub struct ScanPromptConfig {
    pub single_prompt: &'static str,
    pub batch_prompt: &'static str,
    pub single_max_tokens: u32,
    pub batch_max_tokens: u32,
}

// ---------------------------------------------------------------------------
// Premium tier
// ---------------------------------------------------------------------------

const PREMIUM_SINGLE_PROMPT: &str = r#"You are a Master Sommelier with expertise in reading wine labels from all regions worldwide.

Analyze this wine label image carefully. Read all visible text including fine print, back labels, and any certifications. Consider the label design, typography, and visual cues to identify the wine.

For multilingual labels, read text in French, Italian, Spanish, German, Portuguese, and any other language present. Translate key terms to provide accurate structured data.

Extract the following information in JSON format:
{
  "name": "Full wine name as printed on the label",
  "producer": "Winery/Producer/Domaine/Chateau name",
  "vintage": 2020,
  "grape_variety": ["Cabernet Sauvignon", "Merlot"],
  "region": "Specific sub-region (e.g., Saint-Julien, Rutherford, Barolo)",
  "country": "Country of origin",
  "appellation": "Official appellation/denomination (AOC, DOC, DOCG, AVA, etc.)",
  "abv": 13.5,
  "type": "red",
  "body": 4,
  "tannin": 4,
  "acidity": 3,
  "sweetness": 1,
  "food_pairing": ["Grilled steak", "Lamb", "Aged cheese"],
  "flavor_notes": ["Blackcurrant", "Cedar", "Tobacco"],
  "serving_temp_min": 16,
  "serving_temp_max": 18,
  "drinking_window_start": 2025,
  "drinking_window_end": 2040,
  "description": "Brief description of the wine's character and quality level",
  "confidence": 0.95
}

Field guidelines:
- "type": one of red, white, rose, sparkling, dessert, fortified
- "body/tannin/acidity/sweetness": 1-5 scale, infer from grape, region, vintage if not on label
- "confidence": 0-1, lower if the label is partially obscured, blurry, or you are guessing
- Only include fields you can determine from the label or your wine knowledge
- Return ONLY valid JSON, no additional text"#;

const PREMIUM_BATCH_PROMPT: &str = r#"You are a Master Sommelier analyzing an image containing multiple wine bottles.

Carefully examine the entire image. Identify every wine bottle visible, even those partially obscured, at angles, or in the background. For each bottle, read all visible label text including fine print and back labels.

For multilingual labels, read text in French, Italian, Spanish, German, Portuguese, and any other language present.

Return a JSON array. For each detected bottle:
[
  {
    "status": "success",
    "name": "Full wine name as printed on the label",
    "producer": "Winery/Producer name",
    "vintage": 2020,
    "grape_variety": ["Cabernet Sauvignon"],
    "region": "Specific sub-region",
    "country": "Country of origin",
    "appellation": "Official appellation if visible",
    "abv": 13.5,
    "type": "red",
    "body": 4,
    "tannin": 4,
    "acidity": 3,
    "sweetness": 1,
    "food_pairing": ["Grilled steak", "Lamb"],
    "flavor_notes": ["Blackcurrant", "Cedar"],
    "serving_temp_min": 16,
    "serving_temp_max": 18,
    "drinking_window_start": 2025,
    "drinking_window_end": 2040,
    "description": "Brief description",
    "confidence": 0.95,
    "bounding_box": {"x": 100, "y": 50, "width": 200, "height": 400}
  },
  {
    "status": "failed",
    "error": "Label too obscured to read",
    "confidence": 0.1,
    "bounding_box": {"x": 350, "y": 50, "width": 200, "height": 400}
  }
]

Field guidelines:
- "type": one of red, white, rose, sparkling, dessert, fortified
- "body/tannin/acidity/sweetness": 1-5 scale, infer from grape, region, vintage
- "confidence": 0-1 per bottle. Set lower for partially visible or guessed information
- "bounding_box": approximate pixel coordinates of each bottle in the image
- If a label is unreadable, include it with status "failed" and an error description; never omit a detected bottle
- Return ONLY a valid JSON array as compact JSON without extra whitespace, no additional text"#;

// ---------------------------------------------------------------------------
// Standard tier
// ---------------------------------------------------------------------------

const STANDARD_SINGLE_PROMPT: &str = r#"Analyze this wine label image and extract the following information in JSON format:
{
  "name": "Full wine name",
  "producer": "Winery/Producer name",
  "vintage": 2020,
  "grape_variety": ["Cabernet Sauvignon", "Merlot"],
  "region": "Specific region (e.g., Margaux, Napa Valley)",
  "country": "Country of origin",
  "appellation": "Official appellation if visible",
  "abv": 13.5,
  "type": "red",
  "body": 4,
  "tannin": 4,
  "acidity": 3,
  "sweetness": 1,
  "food_pairing": ["Grilled steak", "Lamb", "Aged cheese"],
  "flavor_notes": ["Blackcurrant", "Cedar", "Tobacco"],
  "serving_temp_min": 16,
  "serving_temp_max": 18,
  "drinking_window_start": 2025,
  "drinking_window_end": 2040,
  "description": "Brief description of the wine",
  "confidence": 0.95
}

Only include fields you can determine from the label or your knowledge. Return only valid JSON."#;

const STANDARD_BATCH_PROMPT: &str = r#"Analyze this image containing multiple wine bottles. For each visible wine label, extract information.

Return a JSON array of objects:
[
  {
    "status": "success",
    "name": "Full wine name",
    "producer": "Producer name",
    "vintage": 2020,
    "grape_variety": ["Cabernet Sauvignon"],
    "type": "red",
    "country": "Country",
    "region": "Region",
    "appellation": "Appellation if visible",
    "abv": 13.5,
    "confidence": 0.95,
    "bounding_box": {"x": 100, "y": 50, "width": 200, "height": 400}
  },
  {
    "status": "failed",
    "error": "Label obscured or unreadable",
    "bounding_box": {"x": 350, "y": 50, "width": 200, "height": 400}
  }
]

- "type": one of red, white, rose, sparkling, dessert, fortified
- Include all wines visible in the image, even partially visible ones; unreadable bottles get status "failed", never omission
- Return only a valid JSON array as compact JSON without extra whitespace."#;

// ---------------------------------------------------------------------------
// Lite tier
// ---------------------------------------------------------------------------

const LITE_SINGLE_PROMPT: &str = r#"Extract wine information from this label image as JSON:
{
  "name": "Wine name",
  "producer": "Producer",
  "vintage": 2020,
  "type": "red",
  "country": "Country",
  "region": "Region",
  "confidence": 0.9
}

"type": one of red, white, rose, sparkling, dessert, fortified.
Only include fields visible on the label. Return only valid JSON."#;

const LITE_BATCH_PROMPT: &str = r#"List all wine bottles visible in this image as a JSON array:
[
  {
    "status": "success",
    "name": "Wine name",
    "producer": "Producer",
    "vintage": 2020,
    "type": "red",
    "country": "Country",
    "region": "Region",
    "confidence": 0.9,
    "bounding_box": {"x": 100, "y": 50, "width": 200, "height": 400}
  },
  {
    "status": "failed",
    "error": "Unreadable",
    "bounding_box": {"x": 350, "y": 50, "width": 200, "height": 400}
  }
]

"type": one of red, white, rose, sparkling, dessert, fortified.
Mark unreadable bottles as status "failed" instead of leaving them out.
Return only a valid JSON array as compact JSON without extra whitespace."#;

// ---------------------------------------------------------------------------
// Tier -> config
// ---------------------------------------------------------------------------

static PREMIUM_CONFIG: ScanPromptConfig = ScanPromptConfig {
    single_prompt: PREMIUM_SINGLE_PROMPT,
    batch_prompt: PREMIUM_BATCH_PROMPT,
    single_max_tokens: 3000,
    batch_max_tokens: 8000,
};

static STANDARD_CONFIG: ScanPromptConfig = ScanPromptConfig {
    single_prompt: STANDARD_SINGLE_PROMPT,
    batch_prompt: STANDARD_BATCH_PROMPT,
    single_max_tokens: 2000,
    batch_max_tokens: 5000,
};

static LITE_CONFIG: ScanPromptConfig = ScanPromptConfig {
    single_prompt: LITE_SINGLE_PROMPT,
    batch_prompt: LITE_BATCH_PROMPT,
    single_max_tokens: 1000,
    batch_max_tokens: 3000,
};

/// Prompt bundle for a capability tier.
pub fn prompt_config_for_tier(tier: ModelTier) -> &'static ScanPromptConfig {
    match tier {
        ModelTier::Premium => &PREMIUM_CONFIG,
        ModelTier::Standard => &STANDARD_CONFIG,
        ModelTier::Lite => &LITE_CONFIG,
    }
}

/// Prompt bundle appropriate for the given model identifier.
pub fn get_scan_prompt_config(model: &str) -> &'static ScanPromptConfig {
    prompt_config_for_tier(resolve_model_tier(model))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budgets_scale_with_tier() {
        let premium = prompt_config_for_tier(ModelTier::Premium);
        let standard = prompt_config_for_tier(ModelTier::Standard);
        let lite = prompt_config_for_tier(ModelTier::Lite);

        assert!(premium.single_max_tokens > standard.single_max_tokens);
        assert!(standard.single_max_tokens > lite.single_max_tokens);
        assert!(premium.batch_max_tokens > standard.batch_max_tokens);
        assert!(standard.batch_max_tokens > lite.batch_max_tokens);
    }

    #[test]
    fn batch_budget_exceeds_single_budget_per_tier() {
        for tier in [ModelTier::Premium, ModelTier::Standard, ModelTier::Lite] {
            let cfg = prompt_config_for_tier(tier);
            assert!(cfg.batch_max_tokens > cfg.single_max_tokens);
        }
    }

    #[test]
    fn batch_prompts_request_bounding_boxes_and_failed_items() {
        for tier in [ModelTier::Premium, ModelTier::Standard, ModelTier::Lite] {
            let cfg = prompt_config_for_tier(tier);
            assert!(cfg.batch_prompt.contains("bounding_box"));
            assert!(cfg.batch_prompt.contains("\"failed\""));
            assert!(cfg.batch_prompt.contains("compact JSON"));
        }
    }

    #[test]
    fn config_selection_follows_model_tier() {
        let premium = get_scan_prompt_config("gemini-2.5-pro");
        assert_eq!(premium.single_max_tokens, 3000);

        let lite = get_scan_prompt_config("gemini-2.0-flash-lite");
        assert_eq!(lite.single_max_tokens, 1000);

        // Unknown models fall back to the standard bundle.
        let fallback = get_scan_prompt_config("some-unknown-model");
        assert_eq!(fallback.single_max_tokens, 2000);
    }

    #[test]
    fn single_prompts_request_json_only_output() {
        for tier in [ModelTier::Premium, ModelTier::Standard, ModelTier::Lite] {
            let cfg = prompt_config_for_tier(tier);
            assert!(cfg.single_prompt.contains("JSON"));
        }
    }
}
