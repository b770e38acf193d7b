//! AI model capability tiers and the model-id -> tier lookup.
//!
//! The tier drives prompt depth and token budget selection in
//! [`crate::scan_prompts`]: higher-capability models justify deeper
//! extraction and larger budgets, cheaper models get a reduced schema.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Tier enum
// ---------------------------------------------------------------------------

/// Capability classification of an AI model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Premium,
    Standard,
    Lite,
}

impl ModelTier {
    /// Lowercase name as used in API responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Premium => "premium",
            Self::Standard => "standard",
            Self::Lite => "lite",
        }
    }
}

// ---------------------------------------------------------------------------
// Model -> tier table
// ---------------------------------------------------------------------------

/// Static model-id -> tier table. Exact matches win; otherwise the longest
/// matching prefix decides; unknown models default to [`ModelTier::Standard`].
const MODEL_TIER_TABLE: &[(&str, ModelTier)] = &[
    // Anthropic
    ("claude-opus-4-6", ModelTier::Premium),
    ("claude-opus-4-20250514", ModelTier::Premium),
    ("claude-sonnet-4-20250514", ModelTier::Standard),
    ("claude-sonnet-4-5-20250929", ModelTier::Standard),
    ("claude-haiku-4-5-20251001", ModelTier::Lite),
    // Google Gemini
    ("gemini-2.5-pro", ModelTier::Premium),
    ("gemini-2.5-flash", ModelTier::Standard),
    ("gemini-2.0-flash", ModelTier::Standard),
    ("gemini-2.0-flash-lite", ModelTier::Lite),
];

/// Resolve the capability tier for a model identifier.
///
/// Exact table matches take precedence. Versioned or preview identifiers
/// (e.g. `gemini-2.5-pro-preview-0115`) resolve via prefix matching; the
/// longest prefix wins so `gemini-2.0-flash-lite-001` maps to the lite
/// entry rather than `gemini-2.0-flash`. Unrecognised models fall back to
/// standard. Total and deterministic; never fails.
pub fn resolve_model_tier(model: &str) -> ModelTier {
    if let Some((_, tier)) = MODEL_TIER_TABLE.iter().find(|(id, _)| *id == model) {
        return *tier;
    }

    MODEL_TIER_TABLE
        .iter()
        .filter(|(id, _)| model.starts_with(id))
        .max_by_key(|(id, _)| id.len())
        .map(|(_, tier)| *tier)
        .unwrap_or(ModelTier::Standard)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
