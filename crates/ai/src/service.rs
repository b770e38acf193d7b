//! Recognition service facade.
//!
//! Owns provider selection from configuration, the degraded mode for
//! missing credentials, and the JSON extraction policy: a scan response
//! with no recoverable JSON object becomes a low-confidence placeholder
//! (single scan) or an empty list (batch), while provider failures and
//! missing configuration surface as [`LabelAnalysis::Unavailable`].

use serde::Serialize;
use serde_json::{json, Value};

use cellar_core::extraction;
use cellar_core::model_tier::{resolve_model_tier, ModelTier};
use cellar_core::scan_prompts::{get_scan_prompt_config, ScanPromptConfig};
use cellar_core::wine_data::{self, WineData};

use crate::anthropic::{AnthropicTextProvider, AnthropicVisionProvider};
use crate::config::AiConfig;
use crate::gemini::{GeminiTextProvider, GeminiVisionProvider};
use crate::provider::{TextProvider, VisionProvider};

/// Token budget for pairing recommendation requests.
const PAIRING_MAX_TOKENS: u32 = 2000;

/// Upper bound on mock recommendations in degraded mode.
const MOCK_RECOMMENDATION_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a single-label analysis call.
#[derive(Debug)]
pub enum LabelAnalysis {
    /// Structured wine data recovered from the model response. May be the
    /// low-confidence placeholder when the response carried no JSON.
    Data(WineData),
    /// No vision provider is configured, or the provider call failed.
    Unavailable,
}

/// Scan model identity for the model-info endpoint.
#[derive(Debug, Serialize)]
pub struct ScanModelInfo {
    pub provider: String,
    pub model: String,
    pub tier: ModelTier,
}

/// Recommendation model identity for the model-info endpoint.
#[derive(Debug, Serialize)]
pub struct TextModelInfo {
    pub provider: String,
    pub model: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// AI-powered wine analysis and recommendation service.
///
/// Vision (scanning) and text (recommendation) capabilities are configured
/// independently; either may be absent, in which case the corresponding
/// calls degrade instead of failing.
pub struct AiService {
    scan_provider: Option<Box<dyn VisionProvider>>,
    recommendation_provider: Option<Box<dyn TextProvider>>,
    scan_prompt_config: &'static ScanPromptConfig,
    scan_provider_name: String,
    scan_model: String,
    recommendation_provider_name: String,
    recommendation_model: String,
}

impl AiService {
    /// Build the service from configuration, constructing one provider per
    /// configured capability. Missing API keys or unknown provider names
    /// leave the capability unconfigured (degraded mode) rather than
    /// failing startup.
    pub fn from_config(config: &AiConfig) -> Self {
        let scan_provider_name = config.effective_scan_provider().to_lowercase();
        let scan_model = config.effective_scan_model();
        let recommendation_provider_name =
            config.effective_recommendation_provider().to_lowercase();
        let recommendation_model = config.effective_recommendation_model();

        let scan_provider = create_vision_provider(config, &scan_provider_name, &scan_model);
        let recommendation_provider =
            create_text_provider(config, &recommendation_provider_name, &recommendation_model);

        tracing::info!(
            scan_provider = %scan_provider_name,
            scan_model = %scan_model,
            scan_tier = resolve_model_tier(&scan_model).as_str(),
            scan_configured = scan_provider.is_some(),
            recommendation_provider = %recommendation_provider_name,
            recommendation_model = %recommendation_model,
            recommendation_configured = recommendation_provider.is_some(),
            "AI service initialized"
        );

        Self {
            scan_provider,
            recommendation_provider,
            scan_prompt_config: get_scan_prompt_config(&scan_model),
            scan_provider_name,
            scan_model,
            recommendation_provider_name,
            recommendation_model,
        }
    }

    /// Build a service with explicit providers. Used by tests and by any
    /// caller that wants to bypass environment-based construction.
    pub fn with_providers(
        scan_provider: Option<Box<dyn VisionProvider>>,
        recommendation_provider: Option<Box<dyn TextProvider>>,
        scan_model: &str,
        recommendation_model: &str,
    ) -> Self {
        let scan_provider_name = scan_provider
            .as_ref()
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| "none".to_string());
        let recommendation_provider_name = recommendation_provider
            .as_ref()
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| "none".to_string());

        Self {
            scan_provider,
            recommendation_provider,
            scan_prompt_config: get_scan_prompt_config(scan_model),
            scan_provider_name,
            scan_model: scan_model.to_string(),
            recommendation_provider_name,
            recommendation_model: recommendation_model.to_string(),
        }
    }

    /// Whether a vision provider is configured.
    pub fn scan_configured(&self) -> bool {
        self.scan_provider.is_some()
    }

    /// Current scan model identity and capability tier.
    pub fn scan_model_info(&self) -> ScanModelInfo {
        ScanModelInfo {
            provider: self.scan_provider_name.clone(),
            model: self.scan_model.clone(),
            tier: resolve_model_tier(&self.scan_model),
        }
    }

    /// Current recommendation model identity.
    pub fn recommendation_model_info(&self) -> TextModelInfo {
        TextModelInfo {
            provider: self.recommendation_provider_name.clone(),
            model: self.recommendation_model.clone(),
        }
    }

    /// Analyze a single wine label image.
    ///
    /// Prompt depth and token budget follow the configured scan model's
    /// capability tier. A response without a recoverable JSON object
    /// yields the low-confidence placeholder so the attempt stays
    /// observable to the caller.
    pub async fn analyze_wine_label(&self, image: &[u8]) -> LabelAnalysis {
        let Some(provider) = &self.scan_provider else {
            tracing::warn!("Scan AI provider is not configured; skipping analysis");
            return LabelAnalysis::Unavailable;
        };

        let cfg = self.scan_prompt_config;
        match provider
            .generate_content(image, cfg.single_prompt, cfg.single_max_tokens)
            .await
        {
            Ok(text) => match extraction::extract_json_object(&text) {
                Some(data) => LabelAnalysis::Data(data),
                None => {
                    tracing::warn!(
                        model = %self.scan_model,
                        tier = resolve_model_tier(&self.scan_model).as_str(),
                        "No JSON object in scan response; returning low-confidence placeholder"
                    );
                    LabelAnalysis::Data(wine_data::placeholder_wine_data())
                }
            },
            Err(err) => {
                tracing::error!(
                    model = %self.scan_model,
                    tier = resolve_model_tier(&self.scan_model).as_str(),
                    error = %err,
                    "Label analysis failed"
                );
                LabelAnalysis::Unavailable
            }
        }
    }

    /// Analyze an image containing multiple wine bottles.
    ///
    /// Returns the raw batch array elements in detection order; empty when
    /// no provider is configured, the call fails, or the response carries
    /// no recoverable JSON array.
    pub async fn analyze_batch_wine_labels(&self, image: &[u8]) -> Vec<Value> {
        let Some(provider) = &self.scan_provider else {
            tracing::warn!("Scan AI provider is not configured; skipping batch analysis");
            return Vec::new();
        };

        let cfg = self.scan_prompt_config;
        match provider
            .generate_content(image, cfg.batch_prompt, cfg.batch_max_tokens)
            .await
        {
            Ok(text) => {
                let items = extraction::extract_json_array(&text);
                if items.is_empty() {
                    tracing::warn!(
                        model = %self.scan_model,
                        tier = resolve_model_tier(&self.scan_model).as_str(),
                        "Batch scan response carried no JSON array elements"
                    );
                }
                items
            }
            Err(err) => {
                tracing::error!(
                    model = %self.scan_model,
                    tier = resolve_model_tier(&self.scan_model).as_str(),
                    error = %err,
                    "Batch label analysis failed"
                );
                Vec::new()
            }
        }
    }

    /// Get pairing recommendations for a free-text request against the
    /// caller's collection. Falls back to deterministic mock
    /// recommendations when no text provider is configured.
    pub async fn pairing_recommendations(&self, query: &str, wines: &[Value]) -> Value {
        let Some(provider) = &self.recommendation_provider else {
            tracing::warn!("Recommendation AI provider is not configured; returning mock data");
            return mock_recommendations(wines);
        };

        let prompt = build_pairing_prompt(query, wines);
        match provider.generate_text(&prompt, PAIRING_MAX_TOKENS).await {
            Ok(text) => extraction::extract_json_object(&text)
                .map(Value::Object)
                .unwrap_or_else(|| {
                    tracing::warn!(
                        model = %self.recommendation_model,
                        "No JSON object in recommendation response"
                    );
                    empty_recommendations()
                }),
            Err(err) => {
                tracing::error!(
                    model = %self.recommendation_model,
                    error = %err,
                    "Pairing recommendation request failed"
                );
                empty_recommendations()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Provider factories
// ---------------------------------------------------------------------------

fn create_vision_provider(
    config: &AiConfig,
    provider_name: &str,
    model: &str,
) -> Option<Box<dyn VisionProvider>> {
    match provider_name {
        "gemini" => {
            let api_key = config.gemini_api_key.clone()?;
            Some(Box::new(GeminiVisionProvider::new(api_key, model.to_string())))
        }
        "anthropic" => {
            let api_key = config.anthropic_api_key.clone()?;
            Some(Box::new(AnthropicVisionProvider::new(api_key, model.to_string())))
        }
        other => {
            tracing::warn!(provider = other, "Unknown vision provider");
            None
        }
    }
}

fn create_text_provider(
    config: &AiConfig,
    provider_name: &str,
    model: &str,
) -> Option<Box<dyn TextProvider>> {
    match provider_name {
        "gemini" => {
            let api_key = config.gemini_api_key.clone()?;
            Some(Box::new(GeminiTextProvider::new(api_key, model.to_string())))
        }
        "anthropic" => {
            let api_key = config.anthropic_api_key.clone()?;
            Some(Box::new(AnthropicTextProvider::new(api_key, model.to_string())))
        }
        other => {
            tracing::warn!(provider = other, "Unknown text provider");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Pairing prompt & fallbacks
// ---------------------------------------------------------------------------

fn build_pairing_prompt(query: &str, wines: &[Value]) -> String {
    let wines_json = serde_json::to_string(wines).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a sommelier. A user wants wine recommendations.

User's request: "{query}"

Available wines in their collection:
{wines_json}

Recommend the best matching wines from their collection. Return JSON:
{{
  "recommendations": [
    {{
      "wine_id": 123,
      "rank": 1,
      "match_score": 0.95,
      "reason": "Why this wine pairs well",
      "pairing_tips": "Serving suggestions",
      "drinking_urgency": "optimal"
    }}
  ],
  "general_advice": "General pairing advice for the user's request"
}}

"drinking_urgency" is one of: drink_now, drink_soon, optimal, can_wait.

Consider:
1. Food pairing compatibility
2. Drinking window (prioritize wines that should be drunk soon)
3. Wine characteristics matching the occasion

Return only valid JSON."#
    )
}

fn empty_recommendations() -> Value {
    json!({ "recommendations": [], "general_advice": null })
}

/// Deterministic stand-in recommendations for environments without a text
/// provider: the first few collection entries, ranked in order.
fn mock_recommendations(wines: &[Value]) -> Value {
    let recommendations: Vec<Value> = wines
        .iter()
        .take(MOCK_RECOMMENDATION_COUNT)
        .enumerate()
        .map(|(i, wine)| {
            let name = wine
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("This wine");
            json!({
                "wine_id": wine.get("wine_id").cloned().unwrap_or(Value::Null),
                "rank": i + 1,
                "match_score": 0.95 - (i as f64) * 0.05,
                "reason": format!("The flavor profile of {name} complements your request."),
                "pairing_tips": "Decant about 15 minutes before serving.",
                "drinking_urgency": "optimal",
            })
        })
        .collect();

    json!({
        "recommendations": recommendations,
        "general_advice": "A full-bodied red pairs well with your selection.",
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use crate::provider::ProviderError;

    struct StubVision(&'static str);

    #[async_trait]
    impl VisionProvider for StubVision {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn generate_content(
            &self,
            _image: &[u8],
            _prompt: &str,
            _max_tokens: u32,
        ) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingVision;

    #[async_trait]
    impl VisionProvider for FailingVision {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate_content(
            &self,
            _image: &[u8],
            _prompt: &str,
            _max_tokens: u32,
        ) -> Result<String, ProviderError> {
            Err(ProviderError::Api {
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    struct StubText(&'static str);

    #[async_trait]
    impl TextProvider for StubText {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn generate_text(
            &self,
            _prompt: &str,
            _max_tokens: u32,
        ) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    fn service_with_vision(provider: Option<Box<dyn VisionProvider>>) -> AiService {
        AiService::with_providers(provider, None, "gemini-2.5-flash", "gemini-2.5-flash")
    }

    #[tokio::test]
    async fn unconfigured_vision_is_unavailable() {
        let service = service_with_vision(None);
        assert_matches!(service.analyze_wine_label(b"img").await, LabelAnalysis::Unavailable);
        assert!(service.analyze_batch_wine_labels(b"img").await.is_empty());
        assert!(!service.scan_configured());
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable_not_placeholder() {
        let service = service_with_vision(Some(Box::new(FailingVision)));
        assert_matches!(service.analyze_wine_label(b"img").await, LabelAnalysis::Unavailable);
    }

    #[tokio::test]
    async fn json_wrapped_in_prose_is_extracted() {
        let service = service_with_vision(Some(Box::new(StubVision(
            r#"Here is the wine: {"name":"Margaux","vintage":2015,"confidence":0.85}"#,
        ))));

        let LabelAnalysis::Data(data) = service.analyze_wine_label(b"img").await else {
            panic!("expected data");
        };
        assert_eq!(data.get("name"), Some(&json!("Margaux")));
        assert_eq!(wine_data::extract_confidence(&data), 0.85);
    }

    #[tokio::test]
    async fn unparseable_response_becomes_placeholder() {
        let service = service_with_vision(Some(Box::new(StubVision("sorry, no idea"))));

        let LabelAnalysis::Data(data) = service.analyze_wine_label(b"img").await else {
            panic!("expected placeholder data");
        };
        assert_eq!(data.get("name"), Some(&json!(wine_data::PLACEHOLDER_NAME)));
        assert_eq!(
            wine_data::extract_confidence(&data),
            wine_data::PLACEHOLDER_CONFIDENCE
        );
    }

    #[tokio::test]
    async fn batch_array_is_extracted_in_order() {
        let service = service_with_vision(Some(Box::new(StubVision(
            r#"[{"status":"success","name":"A"},{"status":"failed","error":"blurry"}]"#,
        ))));

        let items = service.analyze_batch_wine_labels(b"img").await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], json!("A"));
        assert_eq!(items[1]["status"], json!("failed"));
    }

    #[tokio::test]
    async fn batch_unparseable_response_is_empty() {
        let service = service_with_vision(Some(Box::new(StubVision("no array here"))));
        assert!(service.analyze_batch_wine_labels(b"img").await.is_empty());
    }

    #[tokio::test]
    async fn mock_recommendations_without_text_provider() {
        let service = service_with_vision(None);
        let wines = vec![
            json!({"wine_id": 1, "name": "Opus One"}),
            json!({"wine_id": 2, "name": "Margaux"}),
        ];

        let result = service.pairing_recommendations("steak dinner", &wines).await;
        let recs = result["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["rank"], json!(1));
        assert_eq!(recs[0]["wine_id"], json!(1));
        assert!(recs[0]["reason"].as_str().unwrap().contains("Opus One"));
    }

    #[tokio::test]
    async fn text_provider_json_is_returned() {
        let service = AiService::with_providers(
            None,
            Some(Box::new(StubText(
                r#"{"recommendations":[{"wine_id":7,"rank":1}],"general_advice":"enjoy"}"#,
            ))),
            "gemini-2.5-flash",
            "gemini-2.5-flash",
        );

        let result = service.pairing_recommendations("cheese", &[]).await;
        assert_eq!(result["recommendations"][0]["wine_id"], json!(7));
        assert_eq!(result["general_advice"], json!("enjoy"));
    }

    #[tokio::test]
    async fn text_provider_prose_falls_back_to_empty() {
        let service = AiService::with_providers(
            None,
            Some(Box::new(StubText("I'd suggest a nice red."))),
            "gemini-2.5-flash",
            "gemini-2.5-flash",
        );

        let result = service.pairing_recommendations("cheese", &[]).await;
        assert!(result["recommendations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn model_info_reports_tier() {
        let service = service_with_vision(None);
        let info = service.scan_model_info();
        assert_eq!(info.model, "gemini-2.5-flash");
        assert_eq!(info.tier, ModelTier::Standard);
    }

    #[test]
    fn pairing_prompt_embeds_query_and_collection() {
        let prompt = build_pairing_prompt("grilled lamb", &[json!({"name": "Barolo"})]);
        assert!(prompt.contains("grilled lamb"));
        assert!(prompt.contains("Barolo"));
        assert!(prompt.contains("Return only valid JSON"));
    }
}
