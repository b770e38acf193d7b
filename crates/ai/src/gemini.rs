//! Google Gemini generateContent providers.
//!
//! Gemini 2.5+ models enable internal "thinking" by default, and thinking
//! tokens are drawn from `maxOutputTokens` -- without intervention the
//! visible answer can be silently truncated or empty. Adapters for models
//! that accept the knob request a zero thinking budget; whether the knob
//! was applied is carried on the adapter instance, decided once at
//! construction. Non-normal finish reasons are logged at warn so callers
//! can tell truncated low-confidence results from clean ones.

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use crate::provider::{ensure_success, ProviderError, TextProvider, VisionProvider};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model-id prefix of the generation that accepts `thinkingConfig`.
const THINKING_CONFIG_PREFIX: &str = "gemini-2.5";

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Shared request path
// ---------------------------------------------------------------------------

fn build_generation_config(max_tokens: u32, thinking_disabled: bool) -> serde_json::Value {
    let mut config = json!({ "maxOutputTokens": max_tokens });
    if thinking_disabled {
        config["thinkingConfig"] = json!({ "thinkingBudget": 0 });
    }
    config
}

async fn send_generate(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    parts: serde_json::Value,
    max_tokens: u32,
    thinking_disabled: bool,
) -> Result<String, ProviderError> {
    let url = format!("{API_BASE}/models/{model}:generateContent");
    let body = json!({
        "contents": [{ "parts": parts }],
        "generationConfig": build_generation_config(max_tokens, thinking_disabled),
    });

    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await?;

    let response = ensure_success(response).await?;
    let parsed: GenerateContentResponse = response.json().await?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        tracing::warn!(model, "Gemini response carried no candidates");
        return Ok(String::new());
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            tracing::warn!(
                model,
                finish_reason = reason,
                max_tokens,
                "Gemini response did not stop normally"
            );
        }
    }

    Ok(candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Vision provider
// ---------------------------------------------------------------------------

/// Vision provider backed by Google's Gemini models.
pub struct GeminiVisionProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Set at construction; true when requests carry a zero thinking budget.
    thinking_disabled: bool,
}

impl GeminiVisionProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let thinking_disabled = model.starts_with(THINKING_CONFIG_PREFIX);
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            thinking_disabled,
        }
    }

    /// Whether requests from this instance disable model thinking.
    pub fn thinking_disabled(&self) -> bool {
        self.thinking_disabled
    }
}

#[async_trait]
impl VisionProvider for GeminiVisionProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_content(
        &self,
        image: &[u8],
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image);
        let parts = json!([
            { "text": prompt },
            { "inline_data": { "mime_type": "image/jpeg", "data": image_base64 } },
        ]);

        send_generate(
            &self.client,
            &self.api_key,
            &self.model,
            parts,
            max_tokens,
            self.thinking_disabled,
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Text provider
// ---------------------------------------------------------------------------

/// Text provider backed by Google's Gemini models.
pub struct GeminiTextProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    thinking_disabled: bool,
}

impl GeminiTextProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let thinking_disabled = model.starts_with(THINKING_CONFIG_PREFIX);
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            thinking_disabled,
        }
    }

    /// Whether requests from this instance disable model thinking.
    pub fn thinking_disabled(&self) -> bool {
        self.thinking_disabled
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_text(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let parts = json!([{ "text": prompt }]);
        send_generate(
            &self.client,
            &self.api_key,
            &self.model,
            parts,
            max_tokens,
            self.thinking_disabled,
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thinking_disabled_for_25_generation() {
        let p = GeminiVisionProvider::new("key".into(), "gemini-2.5-flash".into());
        assert!(p.thinking_disabled());

        let p = GeminiVisionProvider::new("key".into(), "gemini-2.5-pro-preview-0115".into());
        assert!(p.thinking_disabled());
    }

    #[test]
    fn thinking_untouched_for_older_generations() {
        let p = GeminiVisionProvider::new("key".into(), "gemini-2.0-flash".into());
        assert!(!p.thinking_disabled());

        let t = GeminiTextProvider::new("key".into(), "gemini-2.0-flash-lite".into());
        assert!(!t.thinking_disabled());
    }

    #[test]
    fn generation_config_carries_zero_thinking_budget_when_disabled() {
        let config = build_generation_config(2000, true);
        assert_eq!(config["maxOutputTokens"], 2000);
        assert_eq!(config["thinkingConfig"]["thinkingBudget"], 0);

        let config = build_generation_config(2000, false);
        assert!(config.get("thinkingConfig").is_none());
    }
}
