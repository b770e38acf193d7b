//! Anthropic Messages API providers.
//!
//! Wraps `POST /v1/messages` for both the vision (image block + text
//! block) and text request shapes. Claude models do not spend output
//! budget on internal reasoning unless extended thinking is requested, so
//! no budget workaround is needed here; non-normal stop reasons are still
//! logged so truncated answers can be distinguished from clean ones.

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use crate::provider::{ensure_success, ProviderError, TextProvider, VisionProvider};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Shared request path
// ---------------------------------------------------------------------------

async fn send_messages(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    max_tokens: u32,
    content: serde_json::Value,
) -> Result<String, ProviderError> {
    let body = json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [{ "role": "user", "content": content }],
    });

    let response = client
        .post(API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", API_VERSION)
        .json(&body)
        .send()
        .await?;

    let response = ensure_success(response).await?;
    let parsed: MessagesResponse = response.json().await?;

    if let Some(reason) = parsed.stop_reason.as_deref() {
        if reason != "end_turn" {
            tracing::warn!(
                model,
                stop_reason = reason,
                max_tokens,
                "Anthropic response did not stop normally"
            );
        }
    }

    Ok(parsed
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join(""))
}

// ---------------------------------------------------------------------------
// Vision provider
// ---------------------------------------------------------------------------

/// Vision provider backed by Anthropic's Claude models.
pub struct AnthropicVisionProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicVisionProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl VisionProvider for AnthropicVisionProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate_content(
        &self,
        image: &[u8],
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image);
        let content = json!([
            {
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": "image/jpeg",
                    "data": image_base64,
                },
            },
            { "type": "text", "text": prompt },
        ]);

        send_messages(&self.client, &self.api_key, &self.model, max_tokens, content).await
    }
}

// ---------------------------------------------------------------------------
// Text provider
// ---------------------------------------------------------------------------

/// Text provider backed by Anthropic's Claude models.
pub struct AnthropicTextProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicTextProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl TextProvider for AnthropicTextProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate_text(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        send_messages(
            &self.client,
            &self.api_key,
            &self.model,
            max_tokens,
            json!(prompt),
        )
        .await
    }
}
