//! Capability contracts implemented once per AI backend.
//!
//! Two request shapes exist: image + prompt -> text (vision) and
//! prompt -> text. Each adapter performs exactly one outbound call per
//! invocation; retry policy, if any, belongs to the caller.

use async_trait::async_trait;

/// Errors from a provider HTTP call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Vision capability: analyze an image under an instruction prompt.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging and the model-info endpoint.
    fn name(&self) -> &'static str;

    /// Send one image + prompt request and return the raw response text.
    async fn generate_content(
        &self,
        image: &[u8],
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError>;
}

/// Text capability: plain prompt completion.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logging and the model-info endpoint.
    fn name(&self) -> &'static str;

    /// Send one prompt request and return the raw response text.
    async fn generate_text(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError>;
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or [`ProviderError::Api`] with the status and
/// body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
