//! AI provider configuration from environment variables.
//!
//! Scanning (vision) and recommendation (text) tasks are configured
//! independently so cost/accuracy can be tuned per use case; per-task
//! settings fall back to the global provider default.

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const DEFAULT_PROVIDER: &str = "gemini";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// AI provider configuration.
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    /// Global default provider (`gemini` or `anthropic`).
    pub ai_provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub anthropic_api_key: Option<String>,
    /// Per-task overrides; empty means "use the global default".
    pub scan_provider: Option<String>,
    pub scan_model: Option<String>,
    pub recommendation_provider: Option<String>,
    pub recommendation_model: Option<String>,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                       | Default            |
    /// |-------------------------------|--------------------|
    /// | `AI_PROVIDER`                 | `gemini`           |
    /// | `GEMINI_API_KEY`              | (unset)            |
    /// | `GEMINI_MODEL`                | `gemini-2.5-flash` |
    /// | `ANTHROPIC_API_KEY`           | (unset)            |
    /// | `SCAN_AI_PROVIDER`            | (global default)   |
    /// | `SCAN_AI_MODEL`               | (provider default) |
    /// | `RECOMMENDATION_AI_PROVIDER`  | (global default)   |
    /// | `RECOMMENDATION_AI_MODEL`     | (provider default) |
    pub fn from_env() -> Self {
        Self {
            ai_provider: env_or("AI_PROVIDER", DEFAULT_PROVIDER),
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            anthropic_api_key: env_opt("ANTHROPIC_API_KEY"),
            scan_provider: env_opt("SCAN_AI_PROVIDER"),
            scan_model: env_opt("SCAN_AI_MODEL"),
            recommendation_provider: env_opt("RECOMMENDATION_AI_PROVIDER"),
            recommendation_model: env_opt("RECOMMENDATION_AI_MODEL"),
        }
    }

    /// Provider used for label scanning.
    pub fn effective_scan_provider(&self) -> &str {
        self.scan_provider.as_deref().unwrap_or(&self.ai_provider)
    }

    /// Model used for label scanning.
    pub fn effective_scan_model(&self) -> String {
        if let Some(model) = &self.scan_model {
            return model.clone();
        }
        self.provider_default_model(self.effective_scan_provider())
    }

    /// Provider used for pairing recommendations.
    pub fn effective_recommendation_provider(&self) -> &str {
        self.recommendation_provider
            .as_deref()
            .unwrap_or(&self.ai_provider)
    }

    /// Model used for pairing recommendations.
    pub fn effective_recommendation_model(&self) -> String {
        if let Some(model) = &self.recommendation_model {
            return model.clone();
        }
        self.provider_default_model(self.effective_recommendation_provider())
    }

    fn provider_default_model(&self, provider: &str) -> String {
        if provider.eq_ignore_ascii_case("gemini") {
            self.gemini_model.clone()
        } else {
            DEFAULT_ANTHROPIC_MODEL.to_string()
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
