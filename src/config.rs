//! Configuration types for parsing and the completion requests.
//!
//! - [`TranscriptConfig`] - transcript parser settings
//! - [`CompletionConfig`] - system prompt and sampling settings shared by all models
//! - [`ProviderConfig`] - endpoint, model, and credential source of one backend
//! - [`SendConfig`] - batch behaviour of the `send` step
//!
//! # Example
//!
//! ```rust
//! use chatctx::config::{CompletionConfig, ProviderConfig};
//!
//! let completion = CompletionConfig::new()
//!     .with_max_tokens(512)
//!     .with_temperature(Some(0.3));
//!
//! let claude = ProviderConfig::claude().with_model("claude-3-5-haiku-latest");
//! assert_eq!(claude.api_key_env, "ANTHROPIC_API_KEY");
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default system prompt for follow-up suggestions.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI agent writing one-line follow-up messages for real estate leads contacted 24+ hours ago; always output a message. Be concise, clear and professional, re-engage with a question or new info, no emojis, no system text, no silence.";

/// Default Claude model.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

/// Default GPT model.
pub const DEFAULT_GPT_MODEL: &str = "gpt-4o";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default pause between files in the `send` step, in seconds.
pub const DEFAULT_PAUSE_SECS: u64 = 20;

/// Configuration for transcript parsing.
///
/// # Example
///
/// ```rust
/// use chatctx::config::TranscriptConfig;
///
/// let config = TranscriptConfig::new().with_skip_system_messages(true);
/// assert!(config.strip_bom);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Strip a leading UTF-8 byte order mark (default: true)
    pub strip_bom: bool,

    /// Drop messages without a sender (default: false)
    pub skip_system_messages: bool,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            strip_bom: true,
            skip_system_messages: false,
        }
    }
}

impl TranscriptConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to strip a leading byte order mark.
    #[must_use]
    pub fn with_strip_bom(mut self, strip: bool) -> Self {
        self.strip_bom = strip;
        self
    }

    /// Sets whether to drop system messages.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }
}

/// Settings shared by every completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// System instruction sent with every request
    pub system: String,

    /// Maximum tokens for the reply (default: 2048)
    pub max_tokens: u32,

    /// Sampling temperature (default: 0.0); `None` leaves it to the provider
    pub temperature: Option<f64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 2048,
            temperature: Some(0.0),
        }
    }
}

impl CompletionConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Sets the maximum reply length.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Connection settings for one chat-completion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Full URL of the completion endpoint
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Request timeout in seconds (default: 60)
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Anthropic Messages API defaults.
    pub fn claude() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: DEFAULT_CLAUDE_MODEL.to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// OpenAI chat completions defaults.
    pub fn openai() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: DEFAULT_GPT_MODEL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the environment variable the API key is read from.
    #[must_use]
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Batch settings for the `send` step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendConfig {
    /// Directory receiving the combined answer files (default: `ai_answers`)
    pub answers_dir: PathBuf,

    /// Pause between files that made remote calls, in seconds (default: 20)
    pub pause_secs: u64,

    /// Build payloads only, never call the APIs (default: false)
    pub dry_run: bool,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            answers_dir: PathBuf::from("ai_answers"),
            pause_secs: DEFAULT_PAUSE_SECS,
            dry_run: false,
        }
    }
}

impl SendConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answers directory.
    #[must_use]
    pub fn with_answers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.answers_dir = dir.into();
        self
    }

    /// Sets the pause between files.
    #[must_use]
    pub fn with_pause_secs(mut self, secs: u64) -> Self {
        self.pause_secs = secs;
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_config_default() {
        let config = TranscriptConfig::default();
        assert!(config.strip_bom);
        assert!(!config.skip_system_messages);
    }

    #[test]
    fn test_completion_config_builder() {
        let config = CompletionConfig::new()
            .with_system("Be brief.")
            .with_max_tokens(100)
            .with_temperature(None);

        assert_eq!(config.system, "Be brief.");
        assert_eq!(config.max_tokens, 100);
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_completion_config_default() {
        let config = CompletionConfig::default();
        assert_eq!(config.system, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, Some(0.0));
    }

    #[test]
    fn test_provider_presets() {
        let claude = ProviderConfig::claude();
        assert!(claude.endpoint.ends_with("/v1/messages"));
        assert_eq!(claude.model, DEFAULT_CLAUDE_MODEL);

        let openai = ProviderConfig::openai().with_timeout_secs(5);
        assert!(openai.endpoint.ends_with("/v1/chat/completions"));
        assert_eq!(openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(openai.timeout_secs, 5);
    }

    #[test]
    fn test_send_config_default() {
        let config = SendConfig::default();
        assert_eq!(config.answers_dir, PathBuf::from("ai_answers"));
        assert_eq!(config.pause_secs, 20);
        assert!(!config.dry_run);
    }
}
