//! Chat-completion clients.
//!
//! - [`CompletionClient`] - one blocking request/response exchange with a model
//! - [`ClaudeClient`] - Anthropic Messages API
//! - [`GptClient`] - OpenAI chat completions API
//!
//! Every client makes exactly one HTTP call per [`complete`](CompletionClient::complete)
//! and never retries.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatctx::client::{ClaudeClient, CompletionClient, CompletionRequest};
//! use chatctx::config::{CompletionConfig, ProviderConfig};
//! use chatctx::ContextRecord;
//!
//! let client = ClaudeClient::new(ProviderConfig::claude())?;
//! let request = CompletionRequest::from_config(
//!     vec![ContextRecord::user("Oi, tudo bem?")],
//!     &CompletionConfig::default(),
//! );
//!
//! let completion = client.complete(&request)?;
//! println!("{}", completion.text);
//! # Ok::<(), chatctx::ChatctxError>(())
//! ```

mod claude;
mod openai;

use std::env;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CompletionConfig;
use crate::error::{ChatctxError, Result};
use crate::message::ContextRecord;

pub use claude::{ANTHROPIC_VERSION, ClaudeClient};
pub use openai::GptClient;

/// Provider-independent completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<ContextRecord>,

    /// System instruction.
    pub system: String,

    /// Overrides the client's configured model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature; omitted from the payload when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    /// Creates a request with the given messages and system prompt.
    pub fn new(messages: Vec<ContextRecord>, system: impl Into<String>) -> Self {
        let defaults = CompletionConfig::default();
        Self {
            messages,
            system: system.into(),
            model: None,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    /// Creates a request from shared completion settings.
    pub fn from_config(messages: Vec<ContextRecord>, config: &CompletionConfig) -> Self {
        Self {
            messages,
            system: config.system.clone(),
            model: None,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Sets the model override.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum tokens to generate.
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

/// Result of one successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Reply text extracted from the response.
    pub text: String,

    /// Request body that was sent.
    pub payload: Value,

    /// Full response body.
    pub raw: Value,
}

/// A chat-completion backend.
pub trait CompletionClient {
    /// Short lowercase name, used as the key in combined exports (`claude`, `gpt`).
    fn provider(&self) -> &'static str;

    /// Human-readable name for console output.
    fn display_name(&self) -> &'static str;

    /// Model the client sends when the request has no override.
    fn model(&self) -> &str;

    /// Builds the request body without sending it.
    fn payload(&self, request: &CompletionRequest) -> Value;

    /// Sends the request and extracts the reply text.
    ///
    /// # Errors
    ///
    /// - [`ChatctxError::MissingCredential`] when no API key is configured (nothing is sent)
    /// - [`ChatctxError::RemoteRequest`] on transport failure, timeout or non-success status
    /// - [`ChatctxError::Decode`] when a success body lacks the expected shape
    fn complete(&self, request: &CompletionRequest) -> Result<Completion>;
}

impl<T: CompletionClient + ?Sized> CompletionClient for Box<T> {
    fn provider(&self) -> &'static str {
        (**self).provider()
    }

    fn display_name(&self) -> &'static str {
        (**self).display_name()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    fn payload(&self, request: &CompletionRequest) -> Value {
        (**self).payload(request)
    }

    fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        (**self).complete(request)
    }
}

/// Trims whitespace and surrounding quote characters from a pasted API key.
///
/// ```rust
/// use chatctx::client::normalize_api_key;
///
/// assert_eq!(normalize_api_key("  \"sk-abc\"\n"), "sk-abc");
/// assert_eq!(normalize_api_key("'sk-abc'"), "sk-abc");
/// ```
pub fn normalize_api_key(raw: &str) -> String {
    fn is_quote_char(c: char) -> bool {
        matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’')
    }

    let mut s = raw.trim().to_string();
    while s.starts_with(is_quote_char) && s.len() > 1 {
        s.remove(0);
    }
    while s.ends_with(is_quote_char) && s.len() > 1 {
        s.pop();
    }

    s.trim().to_string()
}

/// Reads and normalizes an API key from the environment.
///
/// Returns `None` if the variable is unset or blank.
pub fn api_key_from_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| normalize_api_key(&v))
        .filter(|k| !k.is_empty())
}

/// Returns the key, or [`ChatctxError::MissingCredential`] naming `env_var`.
fn require_key<'a>(provider: &'static str, env_var: &str, key: Option<&'a str>) -> Result<&'a str> {
    key.ok_or_else(|| ChatctxError::missing_credential(provider, env_var))
}

fn http_client(provider: &'static str, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ChatctxError::remote(provider, None, e.to_string()))
}

/// Sends `payload` and returns the parsed success body.
///
/// Non-success responses keep their body verbatim in the error.
fn send_json(provider: &'static str, request: RequestBuilder, payload: &Value) -> Result<Value> {
    let response = request
        .json(payload)
        .send()
        .map_err(|e| ChatctxError::remote(provider, None, e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ChatctxError::remote(provider, Some(status.as_u16()), e.to_string()))?;

    if !status.is_success() {
        return Err(ChatctxError::remote(provider, Some(status.as_u16()), body));
    }

    serde_json::from_str(&body)
        .map_err(|e| ChatctxError::decode(provider, format!("response is not JSON: {e}")))
}
