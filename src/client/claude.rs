//! Anthropic Messages API client.

use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{
    Completion, CompletionClient, CompletionRequest, api_key_from_env, http_client,
    normalize_api_key, require_key, send_json,
};
use crate::config::ProviderConfig;
use crate::error::{ChatctxError, Result};

/// Value of the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const PROVIDER: &str = "claude";

/// Blocking client for `POST /v1/messages`.
///
/// The payload is `{model, max_tokens, system, messages, temperature?}`;
/// the reply text is every `text` content block joined by `\n`.
#[derive(Clone)]
pub struct ClaudeClient {
    config: ProviderConfig,
    api_key: Option<String>,
    http: Client,
}

impl ClaudeClient {
    /// Creates a client, reading the API key from `config.api_key_env`.
    ///
    /// A missing key is not an error here, so payloads can still be
    /// built for a dry run; [`complete`](CompletionClient::complete)
    /// reports it before touching the network.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = api_key_from_env(&config.api_key_env);
        let http = http_client(PROVIDER, config.timeout_secs)?;
        Ok(Self {
            config,
            api_key,
            http,
        })
    }

    /// Sets the API key explicitly. A blank key clears it.
    #[must_use]
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(normalize_api_key(api_key)).filter(|k| !k.is_empty());
        self
    }

    /// Returns `true` if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the connection settings.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("config", &self.config)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn extract_text(raw: &Value) -> Result<String> {
    let content = raw
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| ChatctxError::decode(PROVIDER, "response has no `content` array"))?;

    let chunks: Vec<&str> = content
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    Ok(chunks.join("\n"))
}

impl CompletionClient for ClaudeClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn display_name(&self) -> &'static str {
        "Claude"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn payload(&self, request: &CompletionRequest) -> Value {
        let mut payload = json!({
            "model": request.model.as_deref().unwrap_or(&self.config.model),
            "max_tokens": request.max_tokens,
            "system": request.system,
            "messages": request.messages,
        });
        if let Some(temperature) = request.temperature {
            payload["temperature"] = json!(temperature);
        }
        payload
    }

    fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let api_key = require_key(PROVIDER, &self.config.api_key_env, self.api_key.as_deref())?;
        let payload = self.payload(request);
        info!(
            provider = PROVIDER,
            model = payload["model"].as_str().unwrap_or_default(),
            messages = request.messages.len(),
            "sending completion request"
        );
        debug!(%payload, "request payload");

        let builder = self
            .http
            .post(&self.config.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let raw = send_json(PROVIDER, builder, &payload)?;
        let text = extract_text(&raw)?;

        info!(provider = PROVIDER, chars = text.len(), "received completion");
        Ok(Completion { text, payload, raw })
    }
}
