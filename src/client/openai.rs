//! OpenAI chat completions client.

use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{
    Completion, CompletionClient, CompletionRequest, api_key_from_env, http_client,
    normalize_api_key, require_key, send_json,
};
use crate::config::ProviderConfig;
use crate::error::{ChatctxError, Result};

const PROVIDER: &str = "gpt";

/// Blocking client for `POST /v1/chat/completions`.
///
/// The system prompt goes first in `messages`; the reply text is
/// `choices[0].message.content`.
#[derive(Clone)]
pub struct GptClient {
    config: ProviderConfig,
    api_key: Option<String>,
    http: Client,
}

impl GptClient {
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

impl std::fmt::Debug for GptClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GptClient")
            .field("config", &self.config)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn extract_text(raw: &Value) -> Result<String> {
    let choices = raw
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| ChatctxError::decode(PROVIDER, "response has no `choices` array"))?;

    // No choices is an empty reply, not a decode failure.
    Ok(choices
        .first()
        .and_then(|choice| choice.pointer("/message/content"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

impl CompletionClient for GptClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn display_name(&self) -> &'static str {
        "GPT"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn payload(&self, request: &CompletionRequest) -> Value {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(json!({"role": "system", "content": request.system}));
        messages.extend(request.messages.iter().map(|m| json!(m)));

        let mut payload = json!({
            "model": request.model.as_deref().unwrap_or(&self.config.model),
            "messages": messages,
            "max_tokens": request.max_tokens,
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
            .bearer_auth(api_key);
        let raw = send_json(PROVIDER, builder, &payload)?;
        let text = extract_text(&raw)?;

        info!(provider = PROVIDER, chars = text.len(), "received completion");
        Ok(Completion { text, payload, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ContextRecord;

    fn client() -> GptClient {
        GptClient::new(ProviderConfig::openai())
            .unwrap()
            .with_api_key("sk-test")
    }

    #[test]
    fn test_payload_prepends_system() {
        let request = CompletionRequest::new(vec![ContextRecord::user("Oi")], "Be brief.")
            .with_max_tokens(50)
            .with_temperature(Some(0.0));

        assert_eq!(
            client().payload(&request),
            json!({
                "model": crate::config::DEFAULT_GPT_MODEL,
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Oi"}
                ],
                "max_tokens": 50,
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn test_extract_text() {
        let raw = json!({
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Oi Ana!"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        });
        assert_eq!(extract_text(&raw).unwrap(), "Oi Ana!");
    }

    #[test]
    fn test_extract_text_no_choices() {
        assert_eq!(extract_text(&json!({"choices": []})).unwrap(), "");
    }

    #[test]
    fn test_extract_text_missing_choices() {
        let err = extract_text(&json!({"error": null})).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_blank_key_is_missing_credential() {
        let config = ProviderConfig::openai()
            .with_endpoint("http://127.0.0.1:9/v1/chat/completions")
            .with_api_key_env("CHATCTX_TEST_UNSET_GPT_KEY");
        let client = GptClient::new(config).unwrap().with_api_key("");

        let err = client
            .complete(&CompletionRequest::new(vec![], "s"))
            .unwrap_err();
        assert!(err.is_missing_credential());
        assert!(err.to_string().contains("CHATCTX_TEST_UNSET_GPT_KEY"));
    }
}
