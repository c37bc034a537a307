//! Completion client tests against a local one-shot HTTP stub.
//!
//! Each stub accepts a single connection, records the raw request and
//! answers with a canned status and body.

#![cfg(feature = "api")]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};

use chatctx::client::{ClaudeClient, CompletionClient, CompletionRequest, GptClient};
use chatctx::config::ProviderConfig;
use chatctx::{ChatctxError, ContextRecord};
use serde_json::Value;

struct Stub {
    addr: SocketAddr,
    handle: JoinHandle<String>,
}

impl Stub {
    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Waits for the stub and returns the request it received.
    fn request(self) -> String {
        self.handle.join().unwrap()
    }
}

fn serve_once(status: &'static str, body: &'static str) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request
    });

    Stub { addr, handle }
}

fn read_request(stream: &mut impl Read) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= header_end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8(data).unwrap()
}

fn request_body(request: &str) -> Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1/messages")
}

fn sample_request() -> CompletionRequest {
    CompletionRequest::new(
        vec![
            ContextRecord::assistant("Olá! Ainda procura apartamento?"),
            ContextRecord::user("Oi, tudo bem?"),
        ],
        "Write one follow-up line.",
    )
    .with_max_tokens(128)
    .with_temperature(Some(0.0))
}

fn claude(endpoint: String) -> ClaudeClient {
    ClaudeClient::new(
        ProviderConfig::claude()
            .with_endpoint(endpoint)
            .with_api_key_env("CHATCTX_TEST_UNSET_CLAUDE_KEY")
            .with_timeout_secs(5),
    )
    .unwrap()
}

fn gpt(endpoint: String) -> GptClient {
    GptClient::new(
        ProviderConfig::openai()
            .with_endpoint(endpoint)
            .with_api_key_env("CHATCTX_TEST_UNSET_OPENAI_KEY")
            .with_timeout_secs(5),
    )
    .unwrap()
}

// ============================================================================
// Claude
// ============================================================================

#[test]
fn test_claude_success() {
    let stub = serve_once(
        "200 OK",
        r#"{"id":"msg_1","content":[{"type":"text","text":"Oi Ana!"},{"type":"tool_use","id":"t"},{"type":"text","text":"Posso ajudar?"}]}"#,
    );
    let client = claude(stub.url("/v1/messages")).with_api_key("sk-test");

    let completion = client.complete(&sample_request()).unwrap();
    assert_eq!(completion.text, "Oi Ana!\nPosso ajudar?");
    assert_eq!(completion.raw["id"], "msg_1");

    let request = stub.request();
    let lowered = request.to_lowercase();
    assert!(request.starts_with("POST /v1/messages "));
    assert!(lowered.contains("x-api-key: sk-test"));
    assert!(lowered.contains("anthropic-version: 2023-06-01"));

    let body = request_body(&request);
    assert_eq!(body, completion.payload);
    assert_eq!(body["system"], "Write one follow-up line.");
    assert_eq!(body["max_tokens"], 128);
    assert_eq!(body["messages"][0]["role"], "assistant");
    assert_eq!(body["messages"][1]["content"], "Oi, tudo bem?");
}

#[test]
fn test_claude_error_status_keeps_body() {
    let stub = serve_once(
        "400 Bad Request",
        r#"{"type":"error","error":{"message":"messages: roles must alternate"}}"#,
    );
    let client = claude(stub.url("/v1/messages")).with_api_key("sk-test");

    let err = client.complete(&sample_request()).unwrap_err();
    stub.request();

    match err {
        ChatctxError::RemoteRequest {
            provider,
            status,
            body,
        } => {
            assert_eq!(provider, "claude");
            assert_eq!(status, Some(400));
            assert_eq!(
                body,
                r#"{"type":"error","error":{"message":"messages: roles must alternate"}}"#
            );
        }
        other => panic!("expected RemoteRequest, got {other:?}"),
    }
}

#[test]
fn test_claude_non_json_success_is_decode_error() {
    let stub = serve_once("200 OK", "<html>gateway</html>");
    let client = claude(stub.url("/v1/messages")).with_api_key("sk-test");

    let err = client.complete(&sample_request()).unwrap_err();
    stub.request();
    assert!(err.is_decode());
}

#[test]
fn test_claude_missing_content_is_decode_error() {
    let stub = serve_once("200 OK", r#"{"id":"msg_1"}"#);
    let client = claude(stub.url("/v1/messages")).with_api_key("sk-test");

    let err = client.complete(&sample_request()).unwrap_err();
    stub.request();
    assert!(err.is_decode());
}

#[test]
fn test_claude_missing_key_sends_nothing() {
    let client = claude(closed_port_url());
    assert!(!client.has_api_key());

    let err = client.complete(&sample_request()).unwrap_err();
    assert!(err.is_missing_credential());
    assert!(err.to_string().contains("CHATCTX_TEST_UNSET_CLAUDE_KEY"));
}

#[test]
fn test_claude_connection_refused() {
    let client = claude(closed_port_url()).with_api_key("sk-test");

    let err = client.complete(&sample_request()).unwrap_err();
    match err {
        ChatctxError::RemoteRequest { status, .. } => assert_eq!(status, None),
        other => panic!("expected RemoteRequest, got {other:?}"),
    }
}

// ============================================================================
// GPT
// ============================================================================

#[test]
fn test_gpt_success() {
    let stub = serve_once(
        "200 OK",
        r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"Oi Ana, ainda tem interesse?"}}]}"#,
    );
    let client = gpt(stub.url("/v1/chat/completions")).with_api_key("sk-test");

    let completion = client.complete(&sample_request()).unwrap();
    assert_eq!(completion.text, "Oi Ana, ainda tem interesse?");

    let request = stub.request();
    assert!(request.starts_with("POST /v1/chat/completions "));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));

    let body = request_body(&request);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "Write one follow-up line.");
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
    assert_eq!(body["max_tokens"], 128);
}

#[test]
fn test_gpt_rate_limited() {
    let stub = serve_once("429 Too Many Requests", r#"{"error":{"message":"slow down"}}"#);
    let client = gpt(stub.url("/v1/chat/completions")).with_api_key("sk-test");

    let err = client.complete(&sample_request()).unwrap_err();
    stub.request();

    assert!(err.is_remote_request());
    assert!(err.to_string().contains("(429)"));
    assert!(err.to_string().contains("slow down"));
}

#[test]
fn test_gpt_missing_choices_is_decode_error() {
    let stub = serve_once("200 OK", r#"{"object":"chat.completion"}"#);
    let client = gpt(stub.url("/v1/chat/completions")).with_api_key("sk-test");

    let err = client.complete(&sample_request()).unwrap_err();
    stub.request();
    assert!(err.is_decode());
}

#[test]
fn test_model_override_reaches_payload() {
    let client = gpt(closed_port_url());
    let payload = client.payload(&sample_request().with_model("gpt-4o-mini"));
    assert_eq!(payload["model"], "gpt-4o-mini");
    assert_eq!(client.model(), chatctx::config::DEFAULT_GPT_MODEL);
}
