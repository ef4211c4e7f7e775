// Claude API streaming client using reqwest-eventsource.
//
// Sends messages to the Anthropic Messages API with `stream: true` and parses
// the Server-Sent Events into `LlmEvent` variants that are forwarded over an
// mpsc channel.

use futures_util::StreamExt;
use hrpro_core::config::Config;
use hrpro_core::protocol::LlmEvent;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// ClaudeClient
// ---------------------------------------------------------------------------

/// Low-level Claude API streaming client.
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl ClaudeClient {
    /// Create a new client with the given API key and model identifier.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at a different Messages endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a message to the Claude API and stream the response as `LlmEvent`s
    /// over `tx`.
    ///
    /// The method returns when the stream is complete, an error occurs, or the
    /// receiver is dropped.
    pub async fn stream_message(
        &self,
        system: &str,
        user_content: &str,
        max_tokens: u32,
        tx: mpsc::Sender<LlmEvent>,
    ) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            let _ = tx
                .send(LlmEvent::Error {
                    message: "API key not configured".to_string(),
                })
                .await;
            return Ok(());
        }

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "stream": true,
            "system": system,
            "messages": [{ "role": "user", "content": user_content }]
        });

        let request = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        let mut es = match request.eventsource() {
            Ok(es) => es,
            Err(e) => {
                let _ = tx
                    .send(LlmEvent::Error {
                        message: format!("Failed to create event source: {e}"),
                    })
                    .await;
                return Ok(());
            }
        };

        let mut full_text = String::new();
        let mut input_tokens: u32 = 0;
        let mut output_tokens: u32 = 0;
        let mut stop_reason: Option<String> = None;

        while let Some(event) = es.next().await {
            match event {
                Ok(Event::Open) => {
                    debug!("SSE connection opened");
                }
                Ok(Event::Message(msg)) => {
                    let event_type = msg.event.as_str();
                    let data = &msg.data;

                    match event_type {
                        "message_start" => {
                            match parse_input_tokens(data) {
                                Some(n) => input_tokens = n,
                                None => warn!("failed to parse input_tokens from message_start"),
                            }
                            debug!(input_tokens, "message_start");
                        }
                        "content_block_delta" => {
                            if let Some(text) = parse_delta_text(data) {
                                full_text.push_str(&text);
                                if tx.send(LlmEvent::Token { text }).await.is_err() {
                                    // Receiver dropped, abort stream.
                                    es.close();
                                    return Ok(());
                                }
                            }
                        }
                        "message_delta" => {
                            match parse_output_tokens(data) {
                                Some(n) => output_tokens = n,
                                None => warn!("failed to parse output_tokens from message_delta"),
                            }
                            stop_reason = parse_stop_reason(data).or(stop_reason);
                            debug!(output_tokens, ?stop_reason, "message_delta");
                        }
                        "message_stop" => {
                            debug!("message_stop, streaming complete");
                            let _ = tx
                                .send(LlmEvent::Complete {
                                    full_text,
                                    input_tokens,
                                    output_tokens,
                                    stop_reason,
                                })
                                .await;
                            es.close();
                            return Ok(());
                        }
                        "error" => {
                            let message = parse_api_error(data)
                                .unwrap_or_else(|| "API reported an error".to_string());
                            warn!(%message, "SSE error event");
                            let _ = tx.send(LlmEvent::Error { message }).await;
                            es.close();
                            return Ok(());
                        }
                        // Ignore ping, content_block_start, content_block_stop, etc.
                        _ => {
                            debug!(event_type, "ignoring SSE event");
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(err) => {
                    warn!(?err, "SSE stream error");
                    let message = extract_error_message(&err);
                    let _ = tx.send(LlmEvent::Error { message }).await;
                    es.close();
                    return Ok(());
                }
            }
        }

        // Stream ended without message_stop.
        if full_text.is_empty() {
            let _ = tx
                .send(LlmEvent::Error {
                    message: "Stream ended unexpectedly without any content".to_string(),
                })
                .await;
        } else {
            let _ = tx
                .send(LlmEvent::Complete {
                    full_text,
                    input_tokens,
                    output_tokens,
                    stop_reason,
                })
                .await;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LlmClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that can be either an active Claude client or disabled.
pub enum LlmClient {
    /// Claude API is configured and ready.
    Active(ClaudeClient),
    /// LLM functionality is disabled (no API key configured).
    Disabled,
}

impl LlmClient {
    /// Build an `LlmClient` from the application config.
    ///
    /// Returns `Active` if an API key is present in credentials, otherwise
    /// returns `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match &config.credentials.anthropic_api_key {
            Some(key) if !key.is_empty() => {
                let model = config.llm.model.clone();
                LlmClient::Active(ClaudeClient::new(key.clone(), model))
            }
            _ => LlmClient::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, LlmClient::Active(_))
    }

    /// Stream a message, delegating to the inner `ClaudeClient` or immediately
    /// sending an error if disabled.
    pub async fn stream_message(
        &self,
        system: &str,
        user_content: &str,
        max_tokens: u32,
        tx: mpsc::Sender<LlmEvent>,
    ) -> anyhow::Result<()> {
        match self {
            LlmClient::Active(client) => {
                client
                    .stream_message(system, user_content, max_tokens, tx)
                    .await
            }
            LlmClient::Disabled => {
                let _ = tx
                    .send(LlmEvent::Error {
                        message: "LLM not configured".to_string(),
                    })
                    .await;
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SSE JSON parsing helpers
// ---------------------------------------------------------------------------

/// Extract `input_tokens` from a `message_start` event's JSON.
///
/// Expected shape: `{ "type": "message_start", "message": { "usage": { "input_tokens": N } } }`
pub(crate) fn parse_input_tokens(data: &str) -> Option<u32> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("message")?
        .get("usage")?
        .get("input_tokens")?
        .as_u64()
        .map(|n| n as u32)
}

/// Extract `delta.text` from a `content_block_delta` event's JSON.
///
/// Expected shape: `{ "type": "content_block_delta", "delta": { "type": "text_delta", "text": "..." } }`
pub(crate) fn parse_delta_text(data: &str) -> Option<String> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("delta")?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

/// Extract `output_tokens` from a `message_delta` event's JSON.
///
/// Expected shape: `{ "type": "message_delta", "usage": { "output_tokens": N } }`
pub(crate) fn parse_output_tokens(data: &str) -> Option<u32> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("usage")?
        .get("output_tokens")?
        .as_u64()
        .map(|n| n as u32)
}

/// Extract `delta.stop_reason` from a `message_delta` event's JSON.
pub(crate) fn parse_stop_reason(data: &str) -> Option<String> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("delta")?
        .get("stop_reason")?
        .as_str()
        .map(|s| s.to_string())
}

/// Extract `error.message` from an `error` event's JSON.
///
/// Expected shape: `{ "type": "error", "error": { "type": "overloaded_error", "message": "..." } }`
pub(crate) fn parse_api_error(data: &str) -> Option<String> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

/// Extract a human-readable error message from an SSE error.
fn extract_error_message(err: &reqwest_eventsource::Error) -> String {
    match err {
        reqwest_eventsource::Error::InvalidStatusCode(status, _response) => {
            format!("API returned status {status}")
        }
        reqwest_eventsource::Error::Transport(e) => {
            format!("Network error: {e}")
        }
        other => format!("Stream error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // -- SSE JSON parsing tests --

    #[test]
    fn parse_message_start_input_tokens() {
        let data = r#"{
            "type": "message_start",
            "message": {
                "id": "msg_123",
                "type": "message",
                "role": "assistant",
                "content": [],
                "model": "claude-sonnet-4-5-20250929",
                "usage": { "input_tokens": 42, "output_tokens": 0 }
            }
        }"#;
        assert_eq!(parse_input_tokens(data), Some(42));
    }

    #[test]
    fn parse_message_start_missing_usage() {
        let data = r#"{ "type": "message_start", "message": { "id": "msg_1" } }"#;
        assert_eq!(parse_input_tokens(data), None);
    }

    #[test]
    fn parse_content_block_delta_text() {
        let data = r#"{
            "type": "content_block_delta",
            "index": 0,
            "delta": { "type": "text_delta", "text": "Hello" }
        }"#;
        assert_eq!(parse_delta_text(data), Some("Hello".to_string()));
    }

    #[test]
    fn parse_content_block_delta_missing_delta() {
        let data = r#"{ "type": "content_block_delta", "index": 0 }"#;
        assert_eq!(parse_delta_text(data), None);
    }

    #[test]
    fn parse_delta_text_with_cjk() {
        let data = r#"{
            "type": "content_block_delta",
            "index": 0,
            "delta": { "type": "text_delta", "text": "恭喜王小明" }
        }"#;
        assert_eq!(parse_delta_text(data), Some("恭喜王小明".to_string()));
    }

    #[test]
    fn parse_message_delta_fields() {
        let data = r#"{
            "type": "message_delta",
            "delta": { "stop_reason": "end_turn", "stop_sequence": null },
            "usage": { "output_tokens": 128 }
        }"#;
        assert_eq!(parse_output_tokens(data), Some(128));
        assert_eq!(parse_stop_reason(data), Some("end_turn".to_string()));
    }

    #[test]
    fn parse_message_delta_missing_usage() {
        let data = r#"{ "type": "message_delta", "delta": {} }"#;
        assert_eq!(parse_output_tokens(data), None);
        assert_eq!(parse_stop_reason(data), None);
    }

    #[test]
    fn parse_error_event_message() {
        let data = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(parse_api_error(data), Some("Overloaded".to_string()));
        assert_eq!(parse_api_error("nope"), None);
    }

    // -- LlmClient::Disabled path --

    #[tokio::test]
    async fn disabled_client_sends_error_event() {
        let client = LlmClient::Disabled;
        let (tx, mut rx) = mpsc::channel(8);

        client
            .stream_message("system", "user", 100, tx)
            .await
            .expect("should not fail");

        let event = rx.recv().await.expect("should receive an event");
        assert_eq!(
            event,
            LlmEvent::Error {
                message: "LLM not configured".to_string(),
            }
        );

        // No more events.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_api_key_sends_error_event() {
        let client = ClaudeClient::new(String::new(), "model".to_string());
        let (tx, mut rx) = mpsc::channel(8);

        client
            .stream_message("system", "user", 100, tx)
            .await
            .expect("should not fail");

        let event = rx.recv().await.expect("should receive an event");
        assert_eq!(
            event,
            LlmEvent::Error {
                message: "API key not configured".to_string(),
            }
        );
    }

    // -- LlmClient::from_config --

    fn make_test_config(api_key: Option<String>) -> Config {
        let mut config = Config::default();
        config.credentials.anthropic_api_key = api_key;
        config
    }

    #[test]
    fn from_config_with_api_key_returns_active() {
        let config = make_test_config(Some("sk-ant-test-key".to_string()));
        let client = LlmClient::from_config(&config);
        assert!(client.is_enabled());
        match client {
            LlmClient::Active(inner) => assert_eq!(inner.model(), "claude-sonnet-4-5-20250929"),
            LlmClient::Disabled => panic!("expected Active"),
        }
    }

    #[test]
    fn from_config_without_api_key_returns_disabled() {
        let config = make_test_config(None);
        assert!(matches!(LlmClient::from_config(&config), LlmClient::Disabled));
    }

    #[test]
    fn from_config_with_empty_api_key_returns_disabled() {
        let config = make_test_config(Some(String::new()));
        assert!(!LlmClient::from_config(&config).is_enabled());
    }

    // -- Mock TCP server --

    /// Serve one HTTP response on a local port and return its URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Read the HTTP request (discard it).
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/v1/messages")
    }

    #[tokio::test]
    async fn mock_sse_server_full_flow() {
        let url = serve_once(concat!(
            "HTTP/1.1 200 OK\r\n",
            "Content-Type: text/event-stream\r\n",
            "Cache-Control: no-cache\r\n",
            "Connection: close\r\n",
            "\r\n",
            "event: message_start\r\n",
            "data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_1\",\"type\":\"message\",\"role\":\"assistant\",\"content\":[],\"model\":\"test\",\"usage\":{\"input_tokens\":15}}}\r\n",
            "\r\n",
            "event: ping\r\n",
            "data: {\"type\":\"ping\"}\r\n",
            "\r\n",
            "event: content_block_delta\r\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"[\\\"Rockets\\\",\"}}\r\n",
            "\r\n",
            "event: content_block_delta\r\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\" \\\"Comets\\\"]\"}}\r\n",
            "\r\n",
            "event: message_delta\r\n",
            "data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":7}}\r\n",
            "\r\n",
            "event: message_stop\r\n",
            "data: {\"type\":\"message_stop\"}\r\n",
            "\r\n",
        ))
        .await;

        let client = ClaudeClient::new("sk-test".into(), "test".into()).with_api_url(url);
        let (tx, mut rx) = mpsc::channel(32);
        client
            .stream_message("system", "user", 100, tx)
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                LlmEvent::Token {
                    text: "[\"Rockets\",".to_string()
                },
                LlmEvent::Token {
                    text: " \"Comets\"]".to_string()
                },
                LlmEvent::Complete {
                    full_text: "[\"Rockets\", \"Comets\"]".to_string(),
                    input_tokens: 15,
                    output_tokens: 7,
                    stop_reason: Some("end_turn".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn mock_sse_server_error_status() {
        let url = serve_once(concat!(
            "HTTP/1.1 401 Unauthorized\r\n",
            "Content-Type: application/json\r\n",
            "Content-Length: 2\r\n",
            "Connection: close\r\n",
            "\r\n",
            "{}",
        ))
        .await;

        let client = ClaudeClient::new("sk-bad".into(), "test".into()).with_api_url(url);
        let (tx, mut rx) = mpsc::channel(8);
        client
            .stream_message("system", "user", 100, tx)
            .await
            .unwrap();

        match rx.recv().await {
            Some(LlmEvent::Error { message }) => {
                assert!(message.contains("401"), "unexpected message: {message}");
            }
            other => panic!("expected Error event, got: {other:?}"),
        }
        assert!(rx.recv().await.is_none());
    }
}
