use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use study_companion_common::{AppConfig, Result, StudyCompanionError};
use tracing::{debug, info, warn};

use crate::llm_trait::ChatClient;
use crate::types::{ChatRequest, CompletionBody, CompletionResponse};

/// OpenAI-compatible chat completion client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiClient {
    /// Create new OpenAI client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("OpenAI client initialized: {} (model: {})", base_url, model);
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            model,
            max_retries: 2,
            client,
        })
    }

    /// Create from application config
    pub fn from_config(config: &AppConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(
            &config.openai_base_url,
            api_key,
            &config.openai_model,
            Duration::from_secs(config.openai_timeout_secs),
        )?
        .with_max_retries(config.openai_max_retries))
    }

    /// Set retry count for transient failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Send chat request (with retry logic for transient failures)
    async fn chat_with_retry(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            "Sending chat request - Model: {}, Messages: {}, Prompt length: {}",
            self.model,
            request.messages.len(),
            request.prompt_chars()
        );

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.try_chat(&url, request).await {
                Ok(response) => {
                    debug!("Received chat response - Length: {}", response.len());
                    return Ok(response);
                }
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    let delay = Duration::from_secs(2u64.pow(attempt - 1));
                    warn!(
                        "Chat request failed (attempt {}/{}): {}. Retrying in {:?}...",
                        attempt,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single attempt
    async fn try_chat(&self, url: &str, request: &ChatRequest) -> Result<String> {
        let body = CompletionBody {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StudyCompanionError::network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| StudyCompanionError::llm(format!("Failed to parse response: {}", e)))?;

        extract_content(result)
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn chat(&self, request: ChatRequest) -> Result<String> {
        self.chat_with_retry(&request).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map a non-success provider response to an error
fn classify_failure(status: StatusCode, body: &str) -> StudyCompanionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => StudyCompanionError::authentication(message),
        StatusCode::TOO_MANY_REQUESTS => StudyCompanionError::rate_limit(message),
        s if s.is_server_error() => {
            StudyCompanionError::network(format!("Provider returned {}: {}", s, message))
        }
        s => StudyCompanionError::llm(format!("OpenAI API error ({}): {}", s, message)),
    }
}

/// First choice content, trimmed
fn extract_content(response: CompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| StudyCompanionError::llm("No response generated"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const COMPLETION_BODY: &str = r#"{"choices": [{"message": {"role": "assistant", "content": "done"}}]}"#;

    /// Local HTTP server answering with the given responses in turn (the last one repeats)
    async fn stub_server(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let hit = counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut socket).await;

                let (status, body) = responses[hit.min(responses.len() - 1)];
                let reply = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return;
                }
            }
        }
    }

    fn stub_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(base_url, "test-key", "gpt-3.5-turbo", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let (url, hits) = stub_server(vec![(502, "bad gateway"), (200, COMPLETION_BODY)]).await;
        let client = stub_client(&url);

        let result = client.chat(ChatRequest::from_prompt("hi")).await.unwrap();
        assert_eq!(result, "done");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_auth_and_rate_limit_are_not_retried() {
        let (url, hits) = stub_server(vec![(401, r#"{"error": {"message": "bad key"}}"#)]).await;
        let err = stub_client(&url)
            .chat(ChatRequest::from_prompt("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudyCompanionError::Authentication(ref m) if m == "bad key"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let (url, hits) = stub_server(vec![(429, "slow")]).await;
        let err = stub_client(&url)
            .chat(ChatRequest::from_prompt("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudyCompanionError::RateLimit(ref m) if m == "slow"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_disabled() {
        let (url, hits) = stub_server(vec![(502, "bad gateway")]).await;
        let client = stub_client(&url).with_max_retries(0);

        let err = client.chat(ChatRequest::from_prompt("hi")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_client_creation() {
        let client = OpenAiClient::new(
            "https://api.openai.com/v1/",
            "test-key",
            "gpt-3.5-turbo",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.max_retries, 2);
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.openai_model = "gpt-4o-mini".to_string();
        config.openai_max_retries = 0;
        let client = OpenAiClient::from_config(&config, "test-key").unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.max_retries, 0);
    }

    #[test]
    fn test_classify_failure() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let err = classify_failure(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, StudyCompanionError::Authentication(ref m) if m == "Incorrect API key provided"));

        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, StudyCompanionError::RateLimit(_)));

        let err = classify_failure(StatusCode::BAD_GATEWAY, "");
        assert!(err.is_transient());

        let err = classify_failure(StatusCode::BAD_REQUEST, "context length exceeded");
        assert!(matches!(err, StudyCompanionError::Llm(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_extract_content() {
        let json = r#"{"id": "chatcmpl-1", "choices": [{"index": 0, "message": {"role": "assistant", "content": "  A summary.\n"}, "finish_reason": "stop"}]}"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(response).unwrap(), "A summary.");

        let response: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_content(response).is_err());
    }

    #[test]
    fn test_request_body_skips_unset_fields() {
        let request = ChatRequest::from_prompt("hi");
        let body = CompletionBody {
            model: "gpt-3.5-turbo",
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
    }
}
