//! LLM Client: the single point of entry for all generative-language calls.
//!
//! No other module may call the Gemini API directly.
//!
//! Model: gemini-1.5-flash-latest (hardcoded, not configurable)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// The model used for all generation calls.
pub const MODEL: &str = "gemini-1.5-flash-latest";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Joins the text parts of the first candidate. `None` when there is no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Text generation backend. Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether the backend is configured well enough to attempt a call.
    fn available(&self) -> bool;

    /// Sends a single prompt and returns the generated text, trimmed and non-empty.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Gemini `generateContent` client. One attempt per call, no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, endpoint: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            endpoint,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            MODEL
        )
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    pub async fn call(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.call(prompt).await?.text().ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::spawn_stub_server;

    /// One captured `generateContent` call: path segment, query string, JSON body.
    type SeenCall = (String, HashMap<String, String>, Value);

    /// Stub Gemini API answering every call with `status` and `body`.
    async fn stub_gemini(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<SeenCall>>>) {
        let seen: Arc<Mutex<Vec<SeenCall>>> = Arc::default();
        let recorder = seen.clone();
        let router = Router::new().route(
            "/v1beta/models/:action",
            post(
                move |Path(action): Path<String>,
                      Query(params): Query<HashMap<String, String>>,
                      Json(request): Json<Value>| {
                    let recorder = recorder.clone();
                    let body = body.clone();
                    async move {
                        recorder.lock().unwrap().push((action, params, request));
                        (status, Json(body))
                    }
                },
            ),
        );
        let base = spawn_stub_server(router).await;
        (format!("{base}/v1beta"), seen)
    }

    #[test]
    fn test_text_joins_parts_of_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Dear Hiring Manager,\n"}, {"text": "Sincerely, Jane"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 80}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.text().as_deref(),
            Some("Dear Hiring Manager,\nSincerely, Jane")
        );
        assert_eq!(response.usage.unwrap().candidates_token_count, 80);
    }

    #[test]
    fn test_text_none_when_blocked() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_text_none_when_whitespace_only() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": "  \n"}]}}]}"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_generate_url_includes_model() {
        let client = LlmClient::new(None, "https://example.test/v1beta/".to_string()).unwrap();
        assert_eq!(
            client.generate_url(),
            "https://example.test/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let client = LlmClient::new(None, "https://example.test".to_string()).unwrap();
        assert!(!client.available());
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_with_key() {
        let (endpoint, seen) = stub_gemini(
            StatusCode::OK,
            json!({"candidates": [{"content": {"parts": [{"text": " Dear Hiring Manager, ... Sincerely, Jane Doe\n"}]}}]}),
        )
        .await;
        let client = LlmClient::new(Some("g-key".to_string()), endpoint).unwrap();

        let text = client.generate("Write a cover letter").await.unwrap();
        assert_eq!(text, "Dear Hiring Manager, ... Sincerely, Jane Doe");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (action, params, request) = &seen[0];
        assert_eq!(action, "gemini-1.5-flash-latest:generateContent");
        assert_eq!(params["key"], "g-key");
        assert_eq!(
            *request,
            json!({"contents": [{"parts": [{"text": "Write a cover letter"}]}]})
        );
    }

    #[tokio::test]
    async fn test_error_envelope_message_extracted() {
        let (endpoint, _) = stub_gemini(
            StatusCode::BAD_REQUEST,
            json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}),
        )
        .await;
        let client = LlmClient::new(Some("bad".to_string()), endpoint).unwrap();

        match client.generate("hi").await.unwrap_err() {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_response_is_empty_content() {
        let (endpoint, _) = stub_gemini(
            StatusCode::OK,
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
        )
        .await;
        let client = LlmClient::new(Some("g-key".to_string()), endpoint).unwrap();

        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
