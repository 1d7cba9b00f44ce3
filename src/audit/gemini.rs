//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AuditConfig, AuditError, ReportGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`AuditError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuditError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn send_json(&self, body: &impl Serialize) -> Result<String, AuditError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AuditError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuditError::Request(e.to_string()))?;
        if status != 200 {
            return Err(AuditError::Response { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait]
impl ReportGenerator for GeminiClient {
    async fn generate_report(&self, prompt: &str) -> Result<String, AuditError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        tracing::debug!(model = %self.model, "requesting audit report");
        let text = self.send_json(&body).await?;
        parse_generate_response(&text)
    }
}

// -- wire types --

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate. No candidate means no
/// text, which is not an error.
fn parse_generate_response(body: &str) -> Result<String, AuditError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| AuditError::Parse(e.to_string()))?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> AuditConfig {
        AuditConfig {
            api_key: "test-key".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn test_parse_joins_text_parts() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "### Risks\n" }, { "text": "1. CORS" }]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 80 }
        })
        .to_string();
        assert_eq!(parse_generate_response(&json).unwrap(), "### Risks\n1. CORS");
    }

    #[test]
    fn test_parse_without_candidates_is_empty() {
        let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
        assert_eq!(parse_generate_response(&json).unwrap(), "");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_generate_response("<html>").unwrap_err();
        assert!(matches!(err, AuditError::Parse(_)));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hi" }] }] })
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(config("http://localhost:9/v1beta/")).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GeminiClient::new(config(&format!("http://{addr}"))).unwrap();
        let err = client.generate_report("prompt").await.unwrap_err();
        assert!(matches!(err, AuditError::Request(_)));
    }
}
