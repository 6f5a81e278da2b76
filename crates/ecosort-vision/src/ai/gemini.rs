//! Gemini `generateContent` backend over reqwest

use async_trait::async_trait;
use ecosort_types::BackendError;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::backend::{ModelRequest, VisionBackend};

/// Public Gemini API endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Longest upstream error body kept in [`BackendError::Status`]
const MAX_ERROR_BODY: usize = 500;

/// VisionBackend that calls the Gemini REST API.
///
/// The API key travels per request in `x-goog-api-key`; the client itself
/// holds no credential. No timeout is set here.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    api_base: String,
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl GeminiBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    async fn generate(&self, request: &ModelRequest, api_key: &str) -> Result<String, BackendError> {
        let url = self.endpoint(&request.model);
        debug!(%url, mime = %request.mime_type, structured = request.response_schema.is_some(), "sending generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&build_request_body(request))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            let truncated: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncated,
            });
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| BackendError::Transport(format!("undecodable response envelope: {}", e)))?;
        extract_text(&parsed)
    }
}

/// Build the JSON body for `generateContent`
pub fn build_request_body(request: &ModelRequest) -> Value {
    let mut body = json!({
        "contents": [{
            "parts": [
                {
                    "inline_data": {
                        "mime_type": request.mime_type,
                        "data": request.image_base64,
                    }
                },
                { "text": request.instructions }
            ]
        }]
    });

    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }

    body
}

/// Concatenate the text parts of the first candidate
pub fn extract_text(response: &Value) -> Result<String, BackendError> {
    if let Some(reason) = response
        .pointer("/promptFeedback/blockReason")
        .and_then(|v| v.as_str())
    {
        return Err(BackendError::Blocked(reason.to_string()));
    }

    let text: String = response
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    Ok(text)
}
