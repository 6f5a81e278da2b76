//! Backend seam for the external vision model
//!
//! The classifier only needs "send image + instructions, get text back".
//! Anything that can do that (the Gemini REST client, a test double)
//! implements [`VisionBackend`].

use async_trait::async_trait;
use ecosort_types::BackendError;
use serde_json::Value;

/// One outbound request to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub mime_type: String,
    /// Base64 image data without any data-URI prefix
    pub image_base64: String,
    pub instructions: String,
    /// Present only when the response format should be enforced
    pub response_schema: Option<Value>,
}

#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Submit the request and return the raw text of the answer.
    async fn generate(&self, request: &ModelRequest, api_key: &str) -> Result<String, BackendError>;
}

#[async_trait]
impl<T: VisionBackend + ?Sized> VisionBackend for std::sync::Arc<T> {
    async fn generate(&self, request: &ModelRequest, api_key: &str) -> Result<String, BackendError> {
        (**self).generate(request, api_key).await
    }
}

/// Where the API key comes from. Consulted on every call.
pub trait CredentialSource: Send + Sync {
    /// The key, or `None` when it is missing or blank
    fn api_key(&self) -> Option<String>;

    /// Human-readable location, used in error messages
    fn describe(&self) -> String;
}

/// Fixed key supplied by the host
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(pub Option<String>);

impl CredentialSource for StaticCredential {
    fn api_key(&self) -> Option<String> {
        non_blank(self.0.clone())
    }

    fn describe(&self) -> String {
        "configured api_key".to_string()
    }
}

/// Key read from an environment variable at call time
#[derive(Debug, Clone)]
pub struct EnvCredential {
    pub var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn api_key(&self) -> Option<String> {
        non_blank(std::env::var(&self.var).ok())
    }

    fn describe(&self) -> String {
        format!("${}", self.var)
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
