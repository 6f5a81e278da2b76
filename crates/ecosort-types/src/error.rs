//! Error types for ecosort

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Errors raised by a vision model backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request blocked by model: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyResponse,
}

/// Coarse classification failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credential missing; no request was attempted
    Configuration,
    /// The image payload failed its precondition; no request was attempted
    InvalidInput,
    /// The model call failed or produced no text
    Upstream,
    /// The model answered with something that is not usable JSON
    Format,
}

/// Internal cause behind a [`ClassificationError`]
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error("API key is not configured (checked {0})")]
    MissingCredential(String),

    #[error("invalid image payload: {0}")]
    InvalidImage(String),

    #[error("model request failed: {0}")]
    Upstream(#[from] BackendError),

    #[error("response is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("response has no items collection")]
    MissingItems,
}

impl FailureCause {
    pub fn kind(&self) -> FailureKind {
        match self {
            FailureCause::MissingCredential(_) => FailureKind::Configuration,
            FailureCause::InvalidImage(_) => FailureKind::InvalidInput,
            FailureCause::Upstream(_) => FailureKind::Upstream,
            FailureCause::MalformedJson(_) | FailureCause::MissingItems => FailureKind::Format,
        }
    }
}

/// Uniform failure returned by the classifier.
///
/// The message is meant for users; the cause is kept for logs.
#[derive(Debug, Error)]
#[error("Failed to analyze the image. Please try again.")]
pub struct ClassificationError {
    #[source]
    cause: FailureCause,
}

impl ClassificationError {
    pub fn kind(&self) -> FailureKind {
        self.cause.kind()
    }

    pub fn cause(&self) -> &FailureCause {
        &self.cause
    }
}

impl From<FailureCause> for ClassificationError {
    fn from(cause: FailureCause) -> Self {
        Self { cause }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Classification(#[from] ClassificationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Analysis timed out after {0}s")]
    Timeout(u64),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_message_keeps_cause() {
        let err: ClassificationError = FailureCause::MissingItems.into();
        assert_eq!(err.to_string(), "Failed to analyze the image. Please try again.");
        assert_eq!(err.kind(), FailureKind::Format);

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("response has no items collection"));
    }

    #[test]
    fn test_kind_mapping() {
        let missing = FailureCause::MissingCredential("API_KEY".to_string());
        assert_eq!(missing.kind(), FailureKind::Configuration);

        let upstream: FailureCause = BackendError::EmptyResponse.into();
        assert_eq!(upstream.kind(), FailureKind::Upstream);

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let malformed: FailureCause = json_err.into();
        assert_eq!(malformed.kind(), FailureKind::Format);
    }
}
