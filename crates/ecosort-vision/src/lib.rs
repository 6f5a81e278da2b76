//! Vision module - AI-powered waste classification
//!
//! [`Classifier`] sends one image to a vision model and returns the waste
//! items it found, normalized into [`ClassificationResult`]. Every failure
//! comes back as a single [`ClassificationError`]; the underlying cause is
//! logged and kept as the error source.

pub mod ai;
pub mod normalize;
pub mod payload;

pub use ai::backend::{CredentialSource, EnvCredential, ModelRequest, StaticCredential, VisionBackend};
pub use ai::gemini::{GeminiBackend, DEFAULT_API_BASE};
pub use ai::prompts::{response_schema, FREE_FORM_INSTRUCTIONS, STRUCTURED_INSTRUCTIONS};
pub use normalize::{extract_json_from_response, normalize_response, RawWasteItem};
pub use payload::ImagePayload;

use ecosort_types::{ClassificationError, ClassificationResult, FailureCause};
use tracing::{debug, error, info};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Classifier options
#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    pub model: String,
    /// Ask the model for schema-constrained JSON
    pub structured_output: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            structured_output: false,
        }
    }
}

impl ClassifierOptions {
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        self
    }

    pub fn with_structured_output(mut self, structured: bool) -> Self {
        self.structured_output = structured;
        self
    }
}

/// Image classification adapter.
///
/// Holds no per-call state; concurrent `classify` calls are independent.
pub struct Classifier<B> {
    backend: B,
    credential: Box<dyn CredentialSource>,
    options: ClassifierOptions,
}

impl<B: VisionBackend> Classifier<B> {
    pub fn new(backend: B, credential: Box<dyn CredentialSource>, options: ClassifierOptions) -> Self {
        Self {
            backend,
            credential,
            options,
        }
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Classify an encoded image (data URI or bare base64).
    pub async fn classify(&self, image: &str) -> Result<ClassificationResult, ClassificationError> {
        self.run(|| ImagePayload::parse(image)).await
    }

    /// Classify raw image bytes, e.g. a file read from disk.
    pub async fn classify_bytes(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<ClassificationResult, ClassificationError> {
        self.run(|| ImagePayload::from_bytes(bytes, mime_type)).await
    }

    async fn run<F>(&self, payload: F) -> Result<ClassificationResult, ClassificationError>
    where
        F: FnOnce() -> Result<ImagePayload, FailureCause>,
    {
        match self.try_classify(payload).await {
            Ok(result) => {
                info!(items = result.len(), model = %self.options.model, "classification finished");
                Ok(result)
            }
            Err(cause) => {
                error!(kind = ?cause.kind(), cause = %cause, "classification failed");
                Err(cause.into())
            }
        }
    }

    async fn try_classify<F>(&self, payload: F) -> Result<ClassificationResult, FailureCause>
    where
        F: FnOnce() -> Result<ImagePayload, FailureCause>,
    {
        // Resolved per call so a key supplied after startup is picked up
        let api_key = self
            .credential
            .api_key()
            .ok_or_else(|| FailureCause::MissingCredential(self.credential.describe()))?;

        let payload = payload()?;
        let request = self.build_request(&payload);

        let text = self.backend.generate(&request, &api_key).await?;
        debug!(chars = text.len(), "model answered");

        normalize_response(&text, self.options.structured_output)
    }

    fn build_request(&self, payload: &ImagePayload) -> ModelRequest {
        let (instructions, response_schema) = if self.options.structured_output {
            (STRUCTURED_INSTRUCTIONS, Some(response_schema()))
        } else {
            (FREE_FORM_INSTRUCTIONS, None)
        };

        ModelRequest {
            model: self.options.model.clone(),
            mime_type: payload.mime_type().to_string(),
            image_base64: payload.data().to_string(),
            instructions: instructions.to_string(),
            response_schema,
        }
    }
}
