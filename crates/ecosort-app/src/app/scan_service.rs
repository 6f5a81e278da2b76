//! Scan Service - classify an image and record it in history
//!
//! 1. Read the image input
//! 2. Classify it through the vision adapter
//! 3. On success, stamp the result and store it in history
//!
//! A failed classification never touches the history file.

use ecosort_store::HistoryStore;
use ecosort_types::{ClassificationResult, Error, Result, ScanResult};
use ecosort_vision::{Classifier, ClassifierOptions, GeminiBackend, VisionBackend};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;

/// Image handed to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Data URI or bare base64 text
    Encoded(String),
    /// Raw file contents
    Bytes { data: Vec<u8>, mime_type: String },
}

impl ImageInput {
    /// Read an image file, or a `.txt`/`.b64` file holding a data URI or base64 text.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if matches!(ext.as_str(), "txt" | "b64") {
            return Ok(ImageInput::Encoded(std::fs::read_to_string(path)?));
        }

        let mime_type = mime_for_extension(&ext)
            .ok_or_else(|| Error::UnsupportedImage(path.display().to_string()))?;
        Ok(ImageInput::Bytes {
            data: std::fs::read(path)?,
            mime_type: mime_type.to_string(),
        })
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Options for a single scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Store the result in history
    pub record: bool,
    /// Caller-side bound on latency; the adapter itself has none
    pub timeout: Option<Duration>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            record: true,
            timeout: None,
        }
    }
}

impl ScanOptions {
    pub fn with_record(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of a scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub result: ClassificationResult,
    /// History entry, when the scan was recorded
    pub scan: Option<ScanResult>,
}

/// Classification use case bound to a history location
pub struct ScanService<B> {
    classifier: Classifier<B>,
    store_dir: PathBuf,
    history_limit: usize,
}

impl ScanService<GeminiBackend> {
    /// Build the Gemini-backed service described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let options = ClassifierOptions::default()
            .with_model(Some(config.model.clone()))
            .with_structured_output(config.structured_output);
        let classifier = Classifier::new(
            GeminiBackend::new(config.api_base.clone()),
            Box::new(config.credential()),
            options,
        );
        Ok(Self::new(classifier, config.store_dir()?, config.history_limit))
    }
}

impl<B: VisionBackend> ScanService<B> {
    pub fn new(classifier: Classifier<B>, store_dir: PathBuf, history_limit: usize) -> Self {
        Self {
            classifier,
            store_dir,
            history_limit,
        }
    }

    /// Classify an image and, if asked to, add it to history
    pub async fn scan(&self, image: &ImageInput, options: &ScanOptions) -> Result<ScanOutcome> {
        let result = match options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.classify(image))
                .await
                .map_err(|_| Error::Timeout(limit.as_secs()))??,
            None => self.classify(image).await?,
        };

        if !options.record {
            debug!(items = result.len(), "scan not recorded");
            return Ok(ScanOutcome { result, scan: None });
        }

        let mut store = HistoryStore::open(self.store_dir.clone(), self.history_limit)?;
        let scan = store.record(result.clone())?;
        info!(id = %scan.id, items = scan.items.len(), "scan recorded");

        Ok(ScanOutcome {
            result,
            scan: Some(scan),
        })
    }

    async fn classify(&self, image: &ImageInput) -> Result<ClassificationResult> {
        let result = match image {
            ImageInput::Encoded(text) => self.classifier.classify(text).await?,
            ImageInput::Bytes { data, mime_type } => {
                self.classifier.classify_bytes(data, mime_type).await?
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ecosort_types::{BackendError, FailureKind, WasteCategory};
    use ecosort_vision::{ModelRequest, StaticCredential};
    use tempfile::tempdir;

    struct FixedBackend(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl VisionBackend for FixedBackend {
        async fn generate(
            &self,
            _request: &ModelRequest,
            _api_key: &str,
        ) -> std::result::Result<String, BackendError> {
            self.0
                .map(str::to_string)
                .map_err(|e| BackendError::Transport(e.to_string()))
        }
    }

    struct SlowBackend;

    #[async_trait]
    impl VisionBackend for SlowBackend {
        async fn generate(
            &self,
            _request: &ModelRequest,
            _api_key: &str,
        ) -> std::result::Result<String, BackendError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(r#"{"items":[]}"#.to_string())
        }
    }

    fn service<B: VisionBackend>(backend: B, dir: &Path) -> ScanService<B> {
        let classifier = Classifier::new(
            backend,
            Box::new(StaticCredential(Some("key".to_string()))),
            ClassifierOptions::default(),
        );
        ScanService::new(classifier, dir.to_path_buf(), 20)
    }

    fn image() -> ImageInput {
        ImageInput::Encoded("aGVsbG8=".to_string())
    }

    #[tokio::test]
    async fn test_successful_scan_is_recorded() {
        let dir = tempdir().unwrap();
        let svc = service(
            FixedBackend(Ok(r#"{"items":[{"itemName":"Can","category":"metal"}]}"#)),
            dir.path(),
        );

        let outcome = svc.scan(&image(), &ScanOptions::default()).await.unwrap();
        assert_eq!(outcome.result.items[0].category, WasteCategory::Recyclable);
        let scan = outcome.scan.unwrap();

        let store = HistoryStore::open(dir.path().to_path_buf(), 20).unwrap();
        assert_eq!(store.entries()[0].id, scan.id);
    }

    #[tokio::test]
    async fn test_failed_scan_records_nothing() {
        let dir = tempdir().unwrap();
        let svc = service(FixedBackend(Ok("{\"items\": [")), dir.path());

        let err = svc.scan(&image(), &ScanOptions::default()).await.unwrap_err();
        match err {
            Error::Classification(e) => assert_eq!(e.kind(), FailureKind::Format),
            other => panic!("unexpected error: {:?}", other),
        }

        let store = HistoryStore::open(dir.path().to_path_buf(), 20).unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_records_nothing() {
        let dir = tempdir().unwrap();
        let svc = service(FixedBackend(Err("connection refused")), dir.path());
        assert!(svc.scan(&image(), &ScanOptions::default()).await.is_err());
        assert!(HistoryStore::open(dir.path().to_path_buf(), 20).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_without_recording() {
        let dir = tempdir().unwrap();
        let svc = service(FixedBackend(Ok(r#"{"items":[]}"#)), dir.path());
        let outcome = svc
            .scan(&image(), &ScanOptions::default().with_record(false))
            .await
            .unwrap();
        assert!(outcome.scan.is_none());
        assert!(HistoryStore::open(dir.path().to_path_buf(), 20).unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_timeout() {
        let dir = tempdir().unwrap();
        let svc = service(SlowBackend, dir.path());
        let options = ScanOptions::default().with_timeout(Some(Duration::from_secs(5)));

        let err = svc.scan(&image(), &options).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(5)));
        assert!(HistoryStore::open(dir.path().to_path_buf(), 20).unwrap().is_empty());
    }

    #[test]
    fn test_image_input_from_path() {
        let dir = tempdir().unwrap();

        let jpg = dir.path().join("photo.JPG");
        std::fs::write(&jpg, b"\xff\xd8\xff").unwrap();
        match ImageInput::from_path(&jpg).unwrap() {
            ImageInput::Bytes { data, mime_type } => {
                assert_eq!(mime_type, "image/jpeg");
                assert_eq!(data.len(), 3);
            }
            other => panic!("unexpected input: {:?}", other),
        }

        let txt = dir.path().join("capture.txt");
        std::fs::write(&txt, "data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(
            ImageInput::from_path(&txt).unwrap(),
            ImageInput::Encoded("data:image/png;base64,aGVsbG8=".to_string())
        );

        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();
        assert!(matches!(ImageInput::from_path(&pdf), Err(Error::UnsupportedImage(_))));

        assert!(matches!(
            ImageInput::from_path(&dir.path().join("missing.png")),
            Err(Error::FileNotFound(_))
        ));
    }
}
