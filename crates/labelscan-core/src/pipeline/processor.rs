//! Extraction orchestration: encode images, prompt the model, parse or fall back.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::PipelineError;
use crate::llm::{build_message, LlmProvider, LlmRequest};
use crate::schema::SchemaTemplate;
use crate::types::Extraction;

use super::encode::{encode_image, EncodedImage};
use super::extract::extract_record;

/// One or more image paths, normalized to an ordered sequence.
///
/// A single path converts to a one-element sequence, so
/// `initialize_images("a.jpg")` and `initialize_images(vec!["a.jpg"])` are
/// the same call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePaths(Vec<PathBuf>);

impl ImagePaths {
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }
}

impl From<&str> for ImagePaths {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<String> for ImagePaths {
    fn from(path: String) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<&Path> for ImagePaths {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for ImagePaths {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for ImagePaths {
    fn from(paths: Vec<P>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl<P: Into<PathBuf> + Clone> From<&[P]> for ImagePaths {
    fn from(paths: &[P]) -> Self {
        Self(paths.iter().cloned().map(Into::into).collect())
    }
}

impl<P: Into<PathBuf>, const N: usize> From<[P; N]> for ImagePaths {
    fn from(paths: [P; N]) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

/// An immutable set of encoded images for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRequest {
    images: Vec<EncodedImage>,
}

impl ExtractionRequest {
    pub fn new(images: Vec<EncodedImage>) -> Self {
        Self { images }
    }

    /// Encode every path, in input order. The first unreadable file aborts.
    pub fn from_paths(paths: impl Into<ImagePaths>) -> Result<Self, PipelineError> {
        let paths: ImagePaths = paths.into();
        let images = paths
            .as_slice()
            .iter()
            .map(|path| encode_image(path))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { images })
    }

    pub fn images(&self) -> &[EncodedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Drives a single product through the model.
///
/// Holds the API client and the images of the current product. Not meant to
/// be shared between callers; use [`Processor::extract`] with separate
/// [`ExtractionRequest`]s for that.
pub struct Processor {
    provider: Box<dyn LlmProvider>,
    template: SchemaTemplate,
    request: ExtractionRequest,
}

impl Processor {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            template: SchemaTemplate::default(),
            request: ExtractionRequest::default(),
        }
    }

    /// Replace the held images with freshly encoded ones, in input order.
    ///
    /// On failure the held images are cleared and the error is returned.
    pub fn initialize_images(&mut self, paths: impl Into<ImagePaths>) -> Result<(), PipelineError> {
        match ExtractionRequest::from_paths(paths) {
            Ok(request) => {
                tracing::debug!("Initialized {} image(s)", request.len());
                self.request = request;
                Ok(())
            }
            Err(e) => {
                self.request = ExtractionRequest::default();
                Err(e)
            }
        }
    }

    /// Images currently held.
    pub fn images(&self) -> &[EncodedImage] {
        self.request.images()
    }

    /// Run the held images through the model.
    pub async fn run(&self) -> Extraction {
        self.extract(&self.request).await
    }

    /// Run `request` through the model: one API call, no retries.
    ///
    /// Never fails. An API failure or an unparseable reply yields the
    /// template, with the cause in [`Extraction::fallback`].
    pub async fn extract(&self, request: &ExtractionRequest) -> Extraction {
        let message = build_message(&self.template, request.images());
        let llm_request = LlmRequest::new(message);

        tracing::debug!(
            "Submitting {} image(s) to {} ({})",
            request.len(),
            self.provider.name(),
            self.provider.model()
        );

        let start = Instant::now();
        let response = match self.provider.generate(&llm_request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("LLM API call failed, returning template: {e}");
                return Extraction::fallback(&self.template, e);
            }
        };
        let latency = start.elapsed();
        tracing::info!("LLM execution took {:.2}s", latency.as_secs_f64());

        let mut extraction = match extract_record(&response.text) {
            Ok(record) => {
                tracing::debug!("Parsed record: {record}");
                Extraction {
                    record,
                    fallback: None,
                    latency: None,
                    model: None,
                    tokens_used: None,
                }
            }
            Err(e) => {
                tracing::warn!("{e}; returning template");
                tracing::debug!("Raw model output: {}", response.text);
                Extraction::fallback(&self.template, e)
            }
        };
        extraction.latency = Some(latency);
        extraction.model = Some(response.model);
        extraction.tokens_used = response.tokens_used;
        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ContentPart, LlmResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Stub provider replaying a fixed reply and recording each request.
    struct StubProvider {
        reply: Result<String, (String, Option<u16>)>,
        calls: Arc<Mutex<Vec<LlmRequest>>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> (Self, Arc<Mutex<Vec<LlmRequest>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let stub = Self {
                reply: Ok(text.to_string()),
                calls: calls.clone(),
            };
            (stub, calls)
        }

        fn failing(message: &str, status_code: Option<u16>) -> (Self, Arc<Mutex<Vec<LlmRequest>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let stub = Self {
                reply: Err((message.to_string(), status_code)),
                calls: calls.clone(),
            };
            (stub, calls)
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }

        async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
            self.calls.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(LlmResponse {
                    text: text.clone(),
                    model: "stub-model".to_string(),
                    tokens_used: Some(10),
                }),
                Err((message, status_code)) => Err(PipelineError::Upstream {
                    message: message.clone(),
                    status_code: *status_code,
                }),
            }
        }
    }

    fn template() -> serde_json::Value {
        SchemaTemplate::default().to_value()
    }

    fn write_images(names: &[&str]) -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let paths = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let path = dir.path().join(name);
                std::fs::write(&path, vec![i as u8; 8]).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_image_paths_single_equals_one_element_sequence() {
        assert_eq!(ImagePaths::from("a.jpg"), ImagePaths::from(vec!["a.jpg"]));
        assert_eq!(
            ImagePaths::from(PathBuf::from("a.jpg")),
            ImagePaths::from(["a.jpg"])
        );
    }

    #[test]
    fn test_initialize_single_path_matches_sequence() {
        let (_dir, paths) = write_images(&["front.jpg"]);

        let (stub, _) = StubProvider::replying("{}");
        let mut single = Processor::new(Box::new(stub));
        single.initialize_images(paths[0].as_path()).unwrap();

        let (stub, _) = StubProvider::replying("{}");
        let mut sequence = Processor::new(Box::new(stub));
        sequence.initialize_images(paths.clone()).unwrap();

        assert_eq!(single.images(), sequence.images());
        assert_eq!(single.images().len(), 1);
    }

    #[test]
    fn test_initialize_replaces_previous_images() {
        let (_dir, paths) = write_images(&["a.jpg", "b.png", "c.webp"]);
        let (stub, _) = StubProvider::replying("{}");
        let mut processor = Processor::new(Box::new(stub));

        processor.initialize_images(&paths[..2]).unwrap();
        assert_eq!(processor.images().len(), 2);

        processor.initialize_images(paths[2].clone()).unwrap();
        assert_eq!(processor.images().len(), 1);
        assert_eq!(processor.images()[0].media_type(), "image/webp");
    }

    #[test]
    fn test_initialize_missing_file_propagates_and_clears() {
        let (dir, paths) = write_images(&["a.jpg"]);
        let (stub, _) = StubProvider::replying("{}");
        let mut processor = Processor::new(Box::new(stub));
        processor.initialize_images(paths.clone()).unwrap();

        let err = processor
            .initialize_images(vec![paths[0].clone(), dir.path().join("missing.jpg")])
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileAccess { .. }));
        assert!(processor.images().is_empty());
    }

    #[tokio::test]
    async fn test_run_sends_text_then_images_in_order() {
        let (_dir, paths) = write_images(&["1.jpg", "2.png"]);
        let (stub, calls) = StubProvider::replying(r#"{"name": "Milk"}"#);
        let mut processor = Processor::new(Box::new(stub));
        processor.initialize_images(paths).unwrap();

        processor.run().await;

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let parts = &calls[0].message.parts;
        assert_eq!(parts.len(), 3);
        match &parts[0] {
            ContentPart::Text(text) => {
                assert!(text.contains(&SchemaTemplate::default().to_json_string()))
            }
            other => panic!("expected text part first, got {other:?}"),
        }
        assert_eq!(
            parts[1],
            ContentPart::Image(processor.images()[0].as_str().to_string())
        );
        assert_eq!(
            parts[2],
            ContentPart::Image(processor.images()[1].as_str().to_string())
        );
    }

    #[tokio::test]
    async fn test_run_parses_record_inside_prose() {
        let (stub, calls) = StubProvider::replying(r#"prefix { "name": "Milk" } suffix"#);
        let processor = Processor::new(Box::new(stub));

        let extraction = processor.run().await;

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert!(!extraction.is_fallback());
        assert_eq!(extraction.record, json!({"name": "Milk"}));
        assert!(extraction.latency.is_some());
        assert_eq!(extraction.model.as_deref(), Some("stub-model"));
        assert_eq!(extraction.tokens_used, Some(10));
    }

    #[tokio::test]
    async fn test_run_without_braces_returns_template() {
        for reply in ["Не удалось распознать текст", "only a closing }", "{ only opening", ""] {
            let (stub, _) = StubProvider::replying(reply);
            let processor = Processor::new(Box::new(stub));
            let extraction = processor.run().await;
            assert_eq!(extraction.record, template(), "reply: {reply:?}");
            assert!(matches!(
                extraction.fallback,
                Some(PipelineError::ResponseFormat { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_run_multiple_objects_falls_back() {
        let (stub, _) = StubProvider::replying(r#"{"a":1} noise {"b":2}"#);
        let processor = Processor::new(Box::new(stub));
        let extraction = processor.run().await;
        assert_eq!(extraction.record, template());
        assert!(extraction.latency.is_some());
    }

    #[tokio::test]
    async fn test_run_upstream_error_returns_template() {
        let (stub, calls) = StubProvider::failing("HTTP 401 Unauthorized", Some(401));
        let processor = Processor::new(Box::new(stub));

        let extraction = processor.run().await;

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(extraction.record, template());
        assert!(extraction.latency.is_none());
        match extraction.fallback {
            Some(PipelineError::Upstream { status_code, .. }) => {
                assert_eq!(status_code, Some(401))
            }
            other => panic!("expected Upstream fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_each_run_is_exactly_one_call() {
        let (stub, calls) = StubProvider::failing("connection reset", None);
        let processor = Processor::new(Box::new(stub));
        processor.run().await;
        processor.run().await;
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_extract_with_explicit_request() {
        let (_dir, paths) = write_images(&["label.jpg"]);
        let request = ExtractionRequest::from_paths(paths).unwrap();
        let (stub, calls) = StubProvider::replying(r#"{"category": "Молочные продукты"}"#);
        let processor = Processor::new(Box::new(stub));

        let extraction = processor.extract(&request).await;

        assert!(processor.images().is_empty());
        assert_eq!(calls.lock().unwrap()[0].message.image_count(), 1);
        assert_eq!(extraction.record["category"], "Молочные продукты");
    }

    #[tokio::test]
    async fn test_fallback_template_is_pristine_every_time() {
        let (stub, _) = StubProvider::replying("no json");
        let processor = Processor::new(Box::new(stub));
        let first = processor.run().await.into_record();
        let second = processor.run().await.into_record();
        assert_eq!(first, template());
        assert_eq!(second, template());
    }
}
