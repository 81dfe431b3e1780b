use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResponse};
use crate::services::extraction::extract_analysis;
use crate::services::prompt::ANALYSIS_PROMPT;
use crate::services::GenerationService;

/// Stateless relay between a caller's label photo and the generation model.
///
/// Every call is independent: validate, prompt the model once, extract the
/// JSON analysis from its completion. Nothing is retried or cached.
pub struct AnalysisGateway {
    generator: Arc<dyn GenerationService>,
}

impl AnalysisGateway {
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let image = request.image().ok_or(AnalysisError::InvalidInput)?;

        log::info!("📸 Starting supplement label analysis ({} bytes base64)", image.len());

        let completion = self.generator.generate(ANALYSIS_PROMPT, image).await?;
        log::debug!("💬 Completion received: {} chars", completion.len());

        let analysis = extract_analysis(&completion).map_err(|e| {
            log::warn!("⚠️ Could not extract analysis from completion: {}", e);
            e
        })?;

        log::info!(
            "✅ Analysis complete: {} ingredients, pump={} energy={} focus={} recovery={} endurance={}",
            analysis.ingredients.len(),
            analysis.qualities.pump,
            analysis.qualities.energy,
            analysis.qualities.focus,
            analysis.qualities.recovery,
            analysis.qualities.endurance,
        );

        Ok(analysis)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::test_support::SAMPLE_ANALYSIS;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Canned generation backend
    pub struct StaticGenerator {
        reply: Mutex<Option<Result<String, AnalysisError>>>,
        pub calls: AtomicUsize,
        pub last_image: Mutex<Option<String>>,
    }

    impl StaticGenerator {
        pub fn replying(reply: Result<String, AnalysisError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: AtomicUsize::new(0),
                last_image: Mutex::new(None),
            })
        }

        pub fn text(text: &str) -> Arc<Self> {
            Self::replying(Ok(text.to_string()))
        }
    }

    #[async_trait::async_trait]
    impl GenerationService for StaticGenerator {
        async fn generate(&self, prompt: &str, image_base64: &str) -> Result<String, AnalysisError> {
            assert_eq!(prompt, ANALYSIS_PROMPT);
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_image.lock().unwrap() = Some(image_base64.to_string());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(AnalysisError::MalformedUpstreamResponse))
        }
    }

    #[tokio::test]
    async fn test_analysis_passes_through_model_json() {
        let generator = StaticGenerator::text(SAMPLE_ANALYSIS);
        let gateway = AnalysisGateway::new(generator.clone());

        let analysis = gateway.analyze(AnalysisRequest::new("aW1hZ2U=")).await.unwrap();
        let expected: AnalysisResponse = serde_json::from_str(SAMPLE_ANALYSIS).unwrap();

        assert_eq!(analysis, expected);
        assert_eq!(generator.last_image.lock().unwrap().as_deref(), Some("aW1hZ2U="));
    }

    #[tokio::test]
    async fn test_fenced_completion_matches_plain() {
        let fenced = format!("```json\n{}\n```", SAMPLE_ANALYSIS);
        let gateway = AnalysisGateway::new(StaticGenerator::text(&fenced));

        let analysis = gateway.analyze(AnalysisRequest::new("aW1hZ2U=")).await.unwrap();
        let expected: AnalysisResponse = serde_json::from_str(SAMPLE_ANALYSIS).unwrap();
        assert_eq!(analysis, expected);
    }

    #[tokio::test]
    async fn test_missing_image_skips_model_call() {
        let generator = StaticGenerator::text(SAMPLE_ANALYSIS);
        let gateway = AnalysisGateway::new(generator.clone());

        let err = gateway.analyze(AnalysisRequest::default()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput));

        let err = gateway.analyze(AnalysisRequest::new("")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput));

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let generator = StaticGenerator::replying(Err(AnalysisError::Upstream {
            status: Some(500),
            message: "Gemini API error (500): boom".to_string(),
        }));
        let gateway = AnalysisGateway::new(generator);

        let err = gateway.analyze(AnalysisRequest::new("aW1hZ2U=")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream { status: Some(500), .. }));
    }

    #[tokio::test]
    async fn test_unparseable_completion_fails_without_defaults() {
        let gateway = AnalysisGateway::new(StaticGenerator::text("Sorry, the label is too blurry."));

        let err = gateway.analyze(AnalysisRequest::new("aW1hZ2U=")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Extraction(ExtractionError::NotFound)));
    }
}
