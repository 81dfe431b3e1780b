use crate::error::AnalysisError;

/// A hosted multimodal model that turns a prompt plus one image into text.
///
/// The gateway only sees this trait, so tests can swap in a canned backend.
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Returns the raw completion text for `prompt` and a base64 JPEG.
    async fn generate(&self, prompt: &str, image_base64: &str) -> Result<String, AnalysisError>;
}
