use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::generation::GenerationService;
use super::prompt::IMAGE_MIME_TYPE;
use crate::config::{AuthMode, GeminiConfig, GenerationParams};
use crate::error::AnalysisError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl From<GenerationParams> for GenerationConfig {
    fn from(params: GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Google Gemini `generateContent` client
pub struct GeminiService {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.config.api_base, self.config.model)
    }

    fn build_request(&self, prompt: &str, image_base64: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: IMAGE_MIME_TYPE.to_string(),
                            data: image_base64.to_string(),
                        },
                    },
                ],
            }],
            generation_config: self.config.generation.into(),
        }
    }
}

#[async_trait::async_trait]
impl GenerationService for GeminiService {
    async fn generate(&self, prompt: &str, image_base64: &str) -> Result<String, AnalysisError> {
        let request = self.build_request(prompt, image_base64);

        log::info!("🤖 Sending request to Gemini with model: {}", self.config.model);
        log::debug!("📊 Image payload size: {} bytes (base64)", image_base64.len());

        let mut builder = self.client.post(self.endpoint()).json(&request);
        builder = match self.config.auth_mode {
            AuthMode::QueryParam => builder.query(&[("key", self.config.api_key.as_str())]),
            AuthMode::Bearer => builder.bearer_auth(&self.config.api_key),
        };

        let response = builder.send().await?;
        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Gemini API error ({}): {}", status, error_text);
            return Err(AnalysisError::upstream_status(status, &error_text));
        }

        let response_text = response.text().await?;
        log::debug!("📄 Raw Gemini response size: {} bytes", response_text.len());

        let envelope: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            log::error!("❌ Gemini response is not a generateContent envelope: {}", e);
            AnalysisError::MalformedUpstreamResponse
        })?;

        completion_text(envelope)
    }
}

/// Text of the first part of the first candidate. Later parts are never consulted.
fn completion_text(envelope: GenerateResponse) -> Result<String, AnalysisError> {
    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(AnalysisError::MalformedUpstreamResponse)
}
