use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine};
use std::fs;
use std::path::Path;

use crate::models::{AnalysisRequest, AnalysisResponse, ErrorBody};

/// Caller-side client for a running gateway, as used by the mobile app.
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn analyze_image_file(&self, image_path: &Path) -> Result<AnalysisResponse> {
        let image_data = fs::read(image_path)
            .with_context(|| format!("Failed to read image file {}", image_path.display()))?;
        log::debug!("📊 Image file size: {} bytes", image_data.len());

        self.analyze_image(&image_data).await
    }

    pub async fn analyze_image(&self, image_data: &[u8]) -> Result<AnalysisResponse> {
        let request = AnalysisRequest::new(general_purpose::STANDARD.encode(image_data));
        let url = format!("{}/analyze", self.base_url);

        log::info!("📤 Sending label photo to {}", url);
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("Gateway error ({}): {}", status, message);
        }

        serde_json::from_str(&body).context("Unable to parse response from server")
    }
}

/// Human-readable report of an analysis
pub fn format_analysis_report(analysis: &AnalysisResponse) -> String {
    let mut report = String::from("=== Supplement Analysis ===\n\nIngredients:\n");

    for ingredient in &analysis.ingredients {
        if ingredient.quantity.is_empty() {
            report.push_str(&format!("\n• {}\n", ingredient.name));
        } else {
            report.push_str(&format!("\n• {} ({})\n", ingredient.name, ingredient.quantity));
        }
        for effect in &ingredient.effects {
            report.push_str(&format!("  - {}\n", effect));
        }
    }

    report.push_str("\nQuality Ratings (out of 100):\n");
    for (name, score) in analysis.qualities.iter() {
        report.push_str(&format!("• {}: {}\n", title_case(name), score));
    }

    report
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
