pub mod client; // Caller-side gateway client
pub mod extraction;
pub mod gemini; // Google Gemini generateContent
pub mod generation;
pub mod prompt;

pub use client::{format_analysis_report, GatewayClient};
pub use gemini::GeminiService;
pub use generation::GenerationService;
