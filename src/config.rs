use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How the API key travels to the generation endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    QueryParam, // ?key=...
    Bearer,     // Authorization: Bearer ...
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "query" | "key" => Ok(AuthMode::QueryParam),
            "bearer" | "header" => Ok(AuthMode::Bearer),
            other => anyhow::bail!("unknown auth mode '{}' (expected 'query' or 'bearer')", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

/// Settings for the outbound Gemini call
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub auth_mode: AuthMode,
    pub generation: GenerationParams,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("auth_mode", &self.auth_mode)
            .field("generation", &self.generation)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub gemini: GeminiConfig,
    pub bind_addr: String,
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY must be set in .env file")?;

        let defaults = GenerationParams::default();
        let generation = GenerationParams {
            temperature: parse_or(&lookup, "GEMINI_TEMPERATURE", defaults.temperature)?,
            top_p: parse_or(&lookup, "GEMINI_TOP_P", defaults.top_p)?,
            top_k: parse_or(&lookup, "GEMINI_TOP_K", defaults.top_k)?,
            max_output_tokens: parse_or(&lookup, "GEMINI_MAX_OUTPUT_TOKENS", defaults.max_output_tokens)?,
        };

        let gemini = GeminiConfig {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: lookup("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            auth_mode: parse_or(&lookup, "GEMINI_AUTH_MODE", AuthMode::QueryParam)?,
            generation,
            timeout: Duration::from_secs(parse_or(&lookup, "GEMINI_TIMEOUT_SECS", 60u64)?),
        };

        Ok(Self {
            gemini,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: '{}' ({})", key, raw, e)),
        None => Ok(default),
    }
}
