use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /analyze`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub image: Option<String>, // base64 JPEG, not validated beyond presence
}

impl AnalysisRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
        }
    }

    /// Image payload if present and non-empty
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, deserialize_with = "quantity")]
    pub quantity: String, // dosage as printed on the label, e.g. "200mg"
    #[serde(default, deserialize_with = "effects")]
    pub effects: Vec<String>,
}

/// `null` reads as an unknown quantity.
fn quantity<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Effects {
    One(String),
    Many(Vec<String>),
}

/// Accepts a list of sentences, a single sentence, or `null`.
fn effects<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Effects>::deserialize(deserializer)? {
        Some(Effects::Many(effects)) => effects,
        Some(Effects::One(effect)) if !effect.trim().is_empty() => vec![effect],
        Some(Effects::One(_)) | None => Vec::new(),
    })
}

/// Five quality scores, nominally 1-100. Ranges are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualities {
    #[serde(deserialize_with = "score")]
    pub pump: i64,
    #[serde(deserialize_with = "score")]
    pub energy: i64,
    #[serde(deserialize_with = "score")]
    pub focus: i64,
    #[serde(deserialize_with = "score")]
    pub recovery: i64,
    #[serde(deserialize_with = "score")]
    pub endurance: i64,
}

impl Qualities {
    pub const NAMES: [&'static str; 5] = ["pump", "energy", "focus", "recovery", "endurance"];

    /// (name, score) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> {
        let scores = [self.pump, self.energy, self.focus, self.recovery, self.endurance];
        Self::NAMES.into_iter().zip(scores)
    }
}

/// Accepts any JSON number; floats are rounded to the nearest integer.
fn score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    number
        .as_f64()
        .map(|value| value.round() as i64)
        .ok_or_else(|| serde::de::Error::custom(format!("score out of range: {}", number)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub ingredients: Vec<Ingredient>,
    pub qualities: Qualities,
}

/// JSON error envelope returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
