use serde_json::{Map, Value};

use crate::error::{AnalysisError, ExtractionError};
use crate::models::{AnalysisResponse, Qualities};

/// Reduce a raw model completion to a checked `AnalysisResponse`.
pub fn extract_analysis(completion: &str) -> Result<AnalysisResponse, AnalysisError> {
    let object = extract_json_object(completion)?;
    check_shape(&object)?;

    serde_json::from_value(Value::Object(object)).map_err(|e| AnalysisError::Schema(e.to_string()))
}

/// Find the JSON object in a completion that may be fenced or wrapped in prose.
///
/// Fences are stripped and the remainder parsed directly. If that does not
/// yield an object, the span from the first `{` to the last `}` is parsed
/// instead. Nested braces in surrounding prose can defeat the slice; that is
/// accepted and reported as a parse failure.
pub fn extract_json_object(completion: &str) -> Result<Map<String, Value>, ExtractionError> {
    let text = strip_code_fence(completion);

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) {
        return Ok(object);
    }

    let start = text.find('{').ok_or(ExtractionError::NotFound)?;
    let end = text.rfind('}').ok_or(ExtractionError::NotFound)?;
    if end < start {
        return Err(ExtractionError::NotFound);
    }

    match serde_json::from_str::<Value>(&text[start..=end])? {
        Value::Object(object) => Ok(object),
        _ => Err(ExtractionError::NotFound),
    }
}

/// Strip a leading ```` ```lang ```` line and a trailing ```` ``` ```` if present.
pub fn strip_code_fence(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the rest of the opener line (language tag)
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Top-level shape check; field contents are otherwise passed through.
fn check_shape(object: &Map<String, Value>) -> Result<(), AnalysisError> {
    match object.get("ingredients") {
        None => return Err(AnalysisError::Schema("missing `ingredients`".to_string())),
        Some(Value::Array(_)) => {}
        Some(_) => return Err(AnalysisError::Schema("`ingredients` is not a list".to_string())),
    }

    let qualities = match object.get("qualities") {
        None => return Err(AnalysisError::Schema("missing `qualities`".to_string())),
        Some(Value::Object(qualities)) => qualities,
        Some(_) => return Err(AnalysisError::Schema("`qualities` is not an object".to_string())),
    };

    for name in Qualities::NAMES {
        match qualities.get(name) {
            Some(Value::Number(_)) => {}
            Some(_) => {
                return Err(AnalysisError::Schema(format!("`qualities.{}` is not a number", name)))
            }
            None => return Err(AnalysisError::Schema(format!("missing `qualities.{}`", name))),
        }
    }

    Ok(())
}
