use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::GenerationError;

/// Models sometimes wrap JSON in a Markdown fence despite being told not to.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // drop an info string ("json") only when whitespace follows it, so the
    // fence may sit on the same line as the payload
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let after_tag = &rest[tag_len..];
    let body = if after_tag.starts_with(char::is_whitespace) {
        after_tag
    } else {
        rest
    };
    body.trim()
}

fn parse_value(text: &str) -> Result<Value, GenerationError> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| GenerationError::Malformed(format!("invalid JSON: {}", e)))
}

/// Parse a JSON array of `T`. Elements that do not fit `T` are dropped;
/// anything that is not an array is malformed.
pub fn json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, GenerationError> {
    let value = parse_value(text)?;
    let Value::Array(elements) = value else {
        return Err(GenerationError::Malformed(format!(
            "expected a JSON array, got {}",
            kind_of(&value)
        )));
    };

    let total = elements.len();
    let parsed: Vec<T> = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value(element) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Dropping generated element: {}", e);
                None
            }
        })
        .collect();

    if parsed.len() < total {
        debug!("Kept {} of {} generated elements", parsed.len(), total);
    }
    Ok(parsed)
}

pub fn json_object<T: DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    let value = parse_value(text)?;
    if !value.is_object() {
        return Err(GenerationError::Malformed(format!(
            "expected a JSON object, got {}",
            kind_of(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| GenerationError::Malformed(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
