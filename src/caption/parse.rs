//! Parsing of raw provider output into caption fields.

use serde_json::Value;

use crate::{Result, WartaError};

/// Caption fields extracted from a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCaption {
    pub caption: String,
    pub hashtags: Vec<String>,
}

/// Parse `{"caption": "...", "hashtags": [...]}` out of raw model output.
///
/// A surrounding Markdown code fence is tolerated. `caption` must be a
/// non-empty string and `hashtags` an array of strings; both are trimmed and
/// blank hashtags are dropped.
pub fn parse_caption(raw: &str) -> Result<ParsedCaption> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| WartaError::Parse(format!("not a JSON object: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| WartaError::Parse("expected a JSON object".into()))?;

    let caption = object
        .get("caption")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| WartaError::Parse("missing or empty `caption`".into()))?;

    let hashtags = object
        .get("hashtags")
        .and_then(Value::as_array)
        .ok_or_else(|| WartaError::Parse("missing `hashtags` array".into()))?
        .iter()
        .map(|tag| {
            tag.as_str()
                .map(str::trim)
                .ok_or_else(|| WartaError::Parse("non-string entry in `hashtags`".into()))
        })
        .filter(|tag| !matches!(tag, Ok("")))
        .map(|tag| tag.map(str::to_string))
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedCaption {
        caption: caption.to_string(),
        hashtags,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_suffix("```").unwrap_or(rest);
    // Drop an info string such as `json` on the opening fence line.
    match body.split_once('\n') {
        Some((info, content)) if !info.trim_start().starts_with('{') => content.trim(),
        _ => body.trim(),
    }
}
