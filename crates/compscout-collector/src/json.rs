//! JSON extraction from free-text reasoning-service responses.
//!
//! Extraction rule, in order:
//! 1. the body of the first fenced code block (with or without a `json` tag);
//! 2. the whole trimmed response, if it starts with `{` and ends with `}`.
//!
//! The extracted text is then decoded strictly into the caller's type.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::ParseError;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").expect("valid fenced block regex")
});

/// Locate the JSON object embedded in `response`, if any.
#[must_use]
pub fn extract_json_object(response: &str) -> Option<&str> {
    if let Some(body) = FENCED_BLOCK
        .captures(response)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
    {
        return Some(body);
    }

    let trimmed = response.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }
    None
}

/// Extract and decode the JSON object embedded in `response`.
///
/// # Errors
///
/// [`ParseError::NoJson`] when nothing matches the extraction rule,
/// [`ParseError::Decode`] when the extracted text is not a `T`.
pub fn decode_embedded<T: DeserializeOwned>(response: &str) -> Result<T, ParseError> {
    let body = extract_json_object(response).ok_or(ParseError::NoJson)?;
    Ok(serde_json::from_str(body)?)
}
