//! Response classifier
//!
//! Pure mapping from (response headers, response body) to a
//! [`ClassifiedResult`]. Total function: every response maps to some result,
//! including undecodable JSON bodies.

use std::collections::HashMap;

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::types::ClassifiedResult;

/// Content-type markers that indicate a binary media payload.
const BINARY_CONTENT_MARKERS: &[&str] = &["application/", "video/", "audio/"];

/// Fallback filename when content-disposition is absent or unparseable.
const DEFAULT_FILENAME: &str = "output";

static FILENAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filename="?([^"]+)"?"#).expect("filename pattern is valid"));

/// Classify a response as binary media or JSON.
///
/// Binary when the content-type carries an `application/`, `video/`, or
/// `audio/` marker — except `application/json`, which is decoded like any
/// other JSON body. A JSON body that fails to decode is wrapped under a
/// `raw` field rather than failing the item.
pub fn classify(headers: &HashMap<String, String>, body: &Bytes) -> ClassifiedResult {
    let content_type = headers
        .get("content-type")
        .map(String::as_str)
        .unwrap_or("");

    let is_json = content_type.contains("application/json");
    if !is_json
        && BINARY_CONTENT_MARKERS
            .iter()
            .any(|marker| content_type.contains(marker))
    {
        let filename = headers
            .get("content-disposition")
            .and_then(|value| extract_filename(value))
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        return ClassifiedResult::Binary {
            payload: body.clone(),
            filename,
            content_type: content_type.to_string(),
        };
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(decoded) => ClassifiedResult::Json(decoded),
        Err(_) => ClassifiedResult::Json(serde_json::json!({
            "raw": String::from_utf8_lossy(body),
        })),
    }
}

/// Extract the filename from a content-disposition header value.
/// Quotes around the name are optional.
fn extract_filename(disposition: &str) -> Option<String> {
    FILENAME_PATTERN
        .captures(disposition)
        .map(|captures| captures[1].to_string())
}
