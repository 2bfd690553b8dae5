//! Captures: copy values out of a response into the variable store
//!
//! Two sources exist: a path query over the JSON body, or a response header optionally
//! narrowed by a regular expression.

use regex::Regex;
use reqwest::header::HeaderMap;
use serde_json::Value as JsonValue;

use super::assertions::header_value;
use super::query::{self, stringify};
use super::workflow::Capture;
use crate::errors::{RamjamError, Result};

/// Resolve the string value a capture selects from a response
pub fn capture_value(capture: &Capture, body: Option<&JsonValue>, headers: &HeaderMap) -> Result<String> {
    let json_path = capture.json_path.as_deref().filter(|p| !p.is_empty());
    let header = capture.header.as_deref().filter(|h| !h.is_empty());

    match (json_path, header) {
        (Some(path), None) => {
            let value = query::evaluate_body(body, path).map_err(|source| RamjamError::Query {
                path: path.to_string(),
                source,
            })?;
            Ok(stringify(&value))
        }
        (None, Some(name)) => {
            let value = header_value(headers, name);
            match capture.regex.as_deref().filter(|r| !r.is_empty()) {
                Some(pattern) => apply_regex(pattern, name, &value),
                None => Ok(value),
            }
        }
        (None, None) => Err(RamjamError::Capture(format!(
            "capture {} must specify json_path or header",
            capture.target
        ))),
        (Some(_), Some(_)) => Err(RamjamError::Capture(format!(
            "capture {} must specify only one of json_path or header",
            capture.target
        ))),
    }
}

/// First capture group if the pattern has one, otherwise the whole match
fn apply_regex(pattern: &str, header: &str, value: &str) -> Result<String> {
    let re = Regex::new(pattern)
        .map_err(|e| RamjamError::Capture(format!("invalid regex {}: {}", pattern, e)))?;

    let caps = re.captures(value).ok_or_else(|| {
        RamjamError::Capture(format!(
            "regex {} did not match header {} value {:?}",
            pattern, header, value
        ))
    })?;

    // With a group declared, group 1 wins even when it took no part in the match
    let selected = if re.captures_len() > 1 {
        caps.get(1).map_or("", |m| m.as_str())
    } else {
        caps.get(0).map_or("", |m| m.as_str())
    };
    Ok(selected.to_string())
}
