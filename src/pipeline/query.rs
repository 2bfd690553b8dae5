//! Path queries over parsed JSON responses
//!
//! A small language, tried in this order:
//!
//! - `$[?(@.field==value)]` optionally followed by `.rest`: equality filter over a root array
//! - `$[N]` optionally followed by `.rest`: index into a root array
//! - `$.a.b[0].c`: dotted fields, each optionally carrying one `[N]` index
//!
//! Values are compared by their string form (see [`stringify`]), so a JSON number `30`
//! matches an expectation written as `"30"`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use thiserror::Error;

static FILTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\$\[\?\(@\.([A-Za-z0-9_\-]+)==['"]?([^'"]+)['"]?\)\](?:\.(.*))?$"#).unwrap()
});
static INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$\[([0-9]+)\](?:\.(.*))?$").unwrap()
});

/// Why a path query could not be evaluated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty path")]
    Empty,

    #[error("no JSON body to query")]
    NoBody,

    #[error("expected array for {0}")]
    ExpectedArray(String),

    #[error("expected object for segment {0}")]
    ExpectedObject(String),

    #[error("index out of range for {0}")]
    IndexOutOfRange(String),

    #[error("invalid index in segment {0}")]
    InvalidIndex(String),

    #[error("no match for filter {0}")]
    NoMatch(String),
}

/// Evaluate a query against an optional response body.
///
/// An absent body is a valid state for a response; it only becomes an error once
/// something actually queries it.
pub fn evaluate_body(body: Option<&JsonValue>, path: &str) -> Result<JsonValue, QueryError> {
    match body {
        Some(value) => evaluate(value, path),
        None if path.trim().is_empty() => Err(QueryError::Empty),
        None => Err(QueryError::NoBody),
    }
}

/// Evaluate a query against a JSON value, returning the selected sub-value.
pub fn evaluate(value: &JsonValue, path: &str) -> Result<JsonValue, QueryError> {
    let query = path.trim();
    if query.is_empty() {
        return Err(QueryError::Empty);
    }

    if let Some(caps) = FILTER_RE.captures(query) {
        let field = &caps[1];
        let expected = &caps[2];
        let items = value
            .as_array()
            .ok_or_else(|| QueryError::ExpectedArray(format!("filter {}", query)))?;

        let matches: Vec<&JsonValue> = items
            .iter()
            .filter(|item| {
                item.as_object()
                    .and_then(|obj| obj.get(field))
                    .map(|v| stringify(v) == expected)
                    .unwrap_or(false)
            })
            .collect();

        let first = matches
            .first()
            .ok_or_else(|| QueryError::NoMatch(query.to_string()))?;

        return match caps.get(3).map(|m| m.as_str()).filter(|rest| !rest.is_empty()) {
            Some(rest) => evaluate(first, rest),
            None => Ok(JsonValue::Array(matches.into_iter().cloned().collect())),
        };
    }

    if let Some(caps) = INDEX_RE.captures(query) {
        let items = value
            .as_array()
            .ok_or_else(|| QueryError::ExpectedArray(format!("index {}", query)))?;
        let selected = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get(idx))
            .ok_or_else(|| QueryError::IndexOutOfRange(query.to_string()))?;

        return match caps.get(2).map(|m| m.as_str()).filter(|rest| !rest.is_empty()) {
            Some(rest) => evaluate(selected, rest),
            None => Ok(selected.clone()),
        };
    }

    evaluate_dotted(value, query)
}

fn evaluate_dotted<'a>(value: &'a JsonValue, query: &str) -> Result<JsonValue, QueryError> {
    let trimmed = query
        .strip_prefix("$.")
        .or_else(|| query.strip_prefix('$'))
        .unwrap_or(query);

    let mut current: &'a JsonValue = value;
    for segment in trimmed.split('.').filter(|s| !s.is_empty()) {
        let (name, index) = split_segment(segment)?;

        if !name.is_empty() {
            let obj = current
                .as_object()
                .ok_or_else(|| QueryError::ExpectedObject(name.to_string()))?;
            // Missing key selects null
            current = obj.get(name).unwrap_or(&JsonValue::Null);
        }

        if let Some(idx) = index {
            let items = current
                .as_array()
                .ok_or_else(|| QueryError::ExpectedArray(format!("segment {}", segment)))?;
            current = items
                .get(idx)
                .ok_or_else(|| QueryError::IndexOutOfRange(format!("segment {}", segment)))?;
        }
    }

    Ok(current.clone())
}

/// Split `name[3]` into its field name and optional index
fn split_segment(segment: &str) -> Result<(&str, Option<usize>), QueryError> {
    if !segment.ends_with(']') {
        return Ok((segment, None));
    }
    let Some((name, rest)) = segment.split_once('[') else {
        return Ok((segment, None));
    };

    let raw = &rest[..rest.len() - 1];
    if raw.is_empty() {
        return Ok((name, None));
    }
    let idx = raw
        .parse::<usize>()
        .map_err(|_| QueryError::InvalidIndex(segment.to_string()))?;
    Ok((name, Some(idx)))
}

/// String form of a JSON value used for every comparison and capture.
///
/// Strings are taken verbatim (no quotes) and whole-number floats drop their `.0`, so
/// `10.0` reads as `10`. Everything else uses its compact JSON text.
pub fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
