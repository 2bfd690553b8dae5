//! Response expectations: status, headers, and path-query values
//!
//! Each check returns on the first mismatch with a message carrying both the expected and
//! the actual value.

use reqwest::header::HeaderMap;
use serde_json::Value as JsonValue;

use super::progress::ProgressLog;
use super::query::{self, stringify};
use super::variables::Variables;
use super::workflow::{HeaderExpectation, JsonPathMatch};
use crate::errors::{RamjamError, Result};

/// Check an exact status expectation, if one is declared. `0` counts as undeclared.
pub fn check_status(expected: Option<u16>, actual: u16) -> Result<()> {
    match expected {
        Some(expected) if expected != 0 && expected != actual => Err(RamjamError::Assertion(format!(
            "expected status {}, got {}",
            expected, actual
        ))),
        _ => Ok(()),
    }
}

/// Check one header expectation.
///
/// Exactly one of `value` (equality) or `contains` (substring) must be declared. A header
/// missing from the response compares as the empty string.
pub fn check_header(
    expectation: &HeaderExpectation,
    headers: &HeaderMap,
    vars: &Variables,
    log: &mut ProgressLog,
) -> Result<()> {
    let name = expectation.name.trim();
    if name.is_empty() {
        return Err(RamjamError::Assertion(
            "header expectation must specify a name".to_string(),
        ));
    }

    let actual = header_value(headers, name);
    match (non_empty(&expectation.value), non_empty(&expectation.contains)) {
        (Some(value), None) => {
            let expected = vars.substitute(value);
            log.detail(format!("Asserting header {} == {}", name, expected));
            if actual != expected {
                return Err(RamjamError::Assertion(format!(
                    "expected header {} to equal {:?}, got {:?}",
                    name, expected, actual
                )));
            }
        }
        (None, Some(contains)) => {
            let expected = vars.substitute(contains);
            log.detail(format!("Asserting header {} contains {}", name, expected));
            if !actual.contains(&expected) {
                return Err(RamjamError::Assertion(format!(
                    "expected header {} to contain {:?}, got {:?}",
                    name, expected, actual
                )));
            }
        }
        (None, None) => {
            return Err(RamjamError::Assertion(format!(
                "header expectation for {} must specify value or contains",
                name
            )));
        }
        (Some(_), Some(_)) => {
            return Err(RamjamError::Assertion(format!(
                "header expectation for {} must specify only one of value or contains",
                name
            )));
        }
    }

    Ok(())
}

/// Check one path-query expectation against the parsed body.
///
/// The declared value is compared in its string form after substitution, so `30` and
/// `"30"` are equivalent.
pub fn check_json_path(
    matcher: &JsonPathMatch,
    body: Option<&JsonValue>,
    vars: &Variables,
    log: &mut ProgressLog,
) -> Result<()> {
    let actual = query::evaluate_body(body, &matcher.path).map_err(|source| RamjamError::Query {
        path: matcher.path.clone(),
        source,
    })?;

    let expected = vars.substitute(&stringify(&matcher.value));
    log.detail(format!("Asserting {} == {}", matcher.path, expected));

    let actual = stringify(&actual);
    if actual != expected {
        return Err(RamjamError::Assertion(format!(
            "jsonpath {} expected {:?}, got {:?}",
            matcher.path, expected, actual
        )));
    }
    Ok(())
}

/// First value of a response header, or the empty string when absent
pub fn header_value(headers: &HeaderMap, name: &str) -> String {
    // Find header (case-insensitive)
    headers
        .iter()
        .find(|(k, _)| k.as_str().eq_ignore_ascii_case(name))
        .map(|(_, v)| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
