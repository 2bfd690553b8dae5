//! Per-document variable store and `${name}` substitution

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

static VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}]+)\}").unwrap()
});

/// Variable seeded from the document's `config.base_url`
pub const BASE_URL_VAR: &str = "base_url";

/// Name to string mapping used for interpolation.
///
/// One store exists per running document. Captures write into it and every later step of
/// the same document reads from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with `base_url`
    pub fn with_base_url(base_url: &str) -> Self {
        let mut vars = Self::new();
        vars.insert(BASE_URL_VAR, base_url);
        vars
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every known `${name}` in `input`.
    ///
    /// Unknown names are left exactly as written, delimiters included.
    pub fn substitute(&self, input: &str) -> String {
        if !input.contains("${") {
            return input.to_string();
        }
        VAR_RE
            .replace_all(input, |caps: &Captures| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Substitute through a JSON value: strings directly, arrays element-wise, objects
    /// value-wise (keys untouched). Other values are returned unchanged.
    pub fn substitute_value(&self, value: &JsonValue) -> JsonValue {
        match value {
            JsonValue::String(s) => JsonValue::String(self.substitute(s)),
            JsonValue::Array(items) => {
                JsonValue::Array(items.iter().map(|v| self.substitute_value(v)).collect())
            }
            JsonValue::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.substitute_value(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}
