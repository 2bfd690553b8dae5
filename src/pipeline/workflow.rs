//! Workflow document definition and loading
//!
//! A document is a YAML file with `metadata`, `config` and an ordered `workflow` list of
//! steps. Each step describes one HTTP request, what to expect back, and what to capture.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::errors::{RamjamError, Result};

/// Maximum workflow file size (1 MB)
const MAX_WORKFLOW_FILE_SIZE: u64 = 1024 * 1024;

/// One parsed workflow file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub config: DocumentConfig,

    /// Steps, executed strictly in this order
    #[serde(default)]
    pub workflow: Vec<Step>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Prefix for relative step URLs, also exposed as `${base_url}`
    #[serde(default)]
    pub base_url: String,
}

/// A single request/validate/capture unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Step {
    /// Step identifier, reported on failure
    #[serde(rename = "step")]
    pub id: String,

    #[serde(default)]
    pub description: String,

    pub request: StepRequest,

    #[serde(default)]
    pub expect: Expectation,

    #[serde(default)]
    pub capture: Vec<Capture>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Output>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepRequest {
    /// HTTP method; blank means GET
    #[serde(default)]
    pub method: String,

    pub url: String,

    /// Header values may be any YAML scalar; they are sent in their string form
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, JsonValue>,

    /// Inline JSON payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,

    /// JSON payload file, relative to the document's directory unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_file: Option<String>,

    /// Query-string additions, appended after any query already in the URL
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, JsonValue>,
}

impl StepRequest {
    /// Normalized HTTP method
    pub fn method(&self) -> Result<Method> {
        let normalized = self.method.trim().to_uppercase();
        if normalized.is_empty() {
            return Ok(Method::GET);
        }
        normalized
            .parse::<Method>()
            .map_err(|_| RamjamError::Argument(format!("invalid HTTP method '{}'", self.method)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json_path_match: Vec<JsonPathMatch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderExpectation>,
}

/// Expect the value at `path` to equal `value` (compared as strings)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonPathMatch {
    pub path: String,
    #[serde(default)]
    pub value: JsonValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderExpectation {
    #[serde(default)]
    pub name: String,

    /// Header must equal this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Header must contain this substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
}

/// Copy a response value into a variable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Applied to the header value; first group if any, else the whole match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Destination variable
    #[serde(rename = "as")]
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,
}

/// Where a step's payload came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    Inline,
    File(String),
}

impl std::fmt::Display for BodySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodySource::Inline => write!(f, "inline"),
            BodySource::File(path) => write!(f, "{}", path),
        }
    }
}

/// The payload a step will send, before substitution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBody {
    pub value: JsonValue,
    pub source: BodySource,
}

impl Step {
    /// Materialize this step's payload.
    ///
    /// A `body_file` wins over an inline `body`. Relative files are looked up next to the
    /// document (`base_dir`).
    pub fn resolve_body(&self, base_dir: &Path) -> Result<Option<ResolvedBody>> {
        let body_file = self.request.body_file.as_deref().map(str::trim).unwrap_or("");

        if body_file.is_empty() {
            return Ok(self
                .request
                .body
                .as_ref()
                .filter(|body| !is_empty_body(body))
                .map(|body| ResolvedBody {
                    value: body.clone(),
                    source: BodySource::Inline,
                }));
        }

        let path = Path::new(body_file);
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        };

        let content = fs::read_to_string(&full_path).map_err(|e| {
            RamjamError::BodyFile(format!("read body file {}: {}", body_file, e))
        })?;
        let value: JsonValue = serde_json::from_str(&content).map_err(|e| {
            RamjamError::BodyFile(format!("parse body file {}: {}", body_file, e))
        })?;

        Ok(Some(ResolvedBody {
            value,
            source: BodySource::File(body_file.to_string()),
        }))
    }
}

fn is_empty_body(body: &JsonValue) -> bool {
    match body {
        JsonValue::Null => true,
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Load a workflow document from a file
pub fn load_document(path: &Path) -> Result<WorkflowDocument> {
    let display = path.display().to_string();

    // Check file size before loading to prevent OOM
    let metadata = fs::metadata(path).map_err(|e| RamjamError::Access {
        path: display.clone(),
        source: e,
    })?;

    let file_size = metadata.len();
    if file_size > MAX_WORKFLOW_FILE_SIZE {
        return Err(RamjamError::Parse {
            path: display,
            message: format!(
                "workflow file too large: {} bytes (max {} bytes)",
                file_size, MAX_WORKFLOW_FILE_SIZE
            ),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| RamjamError::Access {
        path: display.clone(),
        source: e,
    })?;

    parse_document(&content, &display)
}

/// Parse workflow YAML; `origin` names the source in error messages
pub fn parse_document(content: &str, origin: &str) -> Result<WorkflowDocument> {
    serde_yaml::from_str(content).map_err(|e| RamjamError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}
