//! Error types for ramjam

use thiserror::Error;

use crate::pipeline::query::QueryError;

/// Main error type for ramjam
#[derive(Error, Debug)]
pub enum RamjamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request failed: timed out after {0:.1} seconds")]
    Timeout(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("unable to access {path}: {source}")]
    Access {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no paths provided")]
    NoPaths,

    #[error("no files found")]
    NoFiles,

    #[error("parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("resolve body file: {0}")]
    BodyFile(String),

    #[error("parse response json: {0}")]
    ResponseJson(#[source] serde_json::Error),

    #[error("{0}")]
    Assertion(String),

    #[error("{0}")]
    Capture(String),

    #[error("jsonpath {path}: {source}")]
    Query {
        path: String,
        #[source]
        source: QueryError,
    },

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("workflow task failed: {0}")]
    Task(String),
}

impl RamjamError {
    /// Wrap a transport error, keeping timeouts distinguishable
    pub fn from_transport(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            RamjamError::Timeout(timeout.as_secs_f64())
        } else {
            RamjamError::Request(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, RamjamError>;
