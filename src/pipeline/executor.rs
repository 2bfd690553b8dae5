//! Single-step execution
//!
//! Builds the request for one step, sends it, checks expectations and runs captures.
//! The first failure ends the step; the caller decides what happens next.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::assertions::{check_header, check_json_path, check_status};
use super::capture::capture_value;
use super::progress::ProgressLog;
use super::query::stringify;
use super::variables::{Variables, BASE_URL_VAR};
use super::workflow::{ResolvedBody, Step, StepRequest};
use crate::client;
use crate::errors::{RamjamError, Result};

/// Executes steps against a shared client
pub struct StepExecutor<'a> {
    client: &'a Client,
    timeout: Duration,
}

impl<'a> StepExecutor<'a> {
    /// `timeout` must be the one the client was built with; it is only used for reporting
    pub fn new(client: &'a Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Run one step to completion.
    ///
    /// On success, captured values have been written into `vars`.
    pub async fn execute(
        &self,
        step: &Step,
        body: Option<&ResolvedBody>,
        vars: &mut Variables,
        log: &mut ProgressLog,
    ) -> Result<()> {
        log.detail(format!("Executing step: {}", step.id));

        let method = step.request.method()?;
        let url = build_url(&step.request, vars)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(client::USER_AGENT));

        let payload = match body {
            Some(body) => {
                let rendered = vars.substitute_value(&body.value);
                let payload = serde_json::to_vec(&rendered)?;
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                log.detail(format!("Using body from: {}", body.source));
                Some(payload)
            }
            None => None,
        };

        // Declared headers go last so they win over the defaults above
        for (key, value) in &step.request.headers {
            let (name, value) = request_header(key, &vars.substitute(&stringify(value)))?;
            headers.insert(name, value);
        }

        debug!(step = %step.id, %method, %url, "sending request");

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RamjamError::from_transport(e, self.timeout))?;

        let status = response.status().as_u16();
        log.detail(format!("Received status: {}", status));
        check_status(step.expect.status, status)?;

        let response_headers = response.headers().clone();
        for expectation in &step.expect.headers {
            check_header(expectation, &response_headers, vars, log)?;
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| RamjamError::from_transport(e, self.timeout))?;
        let json = parse_response_body(&raw)?;

        for matcher in &step.expect.json_path_match {
            check_json_path(matcher, json.as_ref(), vars, log)?;
        }

        for capture in &step.capture {
            let value = capture_value(capture, json.as_ref(), &response_headers)?;
            log.detail(format!("Captured {} => {}", capture.target, value));
            vars.insert(capture.target.clone(), value);
        }

        if let Some(template) = step.output.as_ref().and_then(|o| o.print.as_deref()) {
            if !template.is_empty() {
                log.line(vars.substitute(template));
            }
        }

        Ok(())
    }
}

/// Substitute the step URL, resolve it against `base_url`, and append `params`
pub fn build_url(request: &StepRequest, vars: &Variables) -> Result<Url> {
    let substituted = vars.substitute(&request.url);
    let base_url = vars.get(BASE_URL_VAR).unwrap_or_default();

    let full_url = if is_absolute(&substituted) || base_url.is_empty() {
        substituted
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            substituted.trim_start_matches('/')
        )
    };

    let mut url = Url::parse(&full_url)?;
    if !request.params.is_empty() {
        let mut query_pairs = url.query_pairs_mut();
        for (key, value) in &request.params {
            query_pairs.append_pair(key, &vars.substitute(&stringify(value)));
        }
    }
    Ok(url)
}

/// Build one declared header. Values are taken as raw bytes, so non-ASCII text is sent as is.
fn request_header(key: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| RamjamError::Argument(format!("invalid header name '{}': {}", key, e)))?;
    let value = HeaderValue::from_bytes(value.as_bytes())
        .map_err(|e| RamjamError::Argument(format!("invalid value for header '{}': {}", key, e)))?;
    Ok((name, value))
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// An empty body is valid and yields no JSON; anything else must parse
fn parse_response_body(raw: &[u8]) -> Result<Option<JsonValue>> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(RamjamError::ResponseJson)
}
