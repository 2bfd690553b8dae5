//! Shared HTTP client construction

use std::time::Duration;

use reqwest::Client;

use crate::errors::{RamjamError, Result};

/// Client identifier sent with every request
pub const USER_AGENT: &str = "ramjam-cli";

/// Build the client shared by every request of a run.
///
/// The timeout covers the whole exchange, from connect to the last body byte.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(RamjamError::Request)
}

/// Convert a seconds value from the command line or config file into a timeout
pub fn timeout_from_secs(secs: f64) -> Result<Duration> {
    if secs <= 0.0 {
        return Err(RamjamError::Argument(format!(
            "timeout must be positive, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| RamjamError::Argument(format!("invalid timeout {}: {}", secs, e)))
}
