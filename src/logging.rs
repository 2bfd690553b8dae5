//! Diagnostic logging via tracing
//!
//! Diagnostics go to stderr so workflow output on stdout stays clean.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the tracing filter directives
pub const LOG_ENV: &str = "RAMJAM_LOG";

/// Initialize the global tracing subscriber.
///
/// Log level is controlled by `RAMJAM_LOG` (default: `warn`).
/// Examples:
///   RAMJAM_LOG=debug
///   RAMJAM_LOG=ramjam::pipeline=trace,warn
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (e.g. from an embedding program) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}
