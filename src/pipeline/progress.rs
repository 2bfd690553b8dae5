//! Buffered, per-document progress lines

use std::path::Path;

/// Collects the human-readable lines of one running document.
///
/// Lines are prefixed with `[<prefix>]` and flushed together once the document finishes,
/// so concurrent documents never interleave inside each other's output.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    prefix: String,
    verbose: bool,
    lines: Vec<String>,
}

impl ProgressLog {
    pub fn new(prefix: impl Into<String>, verbose: bool) -> Self {
        Self {
            prefix: prefix.into(),
            verbose,
            lines: Vec::new(),
        }
    }

    /// A log prefixed with the file's base name
    pub fn for_file(path: &Path, verbose: bool) -> Self {
        let prefix = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(prefix, verbose)
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Record a line unconditionally
    pub fn line(&mut self, message: impl AsRef<str>) {
        let line = format!("[{}] {}", self.prefix, message.as_ref());
        tracing::debug!(target: "ramjam::progress", "{}", line);
        self.lines.push(line);
    }

    /// Record a line only in verbose mode
    pub fn detail(&mut self, message: impl AsRef<str>) {
        if self.verbose {
            self.line(message);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
