//! Failure records and run aggregation
//!
//! Every failed step becomes a [`StepError`]; a document that cannot be loaded becomes a
//! document-level [`Failure`]. The run result is the union of all documents' failures.

use std::fmt;
use std::path::PathBuf;

use crate::errors::RamjamError;

/// The structured failure record for one failed step
#[derive(Debug)]
pub struct StepError {
    pub file: PathBuf,
    pub step: String,
    pub description: String,
    pub cause: RamjamError,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {:?} in {} failed: {}",
            self.step,
            self.file.display(),
            self.cause
        )
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// One entry of a run's failure list
#[derive(Debug)]
pub enum Failure {
    /// The document could not be read or parsed; none of its steps ran
    Document { file: PathBuf, error: RamjamError },
    Step(StepError),
}

impl Failure {
    pub fn file(&self) -> &PathBuf {
        match self {
            Failure::Document { file, .. } => file,
            Failure::Step(step) => &step.file,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Document { error, .. } => write!(f, "{}", error),
            Failure::Step(step) => write!(f, "{}", step),
        }
    }
}

/// The outcome of one document
#[derive(Debug)]
pub struct DocumentReport {
    pub path: PathBuf,
    /// Buffered progress lines, already prefixed
    pub lines: Vec<String>,
    pub failures: Vec<Failure>,
}

/// The outcome of a whole run, in document completion order
#[derive(Debug, Default)]
pub struct RunReport {
    pub documents: Vec<DocumentReport>,
}

impl RunReport {
    /// Every failure of the run, document by document, each in step order
    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.documents.iter().flat_map(|d| d.failures.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.documents.iter().map(|d| d.failures.len()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// All progress lines, grouped per document
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.documents
            .iter()
            .flat_map(|d| d.lines.iter().map(String::as_str))
    }
}

/// Render the failure summary shown after a failed run.
///
/// Non-verbose output names only the failing step; verbose output adds its description
/// and the underlying cause.
pub fn format_failures(report: &RunReport, verbose: bool) -> String {
    let mut output = String::new();

    for failure in report.failures() {
        match failure {
            Failure::Document { error, .. } => {
                output.push_str(&format!("Error: {}\n", error));
            }
            Failure::Step(step) => {
                output.push_str(&format!("Failed step: {}\n", step.step));
                if verbose {
                    if !step.description.is_empty() {
                        output.push_str(&format!("Description: {}\n", step.description));
                    }
                    output.push_str(&format!("Error: {}\n", step.cause));
                }
            }
        }
    }

    output
}
