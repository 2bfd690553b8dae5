//! Exit status codes for the CLI
//!
//! ramjam follows standard Unix exit code conventions:
//! - 0: Success
//! - 1: Any error (failed steps, unreadable documents, bad arguments)

use std::process::{ExitCode, Termination};

use crate::pipeline::RunReport;

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    /// At least one failure, or the run could not start
    Error = 1,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Success only when no document or step failed
    pub fn from_report(report: &RunReport) -> Self {
        if report.is_success() {
            ExitStatus::Success
        } else {
            ExitStatus::Error
        }
    }
}
