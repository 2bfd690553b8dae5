//! Workflow execution engine

pub mod assertions;
pub mod capture;
pub mod collect;
pub mod executor;
pub mod progress;
pub mod query;
pub mod report;
pub mod runner;
pub mod variables;
pub mod workflow;

pub use collect::collect_files;
pub use executor::StepExecutor;
pub use progress::ProgressLog;
pub use report::{format_failures, DocumentReport, Failure, RunReport, StepError};
pub use runner::{RunOptions, WorkflowRunner, DEFAULT_TIMEOUT};
pub use variables::Variables;
pub use workflow::{load_document, parse_document, WorkflowDocument};
