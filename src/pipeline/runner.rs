//! Workflow runner
//!
//! Runs every collected document concurrently, one task per document, and folds their
//! outcomes into a single [`RunReport`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::collect::collect_files;
use super::executor::StepExecutor;
use super::progress::ProgressLog;
use super::report::{DocumentReport, Failure, RunReport, StepError};
use super::variables::Variables;
use super::workflow::load_document;
use crate::client::build_client;
use crate::errors::{RamjamError, Result};

/// Default whole-exchange request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options shared by every document of a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub timeout: Duration,
    pub verbose: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }
}

/// Runs workflow documents with one shared HTTP client
#[derive(Debug, Clone)]
pub struct WorkflowRunner {
    client: Client,
    options: RunOptions,
}

impl WorkflowRunner {
    pub fn new(options: RunOptions) -> Result<Self> {
        let client = build_client(options.timeout)?;
        Ok(Self { client, options })
    }

    /// Resolve `paths` into documents and run them all.
    ///
    /// Collection errors (no paths, unreadable argument, no documents found) abort the run
    /// before anything is sent. After that, every failure is recorded in the report.
    pub async fn run_paths(&self, paths: &[PathBuf]) -> Result<RunReport> {
        let files = collect_files(paths)?;
        info!(documents = files.len(), "starting workflow run");

        let (tx, mut rx) = mpsc::channel::<DocumentReport>(files.len());
        let mut handles = Vec::with_capacity(files.len());

        for file in &files {
            let runner = self.clone();
            let tx = tx.clone();
            let path = file.clone();

            let handle = tokio::spawn(async move {
                let report = runner.run_file(&path).await;
                let _ = tx.send(report).await;
            });
            handles.push(handle);
        }

        // Drop the original sender so the receiver knows when all senders are done
        drop(tx);

        let mut report = RunReport::default();

        // A task that died never sent its report; record it against its file instead
        for (file, joined) in files.iter().zip(join_all(handles).await) {
            if let Err(e) = joined {
                warn!(file = %file.display(), error = %e, "workflow task aborted");
                report.documents.push(DocumentReport {
                    path: file.clone(),
                    lines: Vec::new(),
                    failures: vec![Failure::Document {
                        file: file.clone(),
                        error: RamjamError::Task(e.to_string()),
                    }],
                });
            }
        }

        while let Some(document) = rx.recv().await {
            report.documents.push(document);
        }

        info!(failures = report.failure_count(), "workflow run finished");
        Ok(report)
    }

    /// Run a single document to completion.
    ///
    /// Never fails as a whole: a load error becomes the document's only failure, and each
    /// failing step adds one [`StepError`] while later steps still run.
    pub async fn run_file(&self, path: &Path) -> DocumentReport {
        let mut log = ProgressLog::for_file(path, self.options.verbose);
        log.line(format!("Running workflow file: {}", path.display()));

        let document = match load_document(path) {
            Ok(document) => document,
            Err(error) => {
                warn!(file = %path.display(), %error, "failed to load workflow document");
                return DocumentReport {
                    path: path.to_path_buf(),
                    lines: log.into_lines(),
                    failures: vec![Failure::Document {
                        file: path.to_path_buf(),
                        error,
                    }],
                };
            }
        };

        if !document.metadata.name.is_empty() {
            log.set_prefix(document.metadata.name.clone());
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let executor = StepExecutor::new(&self.client, self.options.timeout);
        let mut vars = Variables::with_base_url(&document.config.base_url);
        let mut failures = Vec::new();

        for step in &document.workflow {
            let outcome = match step.resolve_body(base_dir) {
                Ok(body) => executor.execute(step, body.as_ref(), &mut vars, &mut log).await,
                Err(e) => Err(e),
            };

            if let Err(cause) = outcome {
                warn!(file = %path.display(), step = %step.id, error = %cause, "step failed");
                failures.push(Failure::Step(StepError {
                    file: path.to_path_buf(),
                    step: step.id.clone(),
                    description: step.description.clone(),
                    cause,
                }));
            }
        }

        debug!(
            file = %path.display(),
            steps = document.workflow.len(),
            failures = failures.len(),
            "workflow document finished"
        );

        DocumentReport {
            path: path.to_path_buf(),
            lines: log.into_lines(),
            failures,
        }
    }
}
