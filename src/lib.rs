//! ramjam library interface
//!
//! Runs YAML-defined HTTP API workflows: each document is an ordered list of requests
//! with expectations and captures, and documents run concurrently.
//!
//! # Module Organization
//!
//! - [`pipeline`] - Workflow loading and execution (WorkflowRunner, RunReport)
//! - [`errors`] - Error types (RamjamError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - CLI dispatch

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod errors;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod status;
