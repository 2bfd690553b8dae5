//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ramjam - run YAML-defined HTTP API workflows
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ramjam", version, about, long_about = None)]
pub struct Args {
    /// Print request/response details and every check as it runs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run workflow files or directories of workflow files
    Run {
        /// Workflow files (.yaml/.yml) or directories containing them
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Request timeout in seconds (default: 30, or the config file value)
        #[arg(short, long, value_name = "SECONDS")]
        timeout: Option<f64>,
    },

    /// Send a single GET request and print the response
    Get {
        /// The URL to request
        #[arg(value_name = "URL")]
        url: String,

        /// Request timeout in seconds (default: 30, or the config file value)
        #[arg(short, long, value_name = "SECONDS")]
        timeout: Option<f64>,
    },

    /// Print the version
    Version,

    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shell types for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
