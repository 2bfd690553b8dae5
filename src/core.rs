use std::time::Duration;

use clap::{CommandFactory, Parser};
use reqwest::header::USER_AGENT;
use reqwest::Url;
use tracing::{debug, warn};

use crate::cli::{Args, Command, Shell};
use crate::client::{self, build_client, timeout_from_secs};
use crate::config::Config;
use crate::errors::{RamjamError, Result};
use crate::output::Painter;
use crate::pipeline::{format_failures, RunOptions, WorkflowRunner};
use crate::status::ExitStatus;

/// Main entry point for the CLI.
///
/// Handles argument parsing, configuration loading, and dispatches to the
/// subcommand handlers.
pub fn run(args: Vec<String>) -> ExitStatus {
    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    let command = match &parsed.command {
        Some(command) => command.clone(),
        None => {
            Args::command().print_help().ok();
            return ExitStatus::Success;
        }
    };

    match command {
        Command::Version => {
            println!("ramjam version {}", env!("CARGO_PKG_VERSION"));
            return ExitStatus::Success;
        }
        Command::Completions { shell } => {
            generate_completions(&shell);
            return ExitStatus::Success;
        }
        Command::Run { .. } | Command::Get { .. } => {}
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}", e);
            Config::default()
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(RamjamError::Io(e)),
    };

    match runtime.block_on(program(parsed, config)) {
        Ok(status) => status,
        Err(e) => handle_error(e),
    }
}

/// Run a network subcommand with the loaded configuration
pub async fn program(args: Args, config: Config) -> Result<ExitStatus> {
    let verbose = args.verbose || config.verbose;
    debug!(?args, verbose, "dispatching command");

    match args.command {
        Some(Command::Run { paths, timeout }) => {
            let timeout = resolve_timeout(timeout, &config)?;
            run_workflows(&paths, RunOptions { timeout, verbose }).await
        }
        Some(Command::Get { url, timeout }) => {
            let timeout = resolve_timeout(timeout, &config)?;
            run_get(&url, timeout, verbose).await
        }
        _ => Ok(ExitStatus::Success),
    }
}

/// A `--timeout` flag wins over the config file
fn resolve_timeout(flag: Option<f64>, config: &Config) -> Result<Duration> {
    match flag {
        Some(secs) => timeout_from_secs(secs),
        None => Ok(config.timeout),
    }
}

async fn run_workflows(paths: &[std::path::PathBuf], options: RunOptions) -> Result<ExitStatus> {
    let painter = Painter::for_stdout();
    let verbose = options.verbose;

    let runner = WorkflowRunner::new(options)?;
    let report = runner.run_paths(paths).await?;

    for line in report.lines() {
        println!("{}", painter.progress_line(line));
    }

    if report.is_success() {
        println!("{}", painter.success("All steps were run successfully"));
        return Ok(ExitStatus::Success);
    }

    print!("{}", format_failures(&report, verbose));
    eprintln!(
        "{}",
        Painter::for_stderr().error(&format!(
            "Error: workflow failed with {} errors",
            report.failure_count()
        ))
    );

    Ok(ExitStatus::from_report(&report))
}

async fn run_get(url: &str, timeout: Duration, verbose: bool) -> Result<ExitStatus> {
    let painter = Painter::for_stdout();
    let url = Url::parse(url)?;

    if verbose {
        println!("Sending GET request to: {}", url);
        println!("Timeout: {} seconds", timeout.as_secs_f64());
    }

    let client = build_client(timeout)?;
    let response = client
        .get(url)
        .header(USER_AGENT, client::USER_AGENT)
        .send()
        .await
        .map_err(|e| RamjamError::from_transport(e, timeout))?;

    let status = response.status();
    let status_line = match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    };
    println!("Status: {}", painter.http_status(status.as_u16(), &status_line));
    println!("Status Code: {}", status.as_u16());

    if verbose {
        println!("{}", painter.label("Headers:"));
        for (name, value) in response.headers() {
            println!("  {}: {}", name, String::from_utf8_lossy(value.as_bytes()));
        }
    }

    let body = response
        .text()
        .await
        .map_err(|e| RamjamError::from_transport(e, timeout))?;

    println!("\nResponse Body:");
    println!("{}", body);

    Ok(ExitStatus::Success)
}

fn handle_error(error: RamjamError) -> ExitStatus {
    warn!(%error, "command failed");
    eprintln!("Error: {}", error);

    // All errors return the same exit code (1) following Unix conventions
    ExitStatus::Error
}

fn generate_completions(shell: &Shell) {
    use clap_complete::{generate, Shell as ClapShell};

    let mut cmd = Args::command();
    let shell = match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    generate(shell, &mut cmd, "ramjam", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_timeout_prefers_flag() {
        let config = Config {
            timeout: Duration::from_secs(5),
            ..Config::default()
        };
        assert_eq!(resolve_timeout(None, &config).unwrap(), Duration::from_secs(5));
        assert_eq!(resolve_timeout(Some(1.5), &config).unwrap(), Duration::from_millis(1500));
        assert!(matches!(
            resolve_timeout(Some(0.0), &config),
            Err(RamjamError::Argument(_))
        ));
    }
}
