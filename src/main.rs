use anyhow::{Context, Result};
use audit_gate::{
    config::{load_allowlist, PolicyConfig},
    model::Severity,
    output::{self, OutputFormat},
    pipeline,
    policy::Verdict,
};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const PASSED: u8 = 0;
    pub const BLOCKED: u8 = 1;
    pub const INPUT_ERROR: u8 = 2;
}

#[derive(Parser)]
#[command(name = "audit-gate")]
#[command(
    author,
    version,
    about = "Gate CI builds on npm audit findings"
)]
struct Cli {
    /// Audit report file, or '-' to read from stdin
    input: String,

    /// Lowest severity that blocks the build (info, low, moderate, high, critical)
    #[arg(long, default_value = "high", value_name = "LEVEL")]
    min_severity: String,

    /// Advisory id accepted regardless of severity (repeatable)
    #[arg(long, value_name = "ID")]
    allow: Vec<String>,

    /// TOML file with an `allow` list of advisory ids
    #[arg(long, value_name = "PATH")]
    allowlist_file: Option<PathBuf>,

    /// Output format (human, json)
    #[arg(short, long, default_value = "human")]
    format: String,

    /// Render the report but always exit 0
    #[arg(long)]
    dry_run: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::INPUT_ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = OutputFormat::from_str(&cli.format).map_err(|e| anyhow::anyhow!(e))?;
    let min_severity = Severity::from_str(&cli.min_severity).map_err(|e| anyhow::anyhow!(e))?;

    let mut policy = PolicyConfig::with_threshold(min_severity);
    policy.extend_allow(cli.allow.iter().cloned());
    if let Some(path) = &cli.allowlist_file {
        policy.extend_allow(load_allowlist(path)?);
    }

    let raw = read_input(&cli.input)?;
    let outcome = pipeline::run(&raw, &policy)?;

    if let Some(path) = &cli.output {
        let content = output::render(&outcome, format)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report written to: {}", path.display());
    } else {
        output::print_report(&outcome, format)?;
    }

    if cli.dry_run {
        return Ok(exit_codes::PASSED);
    }
    Ok(determine_exit_code(&outcome.verdict))
}

/// Map the verdict onto the process exit code
fn determine_exit_code(verdict: &Verdict) -> u8 {
    if verdict.passed {
        exit_codes::PASSED
    } else {
        exit_codes::BLOCKED
    }
}

/// Read the raw report from a file or stdin
fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read audit report from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read audit report from {}", source))
    }
}

/// Diagnostics go to stderr; stdout is reserved for the rendered report
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "audit_gate=debug"
    } else {
        "audit_gate=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
