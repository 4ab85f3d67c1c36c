mod human;
mod json;

use anyhow::Result;

use crate::pipeline::AuditOutcome;

/// Output format for gate reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Human,
    /// JSON format for CI consumption
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "table" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'", s)),
        }
    }
}

/// Renders a report to a string in the requested format.
pub fn render(outcome: &AuditOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::generate_human_string(outcome)),
        OutputFormat::Json => json::generate_json_string(outcome),
    }
}

/// Renders and prints a report to stdout.
pub fn print_report(outcome: &AuditOutcome, format: OutputFormat) -> Result<()> {
    println!("{}", render(outcome, format)?);
    Ok(())
}
