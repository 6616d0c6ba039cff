//! Output formatting for CLI results

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;

/// Print an API response body to stdout
pub fn print_value(value: &serde_json::Value, format: OutputFormat) -> Result<()> {
    let output = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Json => json::format_json(value)?,
    };
    println!("{}", output);
    Ok(())
}
