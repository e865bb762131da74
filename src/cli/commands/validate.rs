//! Validate command implementation

use crate::chart;
use crate::cli::error::CliError;
use crate::cli::output::format_summary;

use super::load_input;

/// Handle the validate command
pub fn handle_validate(input: &str) -> Result<(), CliError> {
    let content = load_input(input)?;
    let chart = chart::from_json(&content)?;

    print!("{}", format_summary(&chart));
    println!("Validation successful");
    Ok(())
}
