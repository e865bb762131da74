//! Codegen command implementation

use crate::chart;
use crate::cli::error::CliError;

use super::load_input;

/// Handle the codegen command
pub fn handle_codegen(input: &str) -> Result<(), CliError> {
    let content = load_input(input)?;
    let chart = chart::from_json(&content)?;
    let script = chart.to_script()?;

    println!("{}", script);
    Ok(())
}
