//! Render command implementation

use crate::chart::AnyChart;
use crate::cli::error::CliError;
use crate::import::ScriptEvaluator;

use super::load_input;

/// Handle the render command
pub fn handle_render(input: &str) -> Result<(), CliError> {
    let content = load_input(input)?;
    let node = ScriptEvaluator::new().eval(&content)?;

    let type_name = node.type_name();
    let chart_node = node.into_chart().ok_or_else(|| {
        CliError::InvalidArgument(format!("Script builds a {} value, not a chart", type_name))
    })?;
    let chart = AnyChart::from_node(chart_node)?;

    println!("{}", chart.to_json()?);
    Ok(())
}
