//! Output formatting for CLI

use crate::chart::AnyChart;
use crate::graph::{DataSource, PropValue};

/// Format a reconstructed chart as a plain-text summary
pub fn format_summary(chart: &AnyChart) -> String {
    let mut output = String::new();

    output.push_str(&format!("Kind: {}\n", chart.kind()));

    let object = chart.node().object();
    if let Some(mark) = object.get_str("mark") {
        output.push_str(&format!("Mark: {}\n", mark));
    }

    if let Some(PropValue::List(layers)) = object.get("layers") {
        output.push_str(&format!("Layers: {}\n", layers.len()));
    }

    if let Some(PropValue::Node(encoding)) = object.get("encoding") {
        let channels: Vec<&str> = encoding.object().props().map(|(name, _)| name).collect();
        output.push_str(&format!("Channels: {}\n", channels.join(", ")));
    }

    match chart.node().data() {
        Some(DataSource::Reference(node)) => {
            if let Some(url) = node.get_str("url") {
                output.push_str(&format!("Data: url {}\n", url));
            } else {
                output.push_str("Data: reference\n");
            }
        }
        Some(DataSource::Table(table)) => {
            output.push_str(&format!("Data: {} inline row(s)\n", table.len()));
        }
        None => output.push_str("Data: none\n"),
    }

    output
}
