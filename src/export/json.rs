//! Rendering object graphs to specification JSON.
//!
//! Only set, exportable properties are emitted; explicit nulls stay
//! null. Properties render in key order, so repeated renders of the same
//! graph serialize byte-identically.

use serde_json::{Map, Value};

use crate::data::DataTable;
use crate::graph::{ChartNode, DataSource, Node, ObjectNode, PropValue};

/// Graph to JSON renderer.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    include_data: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        JsonExporter::new()
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        JsonExporter { include_data: true }
    }

    /// Renders chart nodes without their data entry.
    pub fn without_data() -> Self {
        JsonExporter {
            include_data: false,
        }
    }

    pub fn export(&self, node: &Node) -> Value {
        match node {
            Node::Plain(object) => Value::Object(self.object_map(object)),
            Node::Chart(chart) => self.export_chart(chart),
        }
    }

    pub fn export_chart(&self, chart: &ChartNode) -> Value {
        Value::Object(self.chart_map(chart))
    }

    pub(crate) fn chart_map(&self, chart: &ChartNode) -> Map<String, Value> {
        let mut out = self.object_map(chart.object());
        if self.include_data {
            if let Some(source) = chart.data() {
                let data = match source {
                    DataSource::Reference(node) => Value::Object(self.object_map(node)),
                    DataSource::Table(table) => values_entry(table),
                };
                out.insert("data".to_string(), data);
            }
        }
        out
    }

    fn object_map(&self, object: &ObjectNode) -> Map<String, Value> {
        let schema = object.schema();
        let mut out = Map::new();
        for (name, value) in object.props() {
            if !schema.exports(name) {
                continue;
            }
            out.insert(name.to_string(), self.prop_value(value));
        }
        out
    }

    fn prop_value(&self, value: &PropValue) -> Value {
        match value {
            PropValue::Scalar(scalar) => scalar.clone(),
            PropValue::Node(node) => self.export(node),
            PropValue::List(items) => {
                Value::Array(items.iter().map(|item| self.prop_value(item)).collect())
            }
        }
    }
}

fn values_entry(table: &DataTable) -> Value {
    let mut out = Map::new();
    out.insert("values".to_string(), table.to_values());
    Value::Object(out)
}
