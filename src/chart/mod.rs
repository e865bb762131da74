//! High-level chart builders over the object graph.
//!
//! [`Chart`], [`LayeredChart`] and [`FacetedChart`] wrap top-level graph
//! nodes with a fluent construction surface: mark methods, encoding,
//! data attachment, configuration updates and (de)serialization to
//! specification JSON and builder-script source.

mod encoding;

pub use encoding::{ChannelDef, ChannelInput, Encoding};

use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::data::{json_kind, DataTable};
use crate::export::{CodeExporter, ExportError, JsonExporter};
use crate::graph::{ChartNode, DataSource, Node, ObjectNode, PropValue};
use crate::import::{JsonImporter, SchemaViolation};
use crate::validation::{validate_encoded_columns, ValidationError};

/// Version marker attached to exported specifications.
pub const SPEC_SCHEMA_URL: &str = "https://vega.github.io/schema/vega-lite/v1.json";

/// Default cap on inline table rows serialized into a specification.
pub const DEFAULT_MAX_ROWS: usize = 5000;

/// Mark types of a unit chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Area,
    Bar,
    Circle,
    ErrorBar,
    Line,
    Point,
    Rule,
    Square,
    Text,
    Tick,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Area => "area",
            Mark::Bar => "bar",
            Mark::Circle => "circle",
            Mark::ErrorBar => "errorBar",
            Mark::Line => "line",
            Mark::Point => "point",
            Mark::Rule => "rule",
            Mark::Square => "square",
            Mark::Text => "text",
            Mark::Tick => "tick",
        }
    }
}

/// Chart-level failures.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("the attached table has {rows} rows, over the limit of {max_rows}; raise max_rows to serialize it")]
    MaxRowsExceeded { rows: usize, max_rows: usize },
    #[error("expected a {expected} specification, found '{found}'")]
    WrongKind {
        expected: &'static str,
        found: String,
    },
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("invalid specification JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Ordered name to value bag for update-style builder calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Props::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    fn apply(self, target: &mut ObjectNode) {
        for (name, value) in self.entries {
            target.set(&name, value);
        }
    }
}

/// A unit chart: one mark plus its encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    node: ChartNode,
}

impl Default for Chart {
    fn default() -> Self {
        Chart::new()
    }
}

impl Chart {
    /// A new chart with the default point mark.
    pub fn new() -> Self {
        let mut node = ChartNode::new("Chart");
        node.object_mut().set("mark", Mark::Point.as_str());
        Chart { node }
    }

    pub fn from_node(node: ChartNode) -> Result<Self, ChartError> {
        if node.type_name() != "Chart" {
            return Err(ChartError::WrongKind {
                expected: "unit chart",
                found: node.type_name().to_string(),
            });
        }
        Ok(Chart { node })
    }

    pub fn node(&self) -> &ChartNode {
        &self.node
    }

    pub fn into_node(self) -> ChartNode {
        self.node
    }

    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        attach_url(&mut self.node, url.into());
        self
    }

    pub fn data_table(mut self, table: DataTable) -> Self {
        self.node.set_data(DataSource::Table(table));
        self
    }

    pub fn data(mut self, source: DataSource) -> Self {
        self.node.set_data(source);
        self
    }

    pub fn mark(mut self, mark: Mark) -> Self {
        self.node.object_mut().set("mark", mark.as_str());
        self
    }

    pub fn mark_area(self) -> Self {
        self.mark(Mark::Area)
    }

    pub fn mark_bar(self) -> Self {
        self.mark(Mark::Bar)
    }

    pub fn mark_circle(self) -> Self {
        self.mark(Mark::Circle)
    }

    pub fn mark_error_bar(self) -> Self {
        self.mark(Mark::ErrorBar)
    }

    pub fn mark_line(self) -> Self {
        self.mark(Mark::Line)
    }

    pub fn mark_point(self) -> Self {
        self.mark(Mark::Point)
    }

    pub fn mark_rule(self) -> Self {
        self.mark(Mark::Rule)
    }

    pub fn mark_square(self) -> Self {
        self.mark(Mark::Square)
    }

    pub fn mark_text(self) -> Self {
        self.mark(Mark::Text)
    }

    pub fn mark_tick(self) -> Self {
        self.mark(Mark::Tick)
    }

    /// Merges the encoding channel by channel: later calls overwrite
    /// channels they set and keep the rest.
    pub fn encode(mut self, encoding: Encoding) -> Self {
        if let Some(target) = self.node.object_mut().ensure_path(&["encoding"]) {
            for (name, value) in encoding.into_node().into_props() {
                target.set(&name, value);
            }
        }
        self
    }

    pub fn transform_data(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["transform"], props);
        self
    }

    pub fn configure(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config"], props);
        self
    }

    pub fn configure_mark(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "mark"], props);
        self
    }

    pub fn configure_axis(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "axis"], props);
        self
    }

    pub fn configure_legend(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "legend"], props);
        self
    }

    pub fn configure_scale(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "scale"], props);
        self
    }

    pub fn configure_cell(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "cell"], props);
        self
    }

    pub fn configure_facet_axis(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "facet", "axis"], props);
        self
    }

    pub fn configure_facet_cell(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "facet", "cell"], props);
        self
    }

    pub fn configure_facet_grid(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "facet", "grid"], props);
        self
    }

    pub fn configure_facet_scale(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config", "facet", "scale"], props);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.node.object_mut().set("width", width);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.node.object_mut().set("height", height);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.node.object_mut().set("name", name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.node.object_mut().set("description", description.into());
        self
    }

    /// Raises or lowers the serialized row limit for this chart.
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.node.object_mut().set("max_rows", max_rows as u64);
        self
    }

    pub fn to_spec_value(&self) -> Result<Value, ChartError> {
        spec_value(&self.node)
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        spec_json(&self.node)
    }

    pub fn to_script(&self) -> Result<String, ChartError> {
        Ok(CodeExporter::new().export_chart(&self.node)?)
    }

    /// Script generation with the chart's table referenced through a
    /// variable name.
    pub fn to_script_with_data_var(&self, name: &str) -> Result<String, ChartError> {
        Ok(CodeExporter::with_data_var(name).export_chart(&self.node)?)
    }

    pub fn from_spec_value(value: &Value) -> Result<Self, ChartError> {
        Chart::from_node(import_top("Chart", value)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        Chart::from_spec_value(&serde_json::from_str(text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChartError> {
        Chart::from_json(&std::fs::read_to_string(path)?)
    }

    /// Checks encoded fields against the attached table's columns.
    pub fn validate_columns(&self) -> Result<(), ValidationError> {
        validate_encoded_columns(&self.node)
    }
}

/// A chart stacking several unit charts in one coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredChart {
    node: ChartNode,
}

impl Default for LayeredChart {
    fn default() -> Self {
        LayeredChart::new()
    }
}

impl LayeredChart {
    pub fn new() -> Self {
        LayeredChart {
            node: ChartNode::new("LayeredChart"),
        }
    }

    pub fn from_node(node: ChartNode) -> Result<Self, ChartError> {
        if node.type_name() != "LayeredChart" {
            return Err(ChartError::WrongKind {
                expected: "layered chart",
                found: node.type_name().to_string(),
            });
        }
        Ok(LayeredChart { node })
    }

    pub fn node(&self) -> &ChartNode {
        &self.node
    }

    pub fn into_node(self) -> ChartNode {
        self.node
    }

    /// Appends one layer.
    pub fn layer(mut self, chart: Chart) -> Self {
        let layer = PropValue::from(chart.into_node());
        match self.node.object_mut().get_mut("layers") {
            Some(PropValue::List(items)) => items.push(layer),
            _ => {
                self.node.object_mut().set("layers", vec![layer]);
            }
        }
        self
    }

    /// Replaces all layers.
    pub fn layers(mut self, charts: Vec<Chart>) -> Self {
        let layers: Vec<PropValue> = charts
            .into_iter()
            .map(|chart| PropValue::from(chart.into_node()))
            .collect();
        self.node.object_mut().set("layers", layers);
        self
    }

    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        attach_url(&mut self.node, url.into());
        self
    }

    pub fn data_table(mut self, table: DataTable) -> Self {
        self.node.set_data(DataSource::Table(table));
        self
    }

    pub fn transform_data(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["transform"], props);
        self
    }

    pub fn configure(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config"], props);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.node.object_mut().set("width", width);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.node.object_mut().set("height", height);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.node.object_mut().set("name", name.into());
        self
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.node.object_mut().set("max_rows", max_rows as u64);
        self
    }

    pub fn to_spec_value(&self) -> Result<Value, ChartError> {
        spec_value(&self.node)
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        spec_json(&self.node)
    }

    pub fn to_script(&self) -> Result<String, ChartError> {
        Ok(CodeExporter::new().export_chart(&self.node)?)
    }

    pub fn from_spec_value(value: &Value) -> Result<Self, ChartError> {
        LayeredChart::from_node(import_top("LayeredChart", value)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        LayeredChart::from_spec_value(&serde_json::from_str(text)?)
    }
}

/// A chart repeating an inner specification over row and column facets.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetedChart {
    node: ChartNode,
}

impl Default for FacetedChart {
    fn default() -> Self {
        FacetedChart::new()
    }
}

impl FacetedChart {
    pub fn new() -> Self {
        FacetedChart {
            node: ChartNode::new("FacetedChart"),
        }
    }

    pub fn from_node(node: ChartNode) -> Result<Self, ChartError> {
        if node.type_name() != "FacetedChart" {
            return Err(ChartError::WrongKind {
                expected: "faceted chart",
                found: node.type_name().to_string(),
            });
        }
        Ok(FacetedChart { node })
    }

    pub fn node(&self) -> &ChartNode {
        &self.node
    }

    pub fn into_node(self) -> ChartNode {
        self.node
    }

    pub fn facet_row(mut self, input: impl Into<ChannelInput>) -> Self {
        self.set_facet("row", input.into());
        self
    }

    pub fn facet_column(mut self, input: impl Into<ChannelInput>) -> Self {
        self.set_facet("column", input.into());
        self
    }

    fn set_facet(&mut self, name: &str, input: ChannelInput) {
        if let Some(facet) = self.node.object_mut().ensure_path(&["facet"]) {
            facet.set(name, input.into_prop("PositionChannel"));
        }
    }

    pub fn spec(mut self, chart: Chart) -> Self {
        self.node.object_mut().set("spec", chart.into_node());
        self
    }

    pub fn spec_layered(mut self, chart: LayeredChart) -> Self {
        self.node.object_mut().set("spec", chart.into_node());
        self
    }

    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        attach_url(&mut self.node, url.into());
        self
    }

    pub fn data_table(mut self, table: DataTable) -> Self {
        self.node.set_data(DataSource::Table(table));
        self
    }

    pub fn transform_data(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["transform"], props);
        self
    }

    pub fn configure(mut self, props: Props) -> Self {
        update_at(&mut self.node, &["config"], props);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.node.object_mut().set("name", name.into());
        self
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.node.object_mut().set("max_rows", max_rows as u64);
        self
    }

    pub fn to_spec_value(&self) -> Result<Value, ChartError> {
        spec_value(&self.node)
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        spec_json(&self.node)
    }

    pub fn to_script(&self) -> Result<String, ChartError> {
        Ok(CodeExporter::new().export_chart(&self.node)?)
    }

    pub fn from_spec_value(value: &Value) -> Result<Self, ChartError> {
        FacetedChart::from_node(import_top("FacetedChart", value)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        FacetedChart::from_spec_value(&serde_json::from_str(text)?)
    }
}

/// Any of the three top-level chart kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyChart {
    Unit(Chart),
    Layered(LayeredChart),
    Faceted(FacetedChart),
}

impl AnyChart {
    pub fn from_node(node: ChartNode) -> Result<Self, ChartError> {
        match node.type_name() {
            "Chart" => Ok(AnyChart::Unit(Chart::from_node(node)?)),
            "LayeredChart" => Ok(AnyChart::Layered(LayeredChart::from_node(node)?)),
            "FacetedChart" => Ok(AnyChart::Faceted(FacetedChart::from_node(node)?)),
            other => Err(ChartError::WrongKind {
                expected: "top-level chart",
                found: other.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnyChart::Unit(_) => "unit",
            AnyChart::Layered(_) => "layered",
            AnyChart::Faceted(_) => "faceted",
        }
    }

    pub fn node(&self) -> &ChartNode {
        match self {
            AnyChart::Unit(chart) => chart.node(),
            AnyChart::Layered(chart) => chart.node(),
            AnyChart::Faceted(chart) => chart.node(),
        }
    }

    pub fn to_spec_value(&self) -> Result<Value, ChartError> {
        spec_value(self.node())
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        spec_json(self.node())
    }

    pub fn to_script(&self) -> Result<String, ChartError> {
        Ok(CodeExporter::new().export_chart(self.node())?)
    }
}

/// Reads any top-level specification, dispatching on its shape: a
/// `layers` entry means layered, a `facet` entry means faceted, anything
/// else is a unit chart.
pub fn from_spec_value(value: &Value) -> Result<AnyChart, ChartError> {
    let map = value.as_object().ok_or(SchemaViolation::NotAMapping {
        type_name: "Chart".to_string(),
        found: json_kind(value),
    })?;
    if map.contains_key("layers") {
        Ok(AnyChart::Layered(LayeredChart::from_spec_value(value)?))
    } else if map.contains_key("facet") {
        Ok(AnyChart::Faceted(FacetedChart::from_spec_value(value)?))
    } else {
        Ok(AnyChart::Unit(Chart::from_spec_value(value)?))
    }
}

pub fn from_json(text: &str) -> Result<AnyChart, ChartError> {
    from_spec_value(&serde_json::from_str(text)?)
}

/// Formula node for transform calculations.
pub fn formula(field: &str, expr: &str) -> ObjectNode {
    ObjectNode::new("Formula")
        .with("field", field)
        .with("expr", expr)
}

pub fn equal_filter(field: &str, value: impl Into<Value>) -> ObjectNode {
    ObjectNode::new("EqualFilter")
        .with("field", field)
        .with("equal", value.into())
}

pub fn range_filter(field: &str, low: impl Into<Value>, high: impl Into<Value>) -> ObjectNode {
    ObjectNode::new("RangeFilter").with("field", field).with(
        "range",
        vec![
            PropValue::Scalar(low.into()),
            PropValue::Scalar(high.into()),
        ],
    )
}

pub fn one_of_filter(field: &str, values: Vec<Value>) -> ObjectNode {
    let items: Vec<PropValue> = values.into_iter().map(PropValue::Scalar).collect();
    ObjectNode::new("OneOfFilter")
        .with("field", field)
        .with("oneOf", items)
}

fn attach_url(node: &mut ChartNode, url: String) {
    let mut data = ObjectNode::new("Data");
    data.set("url", url);
    node.set_data(DataSource::Reference(data));
}

fn update_at(node: &mut ChartNode, path: &[&str], props: Props) {
    if let Some(target) = node.object_mut().ensure_path(path) {
        props.apply(target);
    }
}

fn row_limit(node: &ChartNode) -> usize {
    node.object()
        .get("max_rows")
        .and_then(PropValue::as_scalar)
        .and_then(Value::as_f64)
        .map(|limit| limit as usize)
        .unwrap_or(DEFAULT_MAX_ROWS)
}

fn guard_row_limit(node: &ChartNode) -> Result<(), ChartError> {
    if let Some(DataSource::Table(table)) = node.data() {
        let max_rows = row_limit(node);
        if table.len() > max_rows {
            return Err(ChartError::MaxRowsExceeded {
                rows: table.len(),
                max_rows,
            });
        }
    }
    Ok(())
}

fn spec_value(node: &ChartNode) -> Result<Value, ChartError> {
    guard_row_limit(node)?;
    let mut map = JsonExporter::new().chart_map(node);
    map.insert(
        "$schema".to_string(),
        Value::String(SPEC_SCHEMA_URL.to_string()),
    );
    Ok(Value::Object(map))
}

fn spec_json(node: &ChartNode) -> Result<String, ChartError> {
    Ok(serde_json::to_string_pretty(&spec_value(node)?)?)
}

fn import_top(type_name: &str, value: &Value) -> Result<ChartNode, ChartError> {
    let stripped = strip_schema_marker(value);
    let node = JsonImporter::new().import(type_name, &stripped)?;
    node.into_chart().ok_or(ChartError::WrongKind {
        expected: "top-level chart",
        found: type_name.to_string(),
    })
}

/// Removes the `$schema` entry before reconstruction, warning when the
/// marker names a different specification version.
fn strip_schema_marker(value: &Value) -> Value {
    match value.as_object() {
        Some(map) if map.contains_key("$schema") => {
            if let Some(url) = map.get("$schema").and_then(Value::as_str) {
                if url != SPEC_SCHEMA_URL {
                    warn!(
                        marker = url,
                        expected = SPEC_SCHEMA_URL,
                        "specification version marker does not match"
                    );
                }
            }
            let mut stripped = map.clone();
            stripped.remove("$schema");
            Value::Object(stripped)
        }
        _ => value.clone(),
    }
}
