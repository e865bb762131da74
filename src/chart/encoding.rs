//! Encoding and channel definition builders.

use serde_json::Value;

use super::Props;
use crate::graph::{ObjectNode, PropValue};
use crate::schema::{catalog, PropertySchema, SchemaType};
use crate::shorthand::{self, FieldType};

/// Builder for a chart's encoding mapping. Channels accept either a
/// shorthand string or a full [`ChannelDef`].
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    node: ObjectNode,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::new()
    }
}

impl Encoding {
    pub fn new() -> Self {
        Encoding {
            node: ObjectNode::new("Encoding"),
        }
    }

    pub fn x(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("x", input)
    }

    pub fn x2(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("x2", input)
    }

    pub fn y(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("y", input)
    }

    pub fn y2(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("y2", input)
    }

    pub fn row(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("row", input)
    }

    pub fn column(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("column", input)
    }

    pub fn color(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("color", input)
    }

    pub fn size(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("size", input)
    }

    pub fn shape(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("shape", input)
    }

    pub fn opacity(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("opacity", input)
    }

    pub fn text(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("text", input)
    }

    pub fn label(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("label", input)
    }

    pub fn detail(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("detail", input)
    }

    pub fn order(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("order", input)
    }

    pub fn path(self, input: impl Into<ChannelInput>) -> Self {
        self.channel("path", input)
    }

    fn channel(mut self, name: &str, input: impl Into<ChannelInput>) -> Self {
        let target = channel_target(self.node.schema(), name);
        let value = input.into().into_prop(target);
        self.node.set(name, value);
        self
    }

    pub(crate) fn into_node(self) -> ObjectNode {
        self.node
    }
}

/// The node type a channel property nests, from its schema.
fn channel_target(ty: &SchemaType, name: &str) -> &'static str {
    fn first_reference(schema: &PropertySchema) -> Option<&'static str> {
        match schema {
            PropertySchema::Reference(target) => Some(target),
            PropertySchema::Union(alternatives) => {
                alternatives.iter().find_map(first_reference)
            }
            PropertySchema::Array(element) => first_reference(element),
            _ => None,
        }
    }
    ty.property(name)
        .and_then(first_reference)
        .unwrap_or("FieldChannel")
}

/// What a channel method accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelInput {
    /// Shorthand notation, `aggregate(field):type`.
    Shorthand(String),
    /// A full definition.
    Def(ChannelDef),
}

impl From<&str> for ChannelInput {
    fn from(text: &str) -> Self {
        ChannelInput::Shorthand(text.to_string())
    }
}

impl From<String> for ChannelInput {
    fn from(text: String) -> Self {
        ChannelInput::Shorthand(text)
    }
}

impl From<ChannelDef> for ChannelInput {
    fn from(def: ChannelDef) -> Self {
        ChannelInput::Def(def)
    }
}

impl ChannelInput {
    pub(crate) fn into_prop(self, target: &'static str) -> PropValue {
        let mut node = ObjectNode::new(target);
        match self {
            ChannelInput::Shorthand(text) => match shorthand::parse(&text) {
                Ok(spec) => {
                    if let Some(field) = spec.field {
                        node.set("field", field);
                    }
                    if let Some(aggregate) = spec.aggregate {
                        node.set("aggregate", aggregate);
                    }
                    if let Some(field_type) = spec.field_type {
                        node.set("type", field_type);
                    }
                }
                Err(err) => {
                    // Builder misuse; in release the text degrades to a
                    // plain field name.
                    debug_assert!(false, "invalid channel shorthand: {}", err);
                    node.set("field", text);
                }
            },
            ChannelInput::Def(def) => def.apply(&mut node),
        }
        PropValue::from(node)
    }
}

/// Full channel definition: field, aggregate, measurement type and any
/// further channel properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelDef {
    field: Option<String>,
    aggregate: Option<String>,
    field_type: Option<FieldType>,
    extra: Vec<(String, PropValue)>,
}

impl ChannelDef {
    pub fn field(name: impl Into<String>) -> Self {
        ChannelDef {
            field: Some(name.into()),
            ..ChannelDef::default()
        }
    }

    /// A constant-value channel with no backing field.
    pub fn value(value: impl Into<Value>) -> Self {
        ChannelDef::default().set("value", value.into())
    }

    pub fn aggregate(mut self, op: &str) -> Self {
        debug_assert!(
            catalog::AGGREGATE_OPS.contains(&op),
            "unknown aggregate '{}'",
            op
        );
        self.aggregate = Some(op.to_string());
        self
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn time_unit(mut self, unit: &str) -> Self {
        debug_assert!(
            catalog::TIME_UNITS.contains(&unit),
            "unknown time unit '{}'",
            unit
        );
        self.set("timeUnit", unit)
    }

    pub fn bin(self, enabled: bool) -> Self {
        self.set("bin", enabled)
    }

    pub fn bin_props(self, props: Props) -> Self {
        self.sub_node("bin", "Bin", props)
    }

    pub fn scale(self, props: Props) -> Self {
        self.sub_node("scale", "Scale", props)
    }

    pub fn axis(self, props: Props) -> Self {
        self.sub_node("axis", "Axis", props)
    }

    pub fn hide_axis(self) -> Self {
        self.set("axis", false)
    }

    pub fn legend(self, props: Props) -> Self {
        self.sub_node("legend", "Legend", props)
    }

    pub fn hide_legend(self) -> Self {
        self.set("legend", false)
    }

    pub fn sort(self, order: &str) -> Self {
        debug_assert!(
            catalog::SORT_ORDERS.contains(&order),
            "unknown sort order '{}'",
            order
        );
        self.set("sort", order)
    }

    pub fn sort_by(self, props: Props) -> Self {
        self.sub_node("sort", "SortField", props)
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.set("title", title.into())
    }

    /// Sets any further channel property by name.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    fn sub_node(self, name: &str, type_name: &str, props: Props) -> Self {
        let mut node = ObjectNode::new(type_name);
        props.apply(&mut node);
        self.set(name, node)
    }

    fn apply(self, node: &mut ObjectNode) {
        if let Some(field) = self.field {
            node.set("field", field);
        }
        if let Some(aggregate) = self.aggregate {
            node.set("aggregate", aggregate);
        }
        if let Some(field_type) = self.field_type {
            node.set("type", field_type.name());
        }
        for (name, value) in self.extra {
            node.set(&name, value);
        }
    }
}

#[cfg(test)]
mod encoding_tests {
    use super::*;
    use crate::export::JsonExporter;
    use crate::graph::Node;
    use serde_json::json;

    fn to_json(encoding: Encoding) -> Value {
        JsonExporter::new().export(&Node::Plain(encoding.into_node()))
    }

    #[test]
    fn test_shorthand_channel() {
        let encoding = Encoding::new().x("mean(price):Q");
        assert_eq!(
            to_json(encoding),
            json!({"x": {
                "aggregate": "mean",
                "field": "price",
                "type": "quantitative"
            }})
        );
    }

    #[test]
    fn test_channel_def_with_scale() {
        let encoding = Encoding::new().y(ChannelDef::field("price")
            .field_type(FieldType::Quantitative)
            .scale(Props::new().set("type", "log")));
        assert_eq!(
            to_json(encoding),
            json!({"y": {
                "field": "price",
                "scale": {"type": "log"},
                "type": "quantitative"
            }})
        );
    }

    #[test]
    fn test_value_channel() {
        let encoding = Encoding::new().color(ChannelDef::value("red"));
        assert_eq!(to_json(encoding), json!({"color": {"value": "red"}}));
    }

    #[test]
    fn test_channel_update_overwrites() {
        let encoding = Encoding::new().x("a:Q").x("b:N");
        assert_eq!(
            to_json(encoding),
            json!({"x": {"field": "b", "type": "nominal"}})
        );
    }

    #[test]
    fn test_hide_axis() {
        let encoding = Encoding::new().x(ChannelDef::field("a").hide_axis());
        assert_eq!(
            to_json(encoding),
            json!({"x": {"axis": false, "field": "a"}})
        );
    }

    #[test]
    fn test_channel_targets_follow_schema() {
        let encoding = Encoding::new().color("origin:N").text("label:N");
        let node = encoding.into_node();
        assert_eq!(
            node.get("color").and_then(PropValue::as_object).unwrap().type_name(),
            "ChannelWithLegend"
        );
        assert_eq!(
            node.get("text").and_then(PropValue::as_object).unwrap().type_name(),
            "FieldChannel"
        );
    }
}
