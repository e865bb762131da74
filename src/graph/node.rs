//! Node and property value types.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::data::DataTable;
use crate::schema::{registry, PropertySchema, SchemaType, TypeRole};

/// A property value attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// A JSON scalar, including explicit null.
    Scalar(Value),
    /// A nested node.
    Node(Box<Node>),
    /// A list of values.
    List(Vec<PropValue>),
}

impl PropValue {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            PropValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            PropValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The inner object of a nested node, if this value is one.
    pub fn as_object(&self) -> Option<&ObjectNode> {
        self.as_node().map(Node::object)
    }

    pub fn as_list(&self) -> Option<&[PropValue]> {
        match self {
            PropValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        PropValue::Scalar(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Scalar(Value::String(value.to_string()))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Scalar(Value::String(value))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Scalar(Value::Bool(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Scalar(Value::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Scalar(Value::from(value))
    }
}

impl From<u64> for PropValue {
    fn from(value: u64) -> Self {
        PropValue::Scalar(Value::from(value))
    }
}

impl From<ObjectNode> for PropValue {
    fn from(node: ObjectNode) -> Self {
        PropValue::Node(Box::new(Node::Plain(node)))
    }
}

impl From<ChartNode> for PropValue {
    fn from(node: ChartNode) -> Self {
        PropValue::Node(Box::new(Node::Chart(node)))
    }
}

impl From<Node> for PropValue {
    fn from(node: Node) -> Self {
        PropValue::Node(Box::new(node))
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(items: Vec<PropValue>) -> Self {
        PropValue::List(items)
    }
}

/// A typed mapping node: a catalog type plus the properties set on it.
///
/// Only `set` properties appear in `props`, so exporters can tell unset
/// apart from explicit null.
#[derive(Debug, Clone)]
pub struct ObjectNode {
    schema: &'static SchemaType,
    props: BTreeMap<String, PropValue>,
}

impl PartialEq for ObjectNode {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.props == other.props
    }
}

impl ObjectNode {
    /// Creates an empty node of the named catalog type.
    ///
    /// # Panics
    ///
    /// Panics if the name is not in the registry. Constructing nodes of
    /// unknown types is a programmer error; importers validate names
    /// before reaching this point.
    pub fn new(type_name: &str) -> Self {
        match registry().get(type_name) {
            Some(schema) => ObjectNode {
                schema,
                props: BTreeMap::new(),
            },
            None => panic!("unknown catalog type '{}'", type_name),
        }
    }

    pub fn schema(&self) -> &'static SchemaType {
        self.schema
    }

    pub fn type_name(&self) -> &'static str {
        self.schema.name()
    }

    /// Sets a property. Passing a name the type does not declare is a
    /// programmer error.
    pub fn set(&mut self, name: &str, value: impl Into<PropValue>) -> &mut Self {
        debug_assert!(
            self.schema.has_property(name),
            "type '{}' has no property '{}'",
            self.type_name(),
            name
        );
        self.props.insert(name.to_string(), value.into());
        self
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropValue> {
        self.props.get_mut(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropValue::as_scalar).and_then(Value::as_str)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Removes a property, returning it to the unset state.
    pub fn unset(&mut self, name: &str) -> Option<PropValue> {
        self.props.remove(name)
    }

    /// Set properties in key order.
    pub fn props(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.props.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_props(self) -> impl Iterator<Item = (String, PropValue)> {
        self.props.into_iter()
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Walks a chain of reference-typed properties, creating empty nodes
    /// along the way, and returns the node at the end of the path. Fails
    /// with `None` when a path segment is not a reference property or an
    /// existing value on the path is not a node.
    pub fn ensure_path(&mut self, path: &[&str]) -> Option<&mut ObjectNode> {
        let Some((&head, rest)) = path.split_first() else {
            return Some(self);
        };
        let target = match self.schema.property(head) {
            Some(PropertySchema::Reference(target)) => *target,
            _ => return None,
        };
        if !self.props.contains_key(head) {
            self.props.insert(
                head.to_string(),
                PropValue::from(ObjectNode::new(target)),
            );
        }
        match self.props.get_mut(head) {
            Some(PropValue::Node(node)) => node.object_mut().ensure_path(rest),
            _ => None,
        }
    }
}

/// Where a chart's rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A `Data` node referencing a url, inline values or a format.
    Reference(ObjectNode),
    /// An attached inline table.
    Table(DataTable),
}

/// A top-level node with an attached data source.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartNode {
    object: ObjectNode,
    data: Option<DataSource>,
}

impl ChartNode {
    /// Creates an empty chart node of the named top-level type.
    ///
    /// # Panics
    ///
    /// Panics like [`ObjectNode::new`] on unknown names.
    pub fn new(type_name: &str) -> Self {
        ChartNode::from_object(ObjectNode::new(type_name))
    }

    pub fn from_object(object: ObjectNode) -> Self {
        debug_assert_eq!(object.schema().role(), TypeRole::TopLevel);
        ChartNode { object, data: None }
    }

    pub fn object(&self) -> &ObjectNode {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut ObjectNode {
        &mut self.object
    }

    pub fn schema(&self) -> &'static SchemaType {
        self.object.schema()
    }

    pub fn type_name(&self) -> &'static str {
        self.object.type_name()
    }

    pub fn data(&self) -> Option<&DataSource> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, source: DataSource) {
        self.data = Some(source);
    }

    pub fn clear_data(&mut self) -> Option<DataSource> {
        self.data.take()
    }
}

/// Any node of the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Plain(ObjectNode),
    Chart(ChartNode),
}

impl Node {
    pub fn object(&self) -> &ObjectNode {
        match self {
            Node::Plain(object) => object,
            Node::Chart(chart) => chart.object(),
        }
    }

    pub fn object_mut(&mut self) -> &mut ObjectNode {
        match self {
            Node::Plain(object) => object,
            Node::Chart(chart) => chart.object_mut(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.object().type_name()
    }

    pub fn as_chart(&self) -> Option<&ChartNode> {
        match self {
            Node::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn as_chart_mut(&mut self) -> Option<&mut ChartNode> {
        match self {
            Node::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn into_chart(self) -> Option<ChartNode> {
        match self {
            Node::Chart(chart) => Some(chart),
            _ => None,
        }
    }
}

impl From<ObjectNode> for Node {
    fn from(object: ObjectNode) -> Self {
        Node::Plain(object)
    }
}

impl From<ChartNode> for Node {
    fn from(chart: ChartNode) -> Self {
        Node::Chart(chart)
    }
}
