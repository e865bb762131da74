//! Schema type model for chart specification nodes.
//!
//! Every node type the object graph can hold is described by a
//! [`SchemaType`]: its property schemas, the properties required on
//! import, and the properties suppressed on export. The full catalog of
//! types lives in [`catalog`] and is installed into a lazily built
//! [`SchemaRegistry`] shared by the whole crate.

pub mod catalog;
mod registry;

pub use registry::{registry, SchemaRegistry};

use std::collections::BTreeMap;

use serde_json::Value;

/// JSON scalar kinds accepted by primitive property schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveKind::String => value.is_string(),
            PrimitiveKind::Number => value.is_number(),
            PrimitiveKind::Boolean => value.is_boolean(),
        }
    }
}

/// Schema of a single property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySchema {
    /// A JSON scalar of the given kind.
    Primitive(PrimitiveKind),
    /// One of a fixed set of string values.
    Enum(&'static [&'static str]),
    /// A nested node of the named catalog type.
    Reference(&'static str),
    /// A homogeneous list with the given element schema.
    Array(Box<PropertySchema>),
    /// Ordered alternatives; the first alternative that admits a value
    /// is the one it is built against.
    Union(Vec<PropertySchema>),
    /// Verbatim JSON passthrough.
    Any,
}

impl PropertySchema {
    /// Structural test used to pick a union alternative before committing
    /// to it. Explicit null is admitted everywhere. Arrays are admitted
    /// element-wise so that unions of array schemas resolve correctly,
    /// and references check the candidate mapping's keys against the
    /// target type.
    pub fn admits(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            PropertySchema::Primitive(kind) => kind.matches(value),
            PropertySchema::Enum(values) => value
                .as_str()
                .map(|s| values.contains(&s))
                .unwrap_or(false),
            PropertySchema::Reference(target) => match value.as_object() {
                Some(map) => registry()
                    .get(target)
                    .map(|ty| ty.accepts_keys(map))
                    .unwrap_or(false),
                None => false,
            },
            PropertySchema::Array(element) => match value.as_array() {
                Some(items) => items.iter().all(|item| element.admits(item)),
                None => false,
            },
            PropertySchema::Union(alternatives) => {
                alternatives.iter().any(|alt| alt.admits(value))
            }
            PropertySchema::Any => true,
        }
    }

    /// Short description used in violation messages.
    pub fn describe(&self) -> String {
        match self {
            PropertySchema::Primitive(kind) => format!("a {}", kind.name()),
            PropertySchema::Enum(values) => format!("one of {:?}", values),
            PropertySchema::Reference(target) => format!("a {} mapping", target),
            PropertySchema::Array(element) => format!("an array of {}", element.describe()),
            PropertySchema::Union(alternatives) => {
                let parts: Vec<String> = alternatives.iter().map(|alt| alt.describe()).collect();
                parts.join(" or ")
            }
            PropertySchema::Any => "any value".to_string(),
        }
    }
}

/// Dispatch tag deciding how the visitors treat a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRole {
    /// Ordinary mapping node.
    Plain,
    /// Encoding channel: carries field, aggregate and type and may
    /// collapse to a shorthand string in generated code.
    Channel,
    /// Chart-like node that owns a data source.
    TopLevel,
}

/// Schema for one node type in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaType {
    name: &'static str,
    role: TypeRole,
    properties: BTreeMap<&'static str, PropertySchema>,
    required: &'static [&'static str],
    skip: &'static [&'static str],
    shorthand_children: bool,
    chained_methods: bool,
}

impl SchemaType {
    pub(crate) fn new(name: &'static str, role: TypeRole) -> Self {
        SchemaType {
            name,
            role,
            properties: BTreeMap::new(),
            required: &[],
            skip: &[],
            shorthand_children: false,
            chained_methods: false,
        }
    }

    pub(crate) fn prop(mut self, name: &'static str, schema: PropertySchema) -> Self {
        self.properties.insert(name, schema);
        self
    }

    pub(crate) fn require(mut self, names: &'static [&'static str]) -> Self {
        self.required = names;
        self
    }

    pub(crate) fn skip_on_export(mut self, names: &'static [&'static str]) -> Self {
        self.skip = names;
        self
    }

    pub(crate) fn shorthand_children(mut self) -> Self {
        self.shorthand_children = true;
        self
    }

    pub(crate) fn chained_methods(mut self) -> Self {
        self.chained_methods = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn role(&self) -> TypeRole {
        self.role
    }

    /// Whether child channel nodes may collapse to bare shorthand strings
    /// in generated code.
    pub fn shortens_children(&self) -> bool {
        self.shorthand_children
    }

    /// Whether generated code lifts mark, encoding, transform and config
    /// properties into chained method calls.
    pub fn chains_methods(&self) -> bool {
        self.chained_methods
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &PropertySchema)> {
        self.properties.iter().map(|(name, schema)| (*name, schema))
    }

    pub fn required(&self) -> &'static [&'static str] {
        self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(&name)
    }

    /// Whether the property is included in exported output.
    pub fn exports(&self, name: &str) -> bool {
        !self.skip.contains(&name)
    }

    /// Structural admission test for a candidate mapping: every key must
    /// be a declared property (`data` is reserved on top-level types) and
    /// every required property must be present.
    pub fn accepts_keys(&self, map: &serde_json::Map<String, Value>) -> bool {
        let keys_known = map.keys().all(|key| {
            self.has_property(key) || (self.role == TypeRole::TopLevel && key == "data")
        });
        keys_known && self.required.iter().all(|name| map.contains_key(*name))
    }
}

#[cfg(test)]
mod schema_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_admission() {
        let schema = PropertySchema::Primitive(PrimitiveKind::Number);
        assert!(schema.admits(&json!(3.5)));
        assert!(schema.admits(&json!(null)));
        assert!(!schema.admits(&json!("3.5")));
    }

    #[test]
    fn test_enum_admission() {
        let schema = PropertySchema::Enum(catalog::SORT_ORDERS);
        assert!(schema.admits(&json!("ascending")));
        assert!(!schema.admits(&json!("sideways")));
        assert!(!schema.admits(&json!(true)));
    }

    #[test]
    fn test_array_admission_checks_elements() {
        let strings = PropertySchema::Array(Box::new(PropertySchema::Primitive(
            PrimitiveKind::String,
        )));
        assert!(strings.admits(&json!(["a", "b"])));
        assert!(!strings.admits(&json!([1, 2])));
        assert!(strings.admits(&json!([])));
    }

    #[test]
    fn test_reference_admission_by_keys() {
        let equal = PropertySchema::Reference("EqualFilter");
        let range = PropertySchema::Reference("RangeFilter");
        let candidate = json!({"field": "year", "range": [1955, 1960]});
        assert!(!equal.admits(&candidate));
        assert!(range.admits(&candidate));
    }

    #[test]
    fn test_reference_admission_requires_required_keys() {
        let range = PropertySchema::Reference("RangeFilter");
        assert!(!range.admits(&json!({"field": "year"})));
    }

    #[test]
    fn test_top_level_reference_admits_data_key() {
        let chart = PropertySchema::Reference("Chart");
        assert!(chart.admits(&json!({"mark": "bar", "data": {"url": "x.json"}})));
        assert!(!chart.admits(&json!({"data": {"url": "x.json"}})));
    }
}
