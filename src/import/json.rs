//! Reconstruction of object graphs from specification JSON.
//!
//! Mappings are validated property by property against the registry.
//! Union properties resolve by ordered structural admission: the first
//! alternative that admits the value is committed to, with no
//! backtracking into later alternatives. When no alternative admits the
//! value, it is built against the last alternative so its error
//! surfaces.

use serde_json::Value;
use tracing::debug;

use super::SchemaViolation;
use crate::data::{json_kind, DataTable};
use crate::graph::{ChartNode, DataSource, Node, ObjectNode, PropValue};
use crate::schema::{registry, PropertySchema, SchemaType, TypeRole};

/// JSON value to graph builder.
#[derive(Debug, Clone, Default)]
pub struct JsonImporter;

impl JsonImporter {
    pub fn new() -> Self {
        JsonImporter
    }

    /// Reconstructs a node of the named type from a JSON value.
    pub fn import(&self, type_name: &str, value: &Value) -> Result<Node, SchemaViolation> {
        let ty = registry()
            .get(type_name)
            .ok_or_else(|| SchemaViolation::UnknownType(type_name.to_string()))?;
        self.build_node(ty, value)
    }

    fn build_node(&self, ty: &'static SchemaType, value: &Value) -> Result<Node, SchemaViolation> {
        let map = value.as_object().ok_or(SchemaViolation::NotAMapping {
            type_name: ty.name().to_string(),
            found: json_kind(value),
        })?;
        match ty.role() {
            TypeRole::TopLevel => {
                let mut chart = ChartNode::from_object(self.build_object_entries(
                    ty,
                    map.iter().filter(|(key, _)| key.as_str() != "data"),
                )?);
                if let Some(data) = map.get("data") {
                    chart.set_data(self.build_data(ty, data)?);
                }
                Ok(Node::Chart(chart))
            }
            _ => Ok(Node::Plain(self.build_object_entries(ty, map.iter())?)),
        }
    }

    fn build_object_entries<'a>(
        &self,
        ty: &'static SchemaType,
        entries: impl Iterator<Item = (&'a String, &'a Value)>,
    ) -> Result<ObjectNode, SchemaViolation> {
        let mut node = ObjectNode::new(ty.name());
        for (key, value) in entries {
            let schema = ty
                .property(key)
                .ok_or_else(|| SchemaViolation::UnknownProperty {
                    type_name: ty.name().to_string(),
                    property: key.clone(),
                })?;
            let built = self.build_prop(ty, key, schema, value)?;
            node.set(key, built);
        }
        for name in ty.required() {
            if !node.is_set(name) {
                return Err(SchemaViolation::MissingProperty {
                    type_name: ty.name().to_string(),
                    property: name.to_string(),
                });
            }
        }
        Ok(node)
    }

    /// A `data` entry holding nothing but inline values becomes an
    /// attached table; anything else stays a data reference node.
    fn build_data(
        &self,
        ty: &'static SchemaType,
        value: &Value,
    ) -> Result<DataSource, SchemaViolation> {
        let map = value.as_object().ok_or_else(|| SchemaViolation::ValueMismatch {
            type_name: ty.name().to_string(),
            property: "data".to_string(),
            expected: "a data mapping".to_string(),
            found: json_kind(value).to_string(),
        })?;
        if map.len() == 1 {
            if let Some(values) = map.get("values") {
                let table =
                    DataTable::from_values(values).map_err(|err| SchemaViolation::ValueMismatch {
                        type_name: ty.name().to_string(),
                        property: "data".to_string(),
                        expected: "an array of row mappings under 'values'".to_string(),
                        found: err.to_string(),
                    })?;
                return Ok(DataSource::Table(table));
            }
        }
        let data_ty = registry()
            .get("Data")
            .ok_or_else(|| SchemaViolation::UnknownType("Data".to_string()))?;
        Ok(DataSource::Reference(
            self.build_object_entries(data_ty, map.iter())?,
        ))
    }

    pub(crate) fn build_prop(
        &self,
        ty: &'static SchemaType,
        property: &str,
        schema: &PropertySchema,
        value: &Value,
    ) -> Result<PropValue, SchemaViolation> {
        // Explicit null is assignable to any property.
        if value.is_null() {
            return Ok(PropValue::Scalar(Value::Null));
        }
        match schema {
            PropertySchema::Any => Ok(PropValue::Scalar(value.clone())),
            PropertySchema::Primitive(kind) => {
                if kind.matches(value) {
                    Ok(PropValue::Scalar(value.clone()))
                } else {
                    Err(self.mismatch(ty, property, schema, value))
                }
            }
            PropertySchema::Enum(values) => match value.as_str() {
                Some(text) if values.contains(&text) => Ok(PropValue::Scalar(value.clone())),
                _ => Err(self.mismatch(ty, property, schema, value)),
            },
            PropertySchema::Reference(target) => {
                if value.is_object() {
                    let target_ty = registry()
                        .get(target)
                        .ok_or_else(|| SchemaViolation::UnknownType(target.to_string()))?;
                    Ok(PropValue::from(self.build_node(target_ty, value)?))
                } else {
                    // Scalar in node position: a primitive override such
                    // as axis=false, kept verbatim.
                    Ok(PropValue::Scalar(value.clone()))
                }
            }
            PropertySchema::Array(element) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| self.mismatch(ty, property, schema, value))?;
                let built: Result<Vec<PropValue>, SchemaViolation> = items
                    .iter()
                    .map(|item| self.build_prop(ty, property, element, item))
                    .collect();
                Ok(PropValue::List(built?))
            }
            PropertySchema::Union(alternatives) => {
                self.build_union(ty, property, schema, alternatives, value)
            }
        }
    }

    fn build_union(
        &self,
        ty: &'static SchemaType,
        property: &str,
        schema: &PropertySchema,
        alternatives: &[PropertySchema],
        value: &Value,
    ) -> Result<PropValue, SchemaViolation> {
        let admitting: Vec<&PropertySchema> = alternatives
            .iter()
            .filter(|alt| alt.admits(value))
            .collect();
        if admitting.len() > 1 {
            debug!(
                type_name = ty.name(),
                property,
                candidates = admitting.len(),
                "value admitted by more than one union alternative, using the first"
            );
        }
        if let Some(first) = admitting.first() {
            return self.build_prop(ty, property, first, value);
        }
        // Nothing admits the value: report the failure of the last
        // alternative, or a union-level mismatch if it cannot produce
        // one.
        if let Some(last) = alternatives.last() {
            self.build_prop(ty, property, last, value)?;
        }
        Err(self.mismatch(ty, property, schema, value))
    }

    fn mismatch(
        &self,
        ty: &'static SchemaType,
        property: &str,
        schema: &PropertySchema,
        value: &Value,
    ) -> SchemaViolation {
        SchemaViolation::ValueMismatch {
            type_name: ty.name().to_string(),
            property: property.to_string(),
            expected: schema.describe(),
            found: json_kind(value).to_string(),
        }
    }
}

#[cfg(test)]
mod json_import_tests {
    use super::*;
    use serde_json::json;

    fn import(type_name: &str, value: Value) -> Result<Node, SchemaViolation> {
        JsonImporter::new().import(type_name, &value)
    }

    #[test]
    fn test_rejects_unknown_property() {
        let err = import("Chart", json!({"mark": "bar", "marks": "bar"})).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::UnknownProperty {
                type_name: "Chart".to_string(),
                property: "marks".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_missing_required() {
        let err = import("Chart", json!({"width": 400})).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::MissingProperty {
                type_name: "Chart".to_string(),
                property: "mark".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_enum_mismatch() {
        let err = import("Chart", json!({"mark": "sparkles"})).unwrap_err();
        assert!(matches!(err, SchemaViolation::ValueMismatch { .. }));
    }

    #[test]
    fn test_filter_union_picks_matching_filter() {
        let node = import(
            "Transform",
            json!({"filter": {"field": "year", "range": [1955, 1960]}}),
        )
        .unwrap();
        let filter = node.object().get("filter").and_then(PropValue::as_object).unwrap();
        assert_eq!(filter.type_name(), "RangeFilter");
    }

    #[test]
    fn test_filter_union_accepts_expression_string() {
        let node = import("Transform", json!({"filter": "datum.year > 1960"})).unwrap();
        let filter = node.object().get("filter").and_then(PropValue::as_scalar).unwrap();
        assert_eq!(filter, &json!("datum.year > 1960"));
    }

    #[test]
    fn test_filter_union_list_of_mixed_filters() {
        let node = import(
            "Transform",
            json!({"filter": [
                {"field": "origin", "equal": "USA"},
                "datum.year > 1960"
            ]}),
        )
        .unwrap();
        let filters = node.object().get("filter").and_then(PropValue::as_list).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].as_object().unwrap().type_name(), "EqualFilter");
    }

    #[test]
    fn test_union_error_comes_from_last_alternative() {
        // Nothing admits a number in sort position; the error reports the
        // union's expectations rather than silently passing the value
        // through.
        let err = import(
            "Encoding",
            json!({"x": {"field": "a", "sort": 3}}),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaViolation::ValueMismatch { .. }));
    }

    #[test]
    fn test_scale_domain_union_of_arrays() {
        let node = import("Scale", json!({"domain": [0, 100]})).unwrap();
        let domain = node.object().get("domain").and_then(PropValue::as_list).unwrap();
        assert_eq!(domain.len(), 2);

        let node = import("Scale", json!({"domain": ["a", "b"]})).unwrap();
        assert!(node.object().is_set("domain"));
    }

    #[test]
    fn test_axis_false_passthrough() {
        let node = import("Encoding", json!({"x": {"field": "a", "axis": false}})).unwrap();
        let x = node.object().get("x").and_then(PropValue::as_object).unwrap();
        assert_eq!(x.get("axis"), Some(&PropValue::Scalar(json!(false))));
    }

    #[test]
    fn test_values_only_data_becomes_table() {
        let node = import(
            "Chart",
            json!({"mark": "point", "data": {"values": [{"a": 1}]}}),
        )
        .unwrap();
        let chart = node.as_chart().unwrap();
        match chart.data() {
            Some(DataSource::Table(table)) => assert_eq!(table.len(), 1),
            other => panic!("expected an attached table, got {:?}", other),
        }
    }

    #[test]
    fn test_url_data_stays_reference() {
        let node = import(
            "Chart",
            json!({"mark": "point", "data": {"url": "cars.json", "format": {"type": "csv"}}}),
        )
        .unwrap();
        let chart = node.as_chart().unwrap();
        match chart.data() {
            Some(DataSource::Reference(data)) => {
                assert_eq!(data.get_str("url"), Some("cars.json"));
            }
            other => panic!("expected a data reference, got {:?}", other),
        }
    }

    #[test]
    fn test_layered_chart_layers() {
        let node = import(
            "LayeredChart",
            json!({"layers": [{"mark": "line"}, {"mark": "point"}]}),
        )
        .unwrap();
        let layers = node.object().get("layers").and_then(PropValue::as_list).unwrap();
        assert_eq!(layers.len(), 2);
        assert!(layers[0].as_node().unwrap().as_chart().is_some());
    }

    #[test]
    fn test_explicit_null_survives() {
        let node = import("Scale", json!({"domain": null})).unwrap();
        assert_eq!(
            node.object().get("domain"),
            Some(&PropValue::Scalar(Value::Null))
        );
    }
}
