//! Validation helpers for assembled charts.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::graph::{ChartNode, DataSource, ObjectNode, PropValue};

/// Failures from chart-level validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("encoded field '{field}' is not a column of the attached table (columns: {columns:?})")]
    UnknownField {
        field: String,
        columns: Vec<String>,
    },
}

/// Checks every encoded field against the attached table's columns.
///
/// Calculated formula outputs count as columns, and the `*` field used
/// by count aggregations is exempt. Charts without an attached table
/// pass vacuously; a url reference cannot be checked without fetching
/// it.
pub fn validate_encoded_columns(chart: &ChartNode) -> Result<(), ValidationError> {
    let Some(DataSource::Table(table)) = chart.data() else {
        return Ok(());
    };
    let mut columns: BTreeSet<String> = table.column_names();
    collect_formula_outputs(chart.object(), &mut columns);

    for field in encoded_fields(chart.object()) {
        if field != "*" && !columns.contains(field) {
            return Err(ValidationError::UnknownField {
                field: field.to_string(),
                columns: columns.iter().cloned().collect(),
            });
        }
    }
    Ok(())
}

fn collect_formula_outputs(object: &ObjectNode, columns: &mut BTreeSet<String>) {
    let formulas = object
        .get("transform")
        .and_then(PropValue::as_object)
        .and_then(|transform| transform.get("calculate"))
        .and_then(PropValue::as_list);
    let Some(formulas) = formulas else {
        return;
    };
    for formula in formulas {
        if let Some(field) = formula.as_object().and_then(|node| node.get_str("field")) {
            columns.insert(field.to_string());
        }
    }
}

fn encoded_fields(object: &ObjectNode) -> Vec<&str> {
    let mut fields = Vec::new();
    let Some(encoding) = object.get("encoding").and_then(PropValue::as_object) else {
        return fields;
    };
    for (_, value) in encoding.props() {
        match value {
            PropValue::List(items) => {
                for item in items {
                    push_field(item, &mut fields);
                }
            }
            other => push_field(other, &mut fields),
        }
    }
    fields
}

fn push_field<'a>(value: &'a PropValue, fields: &mut Vec<&'a str>) {
    if let Some(field) = value.as_object().and_then(|node| node.get_str("field")) {
        fields.push(field);
    }
}
