//! Inline tabular data attached to charts.
//!
//! A [`DataTable`] is an ordered list of JSON row mappings. It is the
//! bridge between column-oriented callers and the row-oriented `values`
//! entry of a serialized specification.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use thiserror::Error;

/// Failures converting values into a table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("row {index} is not a mapping")]
    RowNotObject { index: usize },
    #[error("column '{column}' has {length} values, expected {expected}")]
    RaggedColumn {
        column: String,
        length: usize,
        expected: usize,
    },
    #[error("expected an array of rows, got {found}")]
    NotAnArray { found: &'static str },
}

/// An ordered collection of JSON row mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    rows: Vec<Map<String, Value>>,
}

impl DataTable {
    pub fn new() -> Self {
        DataTable::default()
    }

    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        DataTable { rows }
    }

    /// Builds a table from the `values` entry of a data mapping. Every
    /// element must be a row mapping.
    pub fn from_values(values: &Value) -> Result<Self, DataError> {
        let items = values.as_array().ok_or(DataError::NotAnArray {
            found: json_kind(values),
        })?;
        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item.as_object() {
                Some(row) => rows.push(row.clone()),
                None => return Err(DataError::RowNotObject { index }),
            }
        }
        Ok(DataTable { rows })
    }

    /// Builds a table from named columns. All columns must have the same
    /// length; column order does not affect the result.
    pub fn from_columns(
        columns: impl IntoIterator<Item = (String, Vec<Value>)>,
    ) -> Result<Self, DataError> {
        let mut rows: Vec<Map<String, Value>> = Vec::new();
        let mut expected: Option<usize> = None;
        for (column, values) in columns {
            match expected {
                None => {
                    expected = Some(values.len());
                    rows.resize_with(values.len(), Map::new);
                }
                Some(expected) if expected != values.len() => {
                    return Err(DataError::RaggedColumn {
                        column,
                        length: values.len(),
                        expected,
                    });
                }
                Some(_) => {}
            }
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(column.clone(), value);
            }
        }
        Ok(DataTable { rows })
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The union of keys across all rows, sorted.
    pub fn column_names(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect()
    }

    /// Rows as a JSON array, suitable for the `values` entry of a data
    /// mapping.
    pub fn to_values(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod data_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_values_roundtrip() {
        let values = json!([{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]);
        let table = DataTable::from_values(&values).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.to_values(), values);
    }

    #[test]
    fn test_from_values_rejects_scalar_rows() {
        let err = DataTable::from_values(&json!([{"a": 1}, 2])).unwrap_err();
        assert_eq!(err, DataError::RowNotObject { index: 1 });
    }

    #[test]
    fn test_from_values_rejects_non_array() {
        let err = DataTable::from_values(&json!({"a": 1})).unwrap_err();
        assert_eq!(err, DataError::NotAnArray { found: "a mapping" });
    }

    #[test]
    fn test_from_columns() {
        let table = DataTable::from_columns([
            ("x".to_string(), vec![json!(1), json!(2)]),
            ("y".to_string(), vec![json!("a"), json!("b")]),
        ])
        .unwrap();
        assert_eq!(
            table.to_values(),
            json!([{"x": 1, "y": "a"}, {"x": 2, "y": "b"}])
        );
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let err = DataTable::from_columns([
            ("x".to_string(), vec![json!(1), json!(2)]),
            ("y".to_string(), vec![json!(3)]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DataError::RaggedColumn {
                column: "y".to_string(),
                length: 1,
                expected: 2,
            }
        );
    }

    #[test]
    fn test_column_names_union() {
        let table = DataTable::from_values(&json!([{"a": 1}, {"b": 2}])).unwrap();
        let names: Vec<String> = table.column_names().into_iter().collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
