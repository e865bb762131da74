//! Selection payloads exchanged with interactive front ends.
//!
//! A renderer reports a selection as a signal value plus the raw records
//! of its backing store dataset. The three selection shapes differ only
//! in how the typed `value` is derived from the signal:
//!
//! - [`IndexSelection`]: point selection with no bound fields; row ids
//!   come from the signal's `vlPoint.or` entries.
//! - [`PointSelection`]: point selection over bound fields; the signal's
//!   point mappings are kept as is.
//! - [`IntervalSelection`]: interval selection; the signal maps channel
//!   names to ranges.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw records of a selection's backing store dataset.
pub type SelectionStore = Vec<Map<String, Value>>;

/// Point selection addressed by zero-based row indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSelection {
    pub name: String,
    pub value: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub store: SelectionStore,
}

impl IndexSelection {
    /// Builds the selection from the raw signal payload. The signal's
    /// `_vgsid_` ids are one-based; a missing signal means an empty
    /// selection.
    pub fn from_signal(
        name: impl Into<String>,
        signal: Option<&Value>,
        store: SelectionStore,
    ) -> Self {
        let value = signal_points(signal)
            .iter()
            .filter_map(|point| point.get("_vgsid_"))
            .filter_map(Value::as_u64)
            .map(|id| id.saturating_sub(1))
            .collect();
        IndexSelection {
            name: name.into(),
            value,
            store,
        }
    }
}

/// Point selection carrying the selected field values per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSelection {
    pub name: String,
    pub value: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub store: SelectionStore,
}

impl PointSelection {
    pub fn from_signal(
        name: impl Into<String>,
        signal: Option<&Value>,
        store: SelectionStore,
    ) -> Self {
        PointSelection {
            name: name.into(),
            value: signal_points(signal),
            store,
        }
    }
}

/// Interval selection: channel name to selected range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSelection {
    pub name: String,
    pub value: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub store: SelectionStore,
}

impl IntervalSelection {
    pub fn from_signal(
        name: impl Into<String>,
        signal: Option<&Value>,
        store: SelectionStore,
    ) -> Self {
        IntervalSelection {
            name: name.into(),
            value: signal
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            store,
        }
    }
}

fn signal_points(signal: Option<&Value>) -> Vec<Map<String, Value>> {
    signal
        .and_then(|signal| signal.get("vlPoint"))
        .and_then(|point| point.get("or"))
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(Value::as_object)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod selection_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_selection_shifts_to_zero_based() {
        let signal = json!({"vlPoint": {"or": [{"_vgsid_": 1}, {"_vgsid_": 4}]}});
        let selection = IndexSelection::from_signal("sel", Some(&signal), Vec::new());
        assert_eq!(selection.value, vec![0, 3]);
    }

    #[test]
    fn test_index_selection_empty_without_signal() {
        let selection = IndexSelection::from_signal("sel", None, Vec::new());
        assert!(selection.value.is_empty());
    }

    #[test]
    fn test_point_selection_keeps_point_mappings() {
        let signal = json!({"vlPoint": {"or": [{"origin": "USA"}]}});
        let selection = PointSelection::from_signal("sel", Some(&signal), Vec::new());
        assert_eq!(selection.value, vec![json!({"origin": "USA"}).as_object().unwrap().clone()]);
    }

    #[test]
    fn test_interval_selection_keeps_ranges() {
        let signal = json!({"x": [10, 20], "y": [0.5, 0.9]});
        let selection = IntervalSelection::from_signal("sel", Some(&signal), Vec::new());
        assert_eq!(selection.value.get("x"), Some(&json!([10, 20])));
    }

    #[test]
    fn test_store_serializes_only_when_present() {
        let selection = IndexSelection::from_signal("sel", None, Vec::new());
        let serialized = serde_json::to_value(&selection).unwrap();
        assert_eq!(serialized, json!({"name": "sel", "value": []}));
    }
}
