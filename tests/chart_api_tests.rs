//! Builder API, persistence and validation tests for the chart layer.

use chart_spec_sdk::chart::DEFAULT_MAX_ROWS;
use chart_spec_sdk::{
    ChannelDef, Chart, ChartError, DataTable, Encoding, FieldType, Props, ValidationError,
};
use serde_json::{json, Map, Value};

fn spec_of(chart: &Chart) -> Value {
    chart.to_spec_value().unwrap()
}

mod builder_tests {
    use super::*;

    #[test]
    fn test_full_channel_definition() {
        let chart = Chart::new().mark_bar().encode(
            Encoding::new().y(ChannelDef::field("price")
                .aggregate("mean")
                .field_type(FieldType::Quantitative)
                .axis(Props::new().set("title", "Mean price"))),
        );
        let spec = spec_of(&chart);
        assert_eq!(spec["mark"], json!("bar"));
        assert_eq!(
            spec["encoding"]["y"],
            json!({
                "aggregate": "mean",
                "axis": {"title": "Mean price"},
                "field": "price",
                "type": "quantitative"
            })
        );
    }

    #[test]
    fn test_sort_by_aggregated_field() {
        let chart = Chart::new().mark_bar().encode(
            Encoding::new().x(ChannelDef::field("origin")
                .field_type(FieldType::Nominal)
                .sort_by(Props::new().set("field", "hp").set("op", "mean"))),
        );
        let spec = spec_of(&chart);
        assert_eq!(
            spec["encoding"]["x"]["sort"],
            json!({"field": "hp", "op": "mean"})
        );
    }

    #[test]
    fn test_sizing_and_naming() {
        let chart = Chart::new()
            .mark_point()
            .width(400.0)
            .height(300.0)
            .name("scatter");
        let spec = spec_of(&chart);
        assert_eq!(spec["width"], json!(400.0));
        assert_eq!(spec["height"], json!(300.0));
        assert_eq!(spec["name"], json!("scatter"));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Chart::new().mark_point();
        let widened = original.clone().width(500.0);
        assert!(spec_of(&original).get("width").is_none());
        assert_eq!(spec_of(&widened)["width"], json!(500.0));
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let chart = Chart::new()
            .mark_bar()
            .data_url("cars.json")
            .encode(Encoding::new().x("origin:N").y("count(*):Q"));

        chart.save(&path).unwrap();
        let loaded = Chart::load(&path).unwrap();
        assert_eq!(loaded, chart);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Chart::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ChartError::Io(_)));
    }
}

mod limit_tests {
    use super::*;

    fn wide_table(rows: usize) -> DataTable {
        let rows = (0..rows)
            .map(|i| {
                let mut row = Map::new();
                row.insert("x".to_string(), json!(i as f64));
                row
            })
            .collect();
        DataTable::from_rows(rows)
    }

    #[test]
    fn test_default_row_limit_enforced() {
        let chart = Chart::new()
            .mark_point()
            .data_table(wide_table(DEFAULT_MAX_ROWS + 1));
        let err = chart.to_spec_value().unwrap_err();
        assert!(matches!(
            err,
            ChartError::MaxRowsExceeded { rows, max_rows }
                if rows == DEFAULT_MAX_ROWS + 1 && max_rows == DEFAULT_MAX_ROWS
        ));
    }

    #[test]
    fn test_raised_row_limit_serializes() {
        let chart = Chart::new()
            .mark_point()
            .data_table(wide_table(DEFAULT_MAX_ROWS + 1))
            .max_rows(DEFAULT_MAX_ROWS + 10);
        let spec = chart.to_spec_value().unwrap();
        assert_eq!(
            spec["data"]["values"].as_array().unwrap().len(),
            DEFAULT_MAX_ROWS + 1
        );
        // The limit itself is a session setting, never serialized.
        assert!(spec.get("max_rows").is_none());
    }
}

mod validation_tests {
    use super::*;

    fn cars_table() -> DataTable {
        DataTable::from_columns([
            ("hp".to_string(), vec![json!(130.0), json!(165.0)]),
            ("mpg".to_string(), vec![json!(18.0), json!(15.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_known_columns_pass() {
        let chart = Chart::new()
            .mark_point()
            .data_table(cars_table())
            .encode(Encoding::new().x("hp:Q").y("mpg:Q"));
        assert!(chart.validate_columns().is_ok());
    }

    #[test]
    fn test_unknown_column_reported() {
        let chart = Chart::new()
            .mark_point()
            .data_table(cars_table())
            .encode(Encoding::new().x("weight:Q"));
        let err = chart.validate_columns().unwrap_err();
        let ValidationError::UnknownField { field, columns } = err;
        assert_eq!(field, "weight");
        assert_eq!(columns, vec!["hp".to_string(), "mpg".to_string()]);
    }
}
