//! Round-trip tests through the builder-script notation

use serde_json::json;

use chart_spec_sdk::chart::{self, AnyChart, ChannelDef, Chart, Encoding, LayeredChart, Props};
use chart_spec_sdk::import::ScriptEvaluator;
use chart_spec_sdk::shorthand::FieldType;
use chart_spec_sdk::{DataTable, PropValue};

fn reeval(script: &str) -> AnyChart {
    let node = ScriptEvaluator::new().eval(script).unwrap();
    AnyChart::from_node(node.into_chart().unwrap()).unwrap()
}

mod roundtrip_tests {
    use super::*;

    #[test]
    fn test_generated_script_evaluates_to_same_spec() {
        let chart = Chart::new()
            .mark_line()
            .data_url("cars.json")
            .encode(
                Encoding::new()
                    .x("mpg:Q")
                    .y("mean(hp):Q")
                    .color("origin:N"),
            );
        let script = chart.to_script().unwrap();
        assert_eq!(
            reeval(&script).to_spec_value().unwrap(),
            chart.to_spec_value().unwrap()
        );
    }

    #[test]
    fn test_config_chain_roundtrip() {
        let chart = Chart::new()
            .configure(Props::new().set("background", "white"))
            .configure_mark(Props::new().set("opacity", 0.5))
            .configure_facet_cell(Props::new().set("fill", "wheat"));
        let script = chart.to_script().unwrap();
        assert_eq!(
            reeval(&script).to_spec_value().unwrap(),
            chart.to_spec_value().unwrap()
        );
    }

    #[test]
    fn test_channel_extras_roundtrip() {
        let chart = Chart::new().encode(
            Encoding::new()
                .x(ChannelDef::field("date")
                    .field_type(FieldType::Temporal)
                    .time_unit("year"))
                .y(ChannelDef::field("hp")
                    .field_type(FieldType::Quantitative)
                    .bin(true)),
        );
        let script = chart.to_script().unwrap();
        assert_eq!(
            reeval(&script).to_spec_value().unwrap(),
            chart.to_spec_value().unwrap()
        );
    }

    #[test]
    fn test_transform_roundtrip() {
        let chart = Chart::new().transform_data(
            Props::new()
                .set(
                    "calculate",
                    vec![PropValue::from(chart::formula("b", "datum.a * 2"))],
                )
                .set("filter", chart::range_filter("year", json!(1955), json!(1960))),
        );
        let script = chart.to_script().unwrap();
        assert_eq!(
            reeval(&script).to_spec_value().unwrap(),
            chart.to_spec_value().unwrap()
        );
    }

    #[test]
    fn test_layered_roundtrip() {
        let chart = LayeredChart::new()
            .data_url("cars.json")
            .layer(Chart::new().mark_line().encode(Encoding::new().x("year:T")))
            .layer(Chart::new().mark_point());
        let script = chart.to_script().unwrap();
        let node = ScriptEvaluator::new().eval(&script).unwrap();
        let rebuilt = AnyChart::from_node(node.into_chart().unwrap()).unwrap();
        assert_eq!(
            rebuilt.to_spec_value().unwrap(),
            chart.to_spec_value().unwrap()
        );
    }

    #[test]
    fn test_faceted_roundtrip() {
        let chart = chart::FacetedChart::new()
            .facet_row("origin:N")
            .facet_column("cylinders:O")
            .spec(Chart::new().mark_bar().encode(Encoding::new().x("mpg:Q")));
        let script = chart.to_script().unwrap();
        assert_eq!(
            reeval(&script).to_spec_value().unwrap(),
            chart.to_spec_value().unwrap()
        );
    }

    #[test]
    fn test_bound_table_roundtrip() {
        let table = DataTable::from_values(&json!([{"hp": 110, "mpg": 21.0}])).unwrap();
        let chart = Chart::new()
            .data_table(table.clone())
            .encode(Encoding::new().x("mpg:Q"));
        let script = chart.to_script_with_data_var("cars").unwrap();
        let node = ScriptEvaluator::with_data(table).eval(&script).unwrap();
        let rebuilt = AnyChart::from_node(node.into_chart().unwrap()).unwrap();
        assert_eq!(
            rebuilt.to_spec_value().unwrap(),
            chart.to_spec_value().unwrap()
        );
    }
}

mod canonicalization_tests {
    use super::*;

    #[test]
    fn test_long_type_name_normalizes_to_code() {
        let chart = reeval("Chart().mark_point().encode(x='mpg:quantitative')");
        assert_eq!(
            chart.to_script().unwrap(),
            "Chart().mark_point().encode(\n    x='mpg:Q',\n)"
        );
    }

    #[test]
    fn test_aggregate_shorthand_expands() {
        let chart = reeval("Chart().mark_bar().encode(y='average(price):Q')");
        assert_eq!(
            chart.to_spec_value().unwrap()["encoding"]["y"],
            json!({"aggregate": "average", "field": "price", "type": "quantitative"})
        );
        assert_eq!(
            chart.to_script().unwrap(),
            "Chart().mark_bar().encode(\n    y='average(price):Q',\n)"
        );
    }
}
