//! The chart specification type catalog.
//!
//! Property lists, required properties and enumeration values follow the
//! Vega-Lite v1 vocabulary. Types are declared with the [`SchemaType`]
//! builder and collected by the registry at first use.

use super::{PrimitiveKind, PropertySchema, SchemaType, TypeRole};

/// Mark names accepted by unit charts.
pub const MARKS: &[&str] = &[
    "area", "bar", "line", "point", "text", "tick", "rule", "circle", "square", "errorBar",
];

/// Long measurement type names.
pub const FIELD_TYPES: &[&str] = &["quantitative", "ordinal", "nominal", "temporal"];

/// Aggregation operations.
pub const AGGREGATE_OPS: &[&str] = &[
    "values", "count", "valid", "missing", "distinct", "sum", "mean", "average", "variance",
    "variancep", "stdev", "stdevp", "median", "q1", "q3", "modeskew", "min", "max", "argmin",
    "argmax",
];

/// Temporal binning units.
pub const TIME_UNITS: &[&str] = &[
    "year",
    "month",
    "day",
    "date",
    "hours",
    "minutes",
    "seconds",
    "milliseconds",
    "yearmonth",
    "yearmonthdate",
    "yearmonthdatehours",
    "yearmonthdatehoursminutes",
    "yearmonthdatehoursminutesseconds",
    "monthdate",
    "hoursminutes",
    "hoursminutesseconds",
    "minutesseconds",
    "secondsmilliseconds",
    "quarter",
    "yearquarter",
    "quartermonth",
    "yearquartermonth",
];

/// Sort directions.
pub const SORT_ORDERS: &[&str] = &["ascending", "descending", "none"];

/// Scale function names.
pub const SCALE_TYPES: &[&str] = &[
    "linear", "log", "pow", "sqrt", "quantile", "quantize", "ordinal", "time", "utc",
];

/// Units for nice rounding of temporal scales.
pub const NICE_TIMES: &[&str] = &[
    "second", "minute", "hour", "day", "week", "month", "year",
];

/// Data file formats.
pub const DATA_FORMAT_TYPES: &[&str] = &["json", "csv", "tsv", "topojson"];

/// Stacking offsets for mark configuration.
pub const STACK_OFFSETS: &[&str] = &["zero", "center", "normalize", "none"];

/// Axis placements.
pub const AXIS_ORIENTS: &[&str] = &["top", "right", "left", "bottom"];

const STRING: PropertySchema = PropertySchema::Primitive(PrimitiveKind::String);
const NUMBER: PropertySchema = PropertySchema::Primitive(PrimitiveKind::Number);
const BOOLEAN: PropertySchema = PropertySchema::Primitive(PrimitiveKind::Boolean);

fn reference(target: &'static str) -> PropertySchema {
    PropertySchema::Reference(target)
}

fn array(element: PropertySchema) -> PropertySchema {
    PropertySchema::Array(Box::new(element))
}

fn union(alternatives: Vec<PropertySchema>) -> PropertySchema {
    PropertySchema::Union(alternatives)
}

fn filter_alternatives() -> Vec<PropertySchema> {
    vec![
        reference("EqualFilter"),
        reference("RangeFilter"),
        reference("OneOfFilter"),
    ]
}

/// Every type known to the registry.
pub(super) fn types() -> Vec<SchemaType> {
    let mut out = Vec::new();

    // Top-level specifications
    out.push(
        SchemaType::new("Chart", TypeRole::TopLevel)
            .prop("config", reference("Config"))
            .prop("description", STRING)
            .prop("encoding", reference("Encoding"))
            .prop("height", NUMBER)
            .prop("mark", PropertySchema::Enum(MARKS))
            .prop("max_rows", NUMBER)
            .prop("name", STRING)
            .prop("transform", reference("Transform"))
            .prop("width", NUMBER)
            .require(&["mark"])
            .skip_on_export(&["max_rows"])
            .chained_methods(),
    );
    out.push(
        SchemaType::new("LayeredChart", TypeRole::TopLevel)
            .prop("config", reference("Config"))
            .prop("description", STRING)
            .prop("height", NUMBER)
            .prop("layers", array(reference("Chart")))
            .prop("max_rows", NUMBER)
            .prop("name", STRING)
            .prop("transform", reference("Transform"))
            .prop("width", NUMBER)
            .require(&["layers"])
            .skip_on_export(&["max_rows"]),
    );
    out.push(
        SchemaType::new("FacetedChart", TypeRole::TopLevel)
            .prop("config", reference("Config"))
            .prop("description", STRING)
            .prop("facet", reference("Facet"))
            .prop("max_rows", NUMBER)
            .prop("name", STRING)
            .prop(
                "spec",
                union(vec![reference("Chart"), reference("LayeredChart")]),
            )
            .prop("transform", reference("Transform"))
            .require(&["facet", "spec"])
            .skip_on_export(&["max_rows"]),
    );

    // Encoding and channels
    out.push(
        SchemaType::new("Encoding", TypeRole::Plain)
            .prop("color", reference("ChannelWithLegend"))
            .prop("column", reference("PositionChannel"))
            .prop(
                "detail",
                union(vec![
                    reference("FieldChannel"),
                    array(reference("FieldChannel")),
                ]),
            )
            .prop("label", reference("FieldChannel"))
            .prop("opacity", reference("ChannelWithLegend"))
            .prop(
                "order",
                union(vec![
                    reference("OrderChannel"),
                    array(reference("OrderChannel")),
                ]),
            )
            .prop(
                "path",
                union(vec![
                    reference("OrderChannel"),
                    array(reference("OrderChannel")),
                ]),
            )
            .prop("row", reference("PositionChannel"))
            .prop("shape", reference("ChannelWithLegend"))
            .prop("size", reference("ChannelWithLegend"))
            .prop("text", reference("FieldChannel"))
            .prop("x", reference("PositionChannel"))
            .prop("x2", reference("FieldChannel"))
            .prop("y", reference("PositionChannel"))
            .prop("y2", reference("FieldChannel"))
            .shorthand_children(),
    );
    out.push(
        SchemaType::new("Facet", TypeRole::Plain)
            .prop("column", reference("PositionChannel"))
            .prop("row", reference("PositionChannel")),
    );
    out.push(
        SchemaType::new("PositionChannel", TypeRole::Channel)
            .prop("aggregate", PropertySchema::Enum(AGGREGATE_OPS))
            .prop("axis", union(vec![BOOLEAN, reference("Axis")]))
            .prop("bin", union(vec![reference("Bin"), BOOLEAN]))
            .prop("field", STRING)
            .prop("scale", reference("Scale"))
            .prop(
                "sort",
                union(vec![
                    PropertySchema::Enum(SORT_ORDERS),
                    reference("SortField"),
                ]),
            )
            .prop("timeUnit", PropertySchema::Enum(TIME_UNITS))
            .prop("title", STRING)
            .prop("type", PropertySchema::Enum(FIELD_TYPES))
            .prop("value", union(vec![STRING, NUMBER, BOOLEAN])),
    );
    out.push(
        SchemaType::new("ChannelWithLegend", TypeRole::Channel)
            .prop("aggregate", PropertySchema::Enum(AGGREGATE_OPS))
            .prop("bin", union(vec![reference("Bin"), BOOLEAN]))
            .prop("field", STRING)
            .prop("legend", union(vec![BOOLEAN, reference("Legend")]))
            .prop("scale", reference("Scale"))
            .prop(
                "sort",
                union(vec![
                    PropertySchema::Enum(SORT_ORDERS),
                    reference("SortField"),
                ]),
            )
            .prop("timeUnit", PropertySchema::Enum(TIME_UNITS))
            .prop("title", STRING)
            .prop("type", PropertySchema::Enum(FIELD_TYPES))
            .prop("value", union(vec![STRING, NUMBER, BOOLEAN])),
    );
    out.push(
        SchemaType::new("FieldChannel", TypeRole::Channel)
            .prop("aggregate", PropertySchema::Enum(AGGREGATE_OPS))
            .prop("bin", union(vec![reference("Bin"), BOOLEAN]))
            .prop("field", STRING)
            .prop("timeUnit", PropertySchema::Enum(TIME_UNITS))
            .prop("title", STRING)
            .prop("type", PropertySchema::Enum(FIELD_TYPES))
            .prop("value", union(vec![STRING, NUMBER, BOOLEAN])),
    );
    out.push(
        SchemaType::new("OrderChannel", TypeRole::Channel)
            .prop("aggregate", PropertySchema::Enum(AGGREGATE_OPS))
            .prop("bin", union(vec![reference("Bin"), BOOLEAN]))
            .prop("field", STRING)
            .prop("sort", PropertySchema::Enum(SORT_ORDERS))
            .prop("timeUnit", PropertySchema::Enum(TIME_UNITS))
            .prop("title", STRING)
            .prop("type", PropertySchema::Enum(FIELD_TYPES))
            .prop("value", union(vec![STRING, NUMBER, BOOLEAN])),
    );

    // Data references
    out.push(
        SchemaType::new("Data", TypeRole::Plain)
            .prop("format", reference("DataFormat"))
            .prop("url", STRING)
            .prop("values", array(PropertySchema::Any)),
    );
    out.push(
        SchemaType::new("DataFormat", TypeRole::Plain)
            .prop("feature", STRING)
            .prop("mesh", STRING)
            .prop("parse", PropertySchema::Any)
            .prop("property", STRING)
            .prop("type", PropertySchema::Enum(DATA_FORMAT_TYPES)),
    );

    // Transforms and filters
    out.push(
        SchemaType::new("Transform", TypeRole::Plain)
            .prop("calculate", array(reference("Formula")))
            .prop("filter", {
                let mut alternatives = filter_alternatives();
                let mut element = filter_alternatives();
                element.push(STRING);
                alternatives.push(array(union(element)));
                alternatives.push(STRING);
                union(alternatives)
            })
            .prop("filterInvalid", BOOLEAN),
    );
    out.push(
        SchemaType::new("Formula", TypeRole::Plain)
            .prop("expr", STRING)
            .prop("field", STRING)
            .require(&["field", "expr"]),
    );
    out.push(
        SchemaType::new("EqualFilter", TypeRole::Plain)
            .prop(
                "equal",
                union(vec![reference("DateTime"), STRING, NUMBER, BOOLEAN]),
            )
            .prop("field", STRING)
            .prop("timeUnit", PropertySchema::Enum(TIME_UNITS))
            .require(&["field", "equal"]),
    );
    out.push(
        SchemaType::new("RangeFilter", TypeRole::Plain)
            .prop("field", STRING)
            .prop("range", array(union(vec![NUMBER, reference("DateTime")])))
            .prop("timeUnit", PropertySchema::Enum(TIME_UNITS))
            .require(&["field", "range"]),
    );
    out.push(
        SchemaType::new("OneOfFilter", TypeRole::Plain)
            .prop("field", STRING)
            .prop(
                "oneOf",
                array(union(vec![reference("DateTime"), STRING, NUMBER, BOOLEAN])),
            )
            .prop("timeUnit", PropertySchema::Enum(TIME_UNITS))
            .require(&["field", "oneOf"]),
    );
    out.push(
        SchemaType::new("DateTime", TypeRole::Plain)
            .prop("date", NUMBER)
            .prop("day", union(vec![NUMBER, STRING]))
            .prop("hours", NUMBER)
            .prop("milliseconds", NUMBER)
            .prop("minutes", NUMBER)
            .prop("month", union(vec![NUMBER, STRING]))
            .prop("quarter", NUMBER)
            .prop("seconds", NUMBER)
            .prop("year", NUMBER),
    );

    // Channel helpers
    out.push(
        SchemaType::new("Bin", TypeRole::Plain)
            .prop("base", NUMBER)
            .prop("div", array(NUMBER))
            .prop("max", NUMBER)
            .prop("maxbins", NUMBER)
            .prop("min", NUMBER)
            .prop("minstep", NUMBER)
            .prop("step", NUMBER)
            .prop("steps", array(NUMBER)),
    );
    out.push(
        SchemaType::new("Scale", TypeRole::Plain)
            .prop("bandSize", union(vec![NUMBER, PropertySchema::Enum(&["fit"])]))
            .prop("clamp", BOOLEAN)
            .prop(
                "domain",
                union(vec![
                    array(STRING),
                    array(NUMBER),
                    array(reference("DateTime")),
                ]),
            )
            .prop("exponent", NUMBER)
            .prop(
                "nice",
                union(vec![PropertySchema::Enum(NICE_TIMES), BOOLEAN]),
            )
            .prop("padding", NUMBER)
            .prop("range", union(vec![array(STRING), array(NUMBER), STRING]))
            .prop("round", BOOLEAN)
            .prop("type", PropertySchema::Enum(SCALE_TYPES))
            .prop("useRawDomain", BOOLEAN)
            .prop("zero", BOOLEAN),
    );
    out.push(
        SchemaType::new("Axis", TypeRole::Plain)
            .prop("axisColor", STRING)
            .prop("axisWidth", NUMBER)
            .prop("format", STRING)
            .prop("grid", BOOLEAN)
            .prop("labelAngle", NUMBER)
            .prop("labelMaxLength", NUMBER)
            .prop("labels", BOOLEAN)
            .prop("offset", NUMBER)
            .prop("orient", PropertySchema::Enum(AXIS_ORIENTS))
            .prop("shortTimeLabels", BOOLEAN)
            .prop("subdivide", NUMBER)
            .prop("tickPadding", NUMBER)
            .prop("tickSize", NUMBER)
            .prop("ticks", NUMBER)
            .prop("title", STRING)
            .prop("titleMaxLength", NUMBER)
            .prop("titleOffset", NUMBER)
            .prop("values", array(union(vec![NUMBER, STRING]))),
    );
    out.push(
        SchemaType::new("Legend", TypeRole::Plain)
            .prop("format", STRING)
            .prop("offset", NUMBER)
            .prop("orient", STRING)
            .prop("shortTimeLabels", BOOLEAN)
            .prop("title", STRING)
            .prop("values", array(PropertySchema::Any)),
    );
    out.push(
        SchemaType::new("SortField", TypeRole::Plain)
            .prop("field", STRING)
            .prop("op", PropertySchema::Enum(AGGREGATE_OPS))
            .prop("order", PropertySchema::Enum(SORT_ORDERS))
            .require(&["field", "op"]),
    );

    // Configuration
    out.push(
        SchemaType::new("Config", TypeRole::Plain)
            .prop("axis", reference("AxisConfig"))
            .prop("background", STRING)
            .prop("cell", reference("CellConfig"))
            .prop("facet", reference("FacetConfig"))
            .prop("legend", reference("LegendConfig"))
            .prop("mark", reference("MarkConfig"))
            .prop("scale", reference("ScaleConfig"))
            .prop("viewport", array(NUMBER)),
    );
    out.push(
        SchemaType::new("MarkConfig", TypeRole::Plain)
            .prop("align", PropertySchema::Enum(&["left", "right", "center"]))
            .prop("angle", NUMBER)
            .prop("barSize", NUMBER)
            .prop("barThinSize", NUMBER)
            .prop(
                "baseline",
                PropertySchema::Enum(&["top", "middle", "bottom"]),
            )
            .prop("color", STRING)
            .prop("dx", NUMBER)
            .prop("dy", NUMBER)
            .prop("fill", STRING)
            .prop("fillOpacity", NUMBER)
            .prop("filled", BOOLEAN)
            .prop("font", STRING)
            .prop("fontSize", NUMBER)
            .prop("fontStyle", STRING)
            .prop("fontWeight", STRING)
            .prop("format", STRING)
            .prop("interpolate", STRING)
            .prop("lineSize", NUMBER)
            .prop("opacity", NUMBER)
            .prop("orient", PropertySchema::Enum(&["horizontal", "vertical"]))
            .prop("radius", NUMBER)
            .prop("ruleSize", NUMBER)
            .prop("shape", STRING)
            .prop("shortTimeLabels", BOOLEAN)
            .prop("size", NUMBER)
            .prop("stacked", PropertySchema::Enum(STACK_OFFSETS))
            .prop("stroke", STRING)
            .prop("strokeDash", array(NUMBER))
            .prop("strokeDashOffset", NUMBER)
            .prop("strokeOpacity", NUMBER)
            .prop("strokeWidth", NUMBER)
            .prop("tension", NUMBER)
            .prop("text", STRING)
            .prop("theta", NUMBER)
            .prop("tickSize", NUMBER)
            .prop("tickThickness", NUMBER),
    );
    out.push(
        SchemaType::new("AxisConfig", TypeRole::Plain)
            .prop("axisColor", STRING)
            .prop("axisWidth", NUMBER)
            .prop("grid", BOOLEAN)
            .prop("gridColor", STRING)
            .prop("gridDash", array(NUMBER))
            .prop("gridOpacity", NUMBER)
            .prop("gridWidth", NUMBER)
            .prop("labelAngle", NUMBER)
            .prop("labelFont", STRING)
            .prop("labelFontSize", NUMBER)
            .prop("labelMaxLength", NUMBER)
            .prop("labels", BOOLEAN)
            .prop("shortTimeLabels", BOOLEAN)
            .prop("subdivide", NUMBER)
            .prop("tickColor", STRING)
            .prop("tickLabelColor", STRING)
            .prop("tickLabelFontSize", NUMBER)
            .prop("tickPadding", NUMBER)
            .prop("tickSize", NUMBER)
            .prop("ticks", NUMBER)
            .prop("titleColor", STRING)
            .prop("titleFont", STRING)
            .prop("titleFontSize", NUMBER)
            .prop("titleFontWeight", STRING)
            .prop("titleMaxLength", NUMBER)
            .prop("titleOffset", NUMBER),
    );
    out.push(
        SchemaType::new("LegendConfig", TypeRole::Plain)
            .prop("gradientHeight", NUMBER)
            .prop("gradientStrokeColor", STRING)
            .prop("gradientStrokeWidth", NUMBER)
            .prop("gradientWidth", NUMBER)
            .prop("labelAlign", STRING)
            .prop("labelBaseline", STRING)
            .prop("labelColor", STRING)
            .prop("labelFont", STRING)
            .prop("labelFontSize", NUMBER)
            .prop("labelOffset", NUMBER)
            .prop("margin", NUMBER)
            .prop("offset", NUMBER)
            .prop("orient", STRING)
            .prop("padding", NUMBER)
            .prop("shortTimeLabels", BOOLEAN)
            .prop("symbolColor", STRING)
            .prop("symbolShape", STRING)
            .prop("symbolSize", NUMBER)
            .prop("symbolStrokeWidth", NUMBER)
            .prop("titleColor", STRING)
            .prop("titleFont", STRING)
            .prop("titleFontSize", NUMBER)
            .prop("titleFontWeight", STRING),
    );
    out.push(
        SchemaType::new("ScaleConfig", TypeRole::Plain)
            .prop("bandSize", NUMBER)
            .prop("barSizeRange", array(NUMBER))
            .prop("fontSizeRange", array(NUMBER))
            .prop("opacity", array(NUMBER))
            .prop("padding", NUMBER)
            .prop("pointSizeRange", array(NUMBER))
            .prop("round", BOOLEAN)
            .prop("ruleSizeRange", array(NUMBER))
            .prop("textBandWidth", NUMBER)
            .prop("tickSizeRange", array(NUMBER))
            .prop("useRawDomain", BOOLEAN),
    );
    out.push(
        SchemaType::new("CellConfig", TypeRole::Plain)
            .prop("clip", BOOLEAN)
            .prop("fill", STRING)
            .prop("fillOpacity", NUMBER)
            .prop("height", NUMBER)
            .prop("stroke", STRING)
            .prop("strokeDash", array(NUMBER))
            .prop("strokeDashOffset", NUMBER)
            .prop("strokeOpacity", NUMBER)
            .prop("strokeWidth", NUMBER)
            .prop("width", NUMBER),
    );
    out.push(
        SchemaType::new("FacetConfig", TypeRole::Plain)
            .prop("axis", reference("AxisConfig"))
            .prop("cell", reference("CellConfig"))
            .prop("grid", reference("FacetGridConfig"))
            .prop("scale", reference("FacetScaleConfig")),
    );
    out.push(
        SchemaType::new("FacetScaleConfig", TypeRole::Plain)
            .prop("padding", NUMBER)
            .prop("round", BOOLEAN),
    );
    out.push(
        SchemaType::new("FacetGridConfig", TypeRole::Plain)
            .prop("color", STRING)
            .prop("offset", NUMBER)
            .prop("opacity", NUMBER),
    );

    out
}

#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[test]
    fn test_type_names_are_unique() {
        let all = types();
        let mut names: Vec<&str> = all.iter().map(|ty| ty.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_required_properties_are_declared() {
        for ty in types() {
            for name in ty.required() {
                assert!(
                    ty.has_property(name),
                    "{} requires undeclared property {}",
                    ty.name(),
                    name
                );
            }
        }
    }

    #[test]
    fn test_skip_lists_are_declared() {
        for ty in types() {
            for name in ["max_rows"] {
                if !ty.exports(name) {
                    assert!(ty.has_property(name));
                }
            }
        }
    }
}
