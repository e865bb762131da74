//! Shorthand field notation.
//!
//! Channels can be described by a compact string of the form
//! `aggregate(field):type`, where the aggregate and the type code are
//! optional: `mean(price):Q`, `price:Q`, `mean(price)`, `price`. Type
//! codes are single letters (`Q`, `O`, `N`, `T`) or the full measurement
//! names; parsing always normalizes to the full name, formatting always
//! emits the single-letter code.
//!
//! Field names containing `:`, `(` or `)` cannot be told apart from the
//! grammar's own markers and are rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::schema::catalog::{AGGREGATE_OPS, FIELD_TYPES};

/// Failures parsing or formatting shorthand notation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShorthandError {
    #[error("field name '{0}' cannot be expressed in shorthand notation")]
    AmbiguousGrammar(String),
    #[error("unknown measurement type '{0}'")]
    UnknownType(String),
    #[error("unknown aggregate '{0}'")]
    UnknownAggregate(String),
}

/// Measurement types with their single-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Quantitative,
    Ordinal,
    Nominal,
    Temporal,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Quantitative => "quantitative",
            FieldType::Ordinal => "ordinal",
            FieldType::Nominal => "nominal",
            FieldType::Temporal => "temporal",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FieldType::Quantitative => "Q",
            FieldType::Ordinal => "O",
            FieldType::Nominal => "N",
            FieldType::Temporal => "T",
        }
    }

    /// Accepts either the full name or the single-letter code.
    pub fn from_name(text: &str) -> Option<FieldType> {
        match text {
            "quantitative" | "Q" => Some(FieldType::Quantitative),
            "ordinal" | "O" => Some(FieldType::Ordinal),
            "nominal" | "N" => Some(FieldType::Nominal),
            "temporal" | "T" => Some(FieldType::Temporal),
            _ => None,
        }
    }
}

/// The parsed parts of a shorthand string. `field_type` holds the full
/// measurement name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShorthandSpec {
    pub field: Option<String>,
    pub aggregate: Option<String>,
    pub field_type: Option<String>,
}

fn aggregate_pattern() -> String {
    AGGREGATE_OPS.join("|")
}

fn type_pattern() -> String {
    let mut parts: Vec<&str> = FIELD_TYPES.to_vec();
    parts.extend(["Q", "O", "N", "T"]);
    parts.join("|")
}

// Most specific pattern first; `(?s)` lets fields span newlines.
static AGG_FIELD_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s)\A(?P<aggregate>{})\((?P<field>.*)\):(?P<type>{})\z",
        aggregate_pattern(),
        type_pattern()
    ))
    .unwrap()
});
static AGG_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s)\A(?P<aggregate>{})\((?P<field>.*)\)\z",
        aggregate_pattern()
    ))
    .unwrap()
});
static FIELD_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s)\A(?P<field>.*):(?P<type>{})\z",
        type_pattern()
    ))
    .unwrap()
});

fn contains_markers(field: &str) -> bool {
    field.contains([':', '(', ')'])
}

/// Parses a shorthand string into its parts. The empty string parses to
/// an empty spec.
pub fn parse(shorthand: &str) -> Result<ShorthandSpec, ShorthandError> {
    if shorthand.is_empty() {
        return Ok(ShorthandSpec::default());
    }
    for pattern in [&*AGG_FIELD_TYPE, &*AGG_FIELD, &*FIELD_TYPE] {
        let Some(caps) = pattern.captures(shorthand) else {
            continue;
        };
        let field = caps
            .name("field")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        if contains_markers(&field) {
            return Err(ShorthandError::AmbiguousGrammar(shorthand.to_string()));
        }
        let field_type = match caps.name("type") {
            Some(m) => Some(long_type_name(m.as_str())?.to_string()),
            None => None,
        };
        return Ok(ShorthandSpec {
            field: Some(field),
            aggregate: caps.name("aggregate").map(|m| m.as_str().to_string()),
            field_type,
        });
    }
    if contains_markers(shorthand) {
        return Err(ShorthandError::AmbiguousGrammar(shorthand.to_string()));
    }
    Ok(ShorthandSpec {
        field: Some(shorthand.to_string()),
        ..ShorthandSpec::default()
    })
}

/// Formats parts back into canonical shorthand: short type codes and
/// `aggregate(field)` wrapping. A spec with no field formats to the
/// empty string.
pub fn format(spec: &ShorthandSpec) -> Result<String, ShorthandError> {
    let Some(field) = spec.field.as_deref() else {
        return Ok(String::new());
    };
    if contains_markers(field) {
        return Err(ShorthandError::AmbiguousGrammar(field.to_string()));
    }
    let mut out = field.to_string();
    if let Some(aggregate) = spec.aggregate.as_deref() {
        if !AGGREGATE_OPS.contains(&aggregate) {
            return Err(ShorthandError::UnknownAggregate(aggregate.to_string()));
        }
        out = format!("{}({})", aggregate, out);
    }
    if let Some(field_type) = spec.field_type.as_deref() {
        let code = FieldType::from_name(field_type)
            .ok_or_else(|| ShorthandError::UnknownType(field_type.to_string()))?
            .code();
        out.push(':');
        out.push_str(code);
    }
    Ok(out)
}

fn long_type_name(text: &str) -> Result<&'static str, ShorthandError> {
    FieldType::from_name(text)
        .map(|ty| ty.name())
        .ok_or_else(|| ShorthandError::UnknownType(text.to_string()))
}

#[cfg(test)]
mod shorthand_tests {
    use super::*;

    fn spec(
        field: Option<&str>,
        aggregate: Option<&str>,
        field_type: Option<&str>,
    ) -> ShorthandSpec {
        ShorthandSpec {
            field: field.map(str::to_string),
            aggregate: aggregate.map(str::to_string),
            field_type: field_type.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_full_form() {
        assert_eq!(
            parse("mean(price):Q").unwrap(),
            spec(Some("price"), Some("mean"), Some("quantitative"))
        );
    }

    #[test]
    fn test_parse_aggregate_only() {
        assert_eq!(
            parse("median(price)").unwrap(),
            spec(Some("price"), Some("median"), None)
        );
    }

    #[test]
    fn test_parse_field_and_type() {
        assert_eq!(
            parse("price:T").unwrap(),
            spec(Some("price"), None, Some("temporal"))
        );
        assert_eq!(
            parse("price:temporal").unwrap(),
            spec(Some("price"), None, Some("temporal"))
        );
    }

    #[test]
    fn test_parse_bare_field() {
        assert_eq!(parse("price").unwrap(), spec(Some("price"), None, None));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse("").unwrap(), ShorthandSpec::default());
    }

    #[test]
    fn test_parse_field_that_looks_like_aggregate() {
        // No parentheses, so this is a plain field name.
        assert_eq!(parse("mean").unwrap(), spec(Some("mean"), None, None));
    }

    #[test]
    fn test_parse_rejects_marker_fields() {
        assert!(matches!(
            parse("a:b:Q"),
            Err(ShorthandError::AmbiguousGrammar(_))
        ));
        assert!(matches!(
            parse("price(usd)"),
            Err(ShorthandError::AmbiguousGrammar(_))
        ));
    }

    #[test]
    fn test_format_canonicalizes_type() {
        let formatted = format(&spec(Some("price"), Some("mean"), Some("quantitative"))).unwrap();
        assert_eq!(formatted, "mean(price):Q");
    }

    #[test]
    fn test_format_without_field_is_empty() {
        assert_eq!(format(&spec(None, Some("mean"), None)).unwrap(), "");
    }

    #[test]
    fn test_format_rejects_unknown_aggregate() {
        assert!(matches!(
            format(&spec(Some("x"), Some("mode"), None)),
            Err(ShorthandError::UnknownAggregate(_))
        ));
    }

    #[test]
    fn test_format_rejects_marker_fields() {
        assert!(matches!(
            format(&spec(Some("a:b"), None, None)),
            Err(ShorthandError::AmbiguousGrammar(_))
        ));
    }

    #[test]
    fn test_roundtrip_normalizes() {
        let parsed = parse("sum(yield):quantitative").unwrap();
        assert_eq!(format(&parsed).unwrap(), "sum(yield):Q");
    }

    #[test]
    fn test_count_star() {
        let parsed = parse("count(*):Q").unwrap();
        assert_eq!(parsed, spec(Some("*"), Some("count"), Some("quantitative")));
        assert_eq!(format(&parsed).unwrap(), "count(*):Q");
    }
}
