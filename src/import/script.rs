//! Builder-script evaluation using nom.
//!
//! Grammar:
//! ```text
//! script  := call
//! call    := ident '(' args ')' method*
//! method  := '.' ident '(' args ')'
//! args    := (arg (',' arg)* ','?)?
//! arg     := ident '=' expr | expr
//! expr    := 'null' | 'true' | 'false' | number | string | list | map | call | ident
//! list    := '[' (expr (',' expr)* ','?)? ']'
//! map     := '{' (string ':' expr (',' string ':' expr)* ','?)? '}'
//! string  := '\'' ... '\''
//! ```
//!
//! Constructor names resolve against the type catalog; keyword arguments
//! are validated exactly like imported JSON properties. Method calls on
//! top-level constructors invert the chaining the code exporter
//! performs: `mark_*` sets the mark (kwargs go to `config.mark`),
//! `encode` and `transform_data` merge into `encoding` and `transform`,
//! and the `configure*` family merges into the config subtree.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{map, not, opt, recognize, value},
    multi::{many0, many0_count, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use thiserror::Error;

use super::{JsonImporter, SchemaViolation};
use crate::data::DataTable;
use crate::graph::{ChartNode, DataSource, Node, ObjectNode, PropValue};
use crate::schema::{catalog, registry, PropertySchema, SchemaType, TypeRole};
use crate::shorthand::{self, ShorthandError};

/// Failures evaluating builder-script source.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unknown constructor '{0}'")]
    UnknownConstructor(String),
    #[error("'{type_name}' has no method '{method}'")]
    UnknownMethod { type_name: String, method: String },
    #[error("unexpected positional argument in '{0}'")]
    UnexpectedArgument(String),
    #[error("no table is bound for data variable '{0}'")]
    UnboundData(String),
    #[error("unsupported expression for {context}")]
    InvalidExpression { context: &'static str },
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error(transparent)]
    Shorthand(#[from] ShorthandError),
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Str(String),
    Ident(String),
    List(Vec<Expr>),
    Map(Vec<(String, Expr)>),
    Call(CallExpr),
}

#[derive(Debug, Clone, PartialEq)]
struct CallExpr {
    name: String,
    args: Vec<Expr>,
    kwargs: Vec<(String, Expr)>,
    methods: Vec<MethodExpr>,
}

#[derive(Debug, Clone, PartialEq)]
struct MethodExpr {
    name: String,
    args: Vec<Expr>,
    kwargs: Vec<(String, Expr)>,
}

enum Arg {
    Positional(Expr),
    Keyword(String, Expr),
}

/// Parse whitespace around a parser
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Keyword that must not run into a longer identifier
fn keyword(word: &'static str) -> impl FnMut(&str) -> IResult<&str, &str> {
    move |input| terminated(tag(word), not(alt((alphanumeric1, tag("_")))))(input)
}

fn number(input: &str) -> IResult<&str, Expr> {
    let (rest, text) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            digit1,
        ))),
    )))(input)?;
    let parsed = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
    } else {
        text.parse::<i64>()
            .ok()
            .map(serde_json::Number::from)
            .or_else(|| text.parse::<f64>().ok().and_then(serde_json::Number::from_f64))
    };
    match parsed {
        Some(number) => Ok((rest, Expr::Number(number))),
        None => Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn string_literal(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        map(
            opt(escaped_transform(
                is_not("\\'"),
                '\\',
                alt((
                    value("'", char('\'')),
                    value("\\", char('\\')),
                    value("\n", char('n')),
                    value("\t", char('t')),
                    value("\r", char('r')),
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('\''),
    )(input)
}

fn list(input: &str) -> IResult<&str, Expr> {
    map(
        delimited(
            ws(char('[')),
            terminated(
                separated_list0(ws(char(',')), expr),
                opt(ws(char(','))),
            ),
            preceded(multispace0, char(']')),
        ),
        Expr::List,
    )(input)
}

fn map_literal(input: &str) -> IResult<&str, Expr> {
    map(
        delimited(
            ws(char('{')),
            terminated(
                separated_list0(
                    ws(char(',')),
                    separated_pair(string_literal, ws(char(':')), expr),
                ),
                opt(ws(char(','))),
            ),
            preceded(multispace0, char('}')),
        ),
        Expr::Map,
    )(input)
}

fn argument(input: &str) -> IResult<&str, Arg> {
    alt((
        map(
            separated_pair(identifier, ws(char('=')), expr),
            |(name, value)| Arg::Keyword(name.to_string(), value),
        ),
        map(expr, Arg::Positional),
    ))(input)
}

fn call_args(input: &str) -> IResult<&str, (Vec<Expr>, Vec<(String, Expr)>)> {
    let (rest, items) = delimited(
        ws(char('(')),
        terminated(
            separated_list0(ws(char(',')), argument),
            opt(ws(char(','))),
        ),
        preceded(multispace0, char(')')),
    )(input)?;
    let mut args = Vec::new();
    let mut kwargs = Vec::new();
    for item in items {
        match item {
            Arg::Positional(expr) => args.push(expr),
            Arg::Keyword(name, expr) => kwargs.push((name, expr)),
        }
    }
    Ok((rest, (args, kwargs)))
}

fn method(input: &str) -> IResult<&str, MethodExpr> {
    let (rest, _) = ws(char('.'))(input)?;
    let (rest, name) = identifier(rest)?;
    let (rest, (args, kwargs)) = call_args(rest)?;
    Ok((
        rest,
        MethodExpr {
            name: name.to_string(),
            args,
            kwargs,
        },
    ))
}

fn call_or_ident(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, parens) = opt(call_args)(rest)?;
    match parens {
        Some((args, kwargs)) => {
            let (rest, methods) = many0(method)(rest)?;
            Ok((
                rest,
                Expr::Call(CallExpr {
                    name: name.to_string(),
                    args,
                    kwargs,
                    methods,
                }),
            ))
        }
        None => Ok((rest, Expr::Ident(name.to_string()))),
    }
}

fn expr(input: &str) -> IResult<&str, Expr> {
    preceded(
        multispace0,
        alt((
            value(Expr::Null, keyword("null")),
            value(Expr::Bool(true), keyword("true")),
            value(Expr::Bool(false), keyword("false")),
            number,
            map(string_literal, Expr::Str),
            list,
            map_literal,
            call_or_ident,
        )),
    )(input)
}

fn parse_script(source: &str) -> Result<Expr, ScriptError> {
    match ws(expr)(source) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rest, _)) => Err(ScriptError::Parse(format!(
            "unexpected characters at end: '{}'",
            rest
        ))),
        Err(err) => Err(ScriptError::Parse(err.to_string())),
    }
}

/// Evaluates builder-script source back into an object graph.
#[derive(Debug, Clone, Default)]
pub struct ScriptEvaluator {
    data: Option<DataTable>,
    importer: JsonImporter,
}

impl ScriptEvaluator {
    pub fn new() -> Self {
        ScriptEvaluator::default()
    }

    /// Binds a table to bare data identifiers in the script.
    pub fn with_data(table: DataTable) -> Self {
        ScriptEvaluator {
            data: Some(table),
            importer: JsonImporter::new(),
        }
    }

    pub fn eval(&self, source: &str) -> Result<Node, ScriptError> {
        match parse_script(source)? {
            Expr::Call(call) => self.eval_constructor(&call),
            _ => Err(ScriptError::Parse(
                "expected a constructor call".to_string(),
            )),
        }
    }

    fn eval_constructor(&self, call: &CallExpr) -> Result<Node, ScriptError> {
        let ty = registry()
            .get(&call.name)
            .ok_or_else(|| ScriptError::UnknownConstructor(call.name.clone()))?;
        match ty.role() {
            TypeRole::TopLevel => {
                let mut chart = ChartNode::new(ty.name());
                if call.args.len() > 1 {
                    return Err(ScriptError::UnexpectedArgument(call.name.clone()));
                }
                if let Some(arg) = call.args.first() {
                    chart.set_data(self.eval_data_arg(arg)?);
                }
                for (key, value) in &call.kwargs {
                    let built = self.eval_prop(ty, key, value)?;
                    chart.object_mut().set(key, built);
                }
                for method in &call.methods {
                    self.apply_method(&mut chart, method)?;
                }
                Ok(Node::Chart(chart))
            }
            _ => {
                if let Some(method) = call.methods.first() {
                    return Err(ScriptError::UnknownMethod {
                        type_name: call.name.clone(),
                        method: method.name.clone(),
                    });
                }
                Ok(Node::Plain(self.eval_object(ty, call)?))
            }
        }
    }

    fn eval_object(
        &self,
        ty: &'static SchemaType,
        call: &CallExpr,
    ) -> Result<ObjectNode, ScriptError> {
        let mut node = ObjectNode::new(ty.name());
        if let Some(arg) = call.args.first() {
            // Only channel constructors take a positional argument, the
            // shorthand string.
            if ty.role() != TypeRole::Channel || call.args.len() > 1 {
                return Err(ScriptError::UnexpectedArgument(call.name.clone()));
            }
            let Expr::Str(text) = arg else {
                return Err(ScriptError::UnexpectedArgument(call.name.clone()));
            };
            apply_shorthand(&mut node, text)?;
        }
        for (key, value) in &call.kwargs {
            let built = self.eval_prop(ty, key, value)?;
            node.set(key, built);
        }
        Ok(node)
    }

    fn eval_data_arg(&self, arg: &Expr) -> Result<DataSource, ScriptError> {
        match arg {
            Expr::Str(url) => {
                let mut data = ObjectNode::new("Data");
                data.set("url", url.as_str());
                Ok(DataSource::Reference(data))
            }
            Expr::Ident(name) => match &self.data {
                Some(table) => Ok(DataSource::Table(table.clone())),
                None => Err(ScriptError::UnboundData(name.clone())),
            },
            Expr::Call(call) if call.name == "Data" => {
                let ty = registry()
                    .get("Data")
                    .ok_or_else(|| ScriptError::UnknownConstructor("Data".to_string()))?;
                Ok(DataSource::Reference(self.eval_object(ty, call)?))
            }
            _ => Err(ScriptError::InvalidExpression {
                context: "data argument",
            }),
        }
    }

    fn eval_prop(
        &self,
        ty: &'static SchemaType,
        key: &str,
        expr: &Expr,
    ) -> Result<PropValue, ScriptError> {
        let schema = ty
            .property(key)
            .ok_or_else(|| SchemaViolation::UnknownProperty {
                type_name: ty.name().to_string(),
                property: key.to_string(),
            })?;
        self.eval_schema(ty, key, schema, expr)
    }

    fn eval_schema(
        &self,
        ty: &'static SchemaType,
        key: &str,
        schema: &PropertySchema,
        expr: &Expr,
    ) -> Result<PropValue, ScriptError> {
        match (schema, expr) {
            (PropertySchema::Reference(target), Expr::Str(text))
                if channel_type(target) =>
            {
                let mut node = ObjectNode::new(target);
                apply_shorthand(&mut node, text)?;
                Ok(PropValue::from(Node::Plain(node)))
            }
            (PropertySchema::Reference(target), Expr::Call(call)) => {
                if call.name != *target {
                    return Err(ScriptError::Schema(SchemaViolation::ValueMismatch {
                        type_name: ty.name().to_string(),
                        property: key.to_string(),
                        expected: format!("a {} constructor", target),
                        found: call.name.clone(),
                    }));
                }
                Ok(PropValue::from(self.eval_constructor(call)?))
            }
            (PropertySchema::Union(alternatives), expr) => {
                for alt in alternatives {
                    if expr_admissible(alt, expr) {
                        return self.eval_schema(ty, key, alt, expr);
                    }
                }
                Err(ScriptError::Schema(SchemaViolation::ValueMismatch {
                    type_name: ty.name().to_string(),
                    property: key.to_string(),
                    expected: schema.describe(),
                    found: describe_expr(expr).to_string(),
                }))
            }
            (PropertySchema::Array(element), Expr::List(items)) => {
                let built: Result<Vec<PropValue>, ScriptError> = items
                    .iter()
                    .map(|item| self.eval_schema(ty, key, element, item))
                    .collect();
                Ok(PropValue::List(built?))
            }
            (schema, expr) => {
                let value = expr_to_value(expr).ok_or(ScriptError::InvalidExpression {
                    context: "property value",
                })?;
                Ok(self.importer.build_prop(ty, key, schema, &value)?)
            }
        }
    }

    fn apply_method(&self, chart: &mut ChartNode, method: &MethodExpr) -> Result<(), ScriptError> {
        if !method.args.is_empty() {
            return Err(ScriptError::UnexpectedArgument(method.name.clone()));
        }
        let ty = chart.schema();

        if let Some(mark) = method.name.strip_prefix("mark_") {
            if !catalog::MARKS.contains(&mark) || !ty.has_property("mark") {
                return Err(unknown_method(ty, method));
            }
            chart.object_mut().set("mark", mark);
            if !method.kwargs.is_empty() {
                self.merge_into(chart, &["config", "mark"], method)?;
            }
            return Ok(());
        }

        match method.name.as_str() {
            "encode" => self.merge_into(chart, &["encoding"], method),
            "transform_data" => self.merge_into(chart, &["transform"], method),
            "configure" => self.merge_into(chart, &["config"], method),
            name => match name.strip_prefix("configure_") {
                Some(rest) => {
                    let path = config_path(ty, rest).ok_or_else(|| unknown_method(ty, method))?;
                    self.merge_into(chart, &path, method)
                }
                None => Err(unknown_method(ty, method)),
            },
        }
    }

    /// Merges a method's kwargs into the node at the given property
    /// path, creating intermediate nodes as needed. Repeated calls
    /// update rather than replace.
    fn merge_into(
        &self,
        chart: &mut ChartNode,
        path: &[&str],
        method: &MethodExpr,
    ) -> Result<(), ScriptError> {
        let ty = chart.schema();
        let Some(target) = chart.object_mut().ensure_path(path) else {
            return Err(unknown_method(ty, method));
        };
        let target_ty = target.schema();
        for (key, value) in &method.kwargs {
            let built = self.eval_prop(target_ty, key, value)?;
            target.set(key, built);
        }
        Ok(())
    }
}

fn unknown_method(ty: &SchemaType, method: &MethodExpr) -> ScriptError {
    ScriptError::UnknownMethod {
        type_name: ty.name().to_string(),
        method: method.name.clone(),
    }
}

fn channel_type(target: &str) -> bool {
    registry()
        .get(target)
        .map(|ty| ty.role() == TypeRole::Channel)
        .unwrap_or(false)
}

fn apply_shorthand(node: &mut ObjectNode, text: &str) -> Result<(), ScriptError> {
    let spec = shorthand::parse(text)?;
    if let Some(field) = spec.field {
        node.set("field", field);
    }
    if let Some(aggregate) = spec.aggregate {
        node.set("aggregate", aggregate);
    }
    if let Some(field_type) = spec.field_type {
        node.set("type", field_type);
    }
    Ok(())
}

/// Resolves the `configure_<rest>` method family against the config
/// schema: each underscore-separated segment must name a nested config
/// node.
fn config_path(chart_ty: &'static SchemaType, rest: &str) -> Option<Vec<&'static str>> {
    let mut ty = match chart_ty.property("config")? {
        PropertySchema::Reference(target) => registry().get(target)?,
        _ => return None,
    };
    let mut path = vec!["config"];
    for segment in rest.split('_') {
        let (name, schema) = ty.properties().find(|(name, _)| *name == segment)?;
        path.push(name);
        ty = match schema {
            PropertySchema::Reference(target) => registry().get(target)?,
            _ => return None,
        };
    }
    Some(path)
}

/// Structural admission of an unevaluated expression, mirroring
/// `PropertySchema::admits` for JSON values.
fn expr_admissible(schema: &PropertySchema, expr: &Expr) -> bool {
    match (schema, expr) {
        (PropertySchema::Union(alternatives), expr) => {
            alternatives.iter().any(|alt| expr_admissible(alt, expr))
        }
        (PropertySchema::Reference(target), Expr::Call(call)) => call.name == *target,
        (PropertySchema::Reference(target), Expr::Str(_)) => channel_type(target),
        (PropertySchema::Array(element), Expr::List(items)) => {
            items.iter().all(|item| expr_admissible(element, item))
        }
        (PropertySchema::Array(_), _) => false,
        (schema, expr) => match expr_to_value(expr) {
            Some(value) => schema.admits(&value),
            None => false,
        },
    }
}

fn expr_to_value(expr: &Expr) -> Option<serde_json::Value> {
    use serde_json::Value;
    match expr {
        Expr::Null => Some(Value::Null),
        Expr::Bool(flag) => Some(Value::Bool(*flag)),
        Expr::Number(number) => Some(Value::Number(number.clone())),
        Expr::Str(text) => Some(Value::String(text.clone())),
        Expr::List(items) => items
            .iter()
            .map(expr_to_value)
            .collect::<Option<Vec<Value>>>()
            .map(Value::Array),
        Expr::Map(entries) => entries
            .iter()
            .map(|(key, value)| expr_to_value(value).map(|value| (key.clone(), value)))
            .collect::<Option<serde_json::Map<String, Value>>>()
            .map(Value::Object),
        Expr::Ident(_) | Expr::Call(_) => None,
    }
}

fn describe_expr(expr: &Expr) -> &'static str {
    match expr {
        Expr::Null => "null",
        Expr::Bool(_) => "a boolean",
        Expr::Number(_) => "a number",
        Expr::Str(_) => "a string",
        Expr::Ident(_) => "an identifier",
        Expr::List(_) => "a list",
        Expr::Map(_) => "a map",
        Expr::Call(_) => "a constructor call",
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_expr("null"), Expr::Null);
        assert_eq!(parse_expr("true"), Expr::Bool(true));
        assert_eq!(parse_expr("-3.5"), Expr::Number(serde_json::Number::from_f64(-3.5).unwrap()));
        assert_eq!(parse_expr("'it\\'s'"), Expr::Str("it's".to_string()));
    }

    #[test]
    fn test_parse_list_and_map() {
        assert_eq!(
            parse_expr("[1, 2,]"),
            Expr::List(vec![
                Expr::Number(1.into()),
                Expr::Number(2.into()),
            ])
        );
        assert_eq!(
            parse_expr("{'k': 'v'}"),
            Expr::Map(vec![("k".to_string(), Expr::Str("v".to_string()))])
        );
    }

    #[test]
    fn test_parse_call_with_methods() {
        let parsed = parse_expr("Chart('x.json').mark_point()\n    .encode(x='a:Q')");
        let Expr::Call(call) = parsed else {
            panic!("expected a call")
        };
        assert_eq!(call.name, "Chart");
        assert_eq!(call.args, vec![Expr::Str("x.json".to_string())]);
        assert_eq!(call.methods.len(), 2);
        assert_eq!(call.methods[0].name, "mark_point");
        assert_eq!(call.methods[1].name, "encode");
        assert_eq!(call.methods[1].kwargs[0].0, "x");
    }

    #[test]
    fn test_parse_trailing_comma_kwargs() {
        let parsed = parse_expr("Scale(\n    zero=false,\n)");
        let Expr::Call(call) = parsed else {
            panic!("expected a call")
        };
        assert_eq!(call.kwargs, vec![("zero".to_string(), Expr::Bool(false))]);
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert!(parse_script("Chart() extra").is_err());
    }

    #[test]
    fn test_keyword_is_not_identifier_prefix() {
        assert_eq!(parse_expr("nullable"), Expr::Ident("nullable".to_string()));
    }

    fn parse_expr(source: &str) -> Expr {
        parse_script(source).unwrap()
    }
}

#[cfg(test)]
mod eval_tests {
    use super::*;
    use crate::export::JsonExporter;
    use serde_json::json;

    fn eval_json(source: &str) -> serde_json::Value {
        let node = ScriptEvaluator::new().eval(source).unwrap();
        JsonExporter::new().export(&node)
    }

    #[test]
    fn test_eval_chart_with_url_data() {
        assert_eq!(
            eval_json("Chart('cars.json').mark_line()"),
            json!({"data": {"url": "cars.json"}, "mark": "line"})
        );
    }

    #[test]
    fn test_eval_encode_shorthand_expansion() {
        assert_eq!(
            eval_json("Chart().mark_point().encode(x='mean(price):Q')"),
            json!({
                "mark": "point",
                "encoding": {"x": {
                    "aggregate": "mean",
                    "field": "price",
                    "type": "quantitative"
                }}
            })
        );
    }

    #[test]
    fn test_eval_mark_kwargs_go_to_config() {
        assert_eq!(
            eval_json("Chart().mark_bar(\n    color='salmon',\n)"),
            json!({
                "config": {"mark": {"color": "salmon"}},
                "mark": "bar"
            })
        );
    }

    #[test]
    fn test_eval_configure_facet_path() {
        assert_eq!(
            eval_json("Chart().mark_point().configure_facet_cell(\n    fill='wheat',\n)"),
            json!({
                "config": {"facet": {"cell": {"fill": "wheat"}}},
                "mark": "point"
            })
        );
    }

    #[test]
    fn test_eval_repeated_configure_updates() {
        let node = ScriptEvaluator::new()
            .eval("Chart().mark_point().configure_axis(\n    grid=true,\n).configure_axis(\n    tickSize=10,\n)")
            .unwrap();
        let exported = JsonExporter::new().export(&node);
        assert_eq!(
            exported,
            json!({
                "config": {"axis": {"grid": true, "tickSize": 10}},
                "mark": "point"
            })
        );
    }

    #[test]
    fn test_eval_bound_data_identifier() {
        let table = DataTable::from_values(&json!([{"a": 1}])).unwrap();
        let node = ScriptEvaluator::with_data(table)
            .eval("Chart(df).mark_point()")
            .unwrap();
        let chart = node.as_chart().unwrap();
        assert!(matches!(chart.data(), Some(DataSource::Table(_))));
    }

    #[test]
    fn test_eval_unbound_data_identifier_fails() {
        let err = ScriptEvaluator::new().eval("Chart(df).mark_point()").unwrap_err();
        assert!(matches!(err, ScriptError::UnboundData(name) if name == "df"));
    }

    #[test]
    fn test_eval_unknown_constructor() {
        let err = ScriptEvaluator::new().eval("Plot()").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownConstructor(name) if name == "Plot"));
    }

    #[test]
    fn test_eval_unknown_method() {
        let err = ScriptEvaluator::new().eval("Chart().mark_point().rotate()").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownMethod { method, .. } if method == "rotate"));
    }

    #[test]
    fn test_eval_rejects_positional_in_encode() {
        let err = ScriptEvaluator::new()
            .eval("Chart().mark_point().encode('x:Q')")
            .unwrap_err();
        assert!(matches!(err, ScriptError::UnexpectedArgument(_)));
    }

    #[test]
    fn test_eval_kwargs_validated() {
        let err = ScriptEvaluator::new()
            .eval("Chart().mark_point().encode(x=PositionChannel(\n    field=3,\n))")
            .unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Schema(SchemaViolation::ValueMismatch { .. })
        ));
    }

    #[test]
    fn test_eval_layered_chart_kwargs() {
        let exported = eval_json(
            "LayeredChart(\n    layers=[Chart(\n        mark='line',\n    ), Chart(\n        mark='point',\n    )],\n)",
        );
        assert_eq!(
            exported,
            json!({"layers": [{"mark": "line"}, {"mark": "point"}]})
        );
    }

    #[test]
    fn test_eval_transform_data() {
        let exported = eval_json(
            "Chart().mark_point().transform_data(\n    calculate=[Formula(\n        expr='datum.a * 2',\n        field='b',\n    )],\n    filter='datum.a > 1',\n)",
        );
        assert_eq!(
            exported,
            json!({
                "mark": "point",
                "transform": {
                    "calculate": [{"expr": "datum.a * 2", "field": "b"}],
                    "filter": "datum.a > 1"
                }
            })
        );
    }
}
