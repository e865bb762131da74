//! Rendering object graphs to builder-script source.
//!
//! The output is the constructor notation this crate evaluates itself
//! (see `import::script`): keyword arguments sorted by name and laid out
//! one per line, single-quoted strings, channel shorthand in positional
//! argument position, and chart-level properties lifted into chained
//! method calls. Rendering the same graph twice yields byte-identical
//! text.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::ExportError;
use crate::graph::{ChartNode, DataSource, Node, ObjectNode, PropValue};
use crate::schema::TypeRole;
use crate::shorthand::{self, ShorthandSpec};

const INDENT: usize = 4;

/// How many nesting levels of the config object are expanded into
/// `configure_*` method calls.
const CONFIG_METHOD_DEPTH: usize = 3;

/// A value in argument position.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeValue {
    Literal(String),
    Call(CodeCall),
    List(Vec<CodeValue>),
}

impl CodeValue {
    fn render(&self, level: usize) -> String {
        match self {
            CodeValue::Literal(text) => text.clone(),
            CodeValue::Call(call) => call.render(level),
            CodeValue::List(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| item.render(level + INDENT))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

/// A constructor or method call under assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeCall {
    name: String,
    args: Vec<CodeValue>,
    kwargs: BTreeMap<String, CodeValue>,
    methods: Vec<CodeCall>,
}

impl CodeCall {
    pub fn new(name: impl Into<String>) -> Self {
        CodeCall {
            name: name.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            methods: Vec::new(),
        }
    }

    pub fn add_arg(&mut self, value: CodeValue) -> &mut Self {
        self.args.push(value);
        self
    }

    pub fn add_kwarg(&mut self, name: impl Into<String>, value: CodeValue) -> &mut Self {
        self.kwargs.insert(name.into(), value);
        self
    }

    pub fn add_method(&mut self, method: CodeCall) -> &mut Self {
        self.methods.push(method);
        self
    }

    pub fn remove_kwarg(&mut self, name: &str) -> Option<CodeValue> {
        self.kwargs.remove(name)
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Positional arguments, keyword arguments and chained methods
    /// together.
    pub fn num_attributes(&self) -> usize {
        self.args.len() + self.kwargs.len() + self.methods.len()
    }

    pub fn to_source(&self) -> String {
        self.render(0)
    }

    /// Renders at the given indentation level. Keyword arguments go one
    /// per line, indented one step past `level`, with a trailing comma;
    /// the closing parenthesis returns to `level`.
    fn render(&self, level: usize) -> String {
        let args: Vec<String> = self.args.iter().map(|arg| arg.render(level)).collect();
        let kwargs: Vec<String> = self
            .kwargs
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}{}={}",
                    " ".repeat(level + INDENT),
                    name,
                    value.render(level + INDENT)
                )
            })
            .collect();

        let mut out = if args.is_empty() && kwargs.is_empty() {
            format!("{}()", self.name)
        } else if kwargs.is_empty() {
            format!("{}({})", self.name, args.join(", "))
        } else if args.is_empty() {
            format!(
                "{}(\n{},\n{})",
                self.name,
                kwargs.join(",\n"),
                " ".repeat(level)
            )
        } else {
            format!(
                "{}({},\n{},\n{})",
                self.name,
                args.join(", "),
                kwargs.join(",\n"),
                " ".repeat(level)
            )
        };

        for method in &self.methods {
            out.push('.');
            out.push_str(&method.render(level));
        }
        out
    }
}

impl fmt::Display for CodeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

/// Renders a JSON scalar as a script literal.
fn literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => quote(text),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", quote(key), literal(value)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

/// Single-quoted string literal with backslash escapes.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Graph to builder-script renderer.
#[derive(Debug, Clone, Default)]
pub struct CodeExporter {
    data_var: Option<String>,
}

impl CodeExporter {
    pub fn new() -> Self {
        CodeExporter::default()
    }

    /// References a pre-bound table by variable name instead of the
    /// chart's own data source. Applies to the outermost chart only.
    pub fn with_data_var(name: impl Into<String>) -> Self {
        CodeExporter {
            data_var: Some(name.into()),
        }
    }

    pub fn export(&self, node: &Node) -> Result<String, ExportError> {
        let value = match node {
            Node::Plain(object) => self.object_value(object, false)?,
            Node::Chart(chart) => {
                CodeValue::Call(self.chart_call(chart, self.data_var.as_deref())?)
            }
        };
        Ok(value.render(0))
    }

    pub fn export_chart(&self, chart: &ChartNode) -> Result<String, ExportError> {
        Ok(self
            .chart_call(chart, self.data_var.as_deref())?
            .to_source())
    }

    fn node_value(&self, node: &Node, shorten: bool) -> Result<CodeValue, ExportError> {
        match node {
            Node::Plain(object) => self.object_value(object, shorten),
            Node::Chart(chart) => Ok(CodeValue::Call(self.chart_call(chart, None)?)),
        }
    }

    fn object_value(&self, object: &ObjectNode, shorten: bool) -> Result<CodeValue, ExportError> {
        match object.schema().role() {
            TypeRole::Channel => self.channel_value(object, shorten),
            _ => Ok(CodeValue::Call(self.object_call(object)?)),
        }
    }

    fn object_call(&self, object: &ObjectNode) -> Result<CodeCall, ExportError> {
        let schema = object.schema();
        let shorten_children = schema.shortens_children();
        let mut call = CodeCall::new(schema.name());
        for (name, value) in object.props() {
            if !schema.exports(name) {
                continue;
            }
            call.add_kwarg(name, self.prop_value(value, shorten_children)?);
        }
        Ok(call)
    }

    fn prop_value(&self, value: &PropValue, shorten: bool) -> Result<CodeValue, ExportError> {
        match value {
            PropValue::Scalar(scalar) => Ok(CodeValue::Literal(literal(scalar))),
            PropValue::Node(node) => self.node_value(node, shorten),
            PropValue::List(items) => {
                // List elements never collapse, even inside an encoding.
                let rendered: Result<Vec<CodeValue>, ExportError> = items
                    .iter()
                    .map(|item| self.prop_value(item, false))
                    .collect();
                Ok(CodeValue::List(rendered?))
            }
        }
    }

    /// Channel nodes fold field, aggregate and type into a shorthand
    /// positional argument. When the parent allows it and nothing else is
    /// set, the whole call collapses to the bare shorthand string.
    fn channel_value(&self, object: &ObjectNode, shorten: bool) -> Result<CodeValue, ExportError> {
        let spec = ShorthandSpec {
            field: object.get_str("field").map(str::to_string),
            aggregate: object.get_str("aggregate").map(str::to_string),
            field_type: object.get_str("type").map(str::to_string),
        };
        let shorthand = shorthand::format(&spec)?;
        let fold_parts = !shorthand.is_empty();

        let schema = object.schema();
        let mut call = CodeCall::new(schema.name());
        for (name, value) in object.props() {
            if !schema.exports(name) {
                continue;
            }
            if fold_parts && matches!(name, "field" | "aggregate" | "type") {
                continue;
            }
            call.add_kwarg(name, self.prop_value(value, false)?);
        }

        if fold_parts {
            if shorten && call.num_attributes() == 0 {
                return Ok(CodeValue::Literal(quote(&shorthand)));
            }
            call.add_arg(CodeValue::Literal(quote(&shorthand)));
        }
        Ok(CodeValue::Call(call))
    }

    fn chart_call(
        &self,
        chart: &ChartNode,
        data_var: Option<&str>,
    ) -> Result<CodeCall, ExportError> {
        let object = chart.object();
        let mut call = self.object_call(object)?;

        match (data_var, chart.data()) {
            (Some(name), _) => {
                call.add_arg(CodeValue::Literal(name.to_string()));
            }
            (None, Some(DataSource::Reference(data))) => {
                if let Some(url) = url_only(data) {
                    call.add_arg(CodeValue::Literal(quote(url)));
                } else {
                    call.add_arg(self.object_value(data, false)?);
                }
            }
            (None, Some(DataSource::Table(_))) => {
                return Err(ExportError::UnsupportedCodeGeneration {
                    type_name: object.type_name().to_string(),
                });
            }
            (None, None) => {}
        }

        if object.schema().chains_methods() {
            lift_methods(&mut call, object);
        }
        Ok(call)
    }
}

/// A data node carrying nothing but a url renders as the bare url
/// string.
fn url_only(data: &ObjectNode) -> Option<&str> {
    if data.len() == 1 {
        data.get_str("url")
    } else {
        None
    }
}

/// Converts the mark, encoding, transform and config keyword arguments
/// of a unit chart call into chained methods, in that order.
fn lift_methods(call: &mut CodeCall, object: &ObjectNode) {
    let mut methods: Vec<CodeCall> = Vec::new();

    let mut config = match call.remove_kwarg("config") {
        Some(CodeValue::Call(config)) => Some(config),
        Some(other) => {
            call.add_kwarg("config", other);
            None
        }
        None => None,
    };

    match (call.remove_kwarg("mark"), object.get_str("mark")) {
        (Some(_), Some(mark_name)) => {
            // config.mark settings fold into the mark method's kwargs
            let method = match config.as_mut().and_then(|c| c.remove_kwarg("mark")) {
                Some(CodeValue::Call(mark_config)) => {
                    mark_config.rename(format!("mark_{}", mark_name))
                }
                Some(other) => {
                    if let Some(config) = config.as_mut() {
                        config.add_kwarg("mark", other);
                    }
                    CodeCall::new(format!("mark_{}", mark_name))
                }
                None => CodeCall::new(format!("mark_{}", mark_name)),
            };
            methods.push(method);
        }
        (Some(value), None) => {
            call.add_kwarg("mark", value);
        }
        (None, _) => {}
    }

    match call.remove_kwarg("encoding") {
        Some(CodeValue::Call(encoding)) => methods.push(encoding.rename("encode")),
        Some(other) => {
            call.add_kwarg("encoding", other);
        }
        None => {}
    }
    match call.remove_kwarg("transform") {
        Some(CodeValue::Call(transform)) => methods.push(transform.rename("transform_data")),
        Some(other) => {
            call.add_kwarg("transform", other);
        }
        None => {}
    }

    if let Some(config) = config {
        expand_config(config, "configure".to_string(), CONFIG_METHOD_DEPTH, &mut methods);
    }

    for method in methods {
        call.add_method(method);
    }
}

/// Expands a config call into `configure*` methods: nested config nodes
/// split off into their own `name_{key}` methods down to the depth
/// limit, parent first when it still has direct settings.
fn expand_config(mut call: CodeCall, name: String, depth: usize, out: &mut Vec<CodeCall>) {
    let mut nested: Vec<(String, CodeCall)> = Vec::new();
    if depth > 1 {
        let sub_keys: Vec<String> = call
            .kwargs
            .iter()
            .filter(|(_, value)| matches!(value, CodeValue::Call(_)))
            .map(|(key, _)| key.clone())
            .collect();
        for key in sub_keys {
            if let Some(CodeValue::Call(sub)) = call.remove_kwarg(&key) {
                nested.push((format!("{}_{}", name, key), sub));
            }
        }
    }
    if call.num_attributes() > 0 {
        out.push(call.rename(name));
    }
    for (sub_name, sub) in nested {
        expand_config(sub, sub_name, depth - 1, out);
    }
}

#[cfg(test)]
mod code_tests {
    use super::*;

    #[test]
    fn test_layout_args_only() {
        let mut call = CodeCall::new("Foo");
        call.add_arg(CodeValue::Literal("4".to_string()));
        call.add_arg(CodeValue::Literal("5".to_string()));
        assert_eq!(call.to_source(), "Foo(4, 5)");
    }

    #[test]
    fn test_layout_empty() {
        assert_eq!(CodeCall::new("Foo").to_source(), "Foo()");
    }

    #[test]
    fn test_layout_kwargs_one_per_line() {
        let mut call = CodeCall::new("Foo");
        call.add_kwarg("b", CodeValue::Literal("2".to_string()));
        call.add_kwarg("a", CodeValue::Literal("1".to_string()));
        assert_eq!(call.to_source(), "Foo(\n    a=1,\n    b=2,\n)");
    }

    #[test]
    fn test_layout_args_and_kwargs() {
        let mut call = CodeCall::new("Foo");
        call.add_arg(CodeValue::Literal("'x'".to_string()));
        call.add_kwarg("a", CodeValue::Literal("1".to_string()));
        assert_eq!(call.to_source(), "Foo('x',\n    a=1,\n)");
    }

    #[test]
    fn test_layout_nested_call_indents() {
        let mut inner = CodeCall::new("Bar");
        inner.add_kwarg("b", CodeValue::Literal("2".to_string()));
        let mut call = CodeCall::new("Foo");
        call.add_kwarg("a", CodeValue::Call(inner));
        assert_eq!(
            call.to_source(),
            "Foo(\n    a=Bar(\n        b=2,\n    ),\n)"
        );
    }

    #[test]
    fn test_layout_methods_chain_at_same_level() {
        let mut method = CodeCall::new("bar");
        method.add_arg(CodeValue::Literal("1".to_string()));
        let mut call = CodeCall::new("Foo");
        call.add_method(method);
        assert_eq!(call.to_source(), "Foo().bar(1)");
    }

    #[test]
    fn test_literal_scalars() {
        use serde_json::json;
        assert_eq!(literal(&json!(null)), "null");
        assert_eq!(literal(&json!(true)), "true");
        assert_eq!(literal(&json!(4)), "4");
        assert_eq!(literal(&json!(4.5)), "4.5");
        assert_eq!(literal(&json!("it's")), "'it\\'s'");
        assert_eq!(literal(&json!([1, "a"])), "[1, 'a']");
        assert_eq!(literal(&json!({"k": 1})), "{'k': 1}");
    }
}
