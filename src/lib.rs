//! Chart Spec SDK - Declarative statistical chart construction and translation
//!
//! Provides unified interfaces for:
//! - Schema-driven chart graphs (typed nodes over a static type catalog)
//! - JSON spec export/import with structural validation
//! - Builder-script generation and evaluation
//! - Encoding shorthand parsing/formatting
//! - Inline tabular data and encoded-column validation
//! - Selection payload decoding (shared across notebook and server frontends)

pub mod schema;
pub mod graph;
pub mod data;
pub mod shorthand;
pub mod export;
pub mod import;
pub mod chart;
pub mod selection;
pub mod validation;
pub mod cli;

// Re-export commonly used types
pub use chart::{
    from_json, from_spec_value, AnyChart, ChannelDef, ChannelInput, Chart, ChartError, Encoding,
    FacetedChart, LayeredChart, Mark, Props,
};
pub use data::{DataError, DataTable};
pub use export::{CodeExporter, ExportError, JsonExporter};
pub use graph::{ChartNode, DataSource, Node, ObjectNode, PropValue};
pub use import::{JsonImporter, SchemaViolation, ScriptError, ScriptEvaluator};
pub use schema::{registry, PrimitiveKind, PropertySchema, SchemaRegistry, SchemaType, TypeRole};
pub use shorthand::{FieldType, ShorthandError, ShorthandSpec};
pub use validation::{validate_encoded_columns, ValidationError};

// Re-export selection payload types
pub use selection::{IndexSelection, IntervalSelection, PointSelection, SelectionStore};
