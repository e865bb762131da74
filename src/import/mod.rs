//! Importers reconstructing object graphs from wire formats.
//!
//! [`JsonImporter`] rebuilds a graph from specification JSON, validating
//! against the type catalog as it goes; [`ScriptEvaluator`] does the
//! same for builder-script source.

pub mod json;
pub mod script;

pub use json::JsonImporter;
pub use script::{ScriptError, ScriptEvaluator};

use thiserror::Error;

/// Validation failures raised while reconstructing a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("unknown type '{0}'")]
    UnknownType(String),
    #[error("type '{type_name}' does not accept property '{property}'")]
    UnknownProperty { type_name: String, property: String },
    #[error("type '{type_name}' requires property '{property}'")]
    MissingProperty { type_name: String, property: String },
    #[error("property '{property}' of '{type_name}' expects {expected}, got {found}")]
    ValueMismatch {
        type_name: String,
        property: String,
        expected: String,
        found: String,
    },
    #[error("expected a mapping for type '{type_name}', got {found}")]
    NotAMapping {
        type_name: String,
        found: &'static str,
    },
}
