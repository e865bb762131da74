//! Exporters turning object graphs into wire formats.
//!
//! [`JsonExporter`] renders a graph to specification JSON and cannot
//! fail; [`CodeExporter`] renders a graph to builder-script source and
//! can, since inline tables have no code equivalent.

pub mod code;
pub mod json;

pub use code::{CodeCall, CodeExporter, CodeValue};
pub use json::JsonExporter;

use thiserror::Error;

use crate::shorthand::ShorthandError;

/// Failures while generating builder-script code.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(
        "no code equivalent for the inline table attached to '{type_name}'; \
         bind the table to a variable name instead"
    )]
    UnsupportedCodeGeneration { type_name: String },
    #[error(transparent)]
    Shorthand(#[from] ShorthandError),
}
