//! CLI command implementations

pub mod codegen;
pub mod render;
pub mod validate;

pub use codegen::handle_codegen;
pub use render::handle_render;
pub use validate::handle_validate;

use std::io::Read;
use std::path::PathBuf;

use crate::cli::error::CliError;

/// Load input content from file or stdin
pub(crate) fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        // Read from stdin
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        // Read from file
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}
