//! Syntax analysis module for the VCG compiler
//!
//! Drives the two-pass parser over a token cursor and produces the compiled
//! `VcgModule` handed to downstream collaborators.

pub mod error;
pub mod parser;

use crate::grammar::VcgModule;
use crate::tokens::TokenCursor;

pub use error::{CompileError, CompileResult};
pub use parser::VcgParser;

/// Parse a token cursor into a module
pub fn parse_cursor(
    cursor: TokenCursor,
    package_path: &str,
    file_name: &str,
) -> CompileResult<VcgModule> {
    VcgParser::new(cursor).parse_module(package_path, file_name)
}

/// Tokenize and parse an in-memory source string.
/// Lex errors surface as their own type; use the pipeline for aggregation.
pub fn parse_source(
    source: &str,
    package_path: &str,
    file_name: &str,
) -> Result<VcgModule, ParseSourceError> {
    let cursor = crate::lexical::tokenize_source(source)?;
    let module = parse_cursor(cursor, package_path, file_name)?;
    Ok(module)
}

/// Error from the combined tokenize-and-parse convenience entry point
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseSourceError {
    #[error(transparent)]
    Lex(#[from] crate::lexical::LexError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Validate compile error code wiring (for system startup)
pub fn init_syntax_logging() -> Result<(), String> {
    let test_codes = [
        crate::logging::codes::compile::MALFORMED_IMPORT,
        crate::logging::codes::compile::DUPLICATE_PACKAGE,
        crate::logging::codes::compile::STATIC_RENAMED_PACKAGE,
        crate::logging::codes::compile::BAD_DEFINITION,
        crate::logging::codes::compile::NEGATIVE_REPEAT,
        crate::logging::codes::compile::INVALID_REPEAT,
        crate::logging::codes::compile::MAX_LESS_THAN_MIN,
        crate::logging::codes::compile::MAX_RECURSION_DEPTH,
        crate::logging::codes::compile::BUILDER_PROTOCOL,
        crate::logging::codes::compile::CURSOR_FAULT,
    ];

    for code in &test_codes {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Compile error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    Ok(())
}
