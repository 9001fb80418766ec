//! VCG Language Compiler
//!
//! Front end for VCG (voice-command grammar) files: tokenizes source text,
//! runs a two-pass backtracking parser, and assembles each rule body into a
//! hierarchical node tree for a downstream speech-recognition grammar
//! builder.

// ============================================================================
// PUBLIC API - High-Level Interface
// ============================================================================

/// High-level pipeline API for compiling VCG files
pub mod pipeline;

/// Configuration system (compile-time constants + runtime preferences)
pub mod config;

// ============================================================================
// PUBLIC API - Core Types (Re-exports)
// ============================================================================

pub use pipeline::{process_file, process_file_in_package, PipelineError, PipelineResult};

// ============================================================================
// PUBLIC API - Grammar & Module Access (for collaborator integration)
// ============================================================================

/// Grammar data model: node trees, modules, rule builder
pub mod grammar;

pub use grammar::{
    BuildEvent, BuilderError, HierarchicalNode, ImportEntry, RuleBuilder, VcgModule,
    UNBOUNDED_REPEAT,
};

// ============================================================================
// PUBLIC API - Stage Access
// ============================================================================

/// Token types and cursor
pub mod tokens;

/// Lexical analysis
pub mod lexical;

/// Syntax analysis (two-pass parser)
pub mod syntax;

/// File reading and validation
pub mod file_processor;

/// Global logging system
#[macro_use]
pub mod logging;

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub mod error {
    pub use crate::file_processor::FileProcessorError;
    pub use crate::grammar::BuilderError;
    pub use crate::lexical::LexError;
    pub use crate::pipeline::PipelineError;
    pub use crate::syntax::CompileError;
    pub use crate::tokens::CursorError;
}

// ============================================================================
// PUBLIC API - Utility Types
// ============================================================================

pub mod utils;

// ============================================================================
// LIBRARY INFORMATION
// ============================================================================

/// VCG language specification version
pub const LANGUAGE_VERSION: &str = "1.0.0";

/// Compiler implementation version
pub const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the VCG compiler library.
///
/// Call once at application startup to initialize logging and validate the
/// stage configuration.
pub fn init() -> Result<(), String> {
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;
    Ok(())
}

/// Validate stage wiring without touching global logger state
pub fn validate() -> Result<(), String> {
    pipeline::validate_pipeline()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(validate().is_ok());
    }

    #[test]
    fn test_versions_are_set() {
        assert!(!LANGUAGE_VERSION.is_empty());
        assert!(!COMPILER_VERSION.is_empty());
    }
}
