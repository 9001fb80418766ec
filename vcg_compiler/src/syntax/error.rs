//! Compile errors raised by the import and rule passes
//!
//! Combinator non-matches never surface here; they are plain `Ok(false)`
//! outcomes inside the parser. Only semantic violations and internal faults
//! become `CompileError`s, and those abort the current module.

use crate::grammar::BuilderError;
use crate::logging::{codes, Code};
use crate::tokens::CursorError;

pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort compilation of the current module
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Malformed input statement on line {line}")]
    MalformedImport { line: u32 },

    #[error("Package {package} already loaded")]
    DuplicatePackage { package: String },

    #[error("Package {package} cannot be both static and renamed")]
    StaticRenamedPackage { package: String },

    #[error("Bad definition on line {line}")]
    BadDefinition { line: u32 },

    #[error("Negative repeat count {value} on line {line}")]
    NegativeRepeat { value: i64, line: u32 },

    #[error("Invalid repeat count '{text}' on line {line}")]
    InvalidRepeat { text: String, line: u32 },

    #[error("Max value is less than the paired minimum value")]
    MaxLessThanMin,

    #[error("Expression nesting too deep on line {line}")]
    MaxRecursionDepth { line: u32 },

    #[error("Rule builder fault: {0}")]
    Builder(#[from] BuilderError),

    #[error("Token cursor fault: {0}")]
    Cursor(#[from] CursorError),
}

impl CompileError {
    /// Get error code for the global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::MalformedImport { .. } => codes::compile::MALFORMED_IMPORT,
            Self::DuplicatePackage { .. } => codes::compile::DUPLICATE_PACKAGE,
            Self::StaticRenamedPackage { .. } => codes::compile::STATIC_RENAMED_PACKAGE,
            Self::BadDefinition { .. } => codes::compile::BAD_DEFINITION,
            Self::NegativeRepeat { .. } => codes::compile::NEGATIVE_REPEAT,
            Self::InvalidRepeat { .. } => codes::compile::INVALID_REPEAT,
            Self::MaxLessThanMin => codes::compile::MAX_LESS_THAN_MIN,
            Self::MaxRecursionDepth { .. } => codes::compile::MAX_RECURSION_DEPTH,
            Self::Builder(_) => codes::compile::BUILDER_PROTOCOL,
            Self::Cursor(_) => codes::compile::CURSOR_FAULT,
        }
    }

    /// Originating line, when the error carries one
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::MalformedImport { line }
            | Self::BadDefinition { line }
            | Self::NegativeRepeat { line, .. }
            | Self::InvalidRepeat { line, .. }
            | Self::MaxRecursionDepth { line } => Some(*line),
            _ => None,
        }
    }

    /// Check if this error indicates an internal fault rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Builder(_) | Self::Cursor(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_texts() {
        assert_eq!(
            CompileError::MalformedImport { line: 4 }.to_string(),
            "Malformed input statement on line 4"
        );
        assert_eq!(
            CompileError::DuplicatePackage {
                package: "a.b".to_string()
            }
            .to_string(),
            "Package a.b already loaded"
        );
        assert_eq!(
            CompileError::StaticRenamedPackage {
                package: "p".to_string()
            }
            .to_string(),
            "Package p cannot be both static and renamed"
        );
        assert_eq!(
            CompileError::BadDefinition { line: 12 }.to_string(),
            "Bad definition on line 12"
        );
        assert_eq!(
            CompileError::MaxLessThanMin.to_string(),
            "Max value is less than the paired minimum value"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CompileError::MalformedImport { line: 1 }.error_code().as_str(),
            "E040"
        );
        assert_eq!(CompileError::MaxLessThanMin.error_code().as_str(), "E046");
        assert_eq!(
            CompileError::Builder(BuilderError::EmptyRule)
                .error_code()
                .as_str(),
            "E048"
        );
    }

    #[test]
    fn test_line_extraction() {
        assert_eq!(CompileError::BadDefinition { line: 7 }.line(), Some(7));
        assert_eq!(CompileError::MaxLessThanMin.line(), None);
    }

    #[test]
    fn test_internal_classification() {
        assert!(CompileError::Builder(BuilderError::EmptyRule).is_internal());
        assert!(!CompileError::BadDefinition { line: 1 }.is_internal());
    }
}
