//! Consolidated error codes and classification system
//!
//! Single source of truth for all error and success codes used by the VCG
//! compiler, together with their behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const UNEXPECTED_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const EMPTY_QUOTED_STRING: Code = Code::new("E022");
    pub const MALFORMED_NUMBER: Code = Code::new("E023");
    pub const MALFORMED_IDENTIFIER: Code = Code::new("E024");
    pub const MALFORMED_WORD: Code = Code::new("E025");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E026");
    pub const STRING_TOO_LARGE: Code = Code::new("E027");
    pub const COMMENT_TOO_LONG: Code = Code::new("E028");
    pub const TOO_MANY_TOKENS: Code = Code::new("E029");
}

/// Compilation (import/rule pass) error codes
pub mod compile {
    use super::Code;

    pub const MALFORMED_IMPORT: Code = Code::new("E040");
    pub const DUPLICATE_PACKAGE: Code = Code::new("E041");
    pub const STATIC_RENAMED_PACKAGE: Code = Code::new("E042");
    pub const BAD_DEFINITION: Code = Code::new("E043");
    pub const NEGATIVE_REPEAT: Code = Code::new("E044");
    pub const INVALID_REPEAT: Code = Code::new("E045");
    pub const MAX_LESS_THAN_MIN: Code = Code::new("E046");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E047");
    pub const BUILDER_PROTOCOL: Code = Code::new("E048");
    pub const CURSOR_FAULT: Code = Code::new("E049");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const MODULE_COMPILATION_COMPLETE: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn meta(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    requires_halt: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> (&'static str, ErrorMetadata) {
    (
        code,
        ErrorMetadata {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        },
    )
}

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        HashMap::from([
            // System errors
            meta(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the failing grammar",
            ),
            meta(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check configuration and logging setup",
            ),
            // File processing errors
            meta(
                "E005",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File not found at specified path",
                "Check the file path and ensure the file exists",
            ),
            meta(
                "E006",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "File does not have the .vcg extension",
                "Rename the file with a .vcg extension or disable the extension check",
            ),
            meta(
                "E007",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File exceeds maximum size limit",
                "Split the grammar into smaller files",
            ),
            meta(
                "E008",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File is empty when content was expected",
                "Provide a file with at least one import or rule",
            ),
            meta(
                "E009",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Permission denied accessing file",
                "Check file permissions and user access rights",
            ),
            meta(
                "E010",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Invalid UTF-8 encoding in file",
                "Convert the file to UTF-8 encoding",
            ),
            meta(
                "E011",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "I/O error during file operation",
                "Check disk space and file system integrity",
            ),
            meta(
                "E012",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Invalid file path provided",
                "Provide a valid file path",
            ),
            // Lexical errors
            meta(
                "E020",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Unexpected character in source text",
                "Remove the offending character from the grammar",
            ),
            meta(
                "E021",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Quoted phrase not terminated before end of line or file",
                "Add the closing double quote on the same line",
            ),
            meta(
                "E022",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Quoted phrase has no content",
                "Remove the empty quotes or put a phrase between them",
            ),
            meta(
                "E023",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Number immediately followed by a non-delimiter character",
                "Separate the number from the following text",
            ),
            meta(
                "E024",
                "Lexical",
                Severity::Low,
                true,
                false,
                "$/@ identifier does not match the identifier grammar",
                "Identifiers are dot-separated runs of letters and underscores",
            ),
            meta(
                "E025",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Word immediately followed by a digit, $ or @",
                "Separate the word from the following token",
            ),
            meta(
                "E026",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Identifier exceeds maximum allowed length",
                "Shorten the identifier",
            ),
            meta(
                "E027",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Quoted phrase exceeds maximum length",
                "Shorten the quoted phrase",
            ),
            meta(
                "E028",
                "Lexical",
                Severity::Medium,
                false,
                true,
                "Comment exceeds maximum length",
                "Break the comment into multiple lines",
            ),
            meta(
                "E029",
                "Lexical",
                Severity::Medium,
                false,
                true,
                "Token count limit exceeded",
                "Split the grammar into smaller files",
            ),
            // Compilation errors
            meta(
                "E040",
                "Compile",
                Severity::Medium,
                true,
                false,
                "Import statement is not well formed",
                "Use: import [static] pkg.path [as alias];",
            ),
            meta(
                "E041",
                "Compile",
                Severity::Medium,
                true,
                false,
                "Package imported more than once",
                "Remove the duplicate import statement",
            ),
            meta(
                "E042",
                "Compile",
                Severity::Medium,
                true,
                false,
                "Package marked static and given an alias",
                "Drop either the static marker or the alias",
            ),
            meta(
                "E043",
                "Compile",
                Severity::Medium,
                true,
                false,
                "Rule definition is not well formed",
                "Use: $name [@callback] = expression;",
            ),
            meta(
                "E044",
                "Compile",
                Severity::Low,
                true,
                false,
                "Repeat count is negative",
                "Use a non-negative repeat count",
            ),
            meta(
                "E045",
                "Compile",
                Severity::Low,
                true,
                false,
                "Repeat count cannot be represented",
                "Use a smaller repeat count",
            ),
            meta(
                "E046",
                "Compile",
                Severity::Low,
                true,
                false,
                "Repeat maximum is below the paired minimum",
                "Swap or fix the range bounds",
            ),
            meta(
                "E047",
                "Compile",
                Severity::High,
                false,
                true,
                "Expression nesting exceeds the parser depth limit",
                "Flatten the grammar expression",
            ),
            meta(
                "E048",
                "Compile",
                Severity::High,
                false,
                true,
                "Rule builder received an inconsistent event sequence",
                "File a bug report with the failing grammar",
            ),
            meta(
                "E049",
                "Compile",
                Severity::High,
                false,
                true,
                "Token cursor navigation fault",
                "File a bug report with the failing grammar",
            ),
        ])
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get full metadata for a code, if registered
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get the severity for a code (unknown codes default to Medium)
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

/// Get the category for a code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code).map(|m| m.category).unwrap_or("Unknown")
}

/// Get the description for a code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

/// Get the recommended action for a code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

/// Whether an error with this code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code).map(|m| m.recoverable).unwrap_or(false)
}

/// Whether an error with this code should halt processing
pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code).map(|m| m.requires_halt).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let metadata = get_error_metadata("E020").expect("E020 registered");
        assert_eq!(metadata.category, "Lexical");
        assert!(metadata.recoverable);
        assert!(!metadata.requires_halt);
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert!(!is_recoverable("E999"));
        assert!(requires_halt("E999"));
    }

    #[test]
    fn test_all_error_constants_registered() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::EMPTY_FILE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            lexical::UNEXPECTED_CHARACTER,
            lexical::UNTERMINATED_STRING,
            lexical::EMPTY_QUOTED_STRING,
            lexical::MALFORMED_NUMBER,
            lexical::MALFORMED_IDENTIFIER,
            lexical::MALFORMED_WORD,
            lexical::IDENTIFIER_TOO_LONG,
            lexical::STRING_TOO_LARGE,
            lexical::COMMENT_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            compile::MALFORMED_IMPORT,
            compile::DUPLICATE_PACKAGE,
            compile::STATIC_RENAMED_PACKAGE,
            compile::BAD_DEFINITION,
            compile::NEGATIVE_REPEAT,
            compile::INVALID_REPEAT,
            compile::MAX_LESS_THAN_MIN,
            compile::MAX_RECURSION_DEPTH,
            compile::BUILDER_PROTOCOL,
            compile::CURSOR_FAULT,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
        assert_eq!(get_severity("ERR001"), Severity::Critical);
    }
}
