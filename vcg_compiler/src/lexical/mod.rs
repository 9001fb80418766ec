//! Lexical analysis module for the VCG compiler
//!
//! Provides tokenization of VCG source text with file-aware processing and
//! integration with the global logging system.

pub mod analyzer;

use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::tokens::TokenCursor;

pub use analyzer::{LexError, LexicalAnalyzer, LexicalMetrics};

/// Tokenize an in-memory source string
pub fn tokenize_source(source: &str) -> Result<TokenCursor, LexError> {
    let mut analyzer = LexicalAnalyzer::new();
    analyzer.tokenize(source)
}

/// Tokenize a processed file with file-aware logging
pub fn tokenize_file_result(file_result: &FileProcessingResult) -> Result<TokenCursor, LexError> {
    let mut analyzer = LexicalAnalyzer::new();
    analyzer.tokenize_file_result(file_result)
}

/// Create a new lexical analyzer with default preferences
pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

/// Create analyzer with custom runtime preferences
pub fn create_analyzer_with_preferences(preferences: LexicalPreferences) -> LexicalAnalyzer {
    LexicalAnalyzer::with_preferences(preferences)
}

/// Validate lexical error code wiring (for system startup)
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let test_codes = [
        crate::logging::codes::lexical::UNEXPECTED_CHARACTER,
        crate::logging::codes::lexical::UNTERMINATED_STRING,
        crate::logging::codes::lexical::EMPTY_QUOTED_STRING,
        crate::logging::codes::lexical::MALFORMED_NUMBER,
        crate::logging::codes::lexical::MALFORMED_IDENTIFIER,
        crate::logging::codes::lexical::MALFORMED_WORD,
        crate::logging::codes::lexical::IDENTIFIER_TOO_LONG,
        crate::logging::codes::lexical::STRING_TOO_LARGE,
        crate::logging::codes::lexical::COMMENT_TOO_LONG,
        crate::logging::codes::lexical::TOO_MANY_TOKENS,
    ];

    for code in &test_codes {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    #[test]
    fn test_tokenize_source() {
        let mut cursor = tokenize_source("hello $world").unwrap();
        assert_eq!(cursor.len(), 2);
        assert_eq!(cursor.advance().unwrap().kind, TokenKind::Word);
        assert_eq!(cursor.advance().unwrap().kind, TokenKind::DollarIdentifier);
    }

    #[test]
    fn test_metrics_respect_preferences() {
        let mut analyzer = create_analyzer_with_preferences(LexicalPreferences {
            collect_detailed_metrics: false,
            ..Default::default()
        });
        analyzer.tokenize("hello world ; # note").unwrap();
        assert_eq!(analyzer.metrics().total_tokens, 0);
        assert_eq!(analyzer.metrics().comment_count, 0);
    }

    #[test]
    fn test_init_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }
}
