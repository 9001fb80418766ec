//! Core lexical analyzer for VCG source text
//!
//! Scans a single in-memory string into an ordered token sequence. Lines are
//! 1-based and columns 0-based; `\r`, `\t` and space each advance the column
//! by one, and only `\n` advances the line (resetting the column). Whitespace
//! and `#`-to-end-of-line comments produce no tokens.

use crate::config::constants::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::{Token, TokenCursor, TokenKind};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use regex::Regex;

/// Characters allowed immediately after a digit run
const NUMBER_DELIMITERS: &[char] = &[
    ' ', '\n', '\r', '\t', '(', ')', '[', ']', '{', '}', '<', '>', '=', ';', '|', ',',
];

/// Lexical analysis errors with source positions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        line: u32,
        column: u32,
    },

    #[error("Word run adjacent to '{character}' at line {line}, column {column}")]
    MalformedWord {
        character: char,
        line: u32,
        column: u32,
    },

    #[error("Malformed identifier '{text}' at line {line}, column {column}")]
    MalformedIdentifier {
        text: String,
        line: u32,
        column: u32,
    },

    #[error("Malformed number: '{character}' follows digits at line {line}, column {column}")]
    MalformedNumber {
        character: char,
        line: u32,
        column: u32,
    },

    #[error("Empty quoted phrase at line {line}, column {column}")]
    EmptyQuotedString { line: u32, column: u32 },

    #[error("Unterminated quoted phrase starting at line {line}, column {column}")]
    UnterminatedString { line: u32, column: u32 },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, line: u32, column: u32 },

    #[error("Quoted phrase too long: {length} characters (max {MAX_QUOTED_STRING_LENGTH})")]
    StringTooLarge { length: usize, line: u32, column: u32 },

    #[error("Comment too long: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize, line: u32 },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexError::UnexpectedCharacter { .. } => codes::lexical::UNEXPECTED_CHARACTER,
            LexError::MalformedWord { .. } => codes::lexical::MALFORMED_WORD,
            LexError::MalformedIdentifier { .. } => codes::lexical::MALFORMED_IDENTIFIER,
            LexError::MalformedNumber { .. } => codes::lexical::MALFORMED_NUMBER,
            LexError::EmptyQuotedString { .. } => codes::lexical::EMPTY_QUOTED_STRING,
            LexError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Line the error occurred on, when known
    pub fn line(&self) -> Option<u32> {
        self.position().map(|(line, _)| line)
    }

    /// (line, column) the error occurred at, when known
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            LexError::UnexpectedCharacter { line, column, .. }
            | LexError::MalformedWord { line, column, .. }
            | LexError::MalformedIdentifier { line, column, .. }
            | LexError::MalformedNumber { line, column, .. }
            | LexError::EmptyQuotedString { line, column }
            | LexError::UnterminatedString { line, column }
            | LexError::IdentifierTooLong { line, column, .. }
            | LexError::StringTooLarge { line, column, .. } => Some((*line, *column)),
            LexError::CommentTooLong { line, .. } => Some((*line, 0)),
            LexError::TooManyTokens { .. } => None,
        }
    }
}

/// Per-run lexical metrics
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub word_tokens: usize,
    pub identifier_tokens: usize,
    pub number_tokens: usize,
    pub string_tokens: usize,
    pub symbol_tokens: usize,
    pub comment_count: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        match token.kind {
            TokenKind::Word => self.word_tokens += 1,
            TokenKind::DollarIdentifier | TokenKind::AtIdentifier => self.identifier_tokens += 1,
            TokenKind::Number => self.number_tokens += 1,
            TokenKind::QuotedString => self.string_tokens += 1,
            _ => self.symbol_tokens += 1,
        }
    }

    fn record_comment(&mut self) {
        self.comment_count += 1;
    }
}

/// Core lexical analyzer
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    identifier_pattern: Regex,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
            identifier_pattern: Regex::new(r"^([A-Za-z_]+\.)*[A-Za-z_]+$")
                .expect("identifier pattern is a valid regex"),
        }
    }

    /// Get metrics from the most recent tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize an in-memory source string into a cursor
    pub fn tokenize(&mut self, source: &str) -> Result<TokenCursor, LexError> {
        self.metrics = LexicalMetrics::default();

        let chars: Vec<char> = source.chars().collect();
        let mut tokens: Vec<Token> = Vec::new();
        let mut i = 0usize;
        let mut line: u32 = 1;
        let mut column: u32 = 0;

        while i < chars.len() {
            if tokens.len() >= MAX_TOKEN_COUNT {
                return Err(LexError::TooManyTokens { count: tokens.len() });
            }

            let ch = chars[i];
            match ch {
                ' ' | '\t' | '\r' => {
                    i += 1;
                    column += 1;
                }
                '\n' => {
                    i += 1;
                    line += 1;
                    column = 0;
                }
                '#' => {
                    let mut length = 0usize;
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                        column += 1;
                        length += 1;
                        if length > MAX_COMMENT_LENGTH {
                            return Err(LexError::CommentTooLong { length, line });
                        }
                    }
                    if self.preferences.collect_detailed_metrics {
                        self.metrics.record_comment();
                    }
                }
                '"' => {
                    let token = self.scan_quoted(&chars, &mut i, line, &mut column)?;
                    self.note_token(&token);
                    tokens.push(token);
                }
                c if c.is_ascii_digit() => {
                    let token = self.scan_number(&chars, &mut i, line, &mut column)?;
                    self.note_token(&token);
                    tokens.push(token);
                }
                c if c.is_ascii_alphabetic() => {
                    let token = self.scan_word(&chars, &mut i, line, &mut column)?;
                    self.note_token(&token);
                    tokens.push(token);
                }
                '$' | '@' => {
                    let token = self.scan_identifier(&chars, &mut i, line, &mut column)?;
                    self.note_token(&token);
                    tokens.push(token);
                }
                c => match TokenKind::from_symbol(c) {
                    Some(kind) => {
                        let token = Token::symbol(kind, c, line, column);
                        self.note_token(&token);
                        tokens.push(token);
                        i += 1;
                        column += 1;
                    }
                    None => {
                        return Err(LexError::UnexpectedCharacter {
                            character: c,
                            line,
                            column,
                        });
                    }
                },
            }
        }

        Ok(TokenCursor::new(tokens))
    }

    /// Tokenize a processed file, with file-aware logging
    pub fn tokenize_file_result(
        &mut self,
        file_result: &FileProcessingResult,
    ) -> Result<TokenCursor, LexError> {
        let file_path = file_result.metadata.path.display().to_string();

        log_debug!("Starting lexical analysis",
            "file" => file_path.as_str(),
            "size_bytes" => file_result.metadata.size,
            "lines" => file_result.metadata.line_count
        );

        match self.tokenize(&file_result.source) {
            Ok(cursor) => {
                log_success!(codes::success::TOKENIZATION_COMPLETE,
                    "Lexical analysis completed",
                    "file" => file_path.as_str(),
                    "tokens" => cursor.len(),
                    "words" => self.metrics.word_tokens,
                    "identifiers" => self.metrics.identifier_tokens,
                    "comments" => self.metrics.comment_count
                );
                Ok(cursor)
            }
            Err(error) => {
                let message = if self.preferences.include_position_in_errors {
                    match error.line() {
                        Some(line) => format!("Lexical analysis failed on line {}", line),
                        None => "Lexical analysis failed".to_string(),
                    }
                } else {
                    "Lexical analysis failed".to_string()
                };

                match error.position() {
                    Some((line, column)) => {
                        let span = Span::single(Position::at(line, column));
                        log_error!(error.error_code(), &message,
                            span = span,
                            "file" => file_path.as_str(),
                            "error" => error
                        );
                    }
                    None => {
                        log_error!(error.error_code(), &message,
                            "file" => file_path.as_str(),
                            "error" => error
                        );
                    }
                }
                Err(error)
            }
        }
    }

    fn note_token(&mut self, token: &Token) {
        if self.preferences.collect_detailed_metrics {
            self.metrics.record_token(token);
        }
    }

    // ========================================================================
    // Per-lexeme scanners
    // ========================================================================

    fn scan_word(
        &mut self,
        chars: &[char],
        i: &mut usize,
        line: u32,
        column: &mut u32,
    ) -> Result<Token, LexError> {
        let start_column = *column;
        let mut end = *i;
        while end < chars.len() && chars[end].is_ascii_alphabetic() {
            end += 1;
        }

        // A word must be separated from a following digit or identifier prefix
        if end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '$' || chars[end] == '@')
        {
            return Err(LexError::MalformedWord {
                character: chars[end],
                line,
                column: start_column,
            });
        }

        let text: String = chars[*i..end].iter().collect();
        let length = end - *i;
        *i = end;
        *column += length as u32;

        Ok(Token::new(TokenKind::Word, text, line, start_column))
    }

    fn scan_identifier(
        &mut self,
        chars: &[char],
        i: &mut usize,
        line: u32,
        column: &mut u32,
    ) -> Result<Token, LexError> {
        let start_column = *column;
        let prefix = chars[*i];
        let mut end = *i + 1;
        while end < chars.len()
            && (chars[end].is_ascii_alphabetic() || chars[end] == '_' || chars[end] == '.')
        {
            end += 1;
        }

        let text: String = chars[*i + 1..end].iter().collect();

        if text.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexError::IdentifierTooLong {
                length: text.len(),
                line,
                column: start_column,
            });
        }

        if !self.identifier_pattern.is_match(&text) {
            return Err(LexError::MalformedIdentifier {
                text,
                line,
                column: start_column,
            });
        }

        let kind = if prefix == '$' {
            TokenKind::DollarIdentifier
        } else {
            TokenKind::AtIdentifier
        };

        let consumed = end - *i;
        *i = end;
        *column += consumed as u32;

        Ok(Token::new(kind, text, line, start_column))
    }

    fn scan_number(
        &mut self,
        chars: &[char],
        i: &mut usize,
        line: u32,
        column: &mut u32,
    ) -> Result<Token, LexError> {
        let start_column = *column;
        let mut end = *i;
        while end < chars.len() && chars[end].is_ascii_digit() {
            end += 1;
        }

        // A digit run must be followed by whitespace or a structural symbol
        if end < chars.len() && !NUMBER_DELIMITERS.contains(&chars[end]) {
            return Err(LexError::MalformedNumber {
                character: chars[end],
                line,
                column: start_column,
            });
        }

        let text: String = chars[*i..end].iter().collect();
        let length = end - *i;
        *i = end;
        *column += length as u32;

        Ok(Token::new(TokenKind::Number, text, line, start_column))
    }

    fn scan_quoted(
        &mut self,
        chars: &[char],
        i: &mut usize,
        line: u32,
        column: &mut u32,
    ) -> Result<Token, LexError> {
        let start_column = *column;
        let mut end = *i + 1;
        while end < chars.len() && Self::is_phrase_char(chars[end]) {
            end += 1;
        }

        if end >= chars.len() || chars[end] != '"' {
            return Err(LexError::UnterminatedString {
                line,
                column: start_column,
            });
        }

        let text: String = chars[*i + 1..end].iter().collect();
        if text.is_empty() {
            return Err(LexError::EmptyQuotedString {
                line,
                column: start_column,
            });
        }
        if text.len() > MAX_QUOTED_STRING_LENGTH {
            return Err(LexError::StringTooLarge {
                length: text.len(),
                line,
                column: start_column,
            });
        }

        let consumed = (end + 1) - *i;
        *i = end + 1;
        *column += consumed as u32;

        Ok(Token::new(TokenKind::QuotedString, text, line, start_column))
    }

    /// Characters permitted inside a quoted phrase
    fn is_phrase_char(c: char) -> bool {
        c != '\u{7f}' && (c >= ' ' || c == '\t') && c != '"'
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Result<Vec<Token>, LexError> {
        let mut analyzer = LexicalAnalyzer::new();
        let mut cursor = analyzer.tokenize(source)?;
        let mut tokens = Vec::new();
        while cursor.has_next() {
            tokens.push(cursor.advance().unwrap());
        }
        Ok(tokens)
    }

    #[test]
    fn test_words_with_mixed_whitespace() {
        let tokens = lex("   this is\t\ta  Test").unwrap();

        assert_eq!(tokens.len(), 4);
        let expected = [("this", 3), ("is", 8), ("a", 12), ("Test", 15)];
        for (token, (text, col)) in tokens.iter().zip(expected) {
            assert_eq!(token.kind, TokenKind::Word);
            assert_eq!(token.text, text);
            assert_eq!(token.line, 1);
            assert_eq!(token.column, col);
        }
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = lex("#####\n# comment\nhi#\n\n#Test").unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "hi");
        assert_eq!(tokens[0].line, 3);
        assert_eq!(tokens[0].column, 0);
    }

    #[test]
    fn test_identifiers() {
        let tokens = lex("$hello\n@func\n$yes.no.maybe").unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::DollarIdentifier);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 0));

        assert_eq!(tokens[1].kind, TokenKind::AtIdentifier);
        assert_eq!(tokens[1].text, "func");
        assert_eq!((tokens[1].line, tokens[1].column), (2, 0));

        assert_eq!(tokens[2].kind, TokenKind::DollarIdentifier);
        assert_eq!(tokens[2].text, "yes.no.maybe");
        assert_eq!((tokens[2].line, tokens[2].column), (3, 0));
    }

    #[test]
    fn test_lex_error_inputs() {
        let bad_inputs = [
            "_", "4a5", "4.5", "1_", "\"hi", "hel$lo", "hel1", "TE&ST", "1234a", "12$3",
        ];

        for input in bad_inputs {
            assert!(lex(input).is_err(), "expected lex error for {:?}", input);
        }
    }

    #[test]
    fn test_word_digit_adjacency_reports_run_start() {
        let err = lex("  hel1").unwrap_err();
        match err {
            LexError::MalformedWord {
                character,
                line,
                column,
            } => {
                assert_eq!(character, '1');
                assert_eq!(line, 1);
                assert_eq!(column, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_quoted_phrases() {
        let tokens = lex("\"hello there\" \"tab\there\"").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::QuotedString);
        assert_eq!(tokens[0].text, "hello there");
        assert_eq!(tokens[1].text, "tab\there");
        // column advances by content plus both quotes
        assert_eq!(tokens[1].column, 14);
    }

    #[test]
    fn test_empty_quoted_phrase_is_error() {
        assert!(matches!(
            lex("\"\""),
            Err(LexError::EmptyQuotedString { .. })
        ));
    }

    #[test]
    fn test_newline_inside_quoted_phrase_is_error() {
        assert!(matches!(
            lex("\"hi\nthere\""),
            Err(LexError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_numbers_with_delimiters() {
        let tokens = lex("12 {3,4} (5)").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number,
                TokenKind::CurlyStart,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::CurlyEnd,
                TokenKind::ParenStart,
                TokenKind::Number,
                TokenKind::ParenEnd,
            ]
        );
        assert_eq!(tokens[0].text, "12");
    }

    #[test]
    fn test_number_at_end_of_input() {
        let tokens = lex("42").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Number);
    }

    #[test]
    fn test_punctuation_tokens() {
        let tokens = lex("()[]{}<>=;|.*+,").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ParenStart,
                TokenKind::ParenEnd,
                TokenKind::BracketStart,
                TokenKind::BracketEnd,
                TokenKind::CurlyStart,
                TokenKind::CurlyEnd,
                TokenKind::AngleStart,
                TokenKind::AngleEnd,
                TokenKind::Equals,
                TokenKind::Semicolon,
                TokenKind::Pipe,
                TokenKind::Period,
                TokenKind::Star,
                TokenKind::Plus,
                TokenKind::Comma,
            ]
        );
        // columns advance one per symbol
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.column, i as u32);
        }
    }

    #[test]
    fn test_malformed_identifiers() {
        for input in ["$", "$1", "$a..b", "$a.", "@.a", "$_a."] {
            assert!(
                matches!(lex(input), Err(LexError::MalformedIdentifier { .. })),
                "expected malformed identifier for {:?}",
                input
            );
        }
        // underscores and dots in legal positions are fine
        assert!(lex("$some_thing").is_ok());
        assert!(lex("@a_b.c_d").is_ok());
    }

    #[test]
    fn test_carriage_return_advances_column_only() {
        let tokens = lex("a\rb").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].column, 2);
    }

    #[test]
    fn test_every_token_has_nonempty_text() {
        let tokens =
            lex("import my.pkg; $rule @cb = hello \"big phrase\" (a | b)* [c]{2,5} 99;").unwrap();
        assert!(!tokens.is_empty());
        for token in tokens {
            assert!(!token.text.is_empty());
        }
    }

    #[test]
    fn test_metrics_collection() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("hello $world \"phrase\" 42 ; # note").unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.word_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 1);
        assert_eq!(metrics.string_tokens, 1);
        assert_eq!(metrics.number_tokens, 1);
        assert_eq!(metrics.symbol_tokens, 1);
        assert_eq!(metrics.comment_count, 1);
        assert_eq!(metrics.total_tokens, 5);
    }
}
