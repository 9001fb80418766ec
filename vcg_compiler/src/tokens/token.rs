//! Token definitions for the VCG grammar language
//!
//! Every lexeme the tokenizer can emit has a dedicated kind; there is no
//! sentinel/none kind, so an emitted token always carries a meaningful kind
//! and a non-empty text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of token kinds produced by the lexical analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Run of ASCII digits
    Number,
    /// Run of ASCII letters
    Word,
    /// `$name` rule/variable identifier (text excludes the `$`)
    DollarIdentifier,
    /// `@name` callback identifier (text excludes the `@`)
    AtIdentifier,
    /// `"phrase"` literal (text excludes the quotes)
    QuotedString,
    ParenStart,    // (
    ParenEnd,      // )
    BracketStart,  // [
    BracketEnd,    // ]
    CurlyStart,    // {
    CurlyEnd,      // }
    AngleStart,    // <
    AngleEnd,      // >
    Equals,        // =
    Semicolon,     // ;
    Pipe,          // |
    Period,        // .
    Star,          // *
    Plus,          // +
    Comma,         // ,
}

impl TokenKind {
    /// Map a punctuation character to its token kind
    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '(' => Some(Self::ParenStart),
            ')' => Some(Self::ParenEnd),
            '[' => Some(Self::BracketStart),
            ']' => Some(Self::BracketEnd),
            '{' => Some(Self::CurlyStart),
            '}' => Some(Self::CurlyEnd),
            '<' => Some(Self::AngleStart),
            '>' => Some(Self::AngleEnd),
            '=' => Some(Self::Equals),
            ';' => Some(Self::Semicolon),
            '|' => Some(Self::Pipe),
            '.' => Some(Self::Period),
            '*' => Some(Self::Star),
            '+' => Some(Self::Plus),
            ',' => Some(Self::Comma),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Word => "word",
            Self::DollarIdentifier => "$identifier",
            Self::AtIdentifier => "@identifier",
            Self::QuotedString => "quoted string",
            Self::ParenStart => "(",
            Self::ParenEnd => ")",
            Self::BracketStart => "[",
            Self::BracketEnd => "]",
            Self::CurlyStart => "{",
            Self::CurlyEnd => "}",
            Self::AngleStart => "<",
            Self::AngleEnd => ">",
            Self::Equals => "=",
            Self::Semicolon => ";",
            Self::Pipe => "|",
            Self::Period => ".",
            Self::Star => "*",
            Self::Plus => "+",
            Self::Comma => ",",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable lexeme with its source position.
///
/// `line` is 1-based and `column` is 0-based, matching the positions the
/// lexical analyzer reports. Equality is structural over all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Create a new token. The text must be non-empty.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
        let text = text.into();
        debug_assert!(!text.is_empty(), "tokens must carry a non-empty lexeme");
        Self {
            kind,
            text,
            line,
            column,
        }
    }

    /// Create a single-character symbol token
    pub fn symbol(kind: TokenKind, ch: char, line: u32, column: u32) -> Self {
        Self::new(kind, ch.to_string(), line, column)
    }

    /// Case-insensitive comparison against a keyword-like word
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::DollarIdentifier => write!(f, "${}", self.text),
            TokenKind::AtIdentifier => write!(f, "@{}", self.text),
            TokenKind::QuotedString => write!(f, "\"{}\"", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_map_is_exact() {
        let cases = [
            ('(', TokenKind::ParenStart),
            (')', TokenKind::ParenEnd),
            ('[', TokenKind::BracketStart),
            (']', TokenKind::BracketEnd),
            ('{', TokenKind::CurlyStart),
            ('}', TokenKind::CurlyEnd),
            ('<', TokenKind::AngleStart),
            ('>', TokenKind::AngleEnd),
            ('=', TokenKind::Equals),
            (';', TokenKind::Semicolon),
            ('|', TokenKind::Pipe),
            ('.', TokenKind::Period),
            ('*', TokenKind::Star),
            ('+', TokenKind::Plus),
            (',', TokenKind::Comma),
        ];

        for (ch, kind) in cases {
            assert_eq!(TokenKind::from_symbol(ch), Some(kind));
        }

        assert_eq!(TokenKind::from_symbol('&'), None);
        assert_eq!(TokenKind::from_symbol('_'), None);
        assert_eq!(TokenKind::from_symbol('#'), None);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Token::new(TokenKind::Word, "hello", 1, 0);
        let b = Token::new(TokenKind::Word, "hello", 1, 0);
        let c = Token::new(TokenKind::Word, "hello", 1, 1);
        let d = Token::new(TokenKind::Number, "hello", 1, 0);

        // reflexive, symmetric
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        // position and kind participate in equality
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_equality_is_transitive() {
        let a = Token::new(TokenKind::QuotedString, "hi there", 4, 7);
        let b = a.clone();
        let c = b.clone();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    #[test]
    fn test_clone_yields_equal_independent_value() {
        let original = Token::new(TokenKind::DollarIdentifier, "rule", 2, 4);
        let mut cloned = original.clone();
        assert_eq!(original, cloned);

        cloned.text.push('x');
        assert_ne!(original, cloned);
        assert_eq!(original.text, "rule");
    }

    #[test]
    fn test_display_restores_source_shape() {
        assert_eq!(
            Token::new(TokenKind::DollarIdentifier, "a.b", 1, 0).to_string(),
            "$a.b"
        );
        assert_eq!(
            Token::new(TokenKind::AtIdentifier, "cb", 1, 0).to_string(),
            "@cb"
        );
        assert_eq!(
            Token::new(TokenKind::QuotedString, "hi", 1, 0).to_string(),
            "\"hi\""
        );
        assert_eq!(Token::new(TokenKind::Pipe, "|", 1, 0).to_string(), "|");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::Word.as_str(), "word");
        assert_eq!(TokenKind::DollarIdentifier.as_str(), "$identifier");
        assert_eq!(TokenKind::Semicolon.to_string(), ";");
        assert_eq!(TokenKind::QuotedString.as_str(), "quoted string");
    }

    #[test]
    fn test_is_word_is_case_insensitive() {
        let token = Token::new(TokenKind::Word, "Import", 1, 0);
        assert!(token.is_word("import"));
        assert!(token.is_word("IMPORT"));
        assert!(!token.is_word("static"));

        let not_word = Token::new(TokenKind::Number, "3", 1, 0);
        assert!(!not_word.is_word("3"));
    }
}
