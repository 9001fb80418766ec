//! Random-access cursor over a token sequence with marker/rollback
//!
//! The parser's backtracking discipline is built on this cursor: a marker is
//! an opaque snapshot of the position, stable for the cursor's lifetime, and
//! any number of markers may be outstanding at once. `restore` is
//! bounds-checked so a stale or foreign marker cannot silently corrupt the
//! parse position.

use super::token::{Token, TokenKind};

/// Cursor navigation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("Cannot advance past the end of the token sequence")]
    AdvancePastEnd,

    #[error("Marker {marker} is out of bounds for {len} token(s)")]
    InvalidMarker { marker: usize, len: usize },

    #[error("Cannot restore a marker on an empty cursor")]
    EmptyCursor,
}

impl CursorError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::compile::CURSOR_FAULT
    }
}

/// Owning cursor over the tokenizer's output
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Total number of tokens (independent of the current position)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether a token is available at the current position
    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Current position for diagnostics and movement checks
    pub fn position(&self) -> usize {
        self.position
    }

    /// Look at the current token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Look ahead n tokens past the current one (peek_ahead(0) == peek())
    pub fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    /// Whether the current token has the given kind; false when exhausted
    pub fn peek_kind(&self, kind: TokenKind) -> bool {
        self.peek().map(|t| t.kind == kind).unwrap_or(false)
    }

    /// Whether the current token has any of the given kinds; false when exhausted
    pub fn peek_kind_any(&self, kinds: &[TokenKind]) -> bool {
        self.peek()
            .map(|t| kinds.contains(&t.kind))
            .unwrap_or(false)
    }

    /// Consume and return the current token
    pub fn advance(&mut self) -> Result<Token, CursorError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(CursorError::AdvancePastEnd)?;
        self.position += 1;
        Ok(token)
    }

    /// Consume the current token when it has the given kind
    pub fn advance_if_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind(kind) {
            self.advance().ok()
        } else {
            None
        }
    }

    /// Take a marker at the current position
    pub fn mark(&self) -> usize {
        self.position
    }

    /// Roll back to a previously taken marker.
    ///
    /// The marker must be within `[0, len)` for a non-empty cursor; restoring
    /// on an empty cursor is an error.
    pub fn restore(&mut self, marker: usize) -> Result<(), CursorError> {
        if self.tokens.is_empty() {
            return Err(CursorError::EmptyCursor);
        }
        if marker >= self.tokens.len() {
            return Err(CursorError::InvalidMarker {
                marker,
                len: self.tokens.len(),
            });
        }
        self.position = marker;
        Ok(())
    }

    /// Rewind to the start of the sequence
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// One-line state description for debug logging
    pub fn diagnostic(&self) -> String {
        match self.peek() {
            Some(token) => format!(
                "TokenCursor(pos: {}/{}, current: '{}' at {}:{})",
                self.position,
                self.tokens.len(),
                token,
                token.line,
                token.column
            ),
            None => format!(
                "TokenCursor(pos: {}/{}, exhausted)",
                self.position,
                self.tokens.len()
            ),
        }
    }
}
