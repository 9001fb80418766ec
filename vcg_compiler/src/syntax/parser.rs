//! Two-pass recursive-descent parser for VCG source
//!
//! Pass 1 collects imports; pass 2 compiles rule bodies through a
//! `RuleBuilder`. Both passes walk the same cursor and skip regions that
//! belong to the other pass by consuming through the next semicolon.
//!
//! Rule bodies are recognized by backtracking combinators (`any`, `seq`,
//! `star`, `plus`, `plus_any`) over step functions. A failing step leaves the
//! cursor where it was before the attempt; `star`-like repetition keeps what
//! its successful iterations consumed.

use crate::config::constants::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::grammar::{BuildEvent, ImportEntry, RuleBuilder, VcgModule, UNBOUNDED_REPEAT};
use crate::logging::codes;
use crate::syntax::error::{CompileError, CompileResult};
use crate::tokens::{Token, TokenCursor, TokenKind};
use crate::{log_debug, log_error, log_success};

/// A backtracking parse step: `Ok(true)` on match, `Ok(false)` on a
/// recoverable non-match, `Err` on a semantic violation.
type Step = fn(&mut VcgParser, &mut RuleBuilder) -> CompileResult<bool>;

/// Recursive-descent compiler for one VCG module
pub struct VcgParser {
    cursor: TokenCursor,
    module: VcgModule,
    parse_depth: usize,
}

impl VcgParser {
    pub fn new(cursor: TokenCursor) -> Self {
        Self {
            cursor,
            module: VcgModule::default(),
            parse_depth: 0,
        }
    }

    /// Run both passes and assemble the module
    pub fn parse_module(
        mut self,
        package_path: impl Into<String>,
        file_name: impl Into<String>,
    ) -> CompileResult<VcgModule> {
        self.module = VcgModule::new(package_path, file_name);

        log_debug!("Starting module compilation",
            "file" => self.module.file_name.as_str(),
            "tokens" => self.cursor.len()
        );

        if let Err(error) = self.run_import_pass() {
            log_error!(error.error_code(), "Import pass failed",
                "file" => self.module.file_name.as_str(),
                "error" => error
            );
            return Err(error);
        }

        if let Err(error) = self.run_rule_pass() {
            log_error!(error.error_code(), "Rule pass failed",
                "file" => self.module.file_name.as_str(),
                "error" => error
            );
            return Err(error);
        }

        log_success!(codes::success::MODULE_COMPILATION_COMPLETE,
            "Module compilation completed",
            "file" => self.module.file_name.as_str(),
            "imports" => self.module.import_count(),
            "rules" => self.module.rule_count()
        );

        Ok(self.module)
    }

    // ========================================================================
    // Pass 1: imports
    // ========================================================================

    fn run_import_pass(&mut self) -> CompileResult<()> {
        self.cursor.reset();

        while self.cursor.has_next() {
            let Some(token) = self.cursor.peek().cloned() else {
                break;
            };

            if token.kind == TokenKind::DollarIdentifier {
                // Rule region; pass 2 owns it
                self.skip_past_semicolon();
            } else if token.is_word("import") {
                self.cursor.advance()?;
                if !self.consume_import()? {
                    return Err(CompileError::MalformedImport { line: token.line });
                }
            } else {
                self.skip_past_semicolon();
            }
        }

        Ok(())
    }

    /// seq(optional_static, package_name, optional_alias, semicolon)
    fn consume_import(&mut self) -> CompileResult<bool> {
        let marker = self.cursor.mark();
        let mut is_static = false;
        let mut alias = String::new();

        // optional 'static'
        if let Some(token) = self.cursor.peek() {
            if token.is_word("static") {
                self.cursor.advance()?;
                is_static = true;
            }
        }

        // package name: Word ('.' Word)*
        let mut package = match self.cursor.peek() {
            Some(token) if token.kind == TokenKind::Word => self.cursor.advance()?.text,
            _ => {
                self.rewind(marker)?;
                return Ok(false);
            }
        };
        loop {
            if !self.cursor.peek_kind(TokenKind::Period) {
                break;
            }
            self.cursor.advance()?;
            match self.cursor.peek() {
                Some(token) if token.kind == TokenKind::Word => {
                    package.push('.');
                    package.push_str(&self.cursor.advance()?.text);
                }
                // Dangling period: the iteration fails with the cursor left
                // after the period; the remaining steps decide the outcome.
                _ => break,
            }
        }

        // optional 'as <word>'
        if self.cursor.peek().map(|t| t.is_word("as")).unwrap_or(false) {
            let alias_marker = self.cursor.mark();
            self.cursor.advance()?;
            match self.cursor.peek() {
                Some(token) if token.kind == TokenKind::Word => {
                    alias = self.cursor.advance()?.text;
                }
                _ => self.rewind(alias_marker)?,
            }
        }

        // terminating semicolon
        if self.cursor.advance_if_kind(TokenKind::Semicolon).is_none() {
            self.rewind(marker)?;
            return Ok(false);
        }

        if self.module.imports.contains_key(&package) {
            return Err(CompileError::DuplicatePackage { package });
        }
        if is_static && !alias.is_empty() {
            return Err(CompileError::StaticRenamedPackage { package });
        }

        log_debug!("Import collected",
            "package" => package.as_str(),
            "alias" => alias.as_str(),
            "static" => is_static
        );
        self.module
            .imports
            .insert(package, ImportEntry::new(alias, is_static));
        Ok(true)
    }

    // ========================================================================
    // Pass 2: rules
    // ========================================================================

    fn run_rule_pass(&mut self) -> CompileResult<()> {
        self.cursor.reset();

        while self.cursor.has_next() {
            let Some(header) = self.cursor.peek().cloned() else {
                break;
            };

            if header.kind == TokenKind::DollarIdentifier {
                self.cursor.advance()?;
                self.compile_rule(&header)?;
            } else {
                self.skip_past_semicolon();
            }
        }

        Ok(())
    }

    /// seq(optional_rule_function, Equals, expression, Semicolon)
    fn compile_rule(&mut self, header: &Token) -> CompileResult<()> {
        if self.module.rules.contains_key(&header.text) {
            crate::log_warning!("Rule shadows an earlier definition",
                "rule" => header.text.as_str(),
                "line" => header.line
            );
        }

        let mut builder = RuleBuilder::new(header.text.clone());

        let matched = self.seq(
            &mut builder,
            &[
                Self::consume_optional_callback,
                Self::consume_equals,
                Self::consume_expression,
                Self::consume_semicolon,
            ],
        )?;
        if !matched {
            return Err(CompileError::BadDefinition { line: header.line });
        }

        let callback = builder.callback().to_string();
        let root = builder.finish()?;

        log_debug!("Rule compiled",
            "rule" => header.text.as_str(),
            "nodes" => root.node_count(),
            "callback" => callback.as_str()
        );

        self.module.rules.insert(header.text.clone(), root);
        self.module.callbacks.shift_remove(&header.text);
        if !callback.is_empty() {
            self.module.callbacks.insert(header.text.clone(), callback);
        }
        Ok(())
    }

    // ========================================================================
    // Backtracking combinators
    // ========================================================================

    /// Try steps in order; first success wins, failures restore the cursor
    fn any(&mut self, builder: &mut RuleBuilder, steps: &[Step]) -> CompileResult<bool> {
        for step in steps {
            let marker = self.cursor.mark();
            if step(self, builder)? {
                return Ok(true);
            }
            self.rewind(marker)?;
        }
        Ok(false)
    }

    /// Run steps in order; any failure restores to the entry snapshot
    fn seq(&mut self, builder: &mut RuleBuilder, steps: &[Step]) -> CompileResult<bool> {
        let marker = self.cursor.mark();
        for step in steps {
            if !step(self, builder)? {
                self.rewind(marker)?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Repeat greedily; always succeeds
    fn star(&mut self, builder: &mut RuleBuilder, step: Step) -> CompileResult<bool> {
        loop {
            let marker = self.cursor.mark();
            if !step(self, builder)? {
                self.rewind(marker)?;
                return Ok(true);
            }
            // a non-consuming success ends the repetition
            if self.cursor.position() == marker {
                return Ok(true);
            }
        }
    }

    /// Require one success, then repeat greedily
    fn plus(&mut self, builder: &mut RuleBuilder, step: Step) -> CompileResult<bool> {
        let marker = self.cursor.mark();
        if !step(self, builder)? {
            self.rewind(marker)?;
            return Ok(false);
        }
        self.star(builder, step)
    }

    /// Require one `any` success, then repeat `any` greedily
    fn plus_any(&mut self, builder: &mut RuleBuilder, steps: &[Step]) -> CompileResult<bool> {
        let marker = self.cursor.mark();
        if !self.any(builder, steps)? {
            self.rewind(marker)?;
            return Ok(false);
        }
        loop {
            let iteration = self.cursor.mark();
            if !self.any(builder, steps)? {
                self.rewind(iteration)?;
                return Ok(true);
            }
            if self.cursor.position() == iteration {
                return Ok(true);
            }
        }
    }

    // ========================================================================
    // Rule-body grammar steps
    // ========================================================================

    /// expression := plus_any(repeatable_expr, optional_expr)
    fn consume_expression(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            return Err(CompileError::MaxRecursionDepth {
                line: self.current_line(),
            });
        }
        self.parse_depth += 1;
        let result = self.plus_any(
            builder,
            &[
                Self::consume_repeatable_expression,
                Self::consume_optional_expression,
            ],
        );
        self.parse_depth -= 1;
        result
    }

    /// repeatable_expr := plus_any(word, quoted, number, variable, choices,
    /// optional_expr) optional_repeatable
    fn consume_repeatable_expression(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        let matched = self.plus_any(
            builder,
            &[
                Self::consume_word,
                Self::consume_quoted,
                Self::consume_number,
                Self::consume_variable,
                Self::consume_choices,
                Self::consume_optional_expression,
            ],
        )?;
        if !matched {
            return Ok(false);
        }
        self.consume_optional_repeatable(builder)
    }

    fn consume_word(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        match self.cursor.advance_if_kind(TokenKind::Word) {
            Some(token) => {
                builder.apply(BuildEvent::Word(token.text))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn consume_quoted(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        match self.cursor.advance_if_kind(TokenKind::QuotedString) {
            Some(token) => {
                builder.apply(BuildEvent::Word(token.text))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Bare numbers are speakable literals in a rule body
    fn consume_number(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        match self.cursor.advance_if_kind(TokenKind::Number) {
            Some(token) => {
                builder.apply(BuildEvent::Word(token.text))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn consume_variable(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        match self.cursor.advance_if_kind(TokenKind::DollarIdentifier) {
            Some(token) => {
                builder.apply(BuildEvent::Variable(token.text))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// choices := "(" pipe_expression ")"
    fn consume_choices(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        let marker = self.cursor.mark();
        if self.cursor.advance_if_kind(TokenKind::ParenStart).is_none() {
            return Ok(false);
        }
        builder.apply(BuildEvent::GroupStart)?;

        if self.consume_pipe_expression(builder)?
            && self.cursor.advance_if_kind(TokenKind::ParenEnd).is_some()
        {
            builder.apply(BuildEvent::GroupEnd)?;
            return Ok(true);
        }

        self.rewind(marker)?;
        Ok(false)
    }

    /// optional_expr := "[" pipe_expression "]"
    fn consume_optional_expression(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        let marker = self.cursor.mark();
        if self
            .cursor
            .advance_if_kind(TokenKind::BracketStart)
            .is_none()
        {
            return Ok(false);
        }
        builder.apply(BuildEvent::OptionalStart)?;

        if self.consume_pipe_expression(builder)?
            && self.cursor.advance_if_kind(TokenKind::BracketEnd).is_some()
        {
            builder.apply(BuildEvent::OptionalEnd)?;
            return Ok(true);
        }

        self.rewind(marker)?;
        Ok(false)
    }

    /// pipe_expression := expression ( "|" expression )*
    fn consume_pipe_expression(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        if !self.consume_expression(builder)? {
            return Ok(false);
        }
        loop {
            let marker = self.cursor.mark();
            if self.cursor.advance_if_kind(TokenKind::Pipe).is_some() {
                builder.apply(BuildEvent::Pipe)?;
                if self.consume_expression(builder)? {
                    continue;
                }
            }
            self.rewind(marker)?;
            return Ok(true);
        }
    }

    /// optional_repeatable := any(repeat_range, kleene_star, kleene_plus)?
    fn consume_optional_repeatable(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        if !self.cursor.peek_kind_any(&[TokenKind::CurlyStart, TokenKind::Star, TokenKind::Plus]) {
            return Ok(true);
        }
        self.any(
            builder,
            &[
                Self::consume_repeat_range,
                Self::consume_kleene_star,
                Self::consume_kleene_plus,
            ],
        )?;
        Ok(true)
    }

    /// repeat_range := "{" number ("," number?)? "}"
    fn consume_repeat_range(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        let marker = self.cursor.mark();
        if self.cursor.advance_if_kind(TokenKind::CurlyStart).is_none() {
            return Ok(false);
        }

        let min_token = match self.cursor.advance_if_kind(TokenKind::Number) {
            Some(token) => token,
            None => {
                self.rewind(marker)?;
                return Ok(false);
            }
        };
        let min = self.parse_repeat_count(&min_token)?;
        let mut max = min;

        if self.cursor.advance_if_kind(TokenKind::Comma).is_some() {
            match self.cursor.advance_if_kind(TokenKind::Number) {
                Some(max_token) => {
                    let value = self.parse_repeat_count(&max_token)?;
                    if value < min {
                        return Err(CompileError::MaxLessThanMin);
                    }
                    max = value;
                }
                None => max = UNBOUNDED_REPEAT,
            }
        }

        if self.cursor.advance_if_kind(TokenKind::CurlyEnd).is_none() {
            self.rewind(marker)?;
            return Ok(false);
        }

        // max >= 1 is a node invariant; {0} and {0,0} cannot be represented
        if max == 0 {
            return Err(CompileError::InvalidRepeat {
                text: min_token.text,
                line: min_token.line,
            });
        }

        builder.apply(BuildEvent::Repeat { min, max })?;
        Ok(true)
    }

    fn consume_kleene_star(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        if self.cursor.advance_if_kind(TokenKind::Star).is_none() {
            return Ok(false);
        }
        builder.apply(BuildEvent::Repeat {
            min: 0,
            max: UNBOUNDED_REPEAT,
        })?;
        Ok(true)
    }

    fn consume_kleene_plus(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        if self.cursor.advance_if_kind(TokenKind::Plus).is_none() {
            return Ok(false);
        }
        builder.apply(BuildEvent::Repeat {
            min: 1,
            max: UNBOUNDED_REPEAT,
        })?;
        Ok(true)
    }

    /// optional_rule_function := AtIdentifier?
    fn consume_optional_callback(&mut self, builder: &mut RuleBuilder) -> CompileResult<bool> {
        if let Some(token) = self.cursor.advance_if_kind(TokenKind::AtIdentifier) {
            builder.set_callback(token.text);
        }
        Ok(true)
    }

    fn consume_equals(&mut self, _builder: &mut RuleBuilder) -> CompileResult<bool> {
        Ok(self.cursor.advance_if_kind(TokenKind::Equals).is_some())
    }

    fn consume_semicolon(&mut self, _builder: &mut RuleBuilder) -> CompileResult<bool> {
        Ok(self.cursor.advance_if_kind(TokenKind::Semicolon).is_some())
    }

    // ========================================================================
    // Shared plumbing
    // ========================================================================

    fn parse_repeat_count(&self, token: &Token) -> CompileResult<u32> {
        let value: i64 = token.text.parse().map_err(|_| CompileError::InvalidRepeat {
            text: token.text.clone(),
            line: token.line,
        })?;
        if value < 0 {
            return Err(CompileError::NegativeRepeat {
                value,
                line: token.line,
            });
        }
        u32::try_from(value).map_err(|_| CompileError::InvalidRepeat {
            text: token.text.clone(),
            line: token.line,
        })
    }

    /// Restore the cursor to a marker, unless it has not moved.
    /// Markers taken at exhaustion are never restored this way.
    fn rewind(&mut self, marker: usize) -> CompileResult<()> {
        if self.cursor.position() != marker {
            self.cursor.restore(marker)?;
        }
        Ok(())
    }

    /// Consume tokens up to and including the next semicolon
    fn skip_past_semicolon(&mut self) {
        while self.cursor.has_next() {
            match self.cursor.advance() {
                Ok(token) if token.kind == TokenKind::Semicolon => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    fn current_line(&self) -> u32 {
        self.cursor.peek().map(|t| t.line).unwrap_or(0)
    }
}
