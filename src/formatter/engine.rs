//! The formatting state machine
//!
//!     A single left-to-right pass over the significant tokens. Whitespace and newlines from
//!     the source are dropped; layout is rebuilt from the token sequence alone, which is what
//!     makes formatting idempotent.
//!
//!     The state is deliberately small:
//!
//!         - depth: current brace nesting, one indent unit per level
//!         - at_line_start: nothing has been written on the current output line yet
//!         - pending_joiner: a `}` was just written and its line is still open, waiting to
//!           see whether the next token is a brace-joiner keyword (`} else {`)
//!         - prev: the previous significant, non-comment token, for spacing decisions
//!         - paren_depth: open parentheses, so `;` inside a `for (...)` header stays inline
//!
//!     Every state lives for one call of [emit] or [emit_region] and is never shared.

use crate::dialect::{ColonSpacing, Dialect, DialectSpec};
use crate::lexer::tokens::TWO_CHAR_OPERATORS;
use crate::lexer::{Token, TokenKind};

/// Format a token stream with the given dialect and indent unit.
pub fn emit(tokens: &[Token<'_>], dialect: Dialect, indent_unit: &str) -> String {
    emit_region(tokens, dialect, indent_unit, 0, false)
}

/// Format a token stream that sits `depth` braces deep in a larger document.
///
/// With `mid_line` set the region continues a line that already has content, so its first
/// token is written without indentation.
pub fn emit_region(
    tokens: &[Token<'_>],
    dialect: Dialect,
    indent_unit: &str,
    depth: usize,
    mid_line: bool,
) -> String {
    let mut state = FormatterState::new(dialect.spec(), indent_unit, depth);
    state.at_line_start = !mid_line;
    for token in tokens.iter().filter(|t| !t.kind.is_trivia()) {
        state.feed(*token);
    }
    state.finish()
}

struct FormatterState<'a> {
    spec: &'static DialectSpec,
    indent_unit: &'a str,
    out: String,
    depth: usize,
    paren_depth: usize,
    at_line_start: bool,
    pending_joiner: bool,
    prev: Option<Token<'a>>,
}

impl<'a> FormatterState<'a> {
    fn new(spec: &'static DialectSpec, indent_unit: &'a str, depth: usize) -> Self {
        Self {
            spec,
            indent_unit,
            out: String::new(),
            depth,
            paren_depth: 0,
            at_line_start: true,
            pending_joiner: false,
            prev: None,
        }
    }

    fn feed(&mut self, token: Token<'a>) {
        if self.pending_joiner {
            self.pending_joiner = false;
            if token.kind == TokenKind::Keyword && self.spec.is_brace_joiner(token.text) {
                self.out.push(' ');
            } else {
                self.newline();
            }
        }

        match token.kind {
            TokenKind::Identifier
            | TokenKind::Keyword
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Char => self.word(token.text),
            TokenKind::LineComment => self.line_comment(token.text),
            TokenKind::BlockComment => self.block_comment(token.text),
            TokenKind::OpenBrace => self.open_brace(),
            TokenKind::CloseBrace => self.close_brace(),
            TokenKind::Semicolon => self.semicolon(),
            TokenKind::Comma => {
                self.attach_left();
                self.out.push_str(", ");
            }
            TokenKind::Dot => {
                self.attach_left();
                self.out.push('.');
            }
            TokenKind::Colon => self.colon(),
            TokenKind::OpenParen => self.open_paren(),
            TokenKind::OpenBracket => {
                self.begin_line();
                self.out.push('[');
            }
            TokenKind::CloseParen => {
                self.attach_left();
                self.out.push(')');
                self.paren_depth = self.paren_depth.saturating_sub(1);
            }
            TokenKind::CloseBracket => {
                self.attach_left();
                self.out.push(']');
            }
            TokenKind::Operator => self.operator(token.text),
            TokenKind::Other => {
                self.begin_line();
                self.push_text(token.text);
            }
            TokenKind::Whitespace | TokenKind::Newline => {}
        }

        if !token.kind.is_comment() {
            self.prev = Some(token);
        }
    }

    fn word(&mut self, text: &str) {
        if !self.begin_line() && self.prev_separates_words() {
            self.space();
        }
        self.push_text(text);
    }

    fn line_comment(&mut self, text: &str) {
        if !self.begin_line() {
            self.space();
        }
        self.out.push_str(text.trim_end());
        self.newline();
    }

    fn block_comment(&mut self, text: &str) {
        if !self.begin_line() {
            self.space();
        }
        let mut lines = text.lines();
        if let Some(first) = lines.next() {
            self.out.push_str(first.trim_end());
        }
        for line in lines {
            self.out.push('\n');
            let content = line.trim();
            if content.is_empty() {
                continue;
            }
            self.push_indent();
            // keep the star column of ` * text` continuations
            if content.starts_with('*') {
                self.out.push(' ');
            }
            self.out.push_str(content);
        }
        self.newline();
    }

    fn open_brace(&mut self) {
        if !self.begin_line() {
            self.space();
        }
        self.out.push('{');
        self.depth += 1;
        self.paren_depth = 0;
        self.newline();
    }

    fn close_brace(&mut self) {
        self.newline();
        self.depth = self.depth.saturating_sub(1);
        self.paren_depth = 0;
        self.begin_line();
        self.out.push('}');
        self.pending_joiner = true;
    }

    fn semicolon(&mut self) {
        self.attach_left();
        self.out.push(';');
        if self.paren_depth > 0 {
            self.out.push(' ');
        } else {
            self.newline();
        }
    }

    fn colon(&mut self) {
        self.attach_left();
        self.out.push(':');
        if self.spec.colon_spacing() == ColonSpacing::SpaceAfter {
            self.out.push(' ');
        }
    }

    fn open_paren(&mut self) {
        if !self.begin_line() && self.prev_is_paren_keyword() {
            self.space();
        }
        self.push_text("(");
        self.paren_depth += 1;
    }

    fn operator(&mut self, text: &str) {
        if self.is_unary(text) {
            if !self.begin_line() && self.prev_kind() == Some(TokenKind::Keyword) {
                self.space();
            }
            self.push_text(text);
        } else {
            if !self.begin_line() {
                self.space();
            }
            self.out.push_str(text);
            self.out.push(' ');
        }
    }

    fn is_unary(&self, text: &str) -> bool {
        match text {
            "!" | "~" | "++" | "--" => true,
            "+" | "-" => match self.prev_kind() {
                None => true,
                Some(kind) => matches!(
                    kind,
                    TokenKind::OpenParen
                        | TokenKind::OpenBracket
                        | TokenKind::OpenBrace
                        | TokenKind::Comma
                        | TokenKind::Semicolon
                        | TokenKind::Operator
                        | TokenKind::Colon
                        | TokenKind::Keyword
                ),
            },
            _ => false,
        }
    }

    fn prev_kind(&self) -> Option<TokenKind> {
        self.prev.map(|t| t.kind)
    }

    fn prev_separates_words(&self) -> bool {
        self.prev_kind().is_some_and(|kind| {
            kind.is_word_like() || matches!(kind, TokenKind::CloseParen | TokenKind::CloseBracket)
        })
    }

    fn prev_is_paren_keyword(&self) -> bool {
        self.prev.is_some_and(|t| {
            t.kind == TokenKind::Keyword && self.spec.spaces_before_paren(t.text)
        })
    }

    /// Write the indentation if nothing is on the current line yet. Returns whether it did.
    fn begin_line(&mut self) -> bool {
        if !self.at_line_start {
            return false;
        }
        self.push_indent();
        self.at_line_start = false;
        true
    }

    fn push_indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(self.indent_unit);
        }
    }

    /// Tokens that hug whatever precedes them: `;` `,` `.` `:` `)` `]`.
    fn attach_left(&mut self) {
        self.trim_trailing_blanks();
        self.begin_line();
    }

    /// Exactly one space before the next piece of text.
    fn space(&mut self) {
        self.trim_trailing_blanks();
        self.out.push(' ');
    }

    fn newline(&mut self) {
        if self.at_line_start {
            return;
        }
        self.trim_trailing_blanks();
        self.out.push('\n');
        self.at_line_start = true;
    }

    fn trim_trailing_blanks(&mut self) {
        let len = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(len);
    }

    /// Push token text, separating it from the previous character when the two would
    /// re-lex as a different token (`- -x` must not become `--x`).
    fn push_text(&mut self, text: &str) {
        if self.would_fuse(text) {
            self.out.push(' ');
        }
        self.out.push_str(text);
    }

    fn would_fuse(&self, text: &str) -> bool {
        let (Some(last), Some(first)) = (self.out.chars().next_back(), text.chars().next()) else {
            return false;
        };
        let mut pair = [0u8; 8];
        let last_len = last.encode_utf8(&mut pair).len();
        let first_len = first.encode_utf8(&mut pair[last_len..]).len();
        match std::str::from_utf8(&pair[..last_len + first_len]) {
            Ok(pair) => TWO_CHAR_OPERATORS.contains(&pair) || pair == "//" || pair == "/*",
            Err(_) => false,
        }
    }

    fn finish(mut self) -> String {
        if self.out.is_empty() {
            return self.out;
        }
        let len = self.out.trim_end_matches([' ', '\t', '\n']).len();
        self.out.truncate(len);
        self.out.push('\n');
        self.out
    }
}
