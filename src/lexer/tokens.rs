//! Token definitions for the Rebeca dialects
//!
//! This module defines the tokens produced by the lexer. Scanning is done by a logos
//! generated state machine over [RawToken]; words are classified as keywords afterwards,
//! because the keyword set depends on the dialect while the rest of the lexical grammar
//! does not.

use logos::{Lexer, Logos};
use serde::Serialize;
use std::fmt;

/// Token kinds. Closed set shared by both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Whitespace,
    Newline,
    Identifier,
    Keyword,
    Number,
    String,
    Char,
    LineComment,
    BlockComment,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Operator,
    Other,
}

impl TokenKind {
    /// Whitespace and line breaks; the formatter recomputes both.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Words and literals; two of these in a row need a separating space.
    pub fn is_word_like(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Keyword
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Char
        )
    }

    pub fn tag(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Char => "char",
            TokenKind::LineComment => "line-comment",
            TokenKind::BlockComment => "block-comment",
            TokenKind::OpenBrace => "open-brace",
            TokenKind::CloseBrace => "close-brace",
            TokenKind::OpenParen => "open-paren",
            TokenKind::CloseParen => "close-paren",
            TokenKind::OpenBracket => "open-bracket",
            TokenKind::CloseBracket => "close-bracket",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Comma => "comma",
            TokenKind::Dot => "dot",
            TokenKind::Colon => "colon",
            TokenKind::Operator => "operator",
            TokenKind::Other => "other",
        }
    }
}

/// A token: its kind and the exact source slice it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Whitespace | TokenKind::Newline => write!(f, "<{}>", self.kind.tag()),
            _ => write!(f, "<{}:{}>", self.kind.tag(), self.text),
        }
    }
}

/// Raw scanner output, before keyword classification.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r\n|\r|\n")]
    Newline,

    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("\"", |lex| quoted(lex, b'"'))]
    String,

    #[token("'", |lex| quoted(lex, b'\''))]
    Char,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Word,

    // Suffixes, hex and binary markers ride along: 0x1F, 10L, 0b1010
    #[regex(r"[0-9][a-zA-Z0-9_$]*")]
    Number,

    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("&&")]
    #[token("||")]
    #[token("++")]
    #[token("--")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<")]
    #[token(">>")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("=")]
    #[token("<")]
    #[token(">")]
    #[token("!")]
    #[token("~")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    Operator,

    // Any single character nothing else claims
    #[regex(r"[^ \t\r\n]", priority = 0)]
    Other,
}

/// Consume a block comment through the first `*/`, or to the end of input.
fn block_comment(lex: &mut Lexer<RawToken>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.bump(len);
    true
}

/// Consume a quoted literal through its closing quote, honoring backslash escapes.
/// Unterminated literals run to the end of input.
fn quoted(lex: &mut Lexer<RawToken>, quote: u8) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    lex.bump(bytes.len());
    true
}

/// Two-character operators, used to keep adjacent emitted operators from fusing.
pub(crate) const TWO_CHAR_OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
    "^=", "<<", ">>",
];
