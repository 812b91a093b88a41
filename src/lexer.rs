//! Lexer module for the Rebeca dialects
//!
//! This module contains the tokenization logic shared by both dialects, including token
//! definitions, the lexer implementation and the detokenizer used to check coverage.
//!
//! The lexer never fails: every input character ends up in exactly one token, so
//! concatenating the token texts in order gives back the original source.

pub mod detokenizer;
pub mod lexer_impl;
pub mod tokens;

pub use detokenizer::detokenize;
pub use lexer_impl::{tokenize, RebecaLexer};
pub use tokens::{Token, TokenKind};
