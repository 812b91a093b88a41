//! # rebeca-fmt
//!
//! A source formatter for the Rebeca actor modeling language and its companion property
//! language.
//!
//! Formatting is lexical: sources are tokenized, the original layout is discarded, and the
//! tokens are re-emitted with normalized spacing and brace-depth indentation. Both dialects
//! share one engine; they differ only in their keyword tables and in how a `:` is spaced.
//!
//! ## Layout
//!
//!     - [dialect]: the Model and Property dialect tables
//!     - [lexer]: lossless tokenizer
//!     - [formatter]: the formatting engine, indent detection and text edits
//!     - [config]: layered configuration files
//!     - [processor]: token dumps, formatted text, diffs and edits addressed by name
//!     - [runner]: formatting runs over many files

pub mod config;
pub mod dialect;
pub mod formatter;
pub mod lexer;
pub mod processor;
pub mod runner;

pub use dialect::Dialect;
pub use formatter::{format, format_edits, format_range, FormatOptions, Formatter, TextEdit};
