//! Indent unit detection
//!
//! The formatter reuses whatever indentation unit the file was written with. Detection
//! looks only at the leading whitespace of non-blank lines:
//!
//!     - any leading run containing a tab means the file is tab indented
//!     - otherwise the unit is the greatest common divisor of the leading space runs
//!     - with no indented lines at all the unit falls back to one tab
//!
//! Lines are found with the lexer, so `\r`, `\n` and `\r\n` all end a line. Lines that begin
//! inside a multi-line token (a block comment body such as ` * text`, or a string spanning
//! lines) are skipped; their offsets are not indentation.

use crate::dialect::Dialect;
use crate::lexer::{tokenize, TokenKind};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A unit of indentation: one tab or a fixed number of spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentUnit {
    #[default]
    Tab,
    Spaces(usize),
}

impl IndentUnit {
    /// The text emitted once per indentation level.
    pub fn as_string(self) -> String {
        match self {
            IndentUnit::Tab => "\t".to_string(),
            IndentUnit::Spaces(n) => " ".repeat(n),
        }
    }
}

impl fmt::Display for IndentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentUnit::Tab => f.write_str("tab"),
            IndentUnit::Spaces(n) => write!(f, "{} spaces", n),
        }
    }
}

/// Detect the indentation unit of a source text.
pub fn detect_indent_unit(source: &str) -> IndentUnit {
    let mut divisor = 0usize;
    let mut at_line_start = true;
    let mut leading = "";
    // keyword classification plays no part in finding lines
    for token in tokenize(source, Dialect::default()) {
        match token.kind {
            TokenKind::Newline => {
                at_line_start = true;
                leading = "";
            }
            TokenKind::Whitespace if at_line_start => leading = token.text,
            TokenKind::Whitespace => {}
            _ if at_line_start => {
                at_line_start = false;
                if leading.contains('\t') {
                    return IndentUnit::Tab;
                }
                if !leading.is_empty() {
                    divisor = gcd(divisor, leading.len());
                }
            }
            _ => {}
        }
    }
    match divisor {
        0 => IndentUnit::Tab,
        n => IndentUnit::Spaces(n),
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// How a formatting pass picks its indent unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum IndentStyle {
    /// Detect the unit from the source being formatted.
    #[default]
    Auto,
    Tab,
    Spaces(usize),
}

impl IndentStyle {
    /// The explicit indent string, or `None` when the unit should be detected.
    pub fn override_string(&self) -> Option<String> {
        match self {
            IndentStyle::Auto => None,
            IndentStyle::Tab => Some(IndentUnit::Tab.as_string()),
            IndentStyle::Spaces(n) => Some(IndentUnit::Spaces(*n).as_string()),
        }
    }
}

/// Error returned for indent settings other than `auto`, `tab` or a space count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid indent '{0}' (expected 'auto', 'tab' or a number of spaces)")]
pub struct InvalidIndent(pub String);

impl FromStr for IndentStyle {
    type Err = InvalidIndent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(IndentStyle::Auto),
            "tab" | "tabs" => Ok(IndentStyle::Tab),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Ok(IndentStyle::Spaces(n)),
                _ => Err(InvalidIndent(s.to_string())),
            },
        }
    }
}

impl TryFrom<String> for IndentStyle {
    type Error = InvalidIndent;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
