//! Source formatting for the Rebeca dialects
//!
//!     The formatter works purely on lexical structure: tokenize, drop the original layout,
//!     and re-emit with normalized spacing and indentation. There is no parser and no AST,
//!     so malformed input never fails; the worst case is odd-looking but lossless output.
//!
//! Entry points
//!
//!     - [format]: whole-document formatting, a pure function of source, dialect and an
//!       optional indent override
//!     - [format_range]: format one byte span and return its replacement text
//!     - [format_edits]: whole-document formatting expressed as replace-range edits
//!     - [Formatter]: the same operations bundled with [FormatOptions] for repeated use
//!
//!     When no indent override is given the unit is detected from the source, see
//!     [indentation].

pub mod edits;
pub mod engine;
pub mod indentation;

pub use edits::{apply_edits, compute_edits, unified_diff, TextEdit};
pub use indentation::{detect_indent_unit, IndentStyle, IndentUnit, InvalidIndent};

use crate::dialect::Dialect;
use crate::lexer::{tokenize, RebecaLexer, TokenKind};
use std::borrow::Cow;
use tracing::debug;

/// Format a complete source text.
///
/// Empty and whitespace-only inputs are returned unchanged. Otherwise the result ends with
/// exactly one newline.
pub fn format(source: &str, dialect: Dialect, indent_override: Option<&str>) -> String {
    if source.trim().is_empty() {
        return source.to_string();
    }
    let indent_unit = resolve_unit(source, indent_override);
    let tokens = tokenize(source, dialect);
    debug!(tokens = tokens.len(), dialect = %dialect, "formatting");
    engine::emit(&tokens, dialect, &indent_unit)
}

fn resolve_unit<'a>(source: &str, indent_override: Option<&'a str>) -> Cow<'a, str> {
    match indent_override {
        Some(unit) => Cow::Borrowed(unit),
        None => {
            let detected = detect_indent_unit(source);
            debug!(unit = %detected, "detected indent unit");
            Cow::Owned(detected.as_string())
        }
    }
}

/// Format the byte span `offset..offset + length` of `source` and return its replacement.
///
/// The span is clamped to the source and snapped back to char boundaries. Without an
/// override the indent unit comes from the whole document, and the nesting depth comes from
/// the braces before the span, so a selection is formatted the way the full file would be.
/// When the span does not end with a line break, neither does the replacement.
pub fn format_range(
    source: &str,
    dialect: Dialect,
    indent_override: Option<&str>,
    offset: usize,
    length: usize,
) -> String {
    format_range_edit(source, dialect, indent_override, offset, length).new_text
}

/// Like [format_range], but also reports the span the replacement applies to.
///
/// A span preceded only by blanks on its line is widened back to the line start, so the
/// replacement owns that line's indentation.
pub fn format_range_edit(
    source: &str,
    dialect: Dialect,
    indent_override: Option<&str>,
    offset: usize,
    length: usize,
) -> TextEdit {
    let mut start = char_floor(source, offset);
    let end = char_floor(source, offset.saturating_add(length)).max(start);

    let line_start = source[..start].rfind(['\n', '\r']).map_or(0, |i| i + 1);
    let mid_line = !source[line_start..start].trim_matches([' ', '\t']).is_empty();
    if !mid_line {
        start = line_start;
    }
    let region = &source[start..end];
    if region.trim().is_empty() {
        return TextEdit {
            start,
            end,
            new_text: region.to_string(),
        };
    }

    let unit = resolve_unit(source, indent_override);
    let depth = brace_depth_before(source, dialect, start);
    debug!(depth, mid_line, "formatting range {}..{}", start, end);
    let mut new_text =
        engine::emit_region(&tokenize(region, dialect), dialect, &unit, depth, mid_line);
    if !region.ends_with(['\n', '\r']) && new_text.ends_with('\n') {
        new_text.pop();
    }
    TextEdit {
        start,
        end,
        new_text,
    }
}

/// Brace nesting in effect at byte `offset`, floored at zero the way the engine floors it.
fn brace_depth_before(source: &str, dialect: Dialect, offset: usize) -> usize {
    let mut lexer = RebecaLexer::new(source, dialect);
    let mut depth = 0usize;
    while let Some(token) = lexer.next() {
        if lexer.span().end > offset {
            break;
        }
        match token.kind {
            TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseBrace => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}

/// Whole-document formatting as minimal replace-range edits.
pub fn format_edits(
    source: &str,
    dialect: Dialect,
    indent_override: Option<&str>,
) -> Vec<TextEdit> {
    let formatted = format(source, dialect, indent_override);
    compute_edits(source, &formatted)
}

fn char_floor(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Formatting settings shared by a run over many inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub dialect: Dialect,
    pub indent: IndentStyle,
}

/// A formatter bound to one set of [FormatOptions].
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn format(&self, source: &str) -> String {
        let unit = self.options.indent.override_string();
        format(source, self.options.dialect, unit.as_deref())
    }

    pub fn format_range(&self, source: &str, offset: usize, length: usize) -> TextEdit {
        let unit = self.options.indent.override_string();
        format_range_edit(source, self.options.dialect, unit.as_deref(), offset, length)
    }

    pub fn format_edits(&self, source: &str) -> Vec<TextEdit> {
        let unit = self.options.indent.override_string();
        format_edits(source, self.options.dialect, unit.as_deref())
    }
}
