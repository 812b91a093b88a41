//! Text edits between a source and its formatted form
//!
//! Editor surfaces apply formatting as replace-range operations rather than swapping the
//! whole buffer, which keeps cursors and undo history intact. Edits are computed with a
//! line-level Myers diff and expressed as byte ranges over the original text.

use similar::{Algorithm, DiffTag, TextDiff};

/// Replace `start..end` (byte offsets into the original text) with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

/// Compute the line edits that turn `original` into `formatted`.
///
/// Edits are sorted, non-overlapping, and adjacent changes are merged.
pub fn compute_edits(original: &str, formatted: &str) -> Vec<TextEdit> {
    if original == formatted {
        return Vec::new();
    }

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(original, formatted);

    let old_lines = diff.old_slices();
    let new_lines = diff.new_slices();
    let mut offsets = Vec::with_capacity(old_lines.len() + 1);
    let mut offset = 0;
    offsets.push(offset);
    for line in old_lines {
        offset += line.len();
        offsets.push(offset);
    }

    let mut edits: Vec<TextEdit> = Vec::new();
    for op in diff.ops() {
        if op.tag() == DiffTag::Equal {
            continue;
        }
        let start = offsets[op.old_range().start];
        let end = offsets[op.old_range().end];
        let new_text = new_lines[op.new_range()].concat();
        match edits.last_mut() {
            Some(last) if last.end == start => {
                last.end = end;
                last.new_text.push_str(&new_text);
            }
            _ => edits.push(TextEdit {
                start,
                end,
                new_text,
            }),
        }
    }
    edits
}

/// Apply edits produced by [compute_edits] (or any non-overlapping set) to `source`.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut result = source.to_string();
    let mut sorted = edits.to_vec();
    sorted.sort_by_key(|edit| edit.start);
    for edit in sorted.into_iter().rev() {
        result.replace_range(edit.start..edit.end, &edit.new_text);
    }
    result
}

/// Render a unified diff between the original and formatted text.
pub fn unified_diff(original: &str, formatted: &str, name: &str) -> String {
    TextDiff::from_lines(original, formatted)
        .unified_diff()
        .context_radius(3)
        .header(name, name)
        .to_string()
}
