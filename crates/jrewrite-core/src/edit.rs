//! Text edit primitives and utilities.

use crate::{TextRange, TextSize};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::new(offset, offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {text_len:?}")]
    RangeOutOfBounds { range: TextRange, text_len: TextSize },
    #[error("offset {offset:?} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: TextSize },
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },
}

/// Apply a list of edits to a text snapshot.
///
/// The function is deterministic: edits are first sorted by `(start, end)` and
/// applied from the end of the text backwards.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut edits = edits.to_vec();
    normalize_text_edits(text, &mut edits)?;

    let mut out = text.to_string();
    for edit in edits.into_iter().rev() {
        let start = u32::from(edit.range.start()) as usize;
        let end = u32::from(edit.range.end()) as usize;
        out.replace_range(start..end, &edit.replacement);
    }
    Ok(out)
}

/// Sort edits and check for overlaps / out-of-bounds.
pub fn normalize_text_edits(text: &str, edits: &mut Vec<TextEdit>) -> Result<(), EditError> {
    edits.sort_by_key(|e| (e.range.start(), e.range.end()));

    let text_len = TextSize::from(text.len() as u32);

    for edit in edits.iter() {
        if edit.range.end() > text_len {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range,
                text_len,
            });
        }

        for offset in [edit.range.start(), edit.range.end()] {
            if !text.is_char_boundary(u32::from(offset) as usize) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    for pair in edits.windows(2) {
        let first = &pair[0];
        let second = &pair[1];
        if first.range.end() > second.range.start()
            || (first.range.is_empty()
                && second.range.is_empty()
                && first.range.start() == second.range.start())
        {
            return Err(EditError::OverlappingEdits {
                first: first.range,
                second: second.range,
            });
        }
    }

    // Coalesce adjacent edits (e.g. two back-to-back inserts/replacements).
    let mut merged: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.range.end() == edit.range.start() {
                last.range = TextRange::new(last.range.start(), edit.range.end());
                last.replacement.push_str(&edit.replacement);
                continue;
            }
        }
        merged.push(edit);
    }
    *edits = merged;

    Ok(())
}

/// The single edit turning `before` into `after`, trimmed to the differing middle.
///
/// Returns `None` when the texts are identical.
pub fn minimal_text_edit(before: &str, after: &str) -> Option<TextEdit> {
    if before == after {
        return None;
    }

    let mut prefix = before
        .bytes()
        .zip(after.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    while !before.is_char_boundary(prefix) || !after.is_char_boundary(prefix) {
        prefix -= 1;
    }

    let max_suffix = (before.len() - prefix).min(after.len() - prefix);
    let mut suffix = before
        .bytes()
        .rev()
        .zip(after.bytes().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    while !before.is_char_boundary(before.len() - suffix)
        || !after.is_char_boundary(after.len() - suffix)
    {
        suffix -= 1;
    }

    let range = TextRange::new(
        TextSize::from(prefix as u32),
        TextSize::from((before.len() - suffix) as u32),
    );
    Some(TextEdit::new(range, &after[prefix..after.len() - suffix]))
}
