//! Core shared types for jrewrite.
//!
//! This crate is intentionally small: text sizes and ranges, line lookup, plain text edits and the
//! indentation arithmetic shared by the renderer and the comment index.

mod edit;
mod indent;
mod text;

pub use edit::{apply_text_edits, minimal_text_edit, normalize_text_edits, EditError, TextEdit};
pub use indent::{
    ends_line, indent_width, infer_indent_unit, is_blank_before, leading_whitespace, line_end, line_indent,
    line_start, next_line_start, shift_indent, whitespace_for_width, IndentUnit,
};
pub use smol_str::SmolStr;
pub use text::{LineCol, LineIndex, TextRange, TextSize};
