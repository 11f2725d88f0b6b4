//! New doc comments for original declarations.
//!
//! When only block tags change, the comment is edited line by line: the description and every
//! tag the new doc still has keep their original lines, and only added tags are printed. Any
//! other change prints the whole comment again.

use std::ops::Range;

use jrewrite_comments::{block_tag_lines, doc_line, print_doc_comment, DocCommentTree, DocStyle};
use jrewrite_core::{line_indent, TextRange};

use super::{offset, Renderer};

impl Renderer<'_> {
    /// Work out the text of every doc comment that changes, before anything is rendered.
    pub(super) fn plan_docs(&mut self) {
        let rewrites = self.rewrites;
        for (key, target) in rewrites.entries() {
            let Some(rewrite) = target.doc() else {
                continue;
            };
            let old = self.index.doc_comment(key).or(rewrite.old.as_ref());
            match self.index.doc_record(key) {
                Some(id) => {
                    let Some(span) = self.index.record(id).span else {
                        continue;
                    };
                    let text = match old {
                        Some(old) => patch_doc(self.source, span, old, &rewrite.new),
                        None => print_doc_comment(&rewrite.new, line_indent(self.source, offset(span.start()))),
                    };
                    self.doc_patches.insert(id, text);
                }
                None => {
                    let start = offset(self.span(key).start());
                    let indent = self.indent_at(start);
                    self.doc_inserts.insert(key, print_doc_comment(&rewrite.new, indent));
                }
            }
        }
    }
}

/// New text for the doc comment at `span`, which was parsed as `old`.
fn patch_doc(source: &str, span: TextRange, old: &DocCommentTree, new: &DocCommentTree) -> String {
    let indent = line_indent(source, offset(span.start()));
    let text = &source[span];
    match patch_tags(text, indent, old, new) {
        Some(text) => {
            tracing::trace!(target = "jrewrite.render", "doc comment edited line by line");
            text
        }
        None => print_doc_comment(new, indent),
    }
}

fn patch_tags(text: &str, indent: &str, old: &DocCommentTree, new: &DocCommentTree) -> Option<String> {
    if old.style != new.style || !old.same_description(new) {
        return None;
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let closing = match old.style {
        DocStyle::Javadoc => {
            if lines.len() < 2 || lines.last()?.trim() != "*/" {
                return None;
            }
            lines.len() - 1
        }
        DocStyle::Markdown => lines.len(),
    };

    let ranges: Vec<Range<usize>> = old
        .block_tags
        .iter()
        .map(|tag| tag.source_lines.clone())
        .collect::<Option<_>>()?;
    let tags_start = ranges.first().map_or(closing, |lines| lines.start);
    let tags_end = ranges.last().map_or(closing, |lines| lines.end);
    if tags_start == 0 || tags_start > tags_end || tags_end > closing {
        return None;
    }

    let mut out: Vec<String> = lines[..tags_start].iter().map(|line| line.to_string()).collect();
    let mut used = vec![false; old.block_tags.len()];
    for tag in &new.block_tags {
        let kept = old
            .block_tags
            .iter()
            .enumerate()
            .position(|(idx, old_tag)| !used[idx] && old_tag.same_content(tag));
        match kept {
            Some(idx) => {
                used[idx] = true;
                out.extend(lines[ranges[idx].clone()].iter().map(|line| line.to_string()));
            }
            None => out.extend(
                block_tag_lines(tag)
                    .iter()
                    .map(|line| format!("{indent}{}", doc_line(new.style, line))),
            ),
        }
    }
    out.extend(lines[tags_end..].iter().map(|line| line.to_string()));
    Some(out.join("\n"))
}
