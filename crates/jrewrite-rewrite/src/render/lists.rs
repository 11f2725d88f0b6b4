//! Lists are diffed by node identity.
//!
//! A line list owns whole lines: every item's region runs from the start of the line holding
//! its first own-line comment to the end of the line holding its last trailing comment. Kept
//! items keep their region and the gap of blank lines or loose comments before it, removed
//! items lose both, and added items are printed on lines of their own.
//!
//! An inline list keeps the original separator text between items that stay adjacent.

use jrewrite_comments::RelativePosition;
use jrewrite_core::{
    ends_line, indent_width, is_blank_before, line_end, line_start, next_line_start, whitespace_for_width,
    TextRange,
};
use jrewrite_format::Placement;
use jrewrite_syntax::{Delimiter, ListSpec, NodeId, NodeKind, TokenKind};
use similar::{capture_diff_slices, Algorithm, DiffTag};

use super::{offset, range, size, Piece, Renderer};
use crate::RewriteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Kept { old: usize, node: NodeId },
    /// A new node standing where the original `from` stood, built from it.
    Edited { old: usize, from: NodeId, node: NodeId },
    Added(NodeId),
}

impl Entry {
    fn node(self) -> NodeId {
        match self {
            Entry::Kept { node, .. } | Entry::Edited { node, .. } | Entry::Added(node) => node,
        }
    }

    fn old(self) -> Option<usize> {
        match self {
            Entry::Kept { old, .. } | Entry::Edited { old, .. } => Some(old),
            Entry::Added(_) => None,
        }
    }
}

/// The new items in order, each marked with its old position when it was kept.
///
/// An item inserted where items were removed takes the place of the first of them for which
/// `edited(removed, inserted)` holds.
fn diff_items(old: &[NodeId], new: &[NodeId], edited: impl Fn(NodeId, NodeId) -> bool) -> Vec<Entry> {
    let mut out = Vec::with_capacity(new.len());
    let mut removed: Vec<usize> = Vec::new();
    for op in capture_diff_slices(Algorithm::Lcs, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                removed.clear();
                out.extend(
                    old_range
                        .zip(new_range)
                        .map(|(old, new_pos)| Entry::Kept { old, node: new[new_pos] }),
                );
            }
            DiffTag::Delete => removed = old_range.collect(),
            DiffTag::Insert | DiffTag::Replace => {
                if tag == DiffTag::Replace {
                    removed = old_range.collect();
                }
                let mut candidates = removed.iter().copied().peekable();
                for pos in new_range {
                    let node = new[pos];
                    match candidates.next_if(|at| edited(old[*at], node)) {
                        Some(at) => out.push(Entry::Edited {
                            old: at,
                            from: old[at],
                            node,
                        }),
                        None => out.push(Entry::Added(node)),
                    }
                }
                removed.clear();
            }
        }
    }
    out
}

impl Renderer<'_> {
    /// Whether the synthetic `new` is a copy of the original `old` with some parts changed.
    fn is_edited_copy(&self, old: NodeId, new: NodeId) -> bool {
        let tree = self.tree;
        !tree.is_original(new)
            && tree.kind(old) == tree.kind(new)
            && tree.text(old) == tree.text(new)
            && tree
                .children(new)
                .iter()
                .flatten()
                .any(|child| tree.children(old).contains(&Some(*child)))
    }

    fn new_items(&self, list: NodeId) -> Vec<NodeId> {
        self.tree
            .items(list)
            .into_iter()
            .filter(|item| !self.is_deleted(*item))
            .collect()
    }

    // --- line lists ---

    pub(super) fn line_list(&mut self, old: NodeId, new: NodeId, spec: ListSpec) -> Result<Option<Piece>, RewriteError> {
        let span = self.span(old);
        let kind = self.tree.kind(old);
        let old_items = self.tree.items(old);
        let new_items = self.new_items(new);
        if old_items == new_items {
            return self.walk_items(span, &old_items).map(Some);
        }
        let Some(regions) = self.item_regions(&old_items) else {
            return Ok(None);
        };
        let merged = diff_items(&old_items, &new_items, |old, new| self.is_edited_copy(old, new));
        tracing::trace!(
            target = "jrewrite.render",
            list = ?old,
            kind = ?kind,
            old = old_items.len(),
            new = new_items.len(),
            "diffing line list"
        );

        if spec.delimiter != Delimiter::Braces {
            return self.bare_lines(kind, span, &old_items, &regions, &merged);
        }

        let Some((header_end, footer_start)) = self.braced_frame(span, &regions) else {
            if old_items.is_empty() {
                return self.open_empty_braces(kind, span, &merged);
            }
            return Ok(None);
        };
        let mut gaps = Vec::with_capacity(regions.len() + 1);
        let mut at = header_end;
        for region in &regions {
            gaps.push(Region { start: at, end: region.start });
            at = region.end;
        }
        gaps.push(Region { start: at, end: footer_start });
        let last_gap = gaps[gaps.len() - 1];

        let indent = match old_items.first() {
            Some(first) => self.indent_at(offset(self.span(*first).start())).to_string(),
            None => self.nested_indent(offset(span.start())),
        };
        // Items going into an empty body start right below its opening line.
        let first_blank = match merged.first() {
            _ if old_items.is_empty() => 0,
            _ if self.is_blank(gaps[0]) => self.source[gaps[0].start..gaps[0].end].matches('\n').count(),
            Some(first) => self
                .config
                .format
                .blank_lines_before(kind, None, self.tree.kind(first.node())),
            None => 0,
        };

        let mut text = self.copy(offset(span.start()), header_end);
        if merged.is_empty() {
            if !self.is_blank(last_gap) {
                text.push_str(&self.copy(last_gap.start, last_gap.end));
            }
        } else {
            let (items, consumed) = self.line_items(kind, &regions, &gaps, &merged, &indent, first_blank)?;
            text.push_str(&items);
            text.push_str(&self.copy(last_gap.start.max(consumed).min(last_gap.end), last_gap.end));
        }
        text.push_str(&self.copy(footer_start, offset(span.end())));
        Ok(Some(Piece::new(span, text)))
    }

    /// A line list whose items all stay where they are: each item is rendered in place and the
    /// text around them is copied, however the items were laid out.
    fn walk_items(&mut self, span: TextRange, items: &[NodeId]) -> Result<Piece, RewriteError> {
        let start = offset(span.start());
        let mut out = String::new();
        let mut cursor = start;
        for item in items {
            let piece = self.render_node(*item, Placement::LineItem)?;
            self.emit(&mut out, &mut cursor, piece);
        }
        let end = offset(span.end());
        if cursor < end {
            let tail = self.copy(cursor, end);
            out.push_str(&tail);
        }
        Ok(Piece::new(range(start, cursor.max(end)), out))
    }

    /// Items of a line list rendered one region at a time, and the offset up to which source
    /// text was used. The text ends with a newline unless the last kept region ended the file
    /// without one.
    fn line_items(
        &mut self,
        kind: NodeKind,
        regions: &[Region],
        gaps: &[Region],
        merged: &[Entry],
        indent: &str,
        first_blank: usize,
    ) -> Result<(String, usize), RewriteError> {
        let width = indent_width(indent, self.unit().width.max(1));
        let mut out = String::new();
        let mut prev: Option<(NodeKind, bool)> = None;
        // A kept item may consume text past its region, such as comments moved into new braces.
        let mut consumed = gaps.first().map_or(0, |gap| gap.start);
        for entry in merged {
            let node_kind = self.tree.kind(entry.node());
            match *entry {
                Entry::Kept { old, .. } | Entry::Edited { old, .. } => {
                    let gap = match prev {
                        None => gaps[0],
                        Some(_) => gaps[old],
                    };
                    let gap = Region {
                        start: gap.start.max(consumed).min(gap.end),
                        end: gap.end,
                    };
                    // After an added item an empty gap takes the configured spacing; blank lines
                    // that were there stay as written.
                    match prev {
                        Some((prev_kind, true)) if gap.start >= gap.end => {
                            let blank = self.format.blank_lines_before(kind, Some(prev_kind), node_kind);
                            out.push_str(&"\n".repeat(blank));
                        }
                        _ => out.push_str(&self.copy(gap.start, gap.end)),
                    }
                    let region = regions[old];
                    let piece = match *entry {
                        Entry::Edited { from, node, .. } => self.render_pair(from, node, Placement::LineItem)?,
                        _ => self.render_node(entry.node(), Placement::LineItem)?,
                    };
                    let start = piece.start().clamp(region.start, region.end);
                    let end = piece.end().clamp(start, region.end);
                    out.push_str(&self.copy(region.start, start));
                    out.push_str(&piece.text);
                    out.push_str(&self.copy(end, region.end));
                    consumed = consumed.max(region.end).max(piece.end());
                    prev = Some((node_kind, false));
                }
                Entry::Added(node) => {
                    let blank = match prev {
                        None => first_blank,
                        Some((prev_kind, _)) => self.format.blank_lines_before(kind, Some(prev_kind), node_kind),
                    };
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&"\n".repeat(blank));
                    out.push_str(indent);
                    out.push_str(&self.print(node, Placement::LineItem, width)?);
                    out.push('\n');
                    prev = Some((node_kind, true));
                }
            }
        }
        Ok((out, consumed))
    }

    fn bare_lines(
        &mut self,
        kind: NodeKind,
        span: TextRange,
        old_items: &[NodeId],
        regions: &[Region],
        merged: &[Entry],
    ) -> Result<Option<Piece>, RewriteError> {
        let (Some(first), Some(last)) = (regions.first().copied(), regions.last().copied()) else {
            return self.fill_bare(kind, span, merged);
        };
        if merged.is_empty() {
            return Ok(Some(self.clear_bare(first.start, last.end)));
        }

        let mut gaps = Vec::with_capacity(regions.len() + 1);
        let mut at = first.start;
        for region in regions {
            gaps.push(Region { start: at, end: region.start });
            at = region.end;
        }
        gaps.push(Region { start: last.end, end: last.end });

        let indent = self.indent_at(offset(self.span(old_items[0]).start())).to_string();
        let (mut text, consumed) = self.line_items(kind, regions, &gaps, merged, &indent, 0)?;
        if !self.source[..last.end].ends_with('\n') && text.ends_with('\n') {
            text.pop();
        }
        Ok(Some(Piece::new(range(first.start, last.end.max(consumed)), text)))
    }

    /// Items added to a braced list written as `{}` on one line. The braces move apart and the
    /// items go on the lines between them.
    fn open_empty_braces(&mut self, kind: NodeKind, span: TextRange, merged: &[Entry]) -> Result<Option<Piece>, RewriteError> {
        let (start, end) = (offset(span.start()), offset(span.end()));
        if end < start + 2 || !self.source[start + 1..end - 1].trim().is_empty() {
            return Ok(None);
        }
        let indent = self.nested_indent(start);
        let inner = Region { start: start + 1, end: start + 1 };
        let (items, _) = self.line_items(kind, &[], &[inner], merged, &indent, 0)?;
        let text = format!(
            "{}\n{items}{}{}",
            &self.source[start..start + 1],
            self.indent_at(start),
            &self.source[end - 1..end],
        );
        Ok(Some(Piece::new(span, text)))
    }

    /// Items added to a bare list that had none, at the list's anchor.
    fn fill_bare(&mut self, kind: NodeKind, span: TextRange, merged: &[Entry]) -> Result<Option<Piece>, RewriteError> {
        if merged.is_empty() {
            return Ok(Some(Piece::new(span, String::new())));
        }
        let anchor = offset(span.start());
        let indent = match kind {
            NodeKind::ImportList | NodeKind::TypeDeclList => String::new(),
            NodeKind::BodyDeclList => self.indent_at(anchor).to_string(),
            _ => self.nested_indent(anchor),
        };
        let (body, _) = self.line_items(kind, &[], &[Region { start: anchor, end: anchor }], merged, &indent, 0)?;
        let items = body.trim_end_matches('\n');

        let text = match kind {
            NodeKind::ImportList | NodeKind::TypeDeclList if anchor > 0 => format!("\n\n{items}"),
            NodeKind::ImportList => format!("{items}\n\n"),
            NodeKind::TypeDeclList => format!("{items}\n"),
            NodeKind::BodyDeclList => {
                let terminated = self
                    .token_ending_at(size(anchor))
                    .is_some_and(|token| token.kind == TokenKind::Semicolon);
                let semicolon = if terminated { "" } else { ";" };
                format!("{semicolon}\n{items}")
            }
            _ => format!("\n{items}"),
        };
        Ok(Some(Piece::new(TextRange::empty(size(anchor)), text)))
    }

    /// Remove every line of a bare list along with the blank lines that separated it from what
    /// follows.
    fn clear_bare(&self, start: usize, end: usize) -> Piece {
        let source = self.source;
        let followed = self
            .tree
            .next_token(size(end))
            .is_some_and(|token| token.kind != TokenKind::Eof);
        if followed {
            let mut end = end;
            while end < source.len() && source[end..line_end(source, end)].trim().is_empty() {
                end = next_line_start(source, end);
            }
            return Piece::new(range(start, end), "");
        }
        let start = self
            .tree
            .prev_token_end(size(start))
            .map_or(0, |prev| next_line_start(source, offset(prev)))
            .min(start);
        Piece::new(range(start, source.len()), "")
    }

    /// The lines every item owns, or `None` when items share lines with each other or with the
    /// list's delimiters.
    fn item_regions(&self, items: &[NodeId]) -> Option<Vec<Region>> {
        let mut regions: Vec<Region> = Vec::with_capacity(items.len());
        for item in items {
            let region = self.item_region(*item)?;
            if regions.last().is_some_and(|prev| prev.end > region.start) {
                return None;
            }
            regions.push(region);
        }
        Some(regions)
    }

    fn item_region(&self, item: NodeId) -> Option<Region> {
        let source = self.source;
        let span = self.span(item);
        let mut start = offset(span.start());
        for id in self.index.leading_ids(item) {
            let record = self.index.record(*id);
            if record.position == RelativePosition::Preceding {
                if let Some(comment) = record.span {
                    start = start.min(offset(comment.start()));
                }
            }
        }
        if !is_blank_before(source, start) {
            return None;
        }

        let mut end = offset(span.end());
        for id in self.index.trailing_ids(item) {
            if let Some(comment) = self.index.record(*id).span {
                end = end.max(offset(comment.end()));
            }
        }
        // Comments further along the last line belong to the item too.
        let first = self.comments.partition_point(|(comment, _)| offset(comment.start()) < end);
        for (comment, _) in &self.comments[first..] {
            if source[end..offset(comment.start())].contains('\n') {
                break;
            }
            end = end.max(offset(comment.end()));
        }
        if !ends_line(source, end) {
            return None;
        }
        Some(Region {
            start: line_start(source, start),
            end: next_line_start(source, end),
        })
    }

    /// End of the opening line and start of the closing line of a braced list.
    fn braced_frame(&self, span: TextRange, regions: &[Region]) -> Option<(usize, usize)> {
        let source = self.source;
        let (start, end) = (offset(span.start()), offset(span.end()));
        if end < start + 2 {
            return None;
        }
        let close = end - 1;
        if !is_blank_before(source, close) {
            return None;
        }
        let header_end = next_line_start(source, start);
        let footer_start = line_start(source, close);
        if header_end > footer_start {
            return None;
        }
        if regions.first().is_some_and(|first| first.start < header_end)
            || regions.last().is_some_and(|last| last.end > footer_start)
        {
            return None;
        }
        Some((header_end, footer_start))
    }

    fn is_blank(&self, gap: Region) -> bool {
        self.source[gap.start..gap.end.max(gap.start)].trim().is_empty()
    }

    /// One indentation level deeper than the line holding `at`.
    fn nested_indent(&self, at: usize) -> String {
        let unit = self.unit();
        whitespace_for_width(self.width_at(at) + unit.width, unit)
    }

    // --- inline lists ---

    pub(super) fn inline_list(&mut self, old: NodeId, new: NodeId, spec: ListSpec) -> Result<Option<Piece>, RewriteError> {
        let span = self.span(old);
        let (start, end) = (offset(span.start()), offset(span.end()));
        let kind = self.tree.kind(old);
        let old_items = self.tree.items(old);
        let new_items = self.new_items(new);

        if old_items.is_empty() && new_items.is_empty() {
            return Ok(Some(Piece::new(span, self.copy(start, end))));
        }
        if kind == NodeKind::EnumConstantList && (old_items.is_empty() || new_items.is_empty()) {
            return Ok(None);
        }
        let owner = self.parents.get(&old).copied();
        let owner_kind = owner.map(|owner| self.tree.kind(owner));
        let declaration = kind == NodeKind::ModifierList && owner.is_some_and(|owner| self.is_declaration(owner));
        let indent = self.indent_at(start);
        let width = self.width_at(start);

        if old_items.is_empty() {
            let mut joined = String::new();
            let mut prev: Option<NodeId> = None;
            for item in &new_items {
                if let Some(prev) = prev {
                    joined.push_str(&self.inline_separator(spec, kind, prev, declaration, indent));
                }
                joined.push_str(&self.print(*item, Placement::Inline, width)?);
                prev = Some(*item);
            }
            let delimited = |open: &str, close: &str| format!("{open}{joined}{close}");
            let piece = match spec.delimiter {
                Delimiter::Parens | Delimiter::Angles | Delimiter::Braces => {
                    let original = &self.source[start..end];
                    let open = original.get(..1).unwrap_or_default();
                    let close = original.get(original.len().saturating_sub(1)..).unwrap_or_default();
                    Piece::new(span, delimited(open, close))
                }
                Delimiter::AnglesWhenNonEmpty if owner_kind == Some(NodeKind::MethodDecl) => {
                    Piece::new(span, format!("{} ", delimited("<", ">")))
                }
                Delimiter::AnglesWhenNonEmpty => Piece::new(span, delimited("<", ">")),
                Delimiter::ParensWhenNonEmpty => Piece::new(span, delimited("(", ")")),
                Delimiter::Keyword => {
                    let keyword = self
                        .tree
                        .text(new)
                        .or(self.tree.text(old))
                        .unwrap_or(if kind == NodeKind::BoundList { "extends" } else { "implements" });
                    Piece::new(span, format!(" {keyword} {joined}"))
                }
                Delimiter::None => match kind {
                    NodeKind::ModifierList => {
                        let last_is_annotation = prev.is_some_and(|last| self.tree.kind(last) == NodeKind::Annotation);
                        let glue = if declaration && last_is_annotation {
                            format!("\n{indent}")
                        } else {
                            " ".to_string()
                        };
                        Piece::new(span, format!("{joined}{glue}"))
                    }
                    NodeKind::ExpressionList | NodeKind::CatchList => Piece::new(span, format!(" {joined}")),
                    _ => Piece::new(span, joined),
                },
            };
            return Ok(Some(piece));
        }

        if new_items.is_empty() {
            let next_start = |at: usize| {
                self.tree
                    .next_token(size(at))
                    .map_or(at, |token| offset(token.range.start()))
            };
            let prev_end = |at: usize| self.tree.prev_token_end(size(at)).map_or(at, offset);
            let piece = match spec.delimiter {
                Delimiter::Parens | Delimiter::Angles | Delimiter::Braces => {
                    let original = &self.source[start..end];
                    let open = original.get(..1).unwrap_or_default();
                    let close = original.get(original.len().saturating_sub(1)..).unwrap_or_default();
                    Piece::new(span, format!("{open}{close}"))
                }
                Delimiter::AnglesWhenNonEmpty if owner_kind == Some(NodeKind::MethodDecl) => {
                    Piece::new(range(start, next_start(end)), "")
                }
                Delimiter::AnglesWhenNonEmpty | Delimiter::ParensWhenNonEmpty => Piece::new(span, ""),
                Delimiter::Keyword => Piece::new(range(prev_end(start), end), ""),
                Delimiter::None => match kind {
                    NodeKind::ModifierList => Piece::new(range(start, next_start(end)), ""),
                    NodeKind::ExpressionList | NodeKind::CatchList => Piece::new(range(prev_end(start), end), ""),
                    _ => Piece::new(span, ""),
                },
            };
            return Ok(Some(piece));
        }

        let merged = diff_items(&old_items, &new_items, |old, new| self.is_edited_copy(old, new));
        let first_old = self.span(old_items[0]);
        let last_old = self.span(old_items[old_items.len() - 1]);
        let mut text = self.copy(start, offset(first_old.start()));
        let mut prev: Option<(NodeId, Option<usize>)> = None;
        for entry in &merged {
            let (node, old_pos) = (entry.node(), entry.old());
            if let Some((prev_node, prev_pos)) = prev {
                match (prev_pos, old_pos) {
                    (Some(before), Some(after)) if before + 1 == after => {
                        let glue_start = offset(self.span(old_items[before]).end());
                        let glue_end = offset(self.span(old_items[after]).start());
                        text.push_str(&self.copy(glue_start, glue_end));
                    }
                    _ => text.push_str(&self.inline_separator(spec, kind, prev_node, declaration, indent)),
                }
            }
            let rendered = match *entry {
                Entry::Kept { .. } => self.render_node(node, Placement::Inline)?.text,
                Entry::Edited { from, .. } => self.render_pair(from, node, Placement::Inline)?.text,
                Entry::Added(_) => self.print(node, Placement::Inline, width)?,
            };
            text.push_str(&rendered);
            prev = Some((node, old_pos));
        }
        text.push_str(&self.copy(offset(last_old.end()), end));
        Ok(Some(Piece::new(span, text)))
    }

    fn inline_separator(&self, spec: ListSpec, kind: NodeKind, prev: NodeId, declaration: bool, indent: &str) -> String {
        if kind == NodeKind::ModifierList && declaration && self.tree.kind(prev) == NodeKind::Annotation {
            format!("\n{indent}")
        } else {
            spec.separator.text().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use jrewrite_comments::{CommentIndex, CommentLedger};
    use jrewrite_syntax::{parse, NodeData, SyntaxTree};
    use pretty_assertions::assert_eq;

    use crate::config::RewriteConfig;
    use crate::set::RewriteSet;

    use super::super::render;
    use super::*;

    fn find(tree: &SyntaxTree, kind: NodeKind) -> Vec<NodeId> {
        tree.preorder(tree.root())
            .into_iter()
            .filter(|node| tree.kind(*node) == kind)
            .collect()
    }

    fn rendered(tree: &SyntaxTree, set: &RewriteSet) -> String {
        let index = CommentIndex::build(tree);
        let parents = tree.parent_map(tree.root());
        render(tree, &index, &CommentLedger::new(), set, &RewriteConfig::default(), &parents).unwrap()
    }

    /// Replace `list` with a copy holding `items`.
    fn with_items(tree: &mut SyntaxTree, list: NodeId, items: Vec<NodeId>) -> NodeId {
        let kind = tree.kind(list);
        let text = tree.node(list).text.clone();
        tree.alloc(NodeData::synthetic(kind, text, items.into_iter().map(Some).collect()))
    }

    #[test]
    fn diff_marks_kept_and_added_items() {
        let tree = parse("class A { int a; int b; int c; }").unwrap();
        let fields = find(&tree, NodeKind::Variable);
        let merged = diff_items(&fields, &[fields[0], fields[2], fields[1]], |_, _| false);
        assert_eq!(merged.len(), 3);
        assert!(matches!(merged[0], Entry::Kept { old: 0, .. }));
        assert_eq!(merged.iter().filter(|entry| matches!(entry, Entry::Added(_))).count(), 1);
    }

    #[test]
    fn edited_copy_of_an_item_is_walked_in_place() {
        let source = "class A {\n    int a; // a\n    int  b = 1; // b\n}\n";
        let mut tree = parse(source).unwrap();
        let body = find(&tree, NodeKind::MemberList)[0];
        let fields = find(&tree, NodeKind::Variable);
        let renamed = {
            let name = tree.alloc(NodeData::synthetic(NodeKind::Name, Some("c".into()), Vec::new()));
            let mut children = tree.children(fields[1]).to_vec();
            children[NodeKind::Variable.slot_index("name").unwrap()] = Some(name);
            let text = tree.node(fields[1]).text.clone();
            tree.alloc(NodeData::synthetic(NodeKind::Variable, text, children))
        };
        let new_body = with_items(&mut tree, body, vec![fields[0], renamed]);
        let mut set = RewriteSet::new();
        set.replace(body, new_body);
        assert_eq!(rendered(&tree, &set), "class A {\n    int a; // a\n    int  c = 1; // b\n}\n");
    }

    #[test]
    fn same_items_in_a_copied_list_keep_one_line_layout() {
        let source = "class A {\n    void m() { foo( x ,y ) ; }\n}\n";
        let mut tree = parse(source).unwrap();
        let block = find(&tree, NodeKind::Block)[0];
        let items = tree.items(block);
        let same = with_items(&mut tree, block, items);
        let mut set = RewriteSet::new();
        set.replace(block, same);
        assert_eq!(rendered(&tree, &set), source);
    }

    #[test]
    fn removing_a_member_takes_its_comment_and_gap() {
        let source = "class A {\n\n    int a;\n\n    // about b\n    int b; // b\n\n    int c;\n}\n";
        let mut tree = parse(source).unwrap();
        let body = find(&tree, NodeKind::MemberList)[0];
        let fields = find(&tree, NodeKind::Variable);
        let new_body = with_items(&mut tree, body, vec![fields[0], fields[2]]);
        let mut set = RewriteSet::new();
        set.replace(body, new_body);
        assert_eq!(rendered(&tree, &set), "class A {\n\n    int a;\n\n    int c;\n}\n");
    }

    #[test]
    fn swapping_statements_moves_their_comments() {
        let source = "class A {\n    void m() {\n        // first\n        a();\n        b(); // second\n    }\n}\n";
        let mut tree = parse(source).unwrap();
        let block = find(&tree, NodeKind::Block)[0];
        let statements = tree.items(block);
        let new_block = with_items(&mut tree, block, vec![statements[1], statements[0]]);
        let mut set = RewriteSet::new();
        set.replace(block, new_block);
        let text = rendered(&tree, &set);
        assert_eq!(text.matches("// first").count(), 1, "{text}");
        assert_eq!(text.matches("// second").count(), 1, "{text}");
        assert!(text.find("b();").unwrap() < text.find("a();").unwrap(), "{text}");
    }

    #[test]
    fn emptied_class_body_closes_on_the_next_line() {
        let source = "public class Test {\n\n    int a;\n\n    void m() {\n    }\n}\n";
        let mut tree = parse(source).unwrap();
        let body = find(&tree, NodeKind::MemberList)[0];
        let new_body = with_items(&mut tree, body, Vec::new());
        let mut set = RewriteSet::new();
        set.replace(body, new_body);
        assert_eq!(rendered(&tree, &set), "public class Test {\n}\n");
    }

    #[test]
    fn removing_the_only_import_drops_the_blank_line() {
        let source = "package a;\n\nimport java.util.List;\n\nclass A {\n}\n";
        let tree = parse(source).unwrap();
        let import = find(&tree, NodeKind::ImportDecl)[0];
        let mut set = RewriteSet::new();
        set.delete(import);
        assert_eq!(rendered(&tree, &set), "package a;\n\nclass A {\n}\n");
    }

    #[test]
    fn parameters_keep_original_separators() {
        let source = "class A {\n    void m(int a,   int b) {\n    }\n}\n";
        let tree = parse(source).unwrap();
        let method = find(&tree, NodeKind::MethodDecl)[0];
        let params = tree.child_named(method, "parameters").unwrap();
        let first = tree.items(params)[0];
        let mut set = RewriteSet::new();
        set.delete(first);
        assert_eq!(rendered(&tree, &set), "class A {\n    void m(int b) {\n    }\n}\n");
    }

    #[test]
    fn emptied_throws_clause_drops_its_keyword() {
        let source = "class A {\n    void m() throws E {\n    }\n}\n";
        let tree = parse(source).unwrap();
        let method = find(&tree, NodeKind::MethodDecl)[0];
        let throws = tree.child_named(method, "throws").unwrap();
        let only = tree.items(throws)[0];
        let mut set = RewriteSet::new();
        set.delete(only);
        assert_eq!(rendered(&tree, &set), "class A {\n    void m() {\n    }\n}\n");
    }
}
