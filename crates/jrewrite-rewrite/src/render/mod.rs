//! Re-rendering of an edited tree against its original text.
//!
//! Rendering walks the original tree. A subtree with no rewrite, attachment or doc change below
//! it is copied from the source. Elsewhere each original node is paired with the node that takes
//! its place: nodes of the same kind are walked child by child so the text between children
//! survives, lists are diffed by node identity, and anything else is printed fresh with original
//! subtrees spliced back in through [`PrintHooks`](jrewrite_format::PrintHooks).
//!
//! Output is produced twice. The first pass only records which original comments were written
//! where they stood, so the second pass can carry the others along with moved nodes without
//! writing any comment twice.

mod braces;
mod docs;
mod hooks;
mod lists;

use std::collections::{HashMap, HashSet};

use jrewrite_comments::{CommentId, CommentIndex, CommentLedger, CommentRecord};
use jrewrite_core::{
    ends_line, indent_width, infer_indent_unit, is_blank_before, line_end, line_indent, line_start, next_line_start, IndentUnit,
    TextRange, TextSize,
};
use jrewrite_format::{print_node, FormatConfig, Placement};
use jrewrite_syntax::{NodeId, NodeKind, Shape, SlotSpec, SyntaxTree, TokenKind};

use crate::config::RewriteConfig;
use crate::set::{RewriteSet, RewriteTarget};
use crate::RewriteError;

use hooks::RenderHooks;

/// Rendered text for a range of the original source.
///
/// The range is usually the span of the node that produced it, but may reach past it when the
/// rendering also consumed neighbouring text (a removed separator, a closing brace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    pub(crate) range: TextRange,
    pub(crate) text: String,
}

impl Piece {
    fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    fn start(&self) -> usize {
        offset(self.range.start())
    }

    fn end(&self) -> usize {
        offset(self.range.end())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolved {
    Keep,
    Replace(NodeId),
    Delete,
}

#[derive(Debug, Default)]
struct PassState {
    /// Original comments written at their source position.
    emitted: HashSet<CommentId>,
    /// Original comments written next to a node printed somewhere else.
    carried: HashSet<CommentId>,
}

pub(crate) fn offset(size: TextSize) -> usize {
    u32::from(size) as usize
}

pub(crate) fn size(offset: usize) -> TextSize {
    TextSize::from(offset as u32)
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(size(start), size(end.max(start)))
}

/// Render `tree` with `rewrites` applied, returning the complete new text.
pub(crate) fn render(
    tree: &SyntaxTree,
    index: &CommentIndex,
    ledger: &CommentLedger,
    rewrites: &RewriteSet,
    config: &RewriteConfig,
    parents: &HashMap<NodeId, NodeId>,
) -> Result<String, RewriteError> {
    let mut renderer = Renderer::new(tree, index, ledger, rewrites, config, parents);
    tracing::debug!(
        target = "jrewrite.render",
        rewrites = rewrites.len(),
        dirty = renderer.dirty.len(),
        doc_patches = renderer.doc_patches.len(),
        "rendering"
    );

    let first = renderer.render_root()?;
    if renderer.pass.carried.is_empty() {
        return Ok(first);
    }
    renderer.first_pass = Some(std::mem::take(&mut renderer.pass));
    renderer.render_root()
}

pub(crate) struct Renderer<'r> {
    tree: &'r SyntaxTree,
    source: &'r str,
    index: &'r CommentIndex,
    ledger: &'r CommentLedger,
    rewrites: &'r RewriteSet,
    config: &'r RewriteConfig,
    /// The configured format, indented the way the source already is.
    format: FormatConfig,
    parents: &'r HashMap<NodeId, NodeId>,
    /// Original nodes with a rewrite, a doc change or an attachment at or below them.
    dirty: HashSet<NodeId>,
    /// Original comment spans in source order.
    comments: Vec<(TextRange, CommentId)>,
    /// New text for original doc comments whose declaration got a new doc.
    doc_patches: HashMap<CommentId, String>,
    /// Doc comments for original declarations that had none.
    doc_inserts: HashMap<NodeId, String>,
    /// Keys whose replacement is being rendered; inside it they stand for themselves.
    active: HashSet<NodeId>,
    pass: PassState,
    first_pass: Option<PassState>,
}

impl<'r> Renderer<'r> {
    fn new(
        tree: &'r SyntaxTree,
        index: &'r CommentIndex,
        ledger: &'r CommentLedger,
        rewrites: &'r RewriteSet,
        config: &'r RewriteConfig,
        parents: &'r HashMap<NodeId, NodeId>,
    ) -> Self {
        let mut comments: Vec<(TextRange, CommentId)> = index
            .records()
            .iter()
            .filter_map(|record| Some((record.span?, record.id?)))
            .collect();
        comments.sort_by_key(|(span, _)| span.start());
        let format = match infer_indent_unit(tree.source(), config.format.indent_width) {
            Some(unit) => config.format.with_indent_unit(unit),
            None => config.format.clone(),
        };

        let mut renderer = Self {
            tree,
            source: tree.source(),
            index,
            ledger,
            rewrites,
            config,
            format,
            parents,
            dirty: HashSet::new(),
            comments,
            doc_patches: HashMap::new(),
            doc_inserts: HashMap::new(),
            active: HashSet::new(),
            pass: PassState::default(),
            first_pass: None,
        };

        let mut seeds: Vec<NodeId> = rewrites.entries().map(|(key, _)| key).collect();
        seeds.extend(ledger.attached_nodes().filter(|node| tree.is_original(*node)));
        for seed in seeds {
            renderer.mark_dirty(seed);
        }
        renderer.plan_docs();
        renderer
    }

    fn mark_dirty(&mut self, mut node: NodeId) {
        if !self.tree.contains(node) || !self.tree.is_original(node) {
            return;
        }
        while self.dirty.insert(node) {
            match self.parents.get(&node) {
                Some(parent) => node = *parent,
                None => break,
            }
        }
    }

    fn is_dirty(&self, node: NodeId) -> bool {
        self.dirty.contains(&node)
    }

    fn span(&self, node: NodeId) -> TextRange {
        self.tree
            .span(node)
            .unwrap_or_else(|| TextRange::empty(TextSize::from(0)))
    }

    fn unit(&self) -> IndentUnit {
        self.format.indent_unit()
    }

    fn indent_at(&self, at: usize) -> &'r str {
        line_indent(self.source, at)
    }

    fn width_of(&self, ws: &str) -> usize {
        indent_width(ws, self.format.indent_width.max(1))
    }

    fn width_at(&self, at: usize) -> usize {
        self.width_of(self.indent_at(at))
    }

    fn resolve(&self, node: NodeId) -> Resolved {
        if self.active.contains(&node) {
            return Resolved::Keep;
        }
        match self.rewrites.get(node).map(RewriteTarget::replacement) {
            None => Resolved::Keep,
            Some(None) => Resolved::Delete,
            Some(Some(replacement)) if replacement == node => Resolved::Keep,
            Some(Some(replacement)) => Resolved::Replace(replacement),
        }
    }

    /// An original node recorded as deleted and not currently being replaced.
    fn is_deleted(&self, node: NodeId) -> bool {
        self.tree.is_original(node) && self.resolve(node) == Resolved::Delete
    }

    fn render_root(&mut self) -> Result<String, RewriteError> {
        let root = self.tree.root();
        let len = self.source.len();
        let piece = self.render_node(root, Placement::LineItem)?;
        let mut out = self.copy(0, piece.start());
        out.push_str(&piece.text);
        out.push_str(&self.copy(piece.end().max(piece.start()), len));
        Ok(out)
    }

    // --- copying ---

    /// Source text of `[start, end)` with excised comments removed and doc patches applied.
    fn copy(&mut self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let source = self.source;
        let mut cuts: Vec<(usize, usize, Option<String>)> = Vec::new();
        let first = self.comments.partition_point(|(span, _)| offset(span.start()) < start);
        for (span, id) in &self.comments[first..] {
            let (comment_start, comment_end) = (offset(span.start()), offset(span.end()));
            if comment_start >= end {
                break;
            }
            if comment_end > end {
                continue;
            }
            if self.ledger.is_excised(*id) {
                let (cut_start, cut_end) = excision(source, comment_start, comment_end);
                cuts.push((cut_start.max(start), cut_end.min(end), None));
            } else if let Some(text) = self.doc_patches.get(id) {
                cuts.push((comment_start, comment_end, Some(text.clone())));
                self.pass.emitted.insert(*id);
            } else {
                self.pass.emitted.insert(*id);
            }
        }

        let mut out = String::with_capacity(end - start);
        let mut pos = start;
        for (cut_start, cut_end, replacement) in cuts {
            if cut_start < pos {
                pos = pos.max(cut_end);
                continue;
            }
            out.push_str(&source[pos..cut_start]);
            if let Some(text) = replacement {
                out.push_str(&text);
            }
            pos = cut_end;
        }
        if pos < end {
            out.push_str(&source[pos..end]);
        }
        out
    }

    /// Whether nothing but whitespace and excised comments follows `at` on its line.
    fn line_ends_at(&self, at: usize) -> bool {
        let source = self.source;
        let stop = line_end(source, at);
        let first = self.comments.partition_point(|(span, _)| offset(span.start()) < at);
        let mut excised = self.comments[first..]
            .iter()
            .filter(|(_, id)| self.ledger.is_excised(*id))
            .map(|(span, _)| (offset(span.start()), offset(span.end())));
        let mut pos = at;
        loop {
            let rest = &source[pos..stop.max(pos)];
            pos += rest.len() - rest.trim_start().len();
            if pos >= stop {
                return true;
            }
            match excised.find(|(start, _)| *start >= pos) {
                Some((start, end)) if start == pos => pos = end,
                _ => return false,
            }
        }
    }

    /// Append `piece` to `out`, copying the source between `cursor` and the piece first.
    fn emit(&mut self, out: &mut String, cursor: &mut usize, piece: Piece) {
        let start = piece.start();
        if start > *cursor {
            let glue = self.copy(*cursor, start);
            out.push_str(&glue);
        }
        out.push_str(&piece.text);
        *cursor = (*cursor).max(piece.end());
    }

    // --- nodes ---

    /// Render the original node `node` in its own place, comments and doc included.
    fn render_node(&mut self, node: NodeId, placement: Placement) -> Result<Piece, RewriteError> {
        let resolved = self.resolve(node);
        let mut piece = self.render_bare(node, placement)?;
        if resolved != Resolved::Delete {
            self.decorate(node, node, &mut piece);
        }
        Ok(piece)
    }

    /// Render `node` without the attachments and doc insertions that sit around it.
    fn render_bare(&mut self, node: NodeId, placement: Placement) -> Result<Piece, RewriteError> {
        let span = self.span(node);
        match self.resolve(node) {
            Resolved::Delete => Ok(Piece::new(span, String::new())),
            Resolved::Keep if !self.is_dirty(node) => Ok(Piece::new(span, self.copy(offset(span.start()), offset(span.end())))),
            Resolved::Keep => self.render_pair(node, node, placement),
            Resolved::Replace(replacement) => {
                tracing::trace!(
                    target = "jrewrite.render",
                    node = ?node,
                    replacement = ?replacement,
                    "rendering replacement"
                );
                self.active.insert(node);
                let result = self.render_pair(node, replacement, placement);
                self.active.remove(&node);
                result
            }
        }
    }

    /// Render `new` in the place of the original node `old`.
    fn render_pair(&mut self, old: NodeId, new: NodeId, placement: Placement) -> Result<Piece, RewriteError> {
        let span = self.span(old);
        if new != old && self.tree.is_original(new) {
            return self.fresh(old, new, placement);
        }
        let kind = self.tree.kind(old);
        if kind != self.tree.kind(new) {
            return self.fresh(old, new, placement);
        }
        if new != old && self.tree.text(old) != self.tree.text(new) {
            if kind.is_leaf() {
                let text = self.tree.text(new).unwrap_or_default().to_string();
                let mut piece = Piece::new(span, text);
                self.decorate(old, new, &mut piece);
                return Ok(piece);
            }
            return self.fresh(old, new, placement);
        }

        let walked = match kind.shape() {
            Shape::Leaf => Some(Piece::new(span, self.copy(offset(span.start()), offset(span.end())))),
            Shape::Fixed(slots) => self.walk_fixed(old, new, slots)?,
            Shape::List(spec) if spec.is_line_list() => self.line_list(old, new, spec)?,
            Shape::List(spec) => self.inline_list(old, new, spec)?,
        };
        match walked {
            Some(mut piece) => {
                if new != old {
                    self.decorate(old, new, &mut piece);
                }
                Ok(piece)
            }
            None => self.fresh(old, new, placement),
        }
    }

    /// Print `new` fresh over the span of `old`.
    fn fresh(&mut self, old: NodeId, new: NodeId, placement: Placement) -> Result<Piece, RewriteError> {
        let span = self.span(old);
        tracing::trace!(
            target = "jrewrite.render",
            node = ?old,
            kind = ?self.tree.kind(new),
            "falling back to fresh print"
        );
        let text = self.print(new, placement, self.width_at(offset(span.start())))?;
        Ok(Piece::new(span, text))
    }

    /// Print `node` for a line indented by `indent` columns, reusing original subtrees.
    fn print(&mut self, node: NodeId, placement: Placement, indent: usize) -> Result<String, RewriteError> {
        let tree = self.tree;
        let format = self.format.clone();
        let mut hooks = RenderHooks::new(self);
        print_node(tree, node, placement, &format, &mut hooks, indent)
    }

    /// Add the comments attached to `source_of` and its new doc around `piece`, which stands
    /// where `at` stood.
    fn decorate(&mut self, at: NodeId, source_of: NodeId, piece: &mut Piece) {
        let start = piece.start();
        let end = piece.end();
        let indent = self.indent_at(start);
        let own_line = is_blank_before(self.source, start);

        let mut leading: Vec<String> = self
            .ledger
            .attached(source_of, true)
            .iter()
            .map(|record| record.render(indent))
            .collect();
        if let Some(doc) = self.doc_inserts.get(&source_of) {
            leading.push(doc.clone());
        } else if !self.tree.is_original(source_of) {
            if let Some(doc) = self.rewrites.fresh_doc(source_of) {
                leading.push(jrewrite_comments::print_doc_comment(&doc.new, indent));
            }
        }

        let trailing = self.ledger.attached(source_of, false);
        if leading.is_empty() && trailing.is_empty() {
            return;
        }

        let mut text = String::new();
        for comment in leading {
            text.push_str(&comment);
            if own_line {
                text.push('\n');
                text.push_str(indent);
            } else {
                text.push(' ');
            }
        }
        text.push_str(&piece.text);
        for record in trailing {
            text.push(' ');
            text.push_str(&record.render(indent));
            if record.style.ends_line() && !self.line_ends_at(end) {
                text.push('\n');
                text.push_str(indent);
            }
        }
        tracing::trace!(target = "jrewrite.render", node = ?at, "attached comments written");
        piece.text = text;
    }

    // --- fixed shapes ---

    /// Walk two nodes of the same fixed shape slot by slot.
    ///
    /// Returns `None` when a slot change cannot be expressed as an edit of the original text and
    /// the owner has to be printed fresh.
    fn walk_fixed(&mut self, old: NodeId, new: NodeId, slots: &'static [SlotSpec]) -> Result<Option<Piece>, RewriteError> {
        let span = self.span(old);
        let kind = self.tree.kind(old);
        let old_children = self.tree.children(old).to_vec();
        let new_children = self.tree.children(new).to_vec();
        if old_children.len() != new_children.len() || old_children.len() != slots.len() {
            return Ok(None);
        }

        let mut out = String::new();
        let mut cursor = offset(span.start());
        for (slot_index, slot) in slots.iter().enumerate() {
            let before = old_children[slot_index];
            let after = new_children[slot_index].filter(|child| !self.is_deleted(*child));
            let placement = slot_placement(kind, slot.name);
            let piece = match (before, after) {
                (None, None) => continue,
                (Some(before), Some(after)) => {
                    match self.brace_wrap(old, kind, slot.name, before, after)? {
                        Some(piece) => piece,
                        None if before == after => self.render_slot_child(old, kind, slot.name, before, placement)?,
                        None => self.render_pair(before, after, placement)?,
                    }
                }
                (Some(before), None) => match self.slot_removal(kind, slot, before) {
                    Some(piece) => piece,
                    None => return Ok(None),
                },
                (None, Some(after)) => {
                    let anchor = self.insertion_anchor(old, &old_children[..slot_index]);
                    match self.slot_insertion(old, kind, slot, after, anchor)? {
                        Some(piece) => piece,
                        None => return Ok(None),
                    }
                }
            };
            self.emit(&mut out, &mut cursor, piece);
        }
        let end = offset(span.end());
        if cursor < end {
            let tail = self.copy(cursor, end);
            out.push_str(&tail);
        }
        Ok(Some(Piece::new(range(offset(span.start()), cursor.max(end)), out)))
    }

    /// A slot child left in place. A child that is itself replaced by a block holding it is
    /// wrapped in braces like a rewritten owner would be.
    fn render_slot_child(
        &mut self,
        owner: NodeId,
        kind: NodeKind,
        slot: &str,
        child: NodeId,
        placement: Placement,
    ) -> Result<Piece, RewriteError> {
        if let Resolved::Replace(replacement) = self.resolve(child) {
            self.active.insert(child);
            let wrapped = self.brace_wrap(owner, kind, slot, child, replacement);
            self.active.remove(&child);
            if let Some(piece) = wrapped? {
                return Ok(piece);
            }
        }
        self.render_node(child, placement)
    }

    /// Text to drop when the optional child `child` goes away.
    fn slot_removal(&self, kind: NodeKind, slot: &SlotSpec, child: NodeId) -> Option<Piece> {
        let span = self.span(child);
        match (kind, slot.name) {
            (NodeKind::CompilationUnit, "package") => {
                let end = self
                    .tree
                    .next_token(span.end())
                    .filter(|token| token.kind != TokenKind::Eof)
                    .map_or(self.source.len(), |token| offset(token.range.start()));
                Some(Piece::new(range(offset(span.start()), end), ""))
            }
            (NodeKind::MethodDecl, "body") => {
                let start = self.tree.prev_token_end(span.start()).unwrap_or(span.start());
                Some(Piece::new(TextRange::new(start, span.end()), ";"))
            }
            _ if slot.prefix.is_empty() => None,
            _ if slot.prefix.trim().is_empty() => {
                let start = self.tree.prev_token_end(span.start()).unwrap_or(span.start());
                Some(Piece::new(TextRange::new(start, span.end()), ""))
            }
            _ => {
                // Drop the keyword or symbol introducing the child along with it.
                let keyword_end = self.tree.prev_token_end(span.start())?;
                let keyword = self.token_ending_at(keyword_end)?;
                let start = self
                    .tree
                    .prev_token_end(keyword.range.start())
                    .unwrap_or(keyword.range.start());
                Some(Piece::new(TextRange::new(start, span.end()), ""))
            }
        }
    }

    /// Where an optional child inserted after `earlier` slots goes.
    fn insertion_anchor(&self, owner: NodeId, earlier: &[Option<NodeId>]) -> usize {
        earlier
            .iter()
            .rev()
            .flatten()
            .filter_map(|child| self.tree.span(*child))
            .find(|span| !span.is_empty())
            .map(|span| offset(span.end()))
            .unwrap_or_else(|| {
                let start = self.span(owner).start();
                self.tree
                    .next_token(start)
                    .map_or(offset(start), |token| offset(token.range.end()))
            })
    }

    fn slot_insertion(
        &mut self,
        owner: NodeId,
        kind: NodeKind,
        slot: &SlotSpec,
        child: NodeId,
        anchor: usize,
    ) -> Result<Option<Piece>, RewriteError> {
        let width = self.width_at(offset(self.span(owner).start()));
        let placement = slot_placement(kind, slot.name);
        match (kind, slot.name) {
            (NodeKind::CompilationUnit, "package") => {
                let mut text = self.print(child, Placement::Inline, 0)?;
                text.push_str("\n\n");
                Ok(Some(Piece::new(TextRange::empty(TextSize::from(0)), text)))
            }
            (NodeKind::MethodDecl, "body") => {
                // `void m();` becomes `void m() {...}`.
                let span = self.span(owner);
                let Some(semicolon) = self
                    .tree
                    .find_token(span, TokenKind::Semicolon)
                    .filter(|token| token.range.end() == span.end())
                    .copied()
                else {
                    return Ok(None);
                };
                let space = if self.format.space_before_brace { " " } else { "" };
                let body = self.print(child, Placement::Inline, width)?;
                Ok(Some(Piece::new(semicolon.range, format!("{space}{body}"))))
            }
            _ if slot.prefix.is_empty() => Ok(None),
            _ => {
                let body = self.print(child, placement, width)?;
                Ok(Some(Piece::new(
                    TextRange::empty(size(anchor)),
                    format!("{}{body}", slot.prefix),
                )))
            }
        }
    }

    /// The non-trivia token ending exactly at `end`.
    fn token_ending_at(&self, end: TextSize) -> Option<&'r jrewrite_syntax::Token> {
        let tokens = self.tree.tokens();
        let idx = tokens.partition_point(|token| token.range.end() <= end);
        tokens[..idx]
            .iter()
            .rev()
            .find(|token| !token.kind.is_trivia())
            .filter(|token| token.range.end() == end)
    }

    /// Whether `node` heads a declaration written on its own line, where annotations go on
    /// separate lines.
    fn is_declaration(&self, node: NodeId) -> bool {
        match self.tree.kind(node) {
            NodeKind::ClassDecl | NodeKind::MethodDecl => true,
            NodeKind::Variable => self
                .parents
                .get(&node)
                .is_some_and(|parent| self.tree.kind(*parent).list_spec().is_some_and(|spec| spec.is_line_list())),
            _ => false,
        }
    }

    /// Whether `id` may be written next to a node printed away from its source position.
    fn may_carry(&self, id: CommentId) -> bool {
        !self.ledger.is_excised(id)
            && !self.pass.carried.contains(&id)
            && self
                .first_pass
                .as_ref()
                .map_or(true, |first| !first.emitted.contains(&id))
    }

    /// An original comment as it should be carried: with its patched doc text when it has one.
    fn carried_record(&self, id: CommentId) -> CommentRecord {
        let record = self.index.record(id);
        match self.doc_patches.get(&id) {
            Some(text) => CommentRecord::create(record.style, text.clone()),
            None => record.clone(),
        }
    }
}

/// Placement of the child in slot `slot` of a `kind` node.
fn slot_placement(kind: NodeKind, slot: &str) -> Placement {
    match (kind, slot) {
        (NodeKind::If, "then" | "else")
        | (
            NodeKind::While | NodeKind::DoWhile | NodeKind::For | NodeKind::ForEach | NodeKind::Labeled,
            "body",
        ) => Placement::Body,
        _ => Placement::Inline,
    }
}

/// Text to cut when the comment at `[start, end)` is removed.
fn excision(source: &str, start: usize, end: usize) -> (usize, usize) {
    if is_blank_before(source, start) && ends_line(source, end) {
        return (line_start(source, start), next_line_start(source, end));
    }
    if !is_blank_before(source, start) {
        let spaces = source[..start]
            .bytes()
            .rev()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        return (start - spaces, end);
    }
    let spaces = source[end..]
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    (start, end + spaces)
}

#[cfg(test)]
mod tests {
    use jrewrite_syntax::parse;
    use pretty_assertions::assert_eq;

    use super::*;

    fn find(tree: &SyntaxTree, kind: NodeKind) -> Vec<NodeId> {
        tree.preorder(tree.root())
            .into_iter()
            .filter(|node| tree.kind(*node) == kind)
            .collect()
    }

    fn render_with(tree: &SyntaxTree, ledger: &CommentLedger, set: &RewriteSet) -> String {
        let index = CommentIndex::build(tree);
        let parents = tree.parent_map(tree.root());
        render(tree, &index, ledger, set, &RewriteConfig::default(), &parents).unwrap()
    }

    #[test]
    fn excision_takes_the_whole_line_for_own_line_comments() {
        let source = "a();\n    // gone\nb();\n";
        let start = source.find("//").unwrap();
        let (cut_start, cut_end) = excision(source, start, start + "// gone".len());
        assert_eq!(&source[..cut_start], "a();\n");
        assert_eq!(&source[cut_end..], "b();\n");
    }

    #[test]
    fn excision_takes_the_space_before_a_trailing_comment() {
        let source = "a(); /* x */\n";
        let start = source.find("/*").unwrap();
        let (cut_start, cut_end) = excision(source, start, start + "/* x */".len());
        assert_eq!(format!("{}{}", &source[..cut_start], &source[cut_end..]), "a();\n");
    }

    #[test]
    fn untouched_tree_renders_its_source() {
        let source = "package a;\n\n// c\nclass A {\n    int x;  // trailing\n}\n";
        let tree = parse(source).unwrap();
        assert_eq!(render_with(&tree, &CommentLedger::new(), &RewriteSet::new()), source);
    }

    #[test]
    fn leaf_replacement_keeps_everything_else() {
        let source = "class A {\n    int x = 1; // one\n}\n";
        let mut tree = parse(source).unwrap();
        let literal = find(&tree, NodeKind::Literal)[0];
        let two = tree.alloc(jrewrite_syntax::NodeData::synthetic(NodeKind::Literal, Some("2".into()), Vec::new()));
        let mut set = RewriteSet::new();
        set.replace(literal, two);
        assert_eq!(
            render_with(&tree, &CommentLedger::new(), &set),
            "class A {\n    int x = 2; // one\n}\n"
        );
    }

    #[test]
    fn claimed_comments_are_cut_from_copied_text() {
        let source = "class A {\n    // gone\n    int x;\n}\n";
        let tree = parse(source).unwrap();
        let index = CommentIndex::build(&tree);
        let mut ledger = CommentLedger::new();
        ledger.claim(index.records()[0].id.unwrap());
        assert_eq!(
            render_with(&tree, &ledger, &RewriteSet::new()),
            "class A {\n    int x;\n}\n"
        );
    }

    #[test]
    fn removing_an_optional_child_drops_its_prefix() {
        let source = "class A {\n    int x = 1;\n}\n";
        let tree = parse(source).unwrap();
        let literal = find(&tree, NodeKind::Literal)[0];
        let mut set = RewriteSet::new();
        set.delete(literal);
        assert_eq!(render_with(&tree, &CommentLedger::new(), &set), "class A {\n    int x;\n}\n");
    }

    #[test]
    fn token_ending_at_skips_trivia() {
        let source = "class A { int x /* c */ = 1; }";
        let tree = parse(source).unwrap();
        let index = CommentIndex::build(&tree);
        let ledger = CommentLedger::new();
        let set = RewriteSet::new();
        let config = RewriteConfig::default();
        let parents = tree.parent_map(tree.root());
        let renderer = Renderer::new(&tree, &index, &ledger, &set, &config, &parents);
        let eq = source.find('=').unwrap();
        let token = renderer.token_ending_at(size(eq + 1)).unwrap();
        assert_eq!(token.kind, TokenKind::Eq);
        assert!(renderer.token_ending_at(size(eq)).is_none());
    }
}
