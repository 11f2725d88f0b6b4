//! Position-based association of comments with tree nodes.

use std::collections::HashMap;

use jrewrite_core::{is_blank_before, line_indent, TextRange, TextSize};
use jrewrite_syntax::{NodeId, SyntaxTree, TokenKind};

use crate::doc::{DocCommentTree, DocStyle};
use crate::doc_parser::parse_doc_comment;
use crate::record::{CommentBody, CommentId, CommentRecord, CommentStyle, RelativePosition};

/// Every comment of one original file, keyed by the node it belongs to.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    records: Vec<CommentRecord>,
    anchors: Vec<NodeId>,
    leading: HashMap<NodeId, Vec<CommentId>>,
    trailing: HashMap<NodeId, Vec<CommentId>>,
    dangling: HashMap<NodeId, Vec<CommentId>>,
    docs: HashMap<NodeId, (CommentId, DocCommentTree)>,
}

#[derive(Debug, Clone, Copy)]
struct RawComment {
    style: CommentStyle,
    range: TextRange,
}

impl CommentIndex {
    pub fn build(tree: &SyntaxTree) -> Self {
        let raw = collect_comments(tree);
        let mut builder = Builder {
            tree,
            raw: &raw,
            index: CommentIndex::default(),
        };
        if let Some(span) = tree.span(tree.root()) {
            builder.visit(tree.root(), span);
        }
        let mut index = builder.index;
        index.attach_docs(tree);

        tracing::debug!(
            target = "jrewrite.comments",
            comments = index.records.len(),
            docs = index.docs.len(),
            "built comment index"
        );
        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn record(&self, id: CommentId) -> &CommentRecord {
        &self.records[id.index()]
    }

    /// The node `id` is associated with.
    pub fn anchor(&self, id: CommentId) -> NodeId {
        self.anchors[id.index()]
    }

    /// Comments before `node` (`leading`) or after it on its last line.
    pub fn comments(&self, node: NodeId, leading: bool) -> Vec<&CommentRecord> {
        let ids = if leading {
            self.leading_ids(node)
        } else {
            self.trailing_ids(node)
        };
        ids.iter().map(|id| self.record(*id)).collect()
    }

    pub fn leading_ids(&self, node: NodeId) -> &[CommentId] {
        self.leading.get(&node).map_or(&[][..], Vec::as_slice)
    }

    pub fn trailing_ids(&self, node: NodeId) -> &[CommentId] {
        self.trailing.get(&node).map_or(&[][..], Vec::as_slice)
    }

    /// Comments inside `node` after its last child.
    pub fn dangling_ids(&self, node: NodeId) -> &[CommentId] {
        self.dangling.get(&node).map_or(&[][..], Vec::as_slice)
    }

    pub fn doc_comment(&self, node: NodeId) -> Option<&DocCommentTree> {
        self.docs.get(&node).map(|(_, doc)| doc)
    }

    /// The record the doc comment of `node` was parsed from.
    pub fn doc_record(&self, node: NodeId) -> Option<CommentId> {
        self.docs.get(&node).map(|(id, _)| *id)
    }

    fn push(&mut self, tree: &SyntaxTree, raw: RawComment, position: RelativePosition, anchor: NodeId) {
        let id = CommentId(self.records.len() as u32);
        let start = u32::from(raw.range.start()) as usize;
        self.records.push(CommentRecord {
            id: Some(id),
            style: raw.style,
            body: CommentBody::Raw {
                text: tree.source()[raw.range].to_string(),
                column: line_indent(tree.source(), start).len(),
            },
            position,
            span: Some(raw.range),
        });
        self.anchors.push(anchor);

        // Inline comments after the anchor's start sit inside it, past its last child.
        let dangling = position == RelativePosition::Inline
            && tree.span(anchor).is_some_and(|span| span.start() < raw.range.start());
        let map = match position {
            RelativePosition::Trailing => &mut self.trailing,
            _ if dangling => &mut self.dangling,
            _ => &mut self.leading,
        };
        map.entry(anchor).or_default().push(id);
    }

    /// The first doc comment preceding a declaration becomes its doc tree.
    fn attach_docs(&mut self, tree: &SyntaxTree) {
        let mut docs = HashMap::new();
        for (node, ids) in &self.leading {
            if !tree.kind(*node).is_documentable() {
                continue;
            }
            let Some(id) = ids.iter().copied().find(|id| {
                let record = &self.records[id.index()];
                record.style.is_doc() && record.position == RelativePosition::Preceding
            }) else {
                continue;
            };
            let record = &self.records[id.index()];
            let style = match record.style {
                CommentStyle::Markdown => DocStyle::Markdown,
                _ => DocStyle::Javadoc,
            };
            docs.insert(*node, (id, parse_doc_comment(&record.text(), style)));
        }
        self.docs = docs;
    }
}

struct Builder<'a> {
    tree: &'a SyntaxTree,
    raw: &'a [RawComment],
    index: CommentIndex,
}

impl Builder<'_> {
    fn visit(&mut self, node: NodeId, span: TextRange) {
        let tree = self.tree;
        let mut children: Vec<(NodeId, TextRange)> = tree
            .children(node)
            .iter()
            .flatten()
            .filter_map(|child| tree.span(*child).map(|span| (*child, span)))
            .filter(|(_, span)| !span.is_empty())
            .collect();
        children.sort_by_key(|(_, span)| span.start());

        let mut cursor = span.start();
        let mut prev: Option<(NodeId, TextRange)> = None;
        for (child, child_span) in children {
            for raw in self.between(cursor, child_span.start()) {
                self.classify(raw, prev, Some(child), node);
            }
            self.visit(child, child_span);
            cursor = child_span.end();
            prev = Some((child, child_span));
        }
        for raw in self.between(cursor, span.end()) {
            self.classify(raw, prev, None, node);
        }
    }

    fn between(&self, start: TextSize, end: TextSize) -> Vec<RawComment> {
        let from = self.raw.partition_point(|c| c.range.start() < start);
        self.raw[from..]
            .iter()
            .take_while(|c| c.range.end() <= end)
            .copied()
            .collect()
    }

    fn classify(
        &mut self,
        raw: RawComment,
        prev: Option<(NodeId, TextRange)>,
        next: Option<NodeId>,
        parent: NodeId,
    ) {
        let tree = self.tree;
        let lines = tree.line_index();
        if let Some((prev, prev_span)) = prev {
            if lines.same_line(prev_span.end(), raw.range.start()) {
                let anchor = last_item(tree, prev);
                self.index.push(tree, raw, RelativePosition::Trailing, anchor);
                return;
            }
        }
        let own_line = is_blank_before(tree.source(), u32::from(raw.range.start()) as usize);
        match next {
            Some(next) => {
                let position = if own_line {
                    RelativePosition::Preceding
                } else {
                    RelativePosition::Inline
                };
                self.index.push(tree, raw, position, first_item(tree, next));
            }
            None => self.index.push(tree, raw, RelativePosition::Inline, parent),
        }
    }
}

/// Descend through bare lists that start where their first item starts.
fn first_item(tree: &SyntaxTree, mut node: NodeId) -> NodeId {
    while tree.kind(node).is_list() {
        let Some(first) = tree.children(node).iter().flatten().next().copied() else {
            break;
        };
        if tree.span(first).map(|s| s.start()) != tree.span(node).map(|s| s.start()) {
            break;
        }
        node = first;
    }
    node
}

fn last_item(tree: &SyntaxTree, mut node: NodeId) -> NodeId {
    while tree.kind(node).is_list() {
        let Some(last) = tree.children(node).iter().flatten().last().copied() else {
            break;
        };
        if tree.span(last).map(|s| s.end()) != tree.span(node).map(|s| s.end()) {
            break;
        }
        node = last;
    }
    node
}

/// Comment tokens in source order, with runs of own-line `///` comments merged.
fn collect_comments(tree: &SyntaxTree) -> Vec<RawComment> {
    let source = tree.source();
    let mut out: Vec<RawComment> = Vec::new();
    for token in tree.tokens().iter().filter(|t| t.kind.is_comment()) {
        let text = token.text(source);
        let own_line = is_blank_before(source, u32::from(token.range.start()) as usize);
        let style = match token.kind {
            TokenKind::DocComment => CommentStyle::Javadoc,
            TokenKind::LineComment if text.starts_with("///") && own_line => CommentStyle::Markdown,
            TokenKind::LineComment => CommentStyle::Line,
            _ => CommentStyle::Block,
        };

        if style == CommentStyle::Markdown {
            if let Some(last) = out.last_mut() {
                let gap = &source[TextRange::new(last.range.end(), token.range.start())];
                if last.style == CommentStyle::Markdown
                    && gap.trim().is_empty()
                    && gap.matches('\n').count() == 1
                {
                    last.range = last.range.cover(token.range);
                    continue;
                }
            }
        }
        out.push(RawComment {
            style,
            range: token.range,
        });
    }
    out
}
