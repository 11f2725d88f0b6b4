//! Arena-backed syntax tree.
//!
//! Nodes are immutable once allocated. Edits allocate new nodes that point at old or new
//! children, so an original subtree can be shared between the parsed tree and any number of
//! edited copies. Identity is the [`NodeId`]; structural equality is never used for lookups.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jrewrite_core::{line_indent, LineIndex, SmolStr, TextRange, TextSize};

use crate::kind::NodeKind;
use crate::token::{Token, TokenKind};

/// Stable identity of a node within one [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Parsed from the tree's source text.
    Source(TextRange),
    /// Built after parsing; has no position.
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub text: Option<SmolStr>,
    pub children: Vec<Option<NodeId>>,
    pub origin: Origin,
}

impl NodeData {
    pub fn synthetic(kind: NodeKind, text: Option<SmolStr>, children: Vec<Option<NodeId>>) -> Self {
        Self {
            kind,
            text,
            children,
            origin: Origin::Synthetic,
        }
    }

    pub fn span(&self) -> Option<TextRange> {
        match self.origin {
            Origin::Source(range) => Some(range),
            Origin::Synthetic => None,
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self.origin, Origin::Source(_))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The present children, in order. For list nodes these are the items.
    pub fn items(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<NodeData>,
}

impl NodeArena {
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A parsed source file: text, tokens and the node arena.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: Arc<str>,
    tokens: Vec<Token>,
    lines: LineIndex,
    arena: NodeArena,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn from_parts(source: Arc<str>, tokens: Vec<Token>, arena: NodeArena, root: NodeId) -> Self {
        let lines = LineIndex::new(&source);
        Self {
            source,
            tokens,
            lines,
            arena,
            root,
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &NodeData {
        self.arena.get(id)
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[Option<NodeId>] {
        &self.node(id).children
    }

    pub fn child(&self, id: NodeId, slot: usize) -> Option<NodeId> {
        self.node(id).children.get(slot).copied().flatten()
    }

    /// The child in the slot called `name` (see [`NodeKind::slots`]).
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let slot = self.kind(id).slot_index(name)?;
        self.child(id, slot)
    }

    /// Items of a list node.
    pub fn items(&self, list: NodeId) -> Vec<NodeId> {
        self.node(list).items().collect()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text()
    }

    pub fn span(&self, id: NodeId) -> Option<TextRange> {
        self.node(id).span()
    }

    pub fn is_original(&self, id: NodeId) -> bool {
        self.node(id).is_original()
    }

    /// Source text of an original node.
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        self.span(id).map(|range| &self.source[range])
    }

    /// Whether `id` or any descendant is an [`NodeKind::Error`] node.
    pub fn is_erroneous(&self, id: NodeId) -> bool {
        self.preorder(id)
            .into_iter()
            .any(|node| self.kind(node) == NodeKind::Error)
    }

    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        self.arena.alloc(data)
    }

    /// All nodes of the subtree rooted at `id`, parents before children.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.node(node).items().collect::<Vec<_>>().into_iter().rev());
        }
        out
    }

    /// Parent links for the subtree rooted at `root`.
    pub fn parent_map(&self, root: NodeId) -> HashMap<NodeId, NodeId> {
        let mut parents = HashMap::new();
        for node in self.preorder(root) {
            for child in self.node(node).items() {
                parents.insert(child, node);
            }
        }
        parents
    }

    /// Deep-copy a subtree of `from` into this arena as synthetic nodes.
    ///
    /// Returns the new root and the `(old, new)` pairs of every copied node in preorder.
    pub fn copy_subtree(&mut self, from: &SyntaxTree, node: NodeId) -> (NodeId, Vec<(NodeId, NodeId)>) {
        let mut mapping = Vec::new();
        let root = self.copy_rec(from, node, &mut mapping);
        (root, mapping)
    }

    fn copy_rec(&mut self, from: &SyntaxTree, node: NodeId, mapping: &mut Vec<(NodeId, NodeId)>) -> NodeId {
        let data = from.node(node);
        let slot = mapping.len();
        mapping.push((node, node));
        let children = data
            .children
            .iter()
            .map(|child| child.map(|child| self.copy_rec(from, child, mapping)))
            .collect();
        let id = self.alloc(NodeData::synthetic(data.kind, data.text.clone(), children));
        mapping[slot] = (node, id);
        id
    }

    // --- token queries ---

    fn first_token_at_or_after(&self, offset: TextSize) -> usize {
        self.tokens.partition_point(|t| t.range.start() < offset)
    }

    /// End of the last non-trivia token ending at or before `offset`.
    pub fn prev_token_end(&self, offset: TextSize) -> Option<TextSize> {
        let idx = self.tokens.partition_point(|t| t.range.end() <= offset);
        self.tokens[..idx]
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.range.end())
    }

    /// The first non-trivia token starting at or after `offset` (possibly `Eof`).
    pub fn next_token(&self, offset: TextSize) -> Option<&Token> {
        let idx = self.first_token_at_or_after(offset);
        self.tokens[idx..].iter().find(|t| !t.kind.is_trivia())
    }

    /// The token starting exactly at `offset`.
    pub fn token_at(&self, offset: TextSize) -> Option<&Token> {
        let idx = self.first_token_at_or_after(offset);
        self.tokens.get(idx).filter(|t| t.range.start() == offset)
    }

    /// The first non-trivia token of kind `kind` inside `range`.
    pub fn find_token(&self, range: TextRange, kind: TokenKind) -> Option<&Token> {
        let idx = self.first_token_at_or_after(range.start());
        self.tokens[idx..]
            .iter()
            .take_while(|t| t.range.end() <= range.end())
            .find(|t| t.kind == kind)
    }

    /// Comment tokens lying entirely within `range`.
    pub fn comments_in(&self, range: TextRange) -> impl Iterator<Item = &Token> + '_ {
        let idx = self.first_token_at_or_after(range.start());
        self.tokens[idx..]
            .iter()
            .take_while(move |t| t.range.end() <= range.end())
            .filter(|t| t.kind.is_comment())
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn line_indent(&self, offset: TextSize) -> &str {
        line_indent(&self.source, u32::from(offset) as usize)
    }
}

/// Render the structure of a subtree, one node per line.
pub fn debug_dump(tree: &SyntaxTree, node: NodeId) -> String {
    DebugDump { tree, node }.to_string()
}

/// [`fmt::Display`] adapter behind [`debug_dump`].
pub struct DebugDump<'a> {
    pub tree: &'a SyntaxTree,
    pub node: NodeId,
}

impl DebugDump<'_> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: NodeId, indent: usize) -> fmt::Result {
        let data = self.tree.node(node);
        write!(f, "{:indent$}{:?}", "", data.kind, indent = indent)?;
        if let Some(text) = data.text() {
            write!(f, " {text:?}")?;
        }
        writeln!(f)?;
        for child in &data.children {
            match child {
                Some(child) => self.write_node(f, *child, indent + 2)?,
                None => writeln!(f, "{:indent$}-", "", indent = indent + 2)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for DebugDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.node, 0)
    }
}
