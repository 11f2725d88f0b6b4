//! Rewrites recorded against the original tree of one working copy.

use std::collections::HashMap;

use jrewrite_comments::DocCommentTree;
use jrewrite_syntax::NodeId;

/// A doc comment change for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRewrite {
    /// The doc the caller started from, if the declaration had one.
    pub old: Option<DocCommentTree>,
    pub new: DocCommentTree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteTarget {
    Replace(NodeId),
    /// A replacement that also changes the declaration's doc comment. `node` is the key itself
    /// when only the doc changes.
    ReplaceWithDoc { node: NodeId, doc: DocRewrite },
    /// Removal from the enclosing list or optional slot.
    Delete,
}

impl RewriteTarget {
    /// The node rendered in place of the key, or `None` for a deletion.
    pub fn replacement(&self) -> Option<NodeId> {
        match self {
            RewriteTarget::Replace(node) | RewriteTarget::ReplaceWithDoc { node, .. } => Some(*node),
            RewriteTarget::Delete => None,
        }
    }

    pub fn doc(&self) -> Option<&DocRewrite> {
        match self {
            RewriteTarget::ReplaceWithDoc { doc, .. } => Some(doc),
            _ => None,
        }
    }
}

/// Original node identity to [`RewriteTarget`], in the order the rewrites were recorded.
///
/// Recording a second replacement for a key that already has one is not an error here; it is
/// reported as a conflict when the set is validated before rendering.
#[derive(Debug, Clone, Default)]
pub struct RewriteSet {
    entries: Vec<(NodeId, RewriteTarget)>,
    positions: HashMap<NodeId, usize>,
    /// Docs for nodes built in this session, printed along with them.
    fresh_docs: HashMap<NodeId, DocRewrite>,
    repeated: Vec<NodeId>,
}

impl RewriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.fresh_docs.is_empty()
    }

    pub fn get(&self, key: NodeId) -> Option<&RewriteTarget> {
        self.positions.get(&key).map(|pos| &self.entries[*pos].1)
    }

    pub fn entries(&self) -> impl Iterator<Item = (NodeId, &RewriteTarget)> + '_ {
        self.entries.iter().map(|(key, target)| (*key, target))
    }

    pub fn replace(&mut self, key: NodeId, node: NodeId) {
        match self.get(key).cloned() {
            None => self.push(key, RewriteTarget::Replace(node)),
            // A doc-only entry picks up the replacement.
            Some(RewriteTarget::ReplaceWithDoc { node: current, doc }) if current == key => {
                self.set(key, RewriteTarget::ReplaceWithDoc { node, doc });
            }
            Some(_) => {
                self.repeated.push(key);
                self.set(key, RewriteTarget::Replace(node));
            }
        }
    }

    pub fn delete(&mut self, key: NodeId) {
        if self.get(key).is_some() {
            self.repeated.push(key);
        }
        self.set(key, RewriteTarget::Delete);
    }

    /// Record a doc change for an original declaration, keeping any replacement of it.
    pub fn rewrite_doc(&mut self, key: NodeId, doc: DocRewrite) {
        let target = match self.get(key) {
            None => RewriteTarget::ReplaceWithDoc { node: key, doc },
            Some(RewriteTarget::Replace(node)) | Some(RewriteTarget::ReplaceWithDoc { node, .. }) => {
                RewriteTarget::ReplaceWithDoc { node: *node, doc }
            }
            Some(RewriteTarget::Delete) => return,
        };
        self.set(key, target);
    }

    /// Record the doc of a node that has no source text.
    pub fn set_fresh_doc(&mut self, node: NodeId, doc: DocRewrite) {
        self.fresh_docs.insert(node, doc);
    }

    pub fn fresh_doc(&self, node: NodeId) -> Option<&DocRewrite> {
        self.fresh_docs.get(&node)
    }

    /// Replace without counting as a second rewrite. Used by helpers that update a rewrite the
    /// caller may already have recorded, such as adding imports to the compilation unit.
    pub(crate) fn upsert(&mut self, key: NodeId, node: NodeId) {
        let target = match self.get(key) {
            Some(RewriteTarget::ReplaceWithDoc { doc, .. }) => RewriteTarget::ReplaceWithDoc {
                node,
                doc: doc.clone(),
            },
            _ => RewriteTarget::Replace(node),
        };
        self.set(key, target);
    }

    /// Keys that were given more than one replacement or deletion.
    pub(crate) fn repeated(&self) -> &[NodeId] {
        &self.repeated
    }

    fn push(&mut self, key: NodeId, target: RewriteTarget) {
        self.positions.insert(key, self.entries.len());
        self.entries.push((key, target));
    }

    fn set(&mut self, key: NodeId, target: RewriteTarget) {
        match self.positions.get(&key) {
            Some(pos) => self.entries[*pos].1 = target,
            None => self.push(key, target),
        }
    }
}
