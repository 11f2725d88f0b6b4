//! Per-session comment bookkeeping.

use std::collections::{HashMap, HashSet};

use jrewrite_syntax::NodeId;

use crate::record::{CommentId, CommentRecord};

/// Comments explicitly attached to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    pub leading: Vec<CommentRecord>,
    pub trailing: Vec<CommentRecord>,
}

impl Attachments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }

    pub fn side(&self, leading: bool) -> &[CommentRecord] {
        if leading {
            &self.leading
        } else {
            &self.trailing
        }
    }
}

/// Tracks which original comments moved or were deleted, and which comments callers attached to
/// nodes.
///
/// A claimed record is emitted only where it is attached; wherever original text is copied
/// verbatim it is cut out. A suppressed record is cut out and emitted nowhere.
#[derive(Debug, Clone, Default)]
pub struct CommentLedger {
    claimed: HashSet<CommentId>,
    suppressed: HashSet<CommentId>,
    attachments: HashMap<NodeId, Attachments>,
}

impl CommentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, id: CommentId) {
        self.claimed.insert(id);
    }

    pub fn suppress(&mut self, id: CommentId) {
        self.suppressed.insert(id);
    }

    pub fn is_claimed(&self, id: CommentId) -> bool {
        self.claimed.contains(&id)
    }

    pub fn is_suppressed(&self, id: CommentId) -> bool {
        self.suppressed.contains(&id)
    }

    /// Whether verbatim copies must leave the record out.
    pub fn is_excised(&self, id: CommentId) -> bool {
        self.is_claimed(id) || self.is_suppressed(id)
    }

    pub fn excised(&self) -> impl Iterator<Item = CommentId> + '_ {
        self.claimed.iter().chain(self.suppressed.iter()).copied()
    }

    pub fn attach(&mut self, node: NodeId, record: CommentRecord, leading: bool) {
        let entry = self.attachments.entry(node).or_default();
        if leading {
            entry.leading.push(record);
        } else {
            entry.trailing.push(record);
        }
    }

    /// Remove the `index`th comment attached on one side of `node`.
    pub fn detach(&mut self, node: NodeId, index: usize, leading: bool) -> Option<CommentRecord> {
        let entry = self.attachments.get_mut(&node)?;
        let side = if leading {
            &mut entry.leading
        } else {
            &mut entry.trailing
        };
        (index < side.len()).then(|| side.remove(index))
    }

    pub fn attachments(&self, node: NodeId) -> Option<&Attachments> {
        self.attachments.get(&node).filter(|a| !a.is_empty())
    }

    pub fn attached(&self, node: NodeId, leading: bool) -> &[CommentRecord] {
        self.attachments
            .get(&node)
            .map_or(&[][..], |a| a.side(leading))
    }

    /// Nodes with at least one attached comment.
    pub fn attached_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.attachments
            .iter()
            .filter(|(_, a)| !a.is_empty())
            .map(|(node, _)| *node)
    }

    pub fn has_attachments(&self) -> bool {
        self.attachments.values().any(|a| !a.is_empty())
    }
}
