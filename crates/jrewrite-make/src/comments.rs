use jrewrite_comments::{CommentId, CommentRecord};
use jrewrite_syntax::NodeId;

use crate::{StructureError, TreeMaker};

impl TreeMaker<'_> {
    fn live_originals(&self, node: NodeId, leading: bool) -> Vec<CommentId> {
        let ids = if leading {
            self.index.leading_ids(node)
        } else {
            self.index.trailing_ids(node)
        };
        ids.iter()
            .copied()
            .filter(|id| !self.ledger.is_excised(*id))
            .collect()
    }

    /// Comments on one side of `node`: surviving original comments first, then attachments.
    pub fn comments(&self, node: NodeId, leading: bool) -> Vec<CommentRecord> {
        let mut out: Vec<CommentRecord> = self
            .live_originals(node, leading)
            .into_iter()
            .map(|id| self.index.record(id).clone())
            .collect();
        out.extend_from_slice(self.ledger.attached(node, leading));
        out
    }

    /// Attach `comment` before (`leading`) or after `node`.
    pub fn add_comment(&mut self, node: NodeId, comment: CommentRecord, leading: bool) -> Result<(), StructureError> {
        if !self.tree.contains(node) {
            return Err(StructureError::UnknownNode { node });
        }
        self.ledger.attach(node, comment, leading);
        Ok(())
    }

    /// Remove the `index`th comment as listed by [`TreeMaker::comments`].
    ///
    /// An original comment is suppressed: it disappears from the output wherever its source
    /// text would have been copied.
    pub fn remove_comment(&mut self, node: NodeId, index: usize, leading: bool) -> Result<(), StructureError> {
        let originals = self.live_originals(node, leading);
        if let Some(id) = originals.get(index) {
            self.ledger.suppress(*id);
            return Ok(());
        }
        match self.ledger.detach(node, index - originals.len(), leading) {
            Some(_) => Ok(()),
            None => Err(StructureError::NoSuchComment { node, index }),
        }
    }
}
