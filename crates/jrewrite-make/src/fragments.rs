//! Nodes built from source text.
//!
//! A fragment is parsed on its own, copied into the working arena as synthetic nodes, and its
//! comments are re-attached to the copies through the ledger. The copies have no source
//! position, so the renderer prints them fresh along with those attachments.

use std::collections::HashMap;

use jrewrite_comments::{CommentIndex, CommentRecord};
use jrewrite_syntax::{
    parse_block_fragment, parse_expression_fragment, parse_member_fragment,
    parse_statement_fragment, FragmentError, NodeId, SyntaxTree,
};

use crate::{MakeError, TreeMaker};

impl TreeMaker<'_> {
    /// Copy of `method` whose body is parsed from `text` (braces included).
    pub fn create_method_body(&mut self, method: NodeId, text: &str) -> Result<NodeId, MakeError> {
        let body = self.parse_block(text)?;
        Ok(self.replace_named_child(method, "body", Some(body))?)
    }

    /// Parse `{ ... }` into a new block.
    pub fn parse_block(&mut self, text: &str) -> Result<NodeId, FragmentError> {
        let fragment = parse_block_fragment(text)?;
        Ok(self.import_subtree(&fragment, fragment.root()))
    }

    pub fn parse_statement(&mut self, text: &str) -> Result<NodeId, FragmentError> {
        let fragment = parse_statement_fragment(text)?;
        Ok(self.import_subtree(&fragment, fragment.root()))
    }

    pub fn parse_expression(&mut self, text: &str) -> Result<NodeId, FragmentError> {
        let fragment = parse_expression_fragment(text)?;
        Ok(self.import_subtree(&fragment, fragment.root()))
    }

    /// Parse a field, method, constructor, initializer or nested type.
    pub fn parse_member(&mut self, text: &str) -> Result<NodeId, FragmentError> {
        let fragment = parse_member_fragment(text)?;
        Ok(self.import_subtree(&fragment, fragment.root()))
    }

    /// Deep-copy `node` of another tree into this one as synthetic nodes.
    ///
    /// Every comment of the other tree that belongs to the copied subtree becomes an explicit
    /// attachment on the matching copy.
    pub fn import_subtree(&mut self, from: &SyntaxTree, node: NodeId) -> NodeId {
        let (root, mapping) = self.tree.copy_subtree(from, node);
        let mapping: HashMap<NodeId, NodeId> = mapping.into_iter().collect();
        let comments = CommentIndex::build(from);

        for (pos, record) in comments.records().iter().enumerate() {
            let Some(id) = record.id else { continue };
            let anchor = comments.anchor(id);
            let leading = comments.leading_ids(anchor).contains(&id);
            let dangling = comments.dangling_ids(anchor).contains(&id);

            // Dangling comments follow the last element inside their anchor, or the anchor itself.
            let (target, leading) = if dangling {
                let last = from.children(anchor).iter().rev().flatten().next();
                (last.copied().unwrap_or(anchor), false)
            } else {
                (anchor, leading)
            };
            let Some(target) = mapping.get(&target).copied() else {
                continue;
            };
            let detached = CommentRecord {
                id: None,
                span: None,
                ..record.clone()
            };
            tracing::trace!(
                target = "jrewrite.comments",
                comment = pos,
                node = %target,
                leading,
                "fragment comment attached"
            );
            self.ledger.attach(target, detached, leading);
        }

        tracing::debug!(
            target = "jrewrite.parse",
            nodes = mapping.len(),
            comments = comments.len(),
            "subtree imported"
        );
        root
    }
}
