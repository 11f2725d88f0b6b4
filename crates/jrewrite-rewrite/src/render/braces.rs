use jrewrite_core::{indent_width, shift_indent, whitespace_for_width, TextRange, TextSize};
use jrewrite_format::Placement;
use jrewrite_syntax::{NodeId, NodeKind, TokenKind};

use super::{offset, range, size, Piece, Renderer};

impl Renderer<'_> {
    /// Wrap the body statement `before` of a control statement into the new block `after`.
    ///
    /// The statement keeps its text and its comments on the lines it owns; braces are added
    /// around it in the owner's indentation. Returns `None` when the pair is not a wrap.
    pub(super) fn brace_wrap(
        &mut self,
        owner: NodeId,
        kind: NodeKind,
        slot: &str,
        before: NodeId,
        after: NodeId,
    ) -> Result<Option<Piece>, crate::RewriteError> {
        let is_body = matches!(
            (kind, slot),
            (NodeKind::If, "then" | "else")
                | (NodeKind::While | NodeKind::DoWhile | NodeKind::For | NodeKind::ForEach, "body")
        );
        if !is_body
            || self.tree.kind(before) == NodeKind::Block
            || self.tree.kind(after) != NodeKind::Block
            || self.tree.is_original(after)
        {
            return Ok(None);
        }
        let items = self.tree.items(after);
        let Some(position) = items.iter().position(|item| *item == before) else {
            return Ok(None);
        };

        let unit = self.unit();
        let tab = unit.width.max(1);
        let stmt = self.span(before);
        let Some(opening) = self.tree.prev_token_end(stmt.start()) else {
            return Ok(None);
        };
        let owner_indent = self.indent_at(offset(self.span(owner).start()));
        let owner_width = indent_width(owner_indent, tab);
        let inner_width = owner_width + unit.width;
        let inner_indent = whitespace_for_width(inner_width, unit);

        let owned_end = self.owned_comments_end(offset(stmt.end()), owner_width);
        let body = self.render_node(before, Placement::Body)?;
        let body_end = body.end();
        let mut region = body.text;
        region.push_str(&self.copy(body_end.max(offset(stmt.end())), owned_end));

        let tree = self.tree;
        let lines = tree.line_index();
        let mut text = String::from(if self.format.space_before_brace { " {" } else { "{" });
        for item in &items[..position] {
            text.push('\n');
            text.push_str(&inner_indent);
            text.push_str(&self.print(*item, Placement::LineItem, inner_width)?);
        }
        if lines.same_line(opening, stmt.start()) {
            text.push('\n');
            text.push_str(&inner_indent);
            text.push_str(&shift_indent(&region, unit.width as isize, unit));
        } else {
            let mut moved = self.copy(offset(opening), offset(stmt.start()));
            moved.push_str(&region);
            let stmt_width = indent_width(self.indent_at(offset(stmt.start())), tab);
            text.push_str(&shift_indent(&moved, inner_width as isize - stmt_width as isize, unit));
        }
        for item in &items[position + 1..] {
            text.push('\n');
            text.push_str(&inner_indent);
            text.push_str(&self.print(*item, Placement::LineItem, inner_width)?);
        }
        text.push('\n');
        text.push_str(owner_indent);
        text.push('}');

        let continues = self.tree.next_token(size(owned_end)).filter(|token| {
            matches!(
                (kind, slot, token.kind),
                (NodeKind::If, "then", TokenKind::ElseKw) | (NodeKind::DoWhile, "body", TokenKind::WhileKw)
            )
        });
        let end = match continues {
            Some(token) => {
                text.push(' ');
                offset(token.range.start())
            }
            None => owned_end,
        };

        tracing::trace!(target = "jrewrite.render", node = ?before, "statement wrapped in braces");
        Ok(Some(Piece::new(range(offset(opening), end), text)))
    }

    /// End of the comments after `end` that belong to the statement ending there: those on its
    /// last line and those on their own lines indented deeper than the owner.
    fn owned_comments_end(&self, end: usize, owner_width: usize) -> usize {
        let source = self.source;
        let lines = self.tree.line_index();
        let tab = self.unit().width.max(1);
        let limit = self
            .tree
            .next_token(size(end))
            .map_or(source.len(), |token| offset(token.range.start()));
        let mut owned = end;
        for comment in self.tree.comments_in(TextRange::new(size(end), size(limit))) {
            let start = comment.range.start();
            let on_statement_line = lines.same_line(size(end), start);
            let deeper = jrewrite_core::is_blank_before(source, offset(start))
                && indent_width(self.indent_at(offset(start)), tab) > owner_width;
            if !on_statement_line && (!deeper || self.leads_node_at(start, limit)) {
                break;
            }
            owned = offset(comment.range.end());
        }
        owned
    }

    /// Whether the comment starting at `start` is a leading comment of the node starting at `at`.
    fn leads_node_at(&self, start: TextSize, at: usize) -> bool {
        let found = self.comments.partition_point(|(span, _)| span.start() < start);
        let Some((span, id)) = self.comments.get(found) else {
            return false;
        };
        if span.start() != start {
            return false;
        }
        let anchor = self.index.anchor(*id);
        offset(self.span(anchor).start()) == at && self.index.leading_ids(anchor).contains(id)
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

    fn wrap(source: &str, kind: NodeKind, slot: &str) -> String {
        let mut tree = parse(source).unwrap();
        let owner = tree
            .preorder(tree.root())
            .into_iter()
            .find(|node| tree.kind(*node) == kind)
            .unwrap();
        let statement = tree.child_named(owner, slot).unwrap();
        let block = tree.alloc(NodeData::synthetic(NodeKind::Block, None, vec![Some(statement)]));
        let replacement = {
            let mut children = tree.children(owner).to_vec();
            let slot_index = kind.slot_index(slot).unwrap();
            children[slot_index] = Some(block);
            tree.alloc(NodeData::synthetic(kind, None, children))
        };
        let mut set = RewriteSet::new();
        set.replace(owner, replacement);
        rendered(&tree, &set)
    }

    fn rendered(tree: &SyntaxTree, set: &RewriteSet) -> String {
        let index = CommentIndex::build(tree);
        let parents = tree.parent_map(tree.root());
        render(tree, &index, &CommentLedger::new(), set, &RewriteConfig::default(), &parents).unwrap()
    }

    #[test]
    fn body_on_next_line_keeps_its_line() {
        let source = "class A {\n    void m() {\n        if (a)\n            b(); // why\n        c();\n    }\n}\n";
        assert_eq!(
            wrap(source, NodeKind::If, "then"),
            "class A {\n    void m() {\n        if (a) {\n            b(); // why\n        }\n        c();\n    }\n}\n"
        );
    }

    #[test]
    fn body_on_same_line_moves_down() {
        let source = "class A {\n    void m() {\n        while (a) b();\n    }\n}\n";
        assert_eq!(
            wrap(source, NodeKind::While, "body"),
            "class A {\n    void m() {\n        while (a) {\n            b();\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn else_follows_the_closing_brace() {
        let source = "class A {\n    void m() {\n        if (a)\n            b();\n        else\n            c();\n    }\n}\n";
        assert_eq!(
            wrap(source, NodeKind::If, "then"),
            "class A {\n    void m() {\n        if (a) {\n            b();\n        } else\n            c();\n    }\n}\n"
        );
    }

    fn wrap_statements(source: &str, slots: &[&str]) -> String {
        let mut tree = parse(source).unwrap();
        let owner = tree
            .preorder(tree.root())
            .into_iter()
            .find(|node| tree.kind(*node) == NodeKind::If)
            .unwrap();
        let mut set = RewriteSet::new();
        for slot in slots {
            let statement = tree.child_named(owner, slot).unwrap();
            let block = tree.alloc(NodeData::synthetic(NodeKind::Block, None, vec![Some(statement)]));
            set.replace(statement, block);
        }
        rendered(&tree, &set)
    }

    #[test]
    fn statements_replaced_by_their_own_block_keep_comments_inside() {
        let source = "class A {\n    void m() {\n        if (true) //NOI18N\n            //a\n            b(0); //b\n            //c\n        else\n            //NOI18N\n            //d\n            b(1);//e\n            //f\n    }\n}\n";
        assert_eq!(
            wrap_statements(source, &["then", "else"]),
            "class A {\n    void m() {\n        if (true) { //NOI18N\n            //a\n            b(0); //b\n            //c\n        } else {\n            //NOI18N\n            //d\n            b(1);//e\n            //f\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn comment_leading_the_next_statement_stays_outside() {
        let source = "class A {\n    void m() {\n        if (a)\n            b();\n            // about c\n            c();\n    }\n}\n";
        assert_eq!(
            wrap_statements(source, &["then"]),
            "class A {\n    void m() {\n        if (a) {\n            b();\n        }\n            // about c\n            c();\n    }\n}\n"
        );
    }
}
