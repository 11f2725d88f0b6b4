use jrewrite_comments::{print_doc_comment, CommentRecord, CommentStyle, DocStyle};
use jrewrite_format::{Placement, PrintHooks, Reused};
use jrewrite_syntax::NodeId;

use super::Renderer;
use crate::RewriteError;

/// Connects the printer to the renderer: original subtrees are rendered against their source
/// and comments follow the nodes they belong to.
pub(super) struct RenderHooks<'a, 'r> {
    renderer: &'a mut Renderer<'r>,
}

impl<'a, 'r> RenderHooks<'a, 'r> {
    pub(super) fn new(renderer: &'a mut Renderer<'r>) -> Self {
        Self { renderer }
    }
}

fn comment_style(style: DocStyle) -> CommentStyle {
    match style {
        DocStyle::Javadoc => CommentStyle::Javadoc,
        DocStyle::Markdown => CommentStyle::Markdown,
    }
}

impl PrintHooks for RenderHooks<'_, '_> {
    type Error = RewriteError;

    fn reuse(&mut self, node: NodeId) -> Result<Option<Reused>, RewriteError> {
        let renderer = &mut *self.renderer;
        if !renderer.tree.is_original(node) {
            return Ok(None);
        }
        let kind = renderer.tree.kind(node);
        let placement = if kind.is_statement() || kind.is_member() {
            Placement::LineItem
        } else {
            Placement::Inline
        };
        let piece = renderer.render_bare(node, placement)?;
        let base_indent = renderer.width_at(piece.start());
        Ok(Some(Reused {
            text: piece.text,
            base_indent,
        }))
    }

    fn leading_comments(&mut self, node: NodeId, placement: Placement) -> Vec<CommentRecord> {
        let renderer = &mut *self.renderer;
        let mut out = Vec::new();
        if renderer.tree.is_original(node) && placement == Placement::LineItem {
            for id in renderer.index.leading_ids(node) {
                if renderer.may_carry(*id) {
                    renderer.pass.carried.insert(*id);
                    out.push(renderer.carried_record(*id));
                }
            }
        }
        out.extend(renderer.ledger.attached(node, true).iter().cloned());

        if renderer.tree.is_original(node) {
            if let Some(doc) = renderer.doc_inserts.get(&node) {
                let style = if doc.starts_with("///") {
                    CommentStyle::Markdown
                } else {
                    CommentStyle::Javadoc
                };
                out.push(CommentRecord::create(style, doc.clone()));
            }
        } else if let Some(doc) = renderer.rewrites.fresh_doc(node) {
            out.push(CommentRecord::create(
                comment_style(doc.new.style),
                print_doc_comment(&doc.new, ""),
            ));
        }
        out
    }

    fn trailing_comments(&mut self, node: NodeId, placement: Placement) -> Vec<CommentRecord> {
        let renderer = &mut *self.renderer;
        let mut out = Vec::new();
        if renderer.tree.is_original(node) && placement == Placement::LineItem {
            for id in renderer.index.trailing_ids(node) {
                if renderer.may_carry(*id) {
                    renderer.pass.carried.insert(*id);
                    out.push(renderer.carried_record(*id));
                }
            }
        }
        out.extend(renderer.ledger.attached(node, false).iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use jrewrite_comments::{CommentIndex, CommentLedger, DocTreeMaker};
    use jrewrite_syntax::{parse, NodeData, NodeKind, SyntaxTree};
    use pretty_assertions::assert_eq;

    use crate::config::RewriteConfig;
    use crate::set::{DocRewrite, RewriteSet};

    use super::super::render;
    use super::*;

    fn find(tree: &SyntaxTree, kind: NodeKind) -> Vec<NodeId> {
        tree.preorder(tree.root())
            .into_iter()
            .filter(|node| tree.kind(*node) == kind)
            .collect()
    }

    #[test]
    fn moved_member_brings_its_comments_once() {
        let source = "class A {\n    // about a\n    int a; // a\n\n    void m() {\n    }\n}\n";
        let mut tree = parse(source).unwrap();
        let body = find(&tree, NodeKind::MemberList)[0];
        let members = tree.items(body);
        let moved = tree.alloc(NodeData::synthetic(
            NodeKind::MemberList,
            None,
            vec![Some(members[1]), Some(members[0])],
        ));
        let mut set = RewriteSet::new();
        set.replace(body, moved);
        let index = CommentIndex::build(&tree);
        let parents = tree.parent_map(tree.root());
        let text = render(&tree, &index, &CommentLedger::new(), &set, &RewriteConfig::default(), &parents).unwrap();
        assert_eq!(text.matches("// about a").count(), 1, "{text}");
        assert_eq!(text.matches("// a\n").count(), 1, "{text}");
        assert!(text.find("void m()").unwrap() < text.find("int a;").unwrap(), "{text}");
    }

    #[test]
    fn fresh_node_prints_its_doc() {
        let source = "class A {\n    int a;\n}\n";
        let mut tree = parse(source).unwrap();
        let body = find(&tree, NodeKind::MemberList)[0];
        let field = find(&tree, NodeKind::Variable)[0];
        let modifiers = tree.alloc(NodeData::synthetic(NodeKind::ModifierList, None, Vec::new()));
        let ty = tree.alloc(NodeData::synthetic(NodeKind::PrimitiveType, Some("int".into()), Vec::new()));
        let name = tree.alloc(NodeData::synthetic(NodeKind::Name, Some("b".into()), Vec::new()));
        let added = tree.alloc(NodeData::synthetic(
            NodeKind::Variable,
            None,
            vec![Some(modifiers), Some(ty), Some(name), None],
        ));
        let new_body = tree.alloc(NodeData::synthetic(
            NodeKind::MemberList,
            None,
            vec![Some(field), Some(added)],
        ));
        let make = DocTreeMaker::new();
        let mut set = RewriteSet::new();
        set.replace(body, new_body);
        set.set_fresh_doc(
            added,
            DocRewrite {
                old: None,
                new: make.doc_comment(DocStyle::Javadoc, vec![make.text("The b.")], Vec::new(), Vec::new()),
            },
        );
        let index = CommentIndex::build(&tree);
        let parents = tree.parent_map(tree.root());
        let text = render(&tree, &index, &CommentLedger::new(), &set, &RewriteConfig::default(), &parents).unwrap();
        assert_eq!(text, "class A {\n    int a;\n    /**\n     * The b.\n     */\n    int b;\n}\n");
    }
}
