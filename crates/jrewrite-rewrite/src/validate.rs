use std::collections::HashMap;

use jrewrite_core::TextRange;
use jrewrite_make::StructureError;
use jrewrite_syntax::{NodeId, Shape, SyntaxTree};

use crate::set::{RewriteSet, RewriteTarget};
use crate::RewriteError;

/// Check a rewrite set against the original tree before anything is rendered.
pub(crate) fn validate(
    tree: &SyntaxTree,
    set: &RewriteSet,
    parents: &HashMap<NodeId, NodeId>,
) -> Result<(), RewriteError> {
    if let Some(key) = set.repeated().first() {
        return Err(RewriteError::ConflictingRewrite {
            first: *key,
            second: *key,
        });
    }

    let mut spans: Vec<(TextRange, NodeId)> = Vec::new();
    for (key, target) in set.entries() {
        let reachable = tree.contains(key)
            && tree.is_original(key)
            && (key == tree.root() || parents.contains_key(&key));
        if !reachable {
            return Err(RewriteError::StaleReference { node: key });
        }
        if *target == RewriteTarget::Delete {
            check_removable(tree, key, parents)?;
        }
        if let Some(span) = tree.span(key).filter(|span| !span.is_empty()) {
            spans.push((span, key));
        }
    }

    spans.sort_by_key(|(span, _)| (span.start(), std::cmp::Reverse(span.end())));
    for (pos, (span, key)) in spans.iter().enumerate() {
        for (other_span, other) in &spans[pos + 1..] {
            if other_span.start() >= span.end() {
                break;
            }
            let nested = is_ancestor(*key, *other, parents) || is_ancestor(*other, *key, parents);
            if !nested {
                return Err(RewriteError::ConflictingRewrite {
                    first: *key,
                    second: *other,
                });
            }
        }
    }
    Ok(())
}

fn is_ancestor(ancestor: NodeId, mut node: NodeId, parents: &HashMap<NodeId, NodeId>) -> bool {
    while let Some(parent) = parents.get(&node) {
        if *parent == ancestor {
            return true;
        }
        node = *parent;
    }
    false
}

/// A deleted node must sit in a list or an optional slot.
fn check_removable(
    tree: &SyntaxTree,
    key: NodeId,
    parents: &HashMap<NodeId, NodeId>,
) -> Result<(), StructureError> {
    let Some(parent) = parents.get(&key) else {
        return Ok(());
    };
    let kind = tree.kind(*parent);
    if let Shape::Fixed(slots) = kind.shape() {
        let position = tree.children(*parent).iter().position(|child| *child == Some(key));
        if let Some(slot) = position.and_then(|pos| slots.get(pos)) {
            if !slot.optional {
                return Err(StructureError::MissingChild {
                    kind,
                    slot: slot.name,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jrewrite_syntax::{parse, NodeData, NodeKind};

    use super::*;

    fn find(tree: &SyntaxTree, kind: NodeKind) -> Vec<NodeId> {
        tree.preorder(tree.root())
            .into_iter()
            .filter(|node| tree.kind(*node) == kind)
            .collect()
    }

    #[test]
    fn nested_rewrites_are_fine() {
        let tree = parse("class A { void m() { x(); } }").unwrap();
        let parents = tree.parent_map(tree.root());
        let class = find(&tree, NodeKind::ClassDecl)[0];
        let method = find(&tree, NodeKind::MethodDecl)[0];
        let mut set = RewriteSet::new();
        set.replace(class, class);
        set.replace(method, method);
        validate(&tree, &set, &parents).unwrap();
    }

    #[test]
    fn synthetic_keys_are_stale() {
        let mut tree = parse("class A {}").unwrap();
        let parents = tree.parent_map(tree.root());
        let fresh = tree.alloc(NodeData::synthetic(NodeKind::Name, Some("B".into()), Vec::new()));
        let mut set = RewriteSet::new();
        set.replace(fresh, fresh);
        let err = validate(&tree, &set, &parents).unwrap_err();
        assert!(matches!(err, RewriteError::StaleReference { node } if node == fresh), "{err:?}");
    }

    #[test]
    fn repeated_keys_conflict() {
        let tree = parse("class A { int x; }").unwrap();
        let parents = tree.parent_map(tree.root());
        let field = find(&tree, NodeKind::Variable)[0];
        let mut set = RewriteSet::new();
        set.replace(field, field);
        set.delete(field);
        let err = validate(&tree, &set, &parents).unwrap_err();
        assert!(matches!(err, RewriteError::ConflictingRewrite { .. }), "{err:?}");
    }

    #[test]
    fn required_children_cannot_be_deleted() {
        let tree = parse("class A { void m() { if (a) b(); } }").unwrap();
        let parents = tree.parent_map(tree.root());
        let condition = tree.child(find(&tree, NodeKind::If)[0], 0).unwrap();
        let mut set = RewriteSet::new();
        set.delete(condition);
        let err = validate(&tree, &set, &parents).unwrap_err();
        assert!(
            matches!(
                err,
                RewriteError::Structure(StructureError::MissingChild {
                    kind: NodeKind::If,
                    slot: "condition"
                })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn optional_children_and_list_items_can_be_deleted() {
        let tree = parse("class A { int x = 1; void m() { return 2; } }").unwrap();
        let parents = tree.parent_map(tree.root());
        let field = find(&tree, NodeKind::Variable)[0];
        let initializer = tree.child(field, 3).unwrap();
        let method = find(&tree, NodeKind::MethodDecl)[0];
        let mut set = RewriteSet::new();
        set.delete(initializer);
        set.delete(method);
        validate(&tree, &set, &parents).unwrap();
    }
}
