use jrewrite_syntax::{NodeId, NodeKind, Shape, SyntaxTree};

use crate::StructureError;

/// Check a prospective node against the slot table of `kind`.
pub fn check_node(
    tree: &SyntaxTree,
    kind: NodeKind,
    text: Option<&str>,
    children: &[Option<NodeId>],
) -> Result<(), StructureError> {
    for child in children.iter().flatten() {
        if !tree.contains(*child) {
            return Err(StructureError::UnknownNode { node: *child });
        }
    }

    if requires_text(kind) && text.map_or(true, str::is_empty) {
        return Err(StructureError::MissingText { kind });
    }

    match kind.shape() {
        Shape::Leaf => {
            if !children.is_empty() {
                return Err(StructureError::WrongArity {
                    kind,
                    expected: 0,
                    found: children.len(),
                });
            }
        }
        Shape::List(spec) => {
            for child in children {
                let Some(child) = child else {
                    return Err(StructureError::MissingChild { kind, slot: "item" });
                };
                let found = tree.kind(*child);
                if !spec.item.admits(found) {
                    return Err(StructureError::WrongChild {
                        kind,
                        slot: "item",
                        found,
                    });
                }
            }
        }
        Shape::Fixed(slots) => {
            if slots.len() != children.len() {
                return Err(StructureError::WrongArity {
                    kind,
                    expected: slots.len(),
                    found: children.len(),
                });
            }
            for (slot, child) in slots.iter().zip(children) {
                match child {
                    None if !slot.optional => {
                        return Err(StructureError::MissingChild {
                            kind,
                            slot: slot.name,
                        })
                    }
                    None => {}
                    Some(child) => {
                        let found = tree.kind(*child);
                        if !slot.accepts.admits(found) {
                            return Err(StructureError::WrongChild {
                                kind,
                                slot: slot.name,
                                found,
                            });
                        }
                    }
                }
            }
            check_special(tree, kind, text, children)?;
        }
    }
    Ok(())
}

fn requires_text(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Name
            | NodeKind::Literal
            | NodeKind::PrimitiveType
            | NodeKind::Modifier
            | NodeKind::TypeList
            | NodeKind::ClassDecl
            | NodeKind::Unary
            | NodeKind::Postfix
            | NodeKind::Binary
            | NodeKind::Assign
            | NodeKind::ArrayType
    )
}

fn check_special(
    tree: &SyntaxTree,
    kind: NodeKind,
    text: Option<&str>,
    children: &[Option<NodeId>],
) -> Result<(), StructureError> {
    match kind {
        NodeKind::ClassDecl => {
            let Some(body) = children[5] else {
                return Ok(());
            };
            let expected = if text == Some("enum") {
                NodeKind::EnumBody
            } else {
                NodeKind::MemberList
            };
            let found = tree.kind(body);
            if found != expected && found != NodeKind::Error {
                return Err(StructureError::WrongChild {
                    kind,
                    slot: "body",
                    found,
                });
            }
        }
        NodeKind::Wildcard if children[0].is_some() && text.is_none() => {
            return Err(StructureError::MissingText { kind });
        }
        NodeKind::ForEach | NodeKind::Catch => {
            // The loop variable and catch parameter are declarations without initializer.
            if let Some(variable) = children[0] {
                if tree.child(variable, 3).is_some() {
                    return Err(StructureError::WrongChild {
                        kind,
                        slot: kind.slots()[0].name,
                        found: NodeKind::Variable,
                    });
                }
            }
        }
        _ => {}
    }
    Ok(())
}
