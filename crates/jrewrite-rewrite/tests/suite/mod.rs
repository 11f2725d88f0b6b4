mod braces;
mod comments;
mod commit;
mod docs;
mod errors;
mod imports;
mod members;
mod modifiers;
mod properties;
mod rename;
mod statements;

use jrewrite_rewrite::{JavaSource, RewriteError, WorkingCopy};
use jrewrite_syntax::{NodeId, NodeKind};

/// Every node of `kind` in the original tree, in source order.
pub(crate) fn find_all(copy: &WorkingCopy, kind: NodeKind) -> Vec<NodeId> {
    let tree = copy.tree();
    tree.preorder(tree.root())
        .into_iter()
        .filter(|node| tree.kind(*node) == kind)
        .collect()
}

pub(crate) fn find(copy: &WorkingCopy, kind: NodeKind) -> NodeId {
    find_all(copy, kind)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no {kind:?} in the source"))
}

/// The declaration of `kind` whose name is `name`.
pub(crate) fn named(copy: &WorkingCopy, kind: NodeKind, name: &str) -> NodeId {
    let tree = copy.tree();
    find_all(copy, kind)
        .into_iter()
        .find(|node| {
            tree.child_named(*node, "name")
                .and_then(|name| tree.text(name))
                == Some(name)
        })
        .unwrap_or_else(|| panic!("no {kind:?} named {name}"))
}

/// Run `task` over `source` and return the rendered text.
pub(crate) fn rewritten<F>(source: &str, task: F) -> String
where
    F: FnOnce(&mut WorkingCopy) -> Result<(), RewriteError>,
{
    let result = JavaSource::from_text(source).run_modification_task(task).unwrap();
    assert_eq!(result.original_text(), source);
    result.new_text().to_string()
}
