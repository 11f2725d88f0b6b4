//! Helpers layered on the tree builder: moving comments between nodes and shortening qualified
//! type names into imports.

use std::collections::{HashMap, HashSet};

use jrewrite_comments::{CommentId, CommentIndex, CommentLedger, CommentRecord};
use jrewrite_make::TreeMaker;
use jrewrite_syntax::{NodeId, NodeKind, SyntaxTree};

use crate::session::WorkingCopy;
use crate::set::RewriteTarget;
use crate::RewriteError;

/// Decides which dotted names are types.
pub trait TypeNameResolver {
    /// Whether the dotted name `fqn` refers to a type.
    fn is_type(&self, fqn: &str) -> bool;

    /// The qualified type a simple name refers to, if known.
    fn qualify(&self, simple: &str) -> Option<String>;
}

/// Treats `a.b.C` as a type when every segment but the last starts in lower case and the last
/// starts in upper case. Simple names qualify only through [`DefaultResolver::with_type`].
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver {
    known: HashMap<String, String>,
}

impl DefaultResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the simple name of `fqn` resolve to `fqn`.
    pub fn with_type(mut self, fqn: &str) -> Self {
        self.known.insert(simple_name(fqn).to_string(), fqn.to_string());
        self
    }
}

impl TypeNameResolver for DefaultResolver {
    fn is_type(&self, fqn: &str) -> bool {
        let Some((package, simple)) = fqn.rsplit_once('.') else {
            return false;
        };
        let starts = |segment: &str, upper: bool| {
            segment
                .chars()
                .next()
                .is_some_and(|ch| if upper { ch.is_uppercase() } else { ch.is_lowercase() })
        };
        starts(simple, true) && package.split('.').all(|segment| starts(segment, false))
    }

    fn qualify(&self, simple: &str) -> Option<String> {
        self.known.get(simple).cloned()
    }
}

fn simple_name(fqn: &str) -> &str {
    fqn.rsplit_once('.').map_or(fqn, |(_, simple)| simple)
}

fn package_of(fqn: &str) -> &str {
    fqn.rsplit_once('.').map_or("", |(package, _)| package)
}

/// The dotted text of a `Name` or `FieldAccess` chain.
fn dotted_name(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    match tree.kind(node) {
        NodeKind::Name => tree.text(node).map(str::to_string),
        NodeKind::FieldAccess => {
            let target = dotted_name(tree, tree.child(node, 0)?)?;
            let name = tree.text(tree.child(node, 1)?)?;
            Some(format!("{target}.{name}"))
        }
        _ => None,
    }
}

/// Comment and import utilities for one working copy.
pub struct GeneratorUtilities<'w> {
    copy: &'w mut WorkingCopy,
}

impl<'w> GeneratorUtilities<'w> {
    pub(crate) fn new(copy: &'w mut WorkingCopy) -> Self {
        Self { copy }
    }

    /// Make `node` carry its comments wherever it is rendered.
    ///
    /// With `from` set to `None`, `node` belongs to this working copy: its own leading and
    /// trailing comments are claimed and attached to it, and `node` is returned. Otherwise the
    /// subtree of `from` is copied into this working copy with all of its comments, and the copy
    /// is returned.
    pub fn import_comments(&mut self, node: NodeId, from: Option<&SyntaxTree>) -> NodeId {
        let (tree, index, ledger, _) = self.copy.parts_mut();
        if let Some(from) = from {
            let imported = TreeMaker::new(tree, index, ledger).import_subtree(from, node);
            tracing::debug!(target = "jrewrite.comments", node = %node, imported = %imported, "subtree imported");
            return imported;
        }
        for leading in [true, false] {
            for id in live_originals(index, ledger, node, leading) {
                ledger.claim(id);
                ledger.attach(node, detached(index.record(id)), leading);
            }
        }
        tracing::debug!(target = "jrewrite.comments", node = %node, "comments imported");
        node
    }

    /// Copy the comments on one side of `from` onto the same side of `to`.
    ///
    /// Original comments of `from` are claimed, so they appear only with `to`.
    pub fn copy_comments(&mut self, from: NodeId, to: NodeId, leading: bool) -> Result<(), RewriteError> {
        let (tree, index, ledger, _) = self.copy.parts_mut();
        if !tree.contains(to) {
            return Err(jrewrite_make::StructureError::UnknownNode { node: to }.into());
        }
        let mut records = Vec::new();
        for id in live_originals(index, ledger, from, leading) {
            ledger.claim(id);
            records.push(detached(index.record(id)));
        }
        records.extend(ledger.attached(from, leading).iter().cloned());
        tracing::debug!(
            target = "jrewrite.comments",
            from = %from,
            to = %to,
            leading,
            count = records.len(),
            "comments copied"
        );
        for record in records {
            ledger.attach(to, record, leading);
        }
        Ok(())
    }

    /// [`GeneratorUtilities::import_fqns_with`] using the [`DefaultResolver`].
    pub fn import_fqns(&mut self, node: NodeId) -> Result<NodeId, RewriteError> {
        self.import_fqns_with(node, &DefaultResolver::new())
    }

    /// Copy of `node` with qualified type names shortened where an import makes that possible.
    ///
    /// A name is shortened when its simple name is free in the compilation unit or already
    /// imported for the same type. Names that would clash stay qualified, and simple names the
    /// resolver maps to a clashing type are qualified. Missing imports go into the returned node
    /// when `node` is the compilation unit; otherwise the compilation unit is rewritten to hold
    /// them, so a caller rewriting the unit as well does so before calling this.
    pub fn import_fqns_with(&mut self, node: NodeId, resolver: &dyn TypeNameResolver) -> Result<NodeId, RewriteError> {
        let (tree, index, ledger, rewrites) = self.copy.parts_mut();
        let root = tree.root();
        let unit = match rewrites.get(root) {
            Some(RewriteTarget::Delete) => return Ok(node),
            Some(target) => target.replacement().unwrap_or(root),
            None => root,
        };
        let mut scope = ImportScope::collect(tree, unit);
        let mut make = TreeMaker::new(tree, index, ledger);
        let mut rewritten = scope.rewrite(&mut make, resolver, node, None)?;
        if !scope.added.is_empty() {
            if node == root || node == unit {
                rewritten = with_imports(&mut make, rewritten, &scope.added)?;
            } else {
                let unit = with_imports(&mut make, unit, &scope.added)?;
                rewrites.upsert(root, unit);
            }
        }
        tracing::debug!(
            target = "jrewrite.commit",
            node = %node,
            changed = rewritten != node,
            imports = scope.added.len(),
            "qualified names imported"
        );
        Ok(rewritten)
    }
}

fn live_originals(index: &CommentIndex, ledger: &CommentLedger, node: NodeId, leading: bool) -> Vec<CommentId> {
    let ids = if leading {
        index.leading_ids(node)
    } else {
        index.trailing_ids(node)
    };
    ids.iter().copied().filter(|id| !ledger.is_excised(*id)).collect()
}

fn detached(record: &CommentRecord) -> CommentRecord {
    CommentRecord {
        id: None,
        span: None,
        ..record.clone()
    }
}

/// Names visible at the top of a compilation unit.
struct ImportScope {
    package: String,
    /// Single-type imports by simple name.
    imported: HashMap<String, String>,
    on_demand: HashSet<String>,
    declared: HashSet<String>,
    /// Imports to add, in the order they were found.
    added: Vec<String>,
}

impl ImportScope {
    fn collect(tree: &SyntaxTree, unit: NodeId) -> Self {
        let package = tree
            .child(unit, 0)
            .and_then(|decl| tree.child(decl, 0))
            .and_then(|name| dotted_name(tree, name))
            .unwrap_or_default();

        let mut imported = HashMap::new();
        let mut on_demand = HashSet::new();
        if let Some(list) = tree.child(unit, 1) {
            for import in tree.items(list) {
                if tree.text(import) == Some("static") {
                    continue;
                }
                let Some(fqn) = tree.child(import, 0).and_then(|name| dotted_name(tree, name)) else {
                    continue;
                };
                match fqn.strip_suffix(".*") {
                    Some(package) => {
                        on_demand.insert(package.to_string());
                    }
                    None => {
                        imported.insert(simple_name(&fqn).to_string(), fqn);
                    }
                }
            }
        }

        let declared = tree
            .preorder(unit)
            .into_iter()
            .filter(|node| tree.kind(*node) == NodeKind::ClassDecl)
            .filter_map(|class| tree.child(class, 1).and_then(|name| tree.text(name)))
            .map(str::to_string)
            .collect();

        Self {
            package,
            imported,
            on_demand,
            declared,
            added: Vec::new(),
        }
    }

    /// Whether `fqn` can be written as its simple name, recording an import if one is needed.
    fn shorten(&mut self, fqn: &str) -> bool {
        let simple = simple_name(fqn);
        let package = package_of(fqn);
        if let Some(existing) = self.imported.get(simple) {
            return existing == fqn;
        }
        if self.declared.contains(simple) {
            return package == self.package;
        }
        if package != "java.lang" && package != self.package && !self.on_demand.contains(package) {
            self.added.push(fqn.to_string());
        }
        self.imported.insert(simple.to_string(), fqn.to_string());
        true
    }

    /// Whether the simple name `simple` would not refer to `fqn` in this unit.
    fn clashes(&self, simple: &str, fqn: &str) -> bool {
        match self.imported.get(simple) {
            Some(existing) => existing != fqn,
            None => self.declared.contains(simple) && package_of(fqn) != self.package,
        }
    }

    fn rewrite(
        &mut self,
        make: &mut TreeMaker<'_>,
        resolver: &dyn TypeNameResolver,
        node: NodeId,
        parent: Option<(NodeKind, usize)>,
    ) -> Result<NodeId, RewriteError> {
        let tree = make.tree();
        let kind = tree.kind(node);
        if matches!(kind, NodeKind::ImportDecl | NodeKind::PackageDecl) {
            return Ok(node);
        }
        let is_label = parent.is_some_and(|(owner, slot)| owner.label_slot() == Some(slot));

        if kind == NodeKind::FieldAccess && !is_label {
            if let Some(fqn) = dotted_name(tree, node).filter(|fqn| resolver.is_type(fqn)) {
                if self.shorten(&fqn) {
                    return Ok(make.identifier(simple_name(&fqn))?);
                }
                return Ok(node);
            }
        }
        if kind == NodeKind::Name && !is_label {
            let simple = tree.text(node).unwrap_or_default();
            if let Some(fqn) = resolver.qualify(simple).filter(|fqn| fqn != simple) {
                if self.clashes(simple, &fqn) {
                    return Ok(make.qual_ident(&fqn)?);
                }
            }
            return Ok(node);
        }

        let data = tree.node(node).clone();
        let mut children = Vec::with_capacity(data.children.len());
        let mut changed = false;
        for (slot, child) in data.children.iter().enumerate() {
            let rewritten = match child {
                Some(child) => {
                    let new = self.rewrite(make, resolver, *child, Some((kind, slot)))?;
                    changed |= new != *child;
                    Some(new)
                }
                None => None,
            };
            children.push(rewritten);
        }
        if !changed {
            return Ok(node);
        }
        Ok(make.node(kind, data.text.as_deref(), children)?)
    }
}

/// Copy of the compilation unit `unit` with `fqns` imported, keeping the import list sorted
/// where it is.
fn with_imports(make: &mut TreeMaker<'_>, unit: NodeId, fqns: &[String]) -> Result<NodeId, RewriteError> {
    let tree = make.tree();
    let Some(list) = tree.child(unit, 1) else {
        return Ok(unit);
    };
    let mut items: Vec<(Option<String>, NodeId)> = tree
        .items(list)
        .into_iter()
        .map(|import| {
            let name = (tree.text(import) != Some("static"))
                .then(|| tree.child(import, 0).and_then(|name| dotted_name(tree, name)))
                .flatten();
            (name, import)
        })
        .collect();

    for fqn in fqns {
        let name = make.qual_ident(fqn)?;
        let import = make.import(name, false)?;
        let position = items
            .iter()
            .position(|(existing, _)| existing.as_deref().is_some_and(|existing| existing > fqn.as_str()))
            .unwrap_or(items.len());
        items.insert(position, (Some(fqn.clone()), import));
    }

    let list = make.node(
        NodeKind::ImportList,
        None,
        items.into_iter().map(|(_, import)| Some(import)).collect(),
    )?;
    Ok(make.replace_child(unit, 1, Some(list))?)
}

#[cfg(test)]
mod tests {
    use jrewrite_comments::CommentStyle;
    use jrewrite_syntax::parse;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::JavaSource;

    fn first(copy: &WorkingCopy, kind: NodeKind) -> NodeId {
        let tree = copy.tree();
        tree.preorder(tree.root())
            .into_iter()
            .find(|node| tree.kind(*node) == kind)
            .unwrap()
    }

    fn import_in_field(source: &str, resolver: DefaultResolver) -> String {
        JavaSource::from_text(source)
            .run_modification_task(|copy| {
                let field = first(copy, NodeKind::Variable);
                let new = copy.generator().import_fqns_with(field, &resolver)?;
                copy.rewrite(field, new);
                Ok::<_, RewriteError>(())
            })
            .unwrap()
            .new_text()
            .to_string()
    }

    #[test]
    fn default_resolver_recognizes_package_qualified_types() {
        let resolver = DefaultResolver::new();
        assert!(resolver.is_type("java.util.List"));
        assert!(!resolver.is_type("List"));
        assert!(!resolver.is_type("System.out"));
        assert!(!resolver.is_type("java.util.Collections.emptyList"));
        assert_eq!(resolver.with_type("java.util.List").qualify("List").as_deref(), Some("java.util.List"));
    }

    #[test]
    fn qualified_type_is_shortened_and_imported() {
        let text = import_in_field(
            "package p;\n\nclass A {\n    java.util.List<String> l;\n}\n",
            DefaultResolver::new(),
        );
        assert_eq!(text, "package p;\n\nimport java.util.List;\n\nclass A {\n    List<String> l;\n}\n");
    }

    #[test]
    fn new_import_is_sorted_into_the_list() {
        let text = import_in_field(
            "import java.io.File;\nimport java.util.Set;\n\nclass A {\n    java.util.List l;\n}\n",
            DefaultResolver::new(),
        );
        assert_eq!(
            text,
            "import java.io.File;\nimport java.util.List;\nimport java.util.Set;\n\nclass A {\n    List l;\n}\n"
        );
    }

    #[test]
    fn java_lang_and_imported_types_need_no_import() {
        let text = import_in_field(
            "import java.util.List;\n\nclass A {\n    java.lang.String s = (java.util.List) null;\n}\n",
            DefaultResolver::new(),
        );
        assert_eq!(text, "import java.util.List;\n\nclass A {\n    String s = (List) null;\n}\n");
    }

    #[test]
    fn clashing_names_stay_qualified() {
        let text = import_in_field(
            "import java.awt.List;\n\nclass A {\n    java.util.List l;\n}\n",
            DefaultResolver::new(),
        );
        assert_eq!(text, "import java.awt.List;\n\nclass A {\n    java.util.List l;\n}\n");
    }

    #[test]
    fn clashing_simple_names_are_qualified() {
        let text = import_in_field(
            "import java.awt.List;\n\nclass A {\n    List l;\n}\n",
            DefaultResolver::new().with_type("java.util.List"),
        );
        assert_eq!(text, "import java.awt.List;\n\nclass A {\n    java.util.List l;\n}\n");
    }

    #[test]
    fn copied_comments_move_to_the_new_node() {
        let source = "class A {\n    void m() {\n        // keep me\n        int x = 1;\n    }\n}\n";
        let result = JavaSource::from_text(source)
            .run_modification_task(|copy| {
                let old = first(copy, NodeKind::Variable);
                let block = first(copy, NodeKind::Block);
                let new = copy.make().parse_statement("x = 1;")?;
                copy.generator().copy_comments(old, new, true)?;
                let body = {
                    let mut make = copy.make();
                    let body = make.remove_block_statement(block, old)?;
                    make.add_block_statement(body, new)?
                };
                copy.rewrite(block, body);
                Ok::<_, RewriteError>(())
            })
            .unwrap();
        assert_eq!(
            result.new_text(),
            "class A {\n    void m() {\n        // keep me\n        x = 1;\n    }\n}\n"
        );
    }

    #[test]
    fn same_tree_import_claims_own_comments() {
        let mut copy = JavaSource::from_text("class A {\n    // c\n    int x; // t\n}\n")
            .working_copy()
            .unwrap();
        let field = first(&copy, NodeKind::Variable);
        assert_eq!(copy.generator().import_comments(field, None), field);
        let leading = copy.ledger().attached(field, true);
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].text(), "// c");
        assert_eq!(copy.ledger().attached(field, false).len(), 1);
        assert!(copy.comments().leading_ids(field).iter().all(|id| copy.ledger().is_claimed(*id)));
    }

    #[test]
    fn foreign_import_copies_comments() {
        let other = parse("class B {\n    /** Doc. */\n    void m() {} // t\n}\n").unwrap();
        let method = other
            .preorder(other.root())
            .into_iter()
            .find(|node| other.kind(*node) == NodeKind::MethodDecl)
            .unwrap();
        let mut copy = JavaSource::from_text("class A {\n}\n").working_copy().unwrap();
        let imported = copy.generator().import_comments(method, Some(&other));
        assert!(!copy.tree().is_original(imported));
        assert_eq!(copy.tree().kind(imported), NodeKind::MethodDecl);
        let leading = copy.ledger().attached(imported, true);
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].style, CommentStyle::Javadoc);
    }
}
