use jrewrite_make::{Modifier, StructureError, TreeMaker};
use jrewrite_syntax::{NodeId, NodeKind};
use pretty_assertions::assert_eq;

use super::{find, rewritten};

fn method_modifiers<F>(source: &str, edit: F) -> String
where
    F: FnOnce(&mut TreeMaker<'_>, NodeId) -> Result<NodeId, StructureError>,
{
    rewritten(source, |copy| {
        let method = find(copy, NodeKind::MethodDecl);
        let modifiers = copy.tree().child_named(method, "modifiers").unwrap();
        let new_modifiers = edit(&mut copy.make(), modifiers)?;
        copy.rewrite(modifiers, new_modifiers);
        Ok(())
    })
}

#[test]
fn first_modifier_is_added_before_the_type() {
    let text = method_modifiers("class A {\n    void m() {\n    }\n}\n", |make, modifiers| {
        make.add_modifier(modifiers, Modifier::Public)
    });
    assert_eq!(text, "class A {\n    public void m() {\n    }\n}\n");
}

#[test]
fn removed_modifier_takes_its_space() {
    let text = method_modifiers("class A {\n    public static void m() {\n    }\n}\n", |make, modifiers| {
        make.remove_modifier(modifiers, Modifier::Static)
    });
    assert_eq!(text, "class A {\n    public void m() {\n    }\n}\n");
}

#[test]
fn removing_every_modifier_leaves_the_type_in_place() {
    let text = method_modifiers("class A {\n    private void m() {\n    }\n}\n", |make, modifiers| {
        make.remove_modifier(modifiers, Modifier::Private)
    });
    assert_eq!(text, "class A {\n    void m() {\n    }\n}\n");
}

#[test]
fn annotation_on_a_declaration_gets_its_own_line() {
    let text = method_modifiers("class A {\n    void m() {\n    }\n}\n", |make, modifiers| {
        let name = make.identifier("Override")?;
        let annotation = make.annotation(name, Vec::new())?;
        make.add_modifiers_annotation(modifiers, annotation)
    });
    assert_eq!(text, "class A {\n    @Override\n    void m() {\n    }\n}\n");
}
