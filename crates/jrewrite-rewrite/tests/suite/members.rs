use jrewrite_make::{LiteralValue, Modifier};
use jrewrite_rewrite::{RewriteError, WorkingCopy};
use jrewrite_syntax::{NodeId, NodeKind};
use pretty_assertions::assert_eq;

use super::{find, named, rewritten};

fn empty_method(copy: &mut WorkingCopy, name: &str) -> Result<NodeId, RewriteError> {
    let mut make = copy.make();
    let modifiers = make.modifiers(&[], Vec::new())?;
    let void = make.primitive_type("void")?;
    let body = make.block(Vec::new())?;
    Ok(make.method(modifiers, Vec::new(), void, name, Vec::new(), Vec::new(), Some(body))?)
}

#[test]
fn method_added_after_a_field_gets_a_blank_line() {
    let text = rewritten("class A {\n    int a;\n}\n", |copy| {
        let class = find(copy, NodeKind::ClassDecl);
        let method = empty_method(copy, "m")?;
        let new_class = copy.make().add_class_member(class, method)?;
        copy.rewrite(class, new_class);
        Ok(())
    });
    assert_eq!(text, "class A {\n    int a;\n\n    void m() {\n    }\n}\n");
}

#[test]
fn method_inserted_first_keeps_the_blank_line_below_the_header() {
    let source = "public class Test {\n\n    public void taragui() {\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let class = find(copy, NodeKind::ClassDecl);
        let method = empty_method(copy, "foo")?;
        let new_class = copy.make().insert_class_member(class, 0, method)?;
        copy.rewrite(class, new_class);
        Ok(())
    });
    assert_eq!(
        text,
        "public class Test {\n\n    void foo() {\n    }\n\n    public void taragui() {\n    }\n}\n"
    );
}

#[test]
fn field_added_after_a_field_needs_no_blank_line() {
    let text = rewritten("class A {\n    int a;\n}\n", |copy| {
        let class = find(copy, NodeKind::ClassDecl);
        let field = {
            let mut make = copy.make();
            let modifiers = make.modifiers(&[Modifier::Private, Modifier::Static, Modifier::Final], Vec::new())?;
            let ty = make.primitive_type("int")?;
            let one = make.literal(LiteralValue::Int(1))?;
            make.variable(modifiers, ty, "B", Some(one))?
        };
        let new_class = copy.make().add_class_member(class, field)?;
        copy.rewrite(class, new_class);
        Ok(())
    });
    assert_eq!(text, "class A {\n    int a;\n    private static final int B = 1;\n}\n");
}

#[test]
fn removing_every_member_empties_the_body() {
    let source = "package hierbas.del.litoral;\n\npublic class Test {\n\n    int a;\n\n    public void taragui() {\n        new EventListener() {\n        };\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let class = find(copy, NodeKind::ClassDecl);
        let body = copy.tree().child_named(class, "body").unwrap();
        let count = copy.tree().items(body).len();
        let mut new_class = class;
        for _ in 0..count {
            new_class = copy.make().remove_class_member_at(new_class, 0)?;
        }
        copy.rewrite(class, new_class);
        Ok(())
    });
    assert_eq!(text, "package hierbas.del.litoral;\n\npublic class Test {\n}\n");
}

#[test]
fn removed_member_takes_its_comments() {
    let source = "class A {\n\n    int a;\n\n    // about b\n    int b; // b\n\n    int c;\n}\n";
    let text = rewritten(source, |copy| {
        let b = named(copy, NodeKind::Variable, "b");
        copy.remove(b);
        Ok(())
    });
    assert_eq!(text, "class A {\n\n    int a;\n\n    int c;\n}\n");
}

#[test]
fn members_swap_without_touching_the_rest() {
    let source = "class A {\n    int a;\n\n    void m() {\n        x();\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let class = find(copy, NodeKind::ClassDecl);
        let members = {
            let body = copy.tree().child_named(class, "body").unwrap();
            copy.tree().items(body)
        };
        let new_class = {
            let mut make = copy.make();
            let without = make.remove_class_member(class, members[0])?;
            make.add_class_member(without, members[0])?
        };
        copy.rewrite(class, new_class);
        Ok(())
    });
    assert!(text.find("void m()").unwrap() < text.find("int a;").unwrap(), "{text}");
    assert!(text.contains("    void m() {\n        x();\n    }\n"), "{text}");
    assert_eq!(text.matches("int a;").count(), 1, "{text}");
}

#[test]
fn nested_class_members_are_reached() {
    let source = "class Outer {\n    class Inner {\n        int a;\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let inner = named(copy, NodeKind::ClassDecl, "Inner");
        let method = empty_method(copy, "m")?;
        let new_inner = copy.make().add_class_member(inner, method)?;
        copy.rewrite(inner, new_inner);
        Ok(())
    });
    assert_eq!(
        text,
        "class Outer {\n    class Inner {\n        int a;\n\n        void m() {\n        }\n    }\n}\n"
    );
}

#[test]
fn method_added_to_an_empty_body_starts_right_below_the_header() {
    for source in ["class A {\n}\n", "class A {}\n"] {
        let text = rewritten(source, |copy| {
            let class = find(copy, NodeKind::ClassDecl);
            let method = empty_method(copy, "m")?;
            let new_class = copy.make().add_class_member(class, method)?;
            copy.rewrite(class, new_class);
            Ok(())
        });
        assert_eq!(text, "class A {\n    void m() {\n    }\n}\n", "from {source:?}");
    }
}

#[test]
fn member_added_to_a_tab_indented_class_uses_tabs() {
    let text = rewritten("class A {\n\tint a;\n}\n", |copy| {
        let class = find(copy, NodeKind::ClassDecl);
        let method = empty_method(copy, "m")?;
        let new_class = copy.make().add_class_member(class, method)?;
        copy.rewrite(class, new_class);
        Ok(())
    });
    assert_eq!(text, "class A {\n\tint a;\n\n\tvoid m() {\n\t}\n}\n");
}
