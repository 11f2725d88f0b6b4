use jrewrite_rewrite::DefaultResolver;
use jrewrite_syntax::NodeKind;
use pretty_assertions::assert_eq;

use super::{find, rewritten};

#[test]
fn new_member_with_qualified_type_adds_the_first_import() {
    let text = rewritten("package p;\n\nclass A {\n}\n", |copy| {
        let class = find(copy, NodeKind::ClassDecl);
        let member = copy.make().parse_member("java.util.List<String> names;")?;
        let member = copy.generator().import_fqns(member)?;
        let new_class = copy.make().add_class_member(class, member)?;
        copy.rewrite(class, new_class);
        Ok(())
    });
    assert_eq!(
        text,
        "package p;\n\nimport java.util.List;\n\nclass A {\n    List<String> names;\n}\n"
    );
}

#[test]
fn import_is_added_to_a_file_without_package() {
    let text = rewritten("class A {\n    java.io.File f;\n}\n", |copy| {
        let field = find(copy, NodeKind::Variable);
        let new = copy.generator().import_fqns(field)?;
        copy.rewrite(field, new);
        Ok(())
    });
    assert_eq!(text, "import java.io.File;\n\nclass A {\n    File f;\n}\n");
}

#[test]
fn known_simple_names_are_left_alone_without_a_clash() {
    let source = "import java.util.List;\n\nclass A {\n    List l;\n}\n";
    let text = rewritten(source, |copy| {
        let field = find(copy, NodeKind::Variable);
        let resolver = DefaultResolver::new().with_type("java.util.List");
        let new = copy.generator().import_fqns_with(field, &resolver)?;
        copy.rewrite(field, new);
        Ok(())
    });
    assert_eq!(text, source);
}

#[test]
fn two_types_from_the_same_call_are_both_imported_in_order() {
    let text = rewritten("package p;\n\nclass A {\n    java.util.Map<java.io.File, String> m;\n}\n", |copy| {
        let field = find(copy, NodeKind::Variable);
        let new = copy.generator().import_fqns(field)?;
        copy.rewrite(field, new);
        Ok(())
    });
    assert_eq!(
        text,
        "package p;\n\nimport java.io.File;\nimport java.util.Map;\n\nclass A {\n    Map<File, String> m;\n}\n"
    );
}

#[test]
fn whole_unit_can_be_rewritten_with_its_imports() {
    let text = rewritten("package p;\n\nclass A {\n    java.util.List x;\n}\n", |copy| {
        let unit = copy.compilation_unit();
        let new = copy.generator().import_fqns(unit)?;
        copy.rewrite(unit, new);
        Ok(())
    });
    assert_eq!(text, "package p;\n\nimport java.util.List;\n\nclass A {\n    List x;\n}\n");
}
