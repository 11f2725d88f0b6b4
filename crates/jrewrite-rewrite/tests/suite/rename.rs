use jrewrite_rewrite::{JavaSource, RewriteError};
use jrewrite_syntax::NodeKind;
use pretty_assertions::assert_eq;

use super::{find, named, rewritten};

#[test]
fn renamed_field_keeps_initializer_and_comment() {
    let source = "class A {\n    // counter\n    private int count = 0; // starts at zero\n}\n";
    let text = rewritten(source, |copy| {
        let field = named(copy, NodeKind::Variable, "count");
        let renamed = copy.make().set_label(field, "total")?;
        copy.rewrite(field, renamed);
        Ok(())
    });
    assert_eq!(text, "class A {\n    // counter\n    private int total = 0; // starts at zero\n}\n");
}

#[test]
fn renamed_method_keeps_body_and_parameters() {
    let source = "class A {\n    public void run(int a,   String b) {\n        go(a);\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let method = named(copy, NodeKind::MethodDecl, "run");
        let renamed = copy.make().set_label(method, "start")?;
        copy.rewrite(method, renamed);
        Ok(())
    });
    assert_eq!(text, "class A {\n    public void start(int a,   String b) {\n        go(a);\n    }\n}\n");
}

#[test]
fn rename_produces_a_single_small_edit() {
    let source = JavaSource::from_text("package p;\n\nclass Old {\n    int a;\n}\n");
    let result = source
        .run_modification_task(|copy| {
            let class = find(copy, NodeKind::ClassDecl);
            let renamed = copy.make().set_label(class, "New")?;
            copy.rewrite(class, renamed);
            Ok::<_, RewriteError>(())
        })
        .unwrap();
    assert_eq!(result.new_text(), "package p;\n\nclass New {\n    int a;\n}\n");
    let edits = result.text_edits();
    assert_eq!(edits.len(), 1, "{edits:?}");
    let start = u32::from(edits[0].range.start()) as usize;
    let end = u32::from(edits[0].range.end()) as usize;
    assert_eq!(&source.text()[start..end], "Old");
    assert_eq!(edits[0].replacement, "New");
}

#[test]
fn renamed_field_reference_in_member_select() {
    let source = "class A {\n    void m() {\n        this.value = 1;\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let select = find(copy, NodeKind::FieldAccess);
        let renamed = copy.make().set_label(select, "other")?;
        copy.rewrite(select, renamed);
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        this.other = 1;\n    }\n}\n");
}
