use jrewrite_rewrite::{RewriteError, WorkingCopy};
use jrewrite_syntax::{NodeId, NodeKind};
use pretty_assertions::assert_eq;

use super::{find, rewritten};

/// Replace the statement in `slot` of `owner` with a block holding it.
fn wrap_in_block(copy: &mut WorkingCopy, owner: NodeId, slot: &str) -> Result<(), RewriteError> {
    let statement = copy.tree().child_named(owner, slot).unwrap();
    let block = copy.make().block(vec![statement])?;
    copy.rewrite(statement, block);
    Ok(())
}

#[test]
fn braces_are_added_around_if_branches_with_their_comments() {
    let source = "package hierbas.del.litoral;\n\npublic class Test {\n    private void test() {\n        if (true) //NOI18N\n            //a\n            System.out.println(0); //b\n            //c\n        else\n            //NOI18N\n            //d\n            System.out.println(1);//e\n            //f\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let statement = find(copy, NodeKind::If);
        wrap_in_block(copy, statement, "then")?;
        wrap_in_block(copy, statement, "else")
    });
    assert_eq!(
        text,
        "package hierbas.del.litoral;\n\npublic class Test {\n    private void test() {\n        if (true) { //NOI18N\n            //a\n            System.out.println(0); //b\n            //c\n        } else {\n            //NOI18N\n            //d\n            System.out.println(1);//e\n            //f\n        }\n    }\n}\n"
    );
}

#[test]
fn loop_body_on_the_same_line_moves_into_the_block() {
    let source = "class A {\n    void m() {\n        for (int i = 0; i < 3; i++) step(i);\n        done();\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let statement = find(copy, NodeKind::For);
        wrap_in_block(copy, statement, "body")
    });
    assert_eq!(
        text,
        "class A {\n    void m() {\n        for (int i = 0; i < 3; i++) {\n            step(i);\n        }\n        done();\n    }\n}\n"
    );
}

#[test]
fn wrapped_body_can_get_more_statements() {
    let source = "class A {\n    void m() {\n        while (more())\n            step();\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let statement = find(copy, NodeKind::While);
        let body = copy.tree().child_named(statement, "body").unwrap();
        let extra = copy.make().parse_statement("log();")?;
        let block = copy.make().block(vec![body, extra])?;
        copy.rewrite(body, block);
        Ok(())
    });
    assert_eq!(
        text,
        "class A {\n    void m() {\n        while (more()) {\n            step();\n            log();\n        }\n    }\n}\n"
    );
}
