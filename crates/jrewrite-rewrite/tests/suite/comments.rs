use jrewrite_comments::{CommentRecord, CommentStyle};
use jrewrite_syntax::NodeKind;
use pretty_assertions::assert_eq;

use super::{find, find_all, named, rewritten};

#[test]
fn comment_added_before_a_statement_gets_its_own_line() {
    let source = "class A {\n    void m() {\n        a();\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let statement = find(copy, NodeKind::ExpressionStatement);
        copy.make()
            .add_comment(statement, CommentRecord::create(CommentStyle::Line, "note"), true)?;
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        // note\n        a();\n    }\n}\n");
}

#[test]
fn removed_original_comment_takes_its_line() {
    let source = "class A {\n    void m() {\n        // old\n        a();\n        b();\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let statement = find(copy, NodeKind::ExpressionStatement);
        assert_eq!(copy.make().comments(statement, true).len(), 1);
        copy.make().remove_comment(statement, 0, true)?;
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        a();\n        b();\n    }\n}\n");
}

#[test]
fn comments_of_a_replaced_statement_move_with_copy_comments() {
    let source = "class A {\n    void m() {\n        // why\n        old(); // how\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let old = find(copy, NodeKind::ExpressionStatement);
        let new = copy.make().parse_statement("replacement();")?;
        copy.generator().copy_comments(old, new, true)?;
        copy.generator().copy_comments(old, new, false)?;
        copy.rewrite(old, new);
        Ok(())
    });
    assert_eq!(
        text,
        "class A {\n    void m() {\n        // why\n        replacement(); // how\n    }\n}\n"
    );
}

#[test]
fn comment_inside_a_removed_method_goes_with_it() {
    let source = "class A {\n    void keep() {\n    }\n\n    void drop() {\n        // inside\n        x();\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let method = named(copy, NodeKind::MethodDecl, "drop");
        copy.remove(method);
        Ok(())
    });
    assert_eq!(text, "class A {\n    void keep() {\n    }\n}\n");
}

#[test]
fn comments_survive_reordering_exactly_once() {
    let source = "class A {\n    void m() {\n        // one\n        a(); // 1\n        /* two */\n        b(); // 2\n        // three\n        c(); // 3\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let block = find(copy, NodeKind::Block);
        let statements = find_all(copy, NodeKind::ExpressionStatement);
        let reordered = {
            let mut make = copy.make();
            let mut list = block;
            for statement in &statements {
                list = make.remove_block_statement(list, *statement)?;
            }
            for statement in statements.iter().rev() {
                list = make.add_block_statement(list, *statement)?;
            }
            list
        };
        copy.rewrite(block, reordered);
        Ok(())
    });
    for comment in ["// one", "// 1", "/* two */", "// 2", "// three", "// 3"] {
        assert_eq!(text.matches(comment).count(), 1, "{comment} in {text}");
    }
    assert!(text.find("c();").unwrap() < text.find("b();").unwrap(), "{text}");
    assert!(text.find("b();").unwrap() < text.find("a();").unwrap(), "{text}");
}
