use jrewrite_make::LiteralValue;
use jrewrite_syntax::NodeKind;
use pretty_assertions::assert_eq;

use super::{find, find_all, named, rewritten};

const METHOD: &str = "class A {\n    void m() {\n        a();\n        b();\n    }\n}\n";

#[test]
fn statement_parsed_from_text_is_appended() {
    let text = rewritten(METHOD, |copy| {
        let block = find(copy, NodeKind::Block);
        let statement = copy.make().parse_statement("c(1, 2);")?;
        let new_block = copy.make().add_block_statement(block, statement)?;
        copy.rewrite(block, new_block);
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        a();\n        b();\n        c(1, 2);\n    }\n}\n");
}

#[test]
fn statement_is_inserted_between_two_others() {
    let text = rewritten(METHOD, |copy| {
        let block = find(copy, NodeKind::Block);
        let statement = copy.make().parse_statement("int x = 0;")?;
        let new_block = copy.make().insert_block_statement(block, 1, statement)?;
        copy.rewrite(block, new_block);
        Ok(())
    });
    assert_eq!(
        text,
        "class A {\n    void m() {\n        a();\n        int x = 0;\n        b();\n    }\n}\n"
    );
}

#[test]
fn removed_statement_takes_its_line() {
    let text = rewritten(METHOD, |copy| {
        let statements = find_all(copy, NodeKind::ExpressionStatement);
        copy.remove(statements[1]);
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        a();\n    }\n}\n");
}

#[test]
fn method_body_is_replaced_from_text() {
    let source = "class A {\n    int m() {\n        return 0;\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let method = named(copy, NodeKind::MethodDecl, "m");
        let new_method = copy.make().create_method_body(method, "{ return 1; }")?;
        copy.rewrite(method, new_method);
        Ok(())
    });
    assert_eq!(text, "class A {\n    int m() {\n        return 1;\n    }\n}\n");
}

#[test]
fn statement_added_to_an_empty_body() {
    let source = "class A {\n    void m() {\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let block = find(copy, NodeKind::Block);
        let statement = copy.make().parse_statement("a();")?;
        let new_block = copy.make().add_block_statement(block, statement)?;
        copy.rewrite(block, new_block);
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        a();\n    }\n}\n");
}

#[test]
fn replaced_literal_keeps_the_rest_of_the_line() {
    let source = "class A {\n    void m() {\n        Object o = \"x\"; // value\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let literal = find(copy, NodeKind::Literal);
        let null = copy.make().literal(LiteralValue::Null)?;
        copy.rewrite(literal, null);
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        Object o = null; // value\n    }\n}\n");
}

#[test]
fn argument_is_added_after_the_existing_ones() {
    let source = "class A {\n    void m() {\n        call(a,  b);\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let call = find(copy, NodeKind::MethodCall);
        let c = copy.make().identifier("c")?;
        let new_call = copy.make().add_method_invocation_argument(call, c)?;
        copy.rewrite(call, new_call);
        Ok(())
    });
    assert_eq!(text, "class A {\n    void m() {\n        call(a,  b, c);\n    }\n}\n");
}

#[test]
fn tab_indented_body_gets_tabs_for_new_statements() {
    let source = "class A {\n\tvoid x() {\n\t\ta();\n\t}\n}\n";
    let text = rewritten(source, |copy| {
        let block = find(copy, NodeKind::Block);
        let statement = copy.make().parse_statement("if (b) { c(); }")?;
        let new_block = copy.make().add_block_statement(block, statement)?;
        copy.rewrite(block, new_block);
        Ok(())
    });
    assert_eq!(
        text,
        "class A {\n\tvoid x() {\n\t\ta();\n\t\tif (b) {\n\t\t\tc();\n\t\t}\n\t}\n}\n"
    );
}

#[test]
fn copies_of_one_line_lists_keep_their_layout() {
    let source = "class A {\n    void m(int x) { foo( x ,y ) ; switch (x) { case 1: a(); break; default: } }\n}\n";
    let text = rewritten(source, |copy| {
        let lists: Vec<_> = [NodeKind::Block, NodeKind::CaseList, NodeKind::ArgumentList]
            .into_iter()
            .flat_map(|kind| find_all(copy, kind))
            .collect();
        for list in lists {
            let tree = copy.tree();
            let (kind, text, children) = (tree.kind(list), tree.text(list).map(str::to_string), tree.children(list).to_vec());
            let same = copy.make().node(kind, text.as_deref(), children)?;
            copy.rewrite(list, same);
        }
        Ok(())
    });
    assert_eq!(text, source);
}
