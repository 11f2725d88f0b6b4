use jrewrite_comments::{DocStyle, DocTreeMaker};
use jrewrite_rewrite::{DocDialect, JavaSource, RewriteConfig, RewriteError};
use jrewrite_syntax::NodeKind;
use pretty_assertions::assert_eq;

use super::{find, named, rewritten};

const DOCUMENTED: &str = "class A {\n    /**\n     * Test method.\n     *\n     * @param a first\n     * @return nothing\n     */\n    int m(int a, int b) {\n        return a;\n    }\n}\n";

#[test]
fn added_param_tag_is_patched_into_the_existing_doc() {
    let text = rewritten(DOCUMENTED, |copy| {
        let method = named(copy, NodeKind::MethodDecl, "m");
        let old = copy.doc_comment(method).cloned().unwrap();
        let mut new = old.clone();
        let make = DocTreeMaker::new();
        new.block_tags.insert(1, make.param("b", vec![make.text("second")]));
        copy.rewrite_doc(method, Some(old), new);
        Ok(())
    });
    assert_eq!(
        text,
        "class A {\n    /**\n     * Test method.\n     *\n     * @param a first\n     * @param b second\n     * @return nothing\n     */\n    int m(int a, int b) {\n        return a;\n    }\n}\n"
    );
}

#[test]
fn removed_tag_takes_its_line() {
    let text = rewritten(DOCUMENTED, |copy| {
        let method = named(copy, NodeKind::MethodDecl, "m");
        let old = copy.doc_comment(method).cloned().unwrap();
        let mut new = old.clone();
        new.block_tags.remove(1);
        copy.rewrite_doc(method, Some(old), new);
        Ok(())
    });
    assert_eq!(
        text,
        "class A {\n    /**\n     * Test method.\n     *\n     * @param a first\n     */\n    int m(int a, int b) {\n        return a;\n    }\n}\n"
    );
}

#[test]
fn doc_is_created_for_an_undocumented_declaration() {
    let source = "class A {\n    int a;\n\n    void m() {\n    }\n}\n";
    let text = rewritten(source, |copy| {
        let method = named(copy, NodeKind::MethodDecl, "m");
        let make = DocTreeMaker::new();
        let doc = copy.new_doc(vec![make.text("Does things.")], Vec::new());
        copy.rewrite_doc(method, None, doc);
        Ok(())
    });
    assert_eq!(
        text,
        "class A {\n    int a;\n\n    /**\n     * Does things.\n     */\n    void m() {\n    }\n}\n"
    );
}

#[test]
fn doc_and_rename_of_the_same_method_combine() {
    let text = rewritten(DOCUMENTED, |copy| {
        let method = named(copy, NodeKind::MethodDecl, "m");
        let old = copy.doc_comment(method).cloned().unwrap();
        let mut new = old.clone();
        new.block_tags.remove(1);
        let renamed = copy.make().set_label(method, "n")?;
        copy.rewrite(method, renamed);
        copy.rewrite_doc(method, Some(old), new);
        Ok(())
    });
    assert!(text.contains("     * @param a first\n     */\n    int n(int a, int b) {"), "{text}");
    assert!(!text.contains("@return"), "{text}");
}

#[test]
fn markdown_dialect_prints_triple_slash_docs() {
    let config = RewriteConfig::from_toml_str("doc_style = \"markdown\"\n").unwrap();
    assert_eq!(config.doc_style, DocDialect::Markdown);
    let source = JavaSource::from_text("class A {\n    void m() {\n    }\n}\n").with_config(config);
    let result = source
        .run_modification_task(|copy| {
            let method = find(copy, NodeKind::MethodDecl);
            let make = DocTreeMaker::new();
            let doc = copy.new_doc(vec![make.text("Does things.")], Vec::new());
            assert_eq!(doc.style, DocStyle::Markdown);
            copy.rewrite_doc(method, None, doc);
            Ok::<_, RewriteError>(())
        })
        .unwrap();
    assert_eq!(result.new_text(), "class A {\n    /// Does things.\n    void m() {\n    }\n}\n");
}
