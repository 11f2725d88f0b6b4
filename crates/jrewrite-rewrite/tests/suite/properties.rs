use jrewrite_rewrite::{JavaSource, RewriteError};
use jrewrite_syntax::NodeKind;
use proptest::prelude::*;

use super::{find, named};

const PROPTEST_CASES: u32 = 64;

#[derive(Debug, Clone)]
struct Member {
    blank_before: bool,
    leading: bool,
    trailing: bool,
    method: bool,
}

fn arb_member() -> impl Strategy<Value = Member> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(blank_before, leading, trailing, method)| Member {
            blank_before,
            leading,
            trailing,
            method,
        },
    )
}

/// A class whose members are numbered; fields are named `f<n>` and methods `m<n>`.
fn class_source(members: &[Member]) -> String {
    let mut out = String::from("class A {\n");
    for (n, member) in members.iter().enumerate() {
        if member.blank_before {
            out.push('\n');
        }
        if member.leading {
            out.push_str(&format!("    // lead {n}\n"));
        }
        if member.method {
            out.push_str(&format!("    void m{n}() {{\n        call({n});\n    }}"));
        } else {
            out.push_str(&format!("    int f{n} = {n};"));
        }
        if member.trailing {
            out.push_str(&format!(" // trail {n}"));
        }
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// Statements a method body is drawn from, several of them kept on one line.
fn arb_statement() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "a();",
        "a(); // note",
        "{ foo( x ,y ) ; }",
        "{ }",
        "if (x > 0) b(); else { c(); }",
        "switch (x) { case 1: a(); break; default: }",
        "switch (x) {\n            case 1:\n                a();\n                break;\n        }",
        "for (int i = 0; i < n; i++) { s += i; }",
        "int[] xs = { 1, 2 };",
        "return;",
    ])
}

fn method_source(statements: &[&str]) -> String {
    let mut out = String::from("class A {\n    void one() { a(); }\n\n    void m(int x, int n) {\n");
    for statement in statements {
        out.push_str(&format!("        {statement}\n"));
    }
    out.push_str("    }\n}\n");
    out
}

fn fields_only() -> impl Strategy<Value = Vec<Member>> {
    prop::collection::vec(arb_member(), 0..6).prop_map(|members| {
        members
            .into_iter()
            .map(|member| Member { method: false, ..member })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn empty_task_is_the_identity(members in prop::collection::vec(arb_member(), 0..6)) {
        let source = class_source(&members);
        let result = JavaSource::from_text(source.clone())
            .run_modification_task(|_| Ok::<_, RewriteError>(()))
            .unwrap();
        prop_assert_eq!(result.new_text(), source.as_str());
        prop_assert!(result.text_edits().is_empty());
    }

    #[test]
    fn shallow_copy_of_every_node_keeps_the_text(statements in prop::collection::vec(arb_statement(), 0..5)) {
        let source = method_source(&statements);
        let result = JavaSource::from_text(source.clone())
            .run_modification_task(|copy| {
                let tree = copy.tree();
                let root = tree.root();
                let nodes: Vec<_> = tree.preorder(root).into_iter().filter(|node| *node != root).collect();
                for node in nodes {
                    let (kind, text, children) = {
                        let tree = copy.tree();
                        (tree.kind(node), tree.text(node).map(str::to_string), tree.children(node).to_vec())
                    };
                    let shallow = copy.make().node(kind, text.as_deref(), children)?;
                    copy.rewrite(node, shallow);
                }
                Ok::<_, RewriteError>(())
            })
            .unwrap();
        prop_assert_eq!(result.new_text(), source.as_str());
        prop_assert!(result.text_edits().is_empty());
    }

    #[test]
    fn renaming_a_field_edits_only_its_name(members in fields_only(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!members.is_empty());
        let target = pick.index(members.len());
        let source = class_source(&members);
        let name = format!("f{target}");
        let result = JavaSource::from_text(source.clone())
            .run_modification_task(|copy| {
                let field = named(copy, NodeKind::Variable, &name);
                let renamed = copy.make().set_label(field, "renamed")?;
                copy.rewrite(field, renamed);
                Ok::<_, RewriteError>(())
            })
            .unwrap();

        let declaration = format!("int {name} =");
        let name_start = source.find(&declaration).unwrap() + "int ".len();
        let name_end = name_start + name.len();
        let edits = result.text_edits();
        prop_assert_eq!(edits.len(), 1);
        let start = u32::from(edits[0].range.start()) as usize;
        let end = u32::from(edits[0].range.end()) as usize;
        prop_assert!(name_start <= start && end <= name_end, "{:?} outside {}..{}", edits, name_start, name_end);
        prop_assert_eq!(
            result.new_text(),
            format!("{}renamed{}", &source[..name_start], &source[name_end..])
        );
    }

    #[test]
    fn inserting_then_removing_a_field_restores_the_source(
        members in fields_only(),
        pick in any::<prop::sample::Index>(),
    ) {
        let source = class_source(&members);
        let at = pick.index(members.len() + 1);
        let inserted = JavaSource::from_text(source.clone())
            .run_modification_task(|copy| {
                let class = find(copy, NodeKind::ClassDecl);
                let field = copy.make().parse_member("int inserted;")?;
                let new_class = copy.make().insert_class_member(class, at, field)?;
                copy.rewrite(class, new_class);
                Ok::<_, RewriteError>(())
            })
            .unwrap();
        prop_assert!(inserted.new_text().contains("    int inserted;\n"), "{}", inserted.new_text());

        let removed = JavaSource::from_text(inserted.new_text())
            .run_modification_task(|copy| {
                let field = named(copy, NodeKind::Variable, "inserted");
                copy.remove(field);
                Ok::<_, RewriteError>(())
            })
            .unwrap();
        prop_assert_eq!(removed.new_text(), source.as_str());
    }

    #[test]
    fn reversed_members_keep_every_comment_once(members in prop::collection::vec(arb_member(), 1..6)) {
        let source = class_source(&members);
        let result = JavaSource::from_text(source.clone())
            .run_modification_task(|copy| {
                let class = find(copy, NodeKind::ClassDecl);
                let items = {
                    let body = copy.tree().child_named(class, "body").unwrap();
                    copy.tree().items(body)
                };
                let mut make = copy.make();
                let mut reversed = class;
                for item in &items {
                    reversed = make.remove_class_member(reversed, *item)?;
                }
                for item in items.iter().rev() {
                    reversed = make.add_class_member(reversed, *item)?;
                }
                drop(make);
                copy.rewrite(class, reversed);
                Ok::<_, RewriteError>(())
            })
            .unwrap();
        let text = result.new_text();
        for (n, member) in members.iter().enumerate() {
            let lead = format!("// lead {n}\n");
            let trail = format!("// trail {n}\n");
            prop_assert_eq!(text.matches(&lead).count(), usize::from(member.leading), "{}", text);
            prop_assert_eq!(text.matches(&trail).count(), usize::from(member.trailing), "{}", text);
        }
        prop_assert!(JavaSource::from_text(text).working_copy().is_ok(), "{}", text);
    }
}
