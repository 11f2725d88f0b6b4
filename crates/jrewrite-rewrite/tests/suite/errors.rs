use jrewrite_make::StructureError;
use jrewrite_rewrite::{JavaSource, RewriteError, WorkingCopy};
use jrewrite_syntax::NodeKind;

use super::find;

fn failure<F>(source: &str, task: F) -> RewriteError
where
    F: FnOnce(&mut WorkingCopy) -> Result<(), RewriteError>,
{
    JavaSource::from_text(source).run_modification_task(task).unwrap_err()
}

#[test]
fn unparsable_source_is_reported_before_the_task_runs() {
    let mut ran = false;
    let err = failure("class A { void m( }", |_| {
        ran = true;
        Ok(())
    });
    assert!(matches!(err, RewriteError::Parse(_)), "{err:?}");
    assert!(!ran);
}

#[test]
fn built_nodes_cannot_be_rewrite_keys() {
    let err = failure("class A {\n}\n", |copy| {
        let name = copy.make().identifier("b")?;
        let other = copy.make().identifier("c")?;
        copy.rewrite(name, other);
        Ok(())
    });
    assert!(matches!(err, RewriteError::StaleReference { .. }), "{err:?}");
}

#[test]
fn required_child_cannot_be_removed() {
    let err = failure("class A {\n    void m() {\n        if (a) b();\n    }\n}\n", |copy| {
        let statement = find(copy, NodeKind::If);
        let condition = copy.tree().child_named(statement, "condition").unwrap();
        copy.remove(condition);
        Ok(())
    });
    assert!(
        matches!(err, RewriteError::Structure(StructureError::MissingChild { kind: NodeKind::If, .. })),
        "{err:?}"
    );
}

#[test]
fn rewriting_the_same_node_twice_conflicts() {
    let err = failure("class A {\n    int a;\n}\n", |copy| {
        let field = find(copy, NodeKind::Variable);
        let first = copy.make().set_label(field, "b")?;
        let second = copy.make().set_label(field, "c")?;
        copy.rewrite(field, first);
        copy.rewrite(field, second);
        Ok(())
    });
    assert!(matches!(err, RewriteError::ConflictingRewrite { .. }), "{err:?}");
}

#[test]
fn malformed_fragment_surfaces_as_a_fragment_error() {
    let err = failure("class A {\n}\n", |copy| {
        copy.make().parse_statement("if (")?;
        Ok(())
    });
    assert!(matches!(err, RewriteError::Fragment(_)), "{err:?}");
}

#[test]
fn builder_rejects_a_label_on_a_node_without_one() {
    let err = failure("class A {\n    void m() {\n        a();\n    }\n}\n", |copy| {
        let block = find(copy, NodeKind::Block);
        copy.make().set_label(block, "x")?;
        Ok(())
    });
    assert!(matches!(err, RewriteError::Structure(StructureError::NoLabel { .. })), "{err:?}");
}

#[test]
fn task_errors_pass_through_unchanged() {
    #[derive(Debug)]
    enum TaskError {
        Rewrite(RewriteError),
        Cancelled,
    }

    impl From<RewriteError> for TaskError {
        fn from(err: RewriteError) -> Self {
            TaskError::Rewrite(err)
        }
    }

    let source = JavaSource::from_text("class A {\n}\n");
    let err = source
        .run_modification_task(|_| Err::<(), _>(TaskError::Cancelled))
        .unwrap_err();
    assert!(matches!(err, TaskError::Cancelled), "{err:?}");

    let err = JavaSource::from_text("class {")
        .run_modification_task(|_| Ok::<_, TaskError>(()))
        .unwrap_err();
    assert!(matches!(err, TaskError::Rewrite(RewriteError::Parse(_))), "{err:?}");
}
