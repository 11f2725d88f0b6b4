use std::fs;

use jrewrite_core::apply_text_edits;
use jrewrite_rewrite::{JavaSource, RewriteError, StringSink, WorkingCopy};
use jrewrite_syntax::NodeKind;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use super::find;

fn rename_field(copy: &mut WorkingCopy) -> Result<(), RewriteError> {
    let field = find(copy, NodeKind::Variable);
    let renamed = copy.make().set_label(field, "renamed")?;
    copy.rewrite(field, renamed);
    Ok(())
}

#[test]
fn committed_file_holds_the_new_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("A.java");
    fs::write(&path, "class A {\n    int a; // kept\n}\n").unwrap();

    let source = JavaSource::for_path(&path).unwrap();
    let result = source.run_modification_task(rename_field).unwrap();
    assert_eq!(result.path(), Some(path.as_path()));
    result.commit().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "class A {\n    int renamed; // kept\n}\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn unchanged_result_does_not_touch_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("A.java");
    fs::write(&path, "class A {\n}\n").unwrap();

    let source = JavaSource::for_path(&path).unwrap();
    let result = source.run_modification_task(|_| Ok::<_, RewriteError>(())).unwrap();
    assert!(!result.is_changed());
    fs::remove_file(&path).unwrap();
    result.commit().unwrap();
    assert!(!path.exists());
}

#[test]
fn commit_into_a_vanished_directory_fails() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("src");
    fs::create_dir(&nested).unwrap();
    let path = nested.join("A.java");
    fs::write(&path, "class A {\n    int a;\n}\n").unwrap();

    let source = JavaSource::for_path(&path).unwrap();
    let result = source.run_modification_task(rename_field).unwrap();
    fs::remove_dir_all(&nested).unwrap();
    let err = result.commit().unwrap_err();
    assert!(matches!(err, RewriteError::Io { .. }), "{err:?}");
}

#[test]
fn edits_reach_a_string_sink() {
    let source = JavaSource::from_text("class A {\n    int a;\n    int b;\n}\n");
    let result = source.run_modification_task(rename_field).unwrap();
    let mut sink = StringSink::new();
    result.apply_to(&mut sink).unwrap();
    assert_eq!(sink.text(), Some(result.new_text()));
    assert_eq!(
        apply_text_edits(result.original_text(), &result.text_edits()).unwrap(),
        result.new_text()
    );
}

#[test]
fn one_source_can_run_several_tasks() {
    let source = JavaSource::from_text("class A {\n    int a;\n}\n");
    let first = source.run_modification_task(rename_field).unwrap();
    let second = source.run_modification_task(rename_field).unwrap();
    assert_eq!(first.new_text(), second.new_text());
    assert_eq!(source.text(), "class A {\n    int a;\n}\n");
}
