//! Destinations for the edits a session produces.

use std::io::Write;
use std::path::{Path, PathBuf};

use jrewrite_core::{apply_text_edits, TextEdit};
use tempfile::NamedTempFile;

use crate::RewriteError;

/// Receives the edits that turn the original text into the rendered one.
///
/// `original` is the text the edits were computed against. A sink either applies them to a live
/// buffer or writes the resulting text somewhere.
pub trait DocumentSink {
    fn apply(&mut self, original: &str, edits: &[TextEdit]) -> Result<(), RewriteError>;
}

/// Collects the new text in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSink {
    text: Option<String>,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text after the last [`DocumentSink::apply`], if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn into_text(self) -> Option<String> {
        self.text
    }
}

impl DocumentSink for StringSink {
    fn apply(&mut self, original: &str, edits: &[TextEdit]) -> Result<(), RewriteError> {
        self.text = Some(apply_text_edits(original, edits)?);
        Ok(())
    }
}

/// Writes the new text over a file.
///
/// The text goes to a temporary file in the same directory first, which is then renamed over the
/// target, so readers see either the old file or the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, text: &str) -> Result<(), RewriteError> {
        let io_err = |source| RewriteError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(text.as_bytes()).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl DocumentSink for FileSink {
    fn apply(&mut self, original: &str, edits: &[TextEdit]) -> Result<(), RewriteError> {
        let text = apply_text_edits(original, edits)?;
        self.write(&text)?;
        tracing::debug!(
            target = "jrewrite.commit",
            path = %self.path.display(),
            edits = edits.len(),
            bytes = text.len(),
            "file written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jrewrite_core::{TextRange, TextSize};
    use pretty_assertions::assert_eq;

    use super::*;

    fn edit(start: u32, end: u32, text: &str) -> TextEdit {
        TextEdit::new(TextRange::new(TextSize::from(start), TextSize::from(end)), text)
    }

    #[test]
    fn string_sink_applies_edits() {
        let mut sink = StringSink::new();
        sink.apply("int i = 0;", &[edit(4, 5, "count")]).unwrap();
        assert_eq!(sink.text(), Some("int count = 0;"));
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let mut sink = StringSink::new();
        let err = sink
            .apply("abcdef", &[edit(0, 3, "x"), edit(2, 4, "y")])
            .unwrap_err();
        assert!(matches!(err, RewriteError::Edit(_)), "{err:?}");
        assert_eq!(sink.text(), None);
    }

    #[test]
    fn file_sink_replaces_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.java");
        std::fs::write(&path, "class A {}\n").unwrap();

        let mut sink = FileSink::new(&path);
        sink.apply("class A {}\n", &[edit(6, 7, "B")]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "class B {}\n");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file left behind");
    }

    #[test]
    fn bad_edits_leave_the_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.java");
        std::fs::write(&path, "class A {}\n").unwrap();

        let mut sink = FileSink::new(&path);
        let err = sink.apply("class A {}\n", &[edit(6, 40, "B")]).unwrap_err();
        assert!(matches!(err, RewriteError::Edit(_)), "{err:?}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "class A {}\n");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("A.java");
        let err = FileSink::new(&path).apply("", &[]).unwrap_err();
        assert!(matches!(err, RewriteError::Io { path: ref failed, .. } if *failed == path), "{err:?}");
    }
}
