//! Edit sessions over one Java source file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use jrewrite_comments::{BlockTag, CommentIndex, CommentLedger, DocCommentTree, DocTree, DocTreeMaker};
use jrewrite_core::{minimal_text_edit, TextEdit, TextRange, TextSize};
use jrewrite_make::TreeMaker;
use jrewrite_syntax::{parse, NodeId, SyntaxTree};
use similar::{DiffTag, TextDiff};

use crate::config::RewriteConfig;
use crate::generator::GeneratorUtilities;
use crate::render::render;
use crate::set::{DocRewrite, RewriteSet};
use crate::sink::{DocumentSink, FileSink};
use crate::validate::validate;
use crate::RewriteError;

/// A source file to edit, either read from disk or given as text.
#[derive(Debug, Clone)]
pub struct JavaSource {
    path: Option<PathBuf>,
    text: String,
    config: RewriteConfig,
}

impl JavaSource {
    pub fn for_path(path: impl Into<PathBuf>) -> Result<Self, RewriteError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|source| RewriteError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path: Some(path),
            text,
            config: RewriteConfig::default(),
        })
    }

    /// A source with no backing file. Its results can be rendered but not committed.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
            config: RewriteConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RewriteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Parse the source and index its comments.
    pub fn working_copy(&self) -> Result<WorkingCopy, RewriteError> {
        let started = Instant::now();
        let tree = parse(&self.text)?;
        let index = CommentIndex::build(&tree);
        tracing::debug!(
            target = "jrewrite.parse",
            path = ?self.path,
            nodes = tree.arena().len(),
            comments = index.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "parsed source"
        );
        Ok(WorkingCopy {
            path: self.path.clone(),
            tree,
            index,
            ledger: CommentLedger::new(),
            rewrites: RewriteSet::new(),
            config: self.config.clone(),
        })
    }

    /// Run `task` against a fresh working copy and render what it recorded.
    ///
    /// Nothing is written anywhere; call [`ModificationResult::commit`] for that.
    pub fn run_modification_task<F, E>(&self, task: F) -> Result<ModificationResult, E>
    where
        F: FnOnce(&mut WorkingCopy) -> Result<(), E>,
        E: From<RewriteError>,
    {
        let mut copy = self.working_copy()?;
        task(&mut copy)?;
        Ok(copy.render()?)
    }
}

/// The parsed state of one file during an edit session.
///
/// Nodes built through [`WorkingCopy::make`] live in the same arena as the original tree. Only
/// rewrites recorded with [`WorkingCopy::rewrite`], [`WorkingCopy::remove`] and
/// [`WorkingCopy::rewrite_doc`] change the output.
#[derive(Debug)]
pub struct WorkingCopy {
    path: Option<PathBuf>,
    tree: SyntaxTree,
    index: CommentIndex,
    ledger: CommentLedger,
    rewrites: RewriteSet,
    config: RewriteConfig,
}

impl WorkingCopy {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn compilation_unit(&self) -> NodeId {
        self.tree.root()
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    pub fn make(&mut self) -> TreeMaker<'_> {
        TreeMaker::new(&mut self.tree, &self.index, &mut self.ledger)
    }

    /// Render `new` where the original node `old` stood.
    pub fn rewrite(&mut self, old: NodeId, new: NodeId) {
        tracing::trace!(target = "jrewrite.commit", old = %old, new = %new, "rewrite recorded");
        self.rewrites.replace(old, new);
    }

    /// Remove the original node `old` from its list or optional slot.
    pub fn remove(&mut self, old: NodeId) {
        tracing::trace!(target = "jrewrite.commit", node = %old, "removal recorded");
        self.rewrites.delete(old);
    }

    /// Give `node` the doc comment `new`. `old` is the doc the caller started from, if any.
    ///
    /// For an original declaration the existing comment is edited in place, or a new one is
    /// inserted before it. A node built in this session prints the doc along with itself.
    pub fn rewrite_doc(&mut self, node: NodeId, old: Option<DocCommentTree>, new: DocCommentTree) {
        let doc = DocRewrite { old, new };
        if self.tree.is_original(node) {
            self.rewrites.rewrite_doc(node, doc);
        } else {
            self.rewrites.set_fresh_doc(node, doc);
        }
    }

    pub fn comments(&self) -> &CommentIndex {
        &self.index
    }

    pub fn ledger(&self) -> &CommentLedger {
        &self.ledger
    }

    pub fn rewrites(&self) -> &RewriteSet {
        &self.rewrites
    }

    /// The parsed doc comment of an original declaration.
    pub fn doc_comment(&self, node: NodeId) -> Option<&DocCommentTree> {
        self.index.doc_comment(node)
    }

    /// An empty-bodied doc comment in the session's configured dialect.
    pub fn new_doc(&self, description: Vec<DocTree>, block_tags: Vec<BlockTag>) -> DocCommentTree {
        DocTreeMaker::new().doc_comment(self.config.doc_style.style(), description, Vec::new(), block_tags)
    }

    pub fn generator(&mut self) -> GeneratorUtilities<'_> {
        GeneratorUtilities::new(self)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut SyntaxTree, &CommentIndex, &mut CommentLedger, &mut RewriteSet) {
        (&mut self.tree, &self.index, &mut self.ledger, &mut self.rewrites)
    }

    /// Validate the recorded rewrites and render the new text.
    pub fn render(self) -> Result<ModificationResult, RewriteError> {
        let started = Instant::now();
        let parents = self.tree.parent_map(self.tree.root());
        validate(&self.tree, &self.rewrites, &parents)?;
        let text = render(&self.tree, &self.index, &self.ledger, &self.rewrites, &self.config, &parents)?;
        tracing::debug!(
            target = "jrewrite.commit",
            path = ?self.path,
            rewrites = self.rewrites.len(),
            changed = text != self.tree.source(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered working copy"
        );
        Ok(ModificationResult {
            path: self.path,
            original: self.tree.source().to_string(),
            text,
        })
    }
}

/// The outcome of a modification task: the original text and the rendered one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationResult {
    path: Option<PathBuf>,
    original: String,
    text: String,
}

impl ModificationResult {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn original_text(&self) -> &str {
        &self.original
    }

    pub fn new_text(&self) -> &str {
        &self.text
    }

    pub fn is_changed(&self) -> bool {
        self.original != self.text
    }

    /// Edits against the original text, one per changed region, trimmed to the differing bytes.
    pub fn text_edits(&self) -> Vec<TextEdit> {
        diff_edits(&self.original, &self.text)
    }

    pub fn apply_to(&self, sink: &mut dyn DocumentSink) -> Result<(), RewriteError> {
        sink.apply(&self.original, &self.text_edits())
    }

    /// Write the new text over the file the source was read from.
    pub fn commit(&self) -> Result<(), RewriteError> {
        let Some(path) = &self.path else {
            return Err(RewriteError::Detached);
        };
        if !self.is_changed() {
            tracing::debug!(target = "jrewrite.commit", path = %path.display(), "nothing to write");
            return Ok(());
        }
        self.apply_to(&mut FileSink::new(path))
    }
}

/// Byte offset of the start of every line, plus the text length.
fn line_offsets(text: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    offsets.extend(text.match_indices('\n').map(|(pos, _)| pos + 1));
    if offsets.last() != Some(&text.len()) {
        offsets.push(text.len());
    }
    offsets
}

fn diff_edits(old: &str, new: &str) -> Vec<TextEdit> {
    let old_lines = line_offsets(old);
    let new_lines = line_offsets(new);
    let diff = TextDiff::from_lines(old, new);

    // Runs of adjacent changed lines, as line ranges in both texts.
    let mut hunks: Vec<(usize, usize, usize, usize)> = Vec::new();
    for op in diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            continue;
        }
        match hunks.last_mut() {
            Some(last) if last.1 == old_range.start && last.3 == new_range.start => {
                last.1 = old_range.end;
                last.3 = new_range.end;
            }
            _ => hunks.push((old_range.start, old_range.end, new_range.start, new_range.end)),
        }
    }

    let mut edits = Vec::new();
    for (old_start, old_end, new_start, new_end) in hunks {
        let (start, end) = (old_lines[old_start], old_lines[old_end]);
        let replacement = &new[new_lines[new_start]..new_lines[new_end]];
        if let Some(edit) = minimal_text_edit(&old[start..end], replacement) {
            let shift = |at: TextSize| at + TextSize::from(start as u32);
            edits.push(TextEdit::new(
                TextRange::new(shift(edit.range.start()), shift(edit.range.end())),
                edit.replacement,
            ));
        }
    }
    edits
}
