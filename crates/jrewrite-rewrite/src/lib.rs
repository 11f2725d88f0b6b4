//! The diff-and-render engine for jrewrite, and the edit session around it.
//!
//! A [`JavaSource`] parses a file into a [`WorkingCopy`]. Callers build replacement nodes with
//! [`TreeMaker`](jrewrite_make::TreeMaker) and record them in the working copy's
//! [`RewriteSet`]. Rendering copies every untouched region of the original text byte for byte
//! and re-renders only the regions whose nodes changed; the result is a [`ModificationResult`]
//! that can be inspected, turned into minimal text edits, or committed to disk atomically.

mod config;
mod generator;
mod render;
mod session;
mod set;
mod sink;
mod validate;

use std::path::PathBuf;

use jrewrite_core::EditError;
use jrewrite_format::{ConfigError, FormatError};
use jrewrite_make::{MakeError, StructureError};
use jrewrite_syntax::{FragmentError, NodeId, ParseError};
use thiserror::Error;

pub use config::{init_tracing, DocDialect, LoggingConfig, RewriteConfig};
pub use generator::{DefaultResolver, GeneratorUtilities, TypeNameResolver};
pub use session::{JavaSource, ModificationResult, WorkingCopy};
pub use set::{DocRewrite, RewriteSet, RewriteTarget};
pub use sink::{DocumentSink, FileSink, StringSink};

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("node {node} is not reachable from the original tree")]
    StaleReference { node: NodeId },
    #[error("rewrites of {first} and {second} overlap")]
    ConflictingRewrite { first: NodeId, second: NodeId },
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("source was not loaded from a file")]
    Detached,
}

impl From<MakeError> for RewriteError {
    fn from(err: MakeError) -> Self {
        match err {
            MakeError::Structure(err) => RewriteError::Structure(err),
            MakeError::Fragment(err) => RewriteError::Fragment(err),
        }
    }
}
