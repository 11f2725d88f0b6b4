//! Comment and documentation-comment association for jrewrite.
//!
//! [`CommentIndex::build`] scans the comment tokens of a parsed file once and assigns each comment
//! to a node as preceding, trailing or inline. Javadoc and `///` comments preceding declarations
//! are additionally parsed into [`DocCommentTree`]s. [`CommentLedger`] records what an edit
//! session did to those comments: which were moved (claimed), deleted (suppressed), or attached
//! to new nodes.

mod doc;
mod doc_parser;
mod doc_printer;
mod index;
mod ledger;
mod record;

pub use doc::{
    doc_text, BlockTag, BlockTagKind, DocCommentTree, DocStyle, DocTree, DocTreeMaker, InlineTag,
    InlineTagKind,
};
pub use doc_parser::{parse_doc_comment, parse_inline};
pub use doc_printer::{block_tag_lines, description_lines, doc_line, doc_lines, print_doc_comment};
pub use index::CommentIndex;
pub use ledger::{Attachments, CommentLedger};
pub use record::{CommentBody, CommentId, CommentRecord, CommentStyle, RelativePosition};
