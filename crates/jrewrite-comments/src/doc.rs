//! Structured documentation comments.
//!
//! Both dialects share one tree shape; only the printer differs.

use std::ops::Range;

use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocStyle {
    Javadoc,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocCommentTree {
    pub style: DocStyle,
    pub first_sentence: Vec<DocTree>,
    pub body: Vec<DocTree>,
    pub block_tags: Vec<BlockTag>,
}

impl DocCommentTree {
    /// Compares descriptions and tags, ignoring where tags came from.
    pub fn same_content(&self, other: &DocCommentTree) -> bool {
        self.style == other.style
            && self.same_description(other)
            && self.block_tags.len() == other.block_tags.len()
            && self
                .block_tags
                .iter()
                .zip(&other.block_tags)
                .all(|(a, b)| a.same_content(b))
    }

    pub fn same_description(&self, other: &DocCommentTree) -> bool {
        self.first_sentence == other.first_sentence && self.body == other.body
    }

    pub fn description_is_empty(&self) -> bool {
        self.first_sentence.is_empty() && self.body.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTree {
    Text(String),
    Inline(InlineTag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineTagKind {
    Link,
    LinkPlain,
    Value,
    Code,
    Literal,
    InheritDoc,
    DocRoot,
    Unknown,
}

impl InlineTagKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "link" => InlineTagKind::Link,
            "linkplain" => InlineTagKind::LinkPlain,
            "value" => InlineTagKind::Value,
            "code" => InlineTagKind::Code,
            "literal" => InlineTagKind::Literal,
            "inheritDoc" => InlineTagKind::InheritDoc,
            "docRoot" => InlineTagKind::DocRoot,
            _ => InlineTagKind::Unknown,
        }
    }

    fn takes_reference(self) -> bool {
        matches!(self, InlineTagKind::Link | InlineTagKind::LinkPlain | InlineTagKind::Value)
    }
}

/// `{@name reference content}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineTag {
    pub kind: InlineTagKind,
    pub name: SmolStr,
    pub reference: Option<String>,
    pub content: Vec<DocTree>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTagKind {
    Param,
    Return,
    Throws,
    Exception,
    See,
    Since,
    Author,
    Version,
    Serial,
    SerialData,
    SerialField,
    Deprecated,
    Unknown,
}

impl BlockTagKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "param" => BlockTagKind::Param,
            "return" => BlockTagKind::Return,
            "throws" => BlockTagKind::Throws,
            "exception" => BlockTagKind::Exception,
            "see" => BlockTagKind::See,
            "since" => BlockTagKind::Since,
            "author" => BlockTagKind::Author,
            "version" => BlockTagKind::Version,
            "serial" => BlockTagKind::Serial,
            "serialData" => BlockTagKind::SerialData,
            "serialField" => BlockTagKind::SerialField,
            "deprecated" => BlockTagKind::Deprecated,
            _ => BlockTagKind::Unknown,
        }
    }

    /// Tags whose first word is an argument rather than description.
    pub fn takes_argument(self) -> bool {
        matches!(
            self,
            BlockTagKind::Param
                | BlockTagKind::Throws
                | BlockTagKind::Exception
                | BlockTagKind::SerialField
        )
    }
}

/// `@name argument content`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTag {
    pub kind: BlockTagKind,
    pub name: SmolStr,
    pub argument: Option<String>,
    pub content: Vec<DocTree>,
    /// Lines of the comment this tag was parsed from, counted from the comment's first line.
    pub source_lines: Option<Range<usize>>,
}

impl BlockTag {
    pub fn same_content(&self, other: &BlockTag) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.argument == other.argument
            && self.content == other.content
    }
}

/// Render inline content as it appears inside a doc comment.
pub fn doc_text(trees: &[DocTree]) -> String {
    let mut out = String::new();
    for tree in trees {
        match tree {
            DocTree::Text(text) => out.push_str(text),
            DocTree::Inline(tag) => {
                out.push_str("{@");
                out.push_str(&tag.name);
                if let Some(reference) = &tag.reference {
                    out.push(' ');
                    out.push_str(reference);
                }
                let content = doc_text(&tag.content);
                if !content.is_empty() {
                    out.push(' ');
                    out.push_str(&content);
                }
                out.push('}');
            }
        }
    }
    out
}

/// Constructors for doc trees built by callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocTreeMaker;

impl DocTreeMaker {
    pub fn new() -> Self {
        Self
    }

    pub fn doc_comment(
        &self,
        style: DocStyle,
        first_sentence: Vec<DocTree>,
        body: Vec<DocTree>,
        block_tags: Vec<BlockTag>,
    ) -> DocCommentTree {
        DocCommentTree {
            style,
            first_sentence,
            body,
            block_tags,
        }
    }

    pub fn text(&self, text: impl Into<String>) -> DocTree {
        DocTree::Text(text.into())
    }

    fn inline(&self, kind: InlineTagKind, name: &str, reference: Option<String>, content: Vec<DocTree>) -> DocTree {
        DocTree::Inline(InlineTag {
            kind,
            name: SmolStr::new(name),
            reference,
            content,
        })
    }

    pub fn link(&self, reference: impl Into<String>, label: Vec<DocTree>) -> DocTree {
        self.inline(InlineTagKind::Link, "link", Some(reference.into()), label)
    }

    pub fn link_plain(&self, reference: impl Into<String>, label: Vec<DocTree>) -> DocTree {
        self.inline(InlineTagKind::LinkPlain, "linkplain", Some(reference.into()), label)
    }

    pub fn value(&self, reference: Option<String>) -> DocTree {
        self.inline(InlineTagKind::Value, "value", reference, Vec::new())
    }

    pub fn code(&self, text: impl Into<String>) -> DocTree {
        self.inline(InlineTagKind::Code, "code", None, vec![self.text(text)])
    }

    pub fn literal(&self, text: impl Into<String>) -> DocTree {
        self.inline(InlineTagKind::Literal, "literal", None, vec![self.text(text)])
    }

    pub fn inherit_doc(&self) -> DocTree {
        self.inline(InlineTagKind::InheritDoc, "inheritDoc", None, Vec::new())
    }

    pub fn doc_root(&self) -> DocTree {
        self.inline(InlineTagKind::DocRoot, "docRoot", None, Vec::new())
    }

    pub fn unknown_inline(&self, name: &str, content: Vec<DocTree>) -> DocTree {
        self.inline(InlineTagKind::Unknown, name, None, content)
    }

    fn block(&self, kind: BlockTagKind, name: &str, argument: Option<String>, content: Vec<DocTree>) -> BlockTag {
        BlockTag {
            kind,
            name: SmolStr::new(name),
            argument,
            content,
            source_lines: None,
        }
    }

    pub fn param(&self, name: impl Into<String>, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Param, "param", Some(name.into()), description)
    }

    /// `@param <T> description`
    pub fn type_param(&self, name: &str, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Param, "param", Some(format!("<{name}>")), description)
    }

    pub fn return_tag(&self, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Return, "return", None, description)
    }

    pub fn throws(&self, ty: impl Into<String>, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Throws, "throws", Some(ty.into()), description)
    }

    pub fn exception(&self, ty: impl Into<String>, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Exception, "exception", Some(ty.into()), description)
    }

    pub fn see(&self, reference: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::See, "see", None, reference)
    }

    pub fn since(&self, text: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Since, "since", None, text)
    }

    pub fn author(&self, name: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Author, "author", None, name)
    }

    pub fn version(&self, text: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Version, "version", None, text)
    }

    pub fn serial(&self, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Serial, "serial", None, description)
    }

    pub fn serial_data(&self, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::SerialData, "serialData", None, description)
    }

    pub fn serial_field(&self, name: &str, ty: &str, description: Vec<DocTree>) -> BlockTag {
        let mut content = vec![self.text(ty)];
        if !description.is_empty() {
            content.push(self.text(" "));
            content.extend(description);
        }
        self.block(BlockTagKind::SerialField, "serialField", Some(name.to_string()), content)
    }

    pub fn deprecated(&self, description: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Deprecated, "deprecated", None, description)
    }

    pub fn unknown_block(&self, name: &str, content: Vec<DocTree>) -> BlockTag {
        self.block(BlockTagKind::Unknown, name, None, content)
    }
}

impl InlineTag {
    pub fn takes_reference(&self) -> bool {
        self.kind.takes_reference()
    }
}
