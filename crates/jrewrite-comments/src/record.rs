use jrewrite_core::{leading_whitespace, TextRange};

/// Index of an original comment in its [`CommentIndex`](crate::CommentIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommentId(pub(crate) u32);

impl CommentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentStyle {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Javadoc,
    /// A run of `///` lines.
    Markdown,
}

impl CommentStyle {
    pub fn is_doc(self) -> bool {
        matches!(self, CommentStyle::Javadoc | CommentStyle::Markdown)
    }

    /// Whether the comment runs to the end of its line.
    pub fn ends_line(self) -> bool {
        matches!(self, CommentStyle::Line | CommentStyle::Markdown)
    }
}

/// Where a comment sits relative to its anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativePosition {
    /// On its own line(s) before the anchor.
    Preceding,
    /// After the anchor, on the line where the anchor ends.
    Trailing,
    /// Before the anchor on a line that also holds code, or dangling inside the anchor.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentBody {
    /// Text copied from a source file, delimiters included. `column` is the indentation of the
    /// line the comment started on.
    Raw { text: String, column: usize },
    /// Caller-provided content. Text starting with `/` is taken to carry its own delimiters.
    Content(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    /// Set for comments found in an original file.
    pub id: Option<CommentId>,
    pub style: CommentStyle,
    pub body: CommentBody,
    pub position: RelativePosition,
    pub span: Option<TextRange>,
}

impl CommentRecord {
    /// A caller-created comment with no source position.
    pub fn create(style: CommentStyle, content: impl Into<String>) -> Self {
        Self {
            id: None,
            style,
            body: CommentBody::Content(content.into()),
            position: RelativePosition::Preceding,
            span: None,
        }
    }

    pub fn is_original(&self) -> bool {
        self.id.is_some()
    }

    /// The comment text as it would be written at column zero.
    pub fn text(&self) -> String {
        self.render("")
    }

    /// Render the comment for output whose first line starts after `indent`.
    ///
    /// Continuation lines are prefixed with `indent`. The result never ends with a newline.
    pub fn render(&self, indent: &str) -> String {
        match &self.body {
            CommentBody::Raw { text, column } => reindent_raw(text, *column, indent),
            CommentBody::Content(content) if content.starts_with('/') => {
                reindent_delimited(content, indent)
            }
            CommentBody::Content(content) => wrap_content(self.style, content, indent),
        }
    }
}

fn reindent_raw(text: &str, column: usize, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
            let ws = leading_whitespace(line);
            if ws.len() >= column {
                if !line[ws.len()..].trim().is_empty() {
                    out.push_str(indent);
                }
                out.push_str(&line[column..]);
                continue;
            }
        }
        out.push_str(line);
    }
    out
}

fn reindent_delimited(content: &str, indent: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim_start();
        if idx > 0 {
            out.push('\n');
            out.push_str(indent);
            if line.starts_with('*') {
                out.push(' ');
            }
        }
        out.push_str(line);
    }
    out
}

fn wrap_content(style: CommentStyle, content: &str, indent: &str) -> String {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let mut out = String::new();
    match style {
        CommentStyle::Line | CommentStyle::Markdown => {
            let marker = if style == CommentStyle::Line { "//" } else { "///" };
            for (idx, line) in lines.iter().enumerate() {
                if idx > 0 {
                    out.push('\n');
                    out.push_str(indent);
                }
                out.push_str(marker);
                if !line.is_empty() {
                    out.push(' ');
                    out.push_str(line);
                }
            }
            if lines.is_empty() {
                out.push_str(marker);
            }
        }
        CommentStyle::Block => {
            out.push_str("/* ");
            for (idx, line) in lines.iter().enumerate() {
                if idx > 0 {
                    out.push('\n');
                    out.push_str(indent);
                    out.push_str(" * ");
                }
                out.push_str(line);
            }
            out.push_str(" */");
        }
        CommentStyle::Javadoc => {
            out.push_str("/**");
            for line in &lines {
                out.push('\n');
                out.push_str(indent);
                out.push_str(" *");
                if !line.is_empty() {
                    out.push(' ');
                    out.push_str(line);
                }
            }
            out.push('\n');
            out.push_str(indent);
            out.push_str(" */");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn javadoc_content_is_wrapped() {
        let comment = CommentRecord::create(CommentStyle::Javadoc, "Test comment");
        assert_eq!(comment.render("    "), "/**\n     * Test comment\n     */");
    }

    #[test]
    fn line_and_block_content() {
        assert_eq!(CommentRecord::create(CommentStyle::Line, "note").render("  "), "// note");
        assert_eq!(
            CommentRecord::create(CommentStyle::Block, "a\nb").render("  "),
            "/* a\n   * b */"
        );
    }

    #[test]
    fn delimited_content_is_kept() {
        let comment = CommentRecord::create(CommentStyle::Block, "/*\n * x\n */");
        assert_eq!(comment.render("\t"), "/*\n\t * x\n\t */");
    }

    #[test]
    fn raw_text_follows_new_indent() {
        let record = CommentRecord {
            id: None,
            style: CommentStyle::Javadoc,
            body: CommentBody::Raw {
                text: "/**\n         * Doc.\n\n         */".to_string(),
                column: 8,
            },
            position: RelativePosition::Preceding,
            span: None,
        };
        assert_eq!(record.render("    "), "/**\n     * Doc.\n\n     */");
    }

    #[test]
    fn raw_lines_left_of_the_column_are_untouched() {
        let record = CommentRecord {
            id: None,
            style: CommentStyle::Block,
            body: CommentBody::Raw {
                text: "/*\n*/".to_string(),
                column: 8,
            },
            position: RelativePosition::Trailing,
            span: None,
        };
        assert_eq!(record.render("    "), "/*\n*/");
    }
}
