use crate::doc::{doc_text, BlockTag, DocCommentTree, DocStyle};

/// Content lines of `doc`: the description (one empty line when there is none) then each tag.
pub fn doc_lines(doc: &DocCommentTree) -> Vec<String> {
    let mut lines = description_lines(doc);
    for tag in &doc.block_tags {
        lines.extend(block_tag_lines(tag));
    }
    lines
}

pub fn description_lines(doc: &DocCommentTree) -> Vec<String> {
    let mut description = doc_text(&doc.first_sentence);
    let body = doc_text(&doc.body);
    if !body.is_empty() {
        if !description.is_empty() {
            description.push('\n');
        }
        description.push_str(&body);
    }
    description.split('\n').map(str::to_string).collect()
}

pub fn block_tag_lines(tag: &BlockTag) -> Vec<String> {
    let mut text = format!("@{}", tag.name);
    if let Some(argument) = &tag.argument {
        text.push(' ');
        text.push_str(argument);
    }
    let content = doc_text(&tag.content);
    if !content.is_empty() {
        text.push(' ');
        text.push_str(&content);
    }
    text.split('\n').map(str::to_string).collect()
}

/// One content line with its comment margin, without indentation.
pub fn doc_line(style: DocStyle, line: &str) -> String {
    let marker = match style {
        DocStyle::Javadoc => " *",
        DocStyle::Markdown => "///",
    };
    if line.is_empty() {
        marker.to_string()
    } else {
        format!("{marker} {line}")
    }
}

/// Print `doc` as a comment whose first line starts after `indent`.
pub fn print_doc_comment(doc: &DocCommentTree, indent: &str) -> String {
    let lines = doc_lines(doc);
    let mut out = String::new();
    match doc.style {
        DocStyle::Javadoc => {
            out.push_str("/**");
            for line in &lines {
                out.push('\n');
                out.push_str(indent);
                out.push_str(&doc_line(DocStyle::Javadoc, line));
            }
            out.push('\n');
            out.push_str(indent);
            out.push_str(" */");
        }
        DocStyle::Markdown => {
            for (idx, line) in lines.iter().enumerate() {
                if idx > 0 {
                    out.push('\n');
                    out.push_str(indent);
                }
                out.push_str(&doc_line(DocStyle::Markdown, line));
            }
        }
    }
    out
}
