//! Parsing of `/** */` and `///` comment text into [`DocCommentTree`]s.

use smol_str::SmolStr;

use crate::doc::{BlockTag, BlockTagKind, DocCommentTree, DocStyle, DocTree, InlineTag, InlineTagKind};

/// Parse the full text of a documentation comment, delimiters included.
pub fn parse_doc_comment(text: &str, style: DocStyle) -> DocCommentTree {
    let lines = content_lines(text, style);

    let first_tag = lines
        .iter()
        .position(|(_, line)| starts_block_tag(line))
        .unwrap_or(lines.len());

    let description = join_trimmed(lines[..first_tag].iter().map(|(_, l)| l.as_str()));
    let (first_sentence, body) = split_first_sentence(&description);

    let mut block_tags = Vec::new();
    let mut idx = first_tag;
    while idx < lines.len() {
        let mut end = idx + 1;
        while end < lines.len() && !starts_block_tag(&lines[end].1) {
            end += 1;
        }
        let mut last = end;
        while last > idx + 1 && lines[last - 1].1.is_empty() {
            last -= 1;
        }
        let text = lines[idx..last]
            .iter()
            .map(|(_, l)| l.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let mut tag = parse_block_tag(&text);
        tag.source_lines = Some(lines[idx].0..lines[last - 1].0 + 1);
        block_tags.push(tag);
        idx = end;
    }

    DocCommentTree {
        style,
        first_sentence: parse_inline(first_sentence),
        body: parse_inline(body),
        block_tags,
    }
}

/// The content of each comment line, without delimiters or `*` margins, tagged with the line's
/// index within the comment.
fn content_lines(text: &str, style: DocStyle) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    match style {
        DocStyle::Javadoc => {
            let inner = text.strip_prefix("/**").unwrap_or(text);
            let inner = inner.strip_suffix("*/").unwrap_or(inner);
            for (idx, line) in inner.split('\n').enumerate() {
                let mut line = line.trim_end();
                if idx > 0 {
                    line = line.trim_start();
                    if let Some(rest) = line.strip_prefix('*') {
                        line = rest;
                    }
                }
                let line = line.strip_prefix(' ').unwrap_or(line);
                out.push((idx, line.to_string()));
            }
        }
        DocStyle::Markdown => {
            for (idx, line) in text.split('\n').enumerate() {
                let line = line.trim();
                let line = line.strip_prefix("///").unwrap_or(line);
                let line = line.strip_prefix(' ').unwrap_or(line);
                out.push((idx, line.trim_end().to_string()));
            }
        }
    }
    out
}

fn starts_block_tag(line: &str) -> bool {
    let mut chars = line.trim_start().chars();
    chars.next() == Some('@') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn join_trimmed<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let lines: Vec<&str> = lines.collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |e| e + 1);
    lines[start..end].join("\n")
}

/// The first sentence ends after the first `.` followed by whitespace, or at the first blank line.
fn split_first_sentence(text: &str) -> (&str, &str) {
    let blank = text.find("\n\n");
    let bytes = text.as_bytes();
    let period = bytes.iter().enumerate().find_map(|(idx, b)| {
        let followed_by_space = bytes.get(idx + 1).map_or(true, |next| next.is_ascii_whitespace());
        (*b == b'.' && followed_by_space).then_some(idx + 1)
    });
    let split = match (period, blank) {
        (Some(p), Some(b)) => p.min(b),
        (Some(p), None) => p,
        (None, Some(b)) => b,
        (None, None) => text.len(),
    };
    (text[..split].trim_end(), text[split..].trim_start())
}

fn parse_block_tag(text: &str) -> BlockTag {
    let text = text.trim_start();
    let after_at = &text[1..];
    let name_len = after_at
        .find(|c: char| c.is_whitespace())
        .unwrap_or(after_at.len());
    let name = &after_at[..name_len];
    let kind = BlockTagKind::from_name(name);
    let mut rest = after_at[name_len..].trim_start();

    let mut argument = None;
    if kind.takes_argument() && !rest.is_empty() {
        let arg_len = rest.find(|c: char| c.is_whitespace()).unwrap_or(rest.len());
        argument = Some(rest[..arg_len].to_string());
        rest = rest[arg_len..].trim_start();
    }

    BlockTag {
        kind,
        name: SmolStr::new(name),
        argument,
        content: parse_inline(rest),
        source_lines: None,
    }
}

/// Split text into plain runs and `{@...}` inline tags.
pub fn parse_inline(text: &str) -> Vec<DocTree> {
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(found) = text[cursor..].find("{@") {
        let open = cursor + found;
        let Some(close) = matching_brace(text, open) else {
            break;
        };
        if open > cursor {
            out.push(DocTree::Text(text[cursor..open].to_string()));
        }
        out.push(DocTree::Inline(parse_inline_tag(&text[open + 2..close])));
        cursor = close + 1;
    }
    if cursor < text.len() {
        out.push(DocTree::Text(text[cursor..].to_string()));
    }
    out
}

fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_inline_tag(inner: &str) -> InlineTag {
    let name_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = &inner[..name_len];
    let kind = InlineTagKind::from_name(name);
    let rest = inner[name_len..].trim_start();

    let (reference, content) = match kind {
        InlineTagKind::Code | InlineTagKind::Literal => {
            let content = if rest.is_empty() {
                Vec::new()
            } else {
                vec![DocTree::Text(rest.to_string())]
            };
            (None, content)
        }
        InlineTagKind::Link | InlineTagKind::LinkPlain | InlineTagKind::Value => {
            if rest.is_empty() {
                (None, Vec::new())
            } else {
                let ref_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
                (
                    Some(rest[..ref_len].to_string()),
                    parse_inline(rest[ref_len..].trim_start()),
                )
            }
        }
        InlineTagKind::InheritDoc | InlineTagKind::DocRoot => (None, Vec::new()),
        InlineTagKind::Unknown => (None, parse_inline(rest)),
    };

    InlineTag {
        kind,
        name: SmolStr::new(name),
        reference,
        content,
    }
}
