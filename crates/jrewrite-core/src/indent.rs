//! Line and indentation helpers over raw source text.
//!
//! Offsets are byte offsets into the text. All helpers treat `\n` as the line terminator; a
//! preceding `\r` is kept as part of the line content.

/// How one level of indentation is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentUnit {
    pub width: usize,
    pub use_tabs: bool,
}

impl Default for IndentUnit {
    fn default() -> Self {
        Self {
            width: 4,
            use_tabs: false,
        }
    }
}

impl IndentUnit {
    /// Whitespace for `levels` indentation levels.
    pub fn levels(&self, levels: usize) -> String {
        whitespace_for_width(levels * self.width, *self)
    }
}

/// Offset of the first byte of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |nl| nl + 1)
}

/// Offset of the `\n` terminating the line containing `offset`, or `text.len()`.
pub fn line_end(text: &str, offset: usize) -> usize {
    text[offset..].find('\n').map_or(text.len(), |nl| offset + nl)
}

/// Offset just past the `\n` terminating the line containing `offset`.
pub fn next_line_start(text: &str, offset: usize) -> usize {
    let end = line_end(text, offset);
    if end < text.len() {
        end + 1
    } else {
        end
    }
}

/// The leading whitespace of the line containing `offset`.
pub fn line_indent(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    leading_whitespace(&text[start..])
}

/// The leading spaces and tabs of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let len = line
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[..len]
}

/// Returns `true` when only whitespace precedes `offset` on its line.
pub fn is_blank_before(text: &str, offset: usize) -> bool {
    text[line_start(text, offset)..offset]
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
}

/// Returns `true` when only whitespace follows `offset` up to the end of its line.
pub fn ends_line(text: &str, offset: usize) -> bool {
    text[offset..line_end(text, offset)]
        .bytes()
        .all(|b| b == b' ' || b == b'\t' || b == b'\r')
}

/// Visual width of a run of leading whitespace, expanding tabs to `tab_width` columns.
pub fn indent_width(ws: &str, tab_width: usize) -> usize {
    ws.chars().fold(0, |col, ch| match ch {
        '\t' => (col / tab_width + 1) * tab_width,
        _ => col + 1,
    })
}

/// Whitespace spanning `width` columns written in `unit`'s style.
pub fn whitespace_for_width(width: usize, unit: IndentUnit) -> String {
    if unit.use_tabs && unit.width > 0 {
        let mut out = "\t".repeat(width / unit.width);
        out.push_str(&" ".repeat(width % unit.width));
        out
    } else {
        " ".repeat(width)
    }
}

/// The indentation `text` is written with, judged from its indented lines.
///
/// Tab-indented lines against space-indented lines decide the style; tabs count `tab_width`
/// columns. For spaces the width is the most common increase in indentation from one line to the
/// next. Comment continuation lines (` * ...`) are skipped. Returns `None` when nothing is
/// indented.
pub fn infer_indent_unit(text: &str, tab_width: usize) -> Option<IndentUnit> {
    let tab_width = tab_width.max(1);
    let (mut tabs, mut spaces) = (0usize, 0usize);
    let mut steps = [0usize; 9];
    let mut prev = 0;
    for line in text.lines() {
        let ws = leading_whitespace(line);
        let rest = line[ws.len()..].trim_end();
        if rest.is_empty() || rest.starts_with('*') {
            continue;
        }
        if ws.starts_with('\t') {
            tabs += 1;
        } else if !ws.is_empty() {
            spaces += 1;
        }
        let width = indent_width(ws, tab_width);
        if width > prev && width - prev < steps.len() {
            steps[width - prev] += 1;
        }
        prev = width;
    }

    if tabs == 0 && spaces == 0 {
        return None;
    }
    if tabs > spaces {
        return Some(IndentUnit {
            width: tab_width,
            use_tabs: true,
        });
    }
    let width = (2..steps.len())
        .filter(|step| steps[*step] > 0)
        .max_by_key(|step| (steps[*step], std::cmp::Reverse(*step)))
        .unwrap_or(tab_width);
    Some(IndentUnit {
        width,
        use_tabs: false,
    })
}

/// Shift every line after the first by `delta` columns.
///
/// Whitespace-only lines are left as they are. Lines indented less than `-delta` are flushed to
/// column zero rather than truncated.
pub fn shift_indent(text: &str, delta: isize, unit: IndentUnit) -> String {
    if delta == 0 || !text.contains('\n') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 16);
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        if idx == 0 {
            out.push_str(line);
            continue;
        }
        let ws = leading_whitespace(line);
        let rest = &line[ws.len()..];
        if rest.trim().is_empty() {
            out.push_str(line);
            continue;
        }
        let width = indent_width(ws, unit.width.max(1)) as isize + delta;
        out.push_str(&whitespace_for_width(width.max(0) as usize, unit));
        out.push_str(rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_queries() {
        let text = "class A {\n    int x; // c\n}";
        let field = text.find("int").unwrap();
        assert_eq!(line_start(text, field), 10);
        assert_eq!(line_indent(text, field), "    ");
        assert!(is_blank_before(text, field));
        assert!(!ends_line(text, field));
        assert!(ends_line(text, text.find("// c").unwrap() + 4));
        assert_eq!(next_line_start(text, field), text.find('}').unwrap());
    }

    #[test]
    fn shift_keeps_relative_layout() {
        let block = "/*\n     * Test\n     */";
        assert_eq!(
            shift_indent(block, 4, IndentUnit::default()),
            "/*\n         * Test\n         */"
        );
        assert_eq!(
            shift_indent("{\n        x();\n\n    }", -4, IndentUnit::default()),
            "{\n    x();\n\n}"
        );
    }

    #[test]
    fn indent_unit_follows_the_text() {
        let tabs = "class A {\n\tvoid m() {\n\t\ta();\n\t}\n}\n";
        assert_eq!(
            infer_indent_unit(tabs, 4),
            Some(IndentUnit {
                width: 4,
                use_tabs: true
            })
        );

        let two = "class A {\n  /**\n   * Doc.\n   */\n  void m() {\n    a(1,\n        2);\n  }\n}\n";
        assert_eq!(
            infer_indent_unit(two, 4),
            Some(IndentUnit {
                width: 2,
                use_tabs: false
            })
        );

        assert_eq!(infer_indent_unit("class A {}\n", 4), None);
    }

    #[test]
    fn tabs_expand_to_unit_width() {
        let unit = IndentUnit {
            width: 4,
            use_tabs: true,
        };
        assert_eq!(indent_width("\t  ", 4), 6);
        assert_eq!(whitespace_for_width(10, unit), "\t\t  ");
        assert_eq!(unit.levels(2), "\t\t");
    }
}
