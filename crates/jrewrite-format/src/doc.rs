//! A small Prettier/Wadler-Leijen style document model and pretty printer.
//!
//! The core ideas:
//! - [`Doc`] is a composable document tree (text, concatenation, line breaks, groups, indentation).
//! - [`print`] renders a [`Doc`] to a `String` using a deterministic algorithm inspired by
//!   Prettier's printer.
//! - [`Group`](Doc::group) tries to render its contents in [`Mode::Flat`] (no line breaks), but
//!   falls back to [`Mode::Break`] when it doesn't fit within `max_width`.
//! - [`Verbatim`](Doc::verbatim) embeds already-rendered multi-line text (reused source, comments)
//!   and shifts its continuation lines to the indentation in effect where it lands.
//!
//! Width is approximated using `text.len()` for ASCII and `text.chars().count()` otherwise.

use std::borrow::Cow;
use std::rc::Rc;

use jrewrite_core::{indent_width, shift_indent, whitespace_for_width, IndentUnit};

/// Rendering configuration for [`print`].
#[derive(Debug, Clone, Copy)]
pub struct PrintConfig {
    pub max_width: usize,
    pub indent: IndentUnit,
    pub newline: &'static str,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            max_width: 100,
            indent: IndentUnit::default(),
            newline: "\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A regular line break: `" "` in flat mode, `config.newline` in break mode.
    Line,
    /// A soft line break: `""` in flat mode, `config.newline` in break mode.
    Soft,
    /// A hard line break: always `config.newline`, and forces any containing group to break.
    Hard,
}

#[derive(Debug)]
enum DocKind<'a> {
    Nil,
    Text(Cow<'a, str>),
    Concat(Vec<Doc<'a>>),
    Group(Doc<'a>),
    Nest(usize, Doc<'a>),
    /// Increase indentation by one `PrintConfig::indent` unit.
    Indent(Doc<'a>),
    Line(LineKind),
    /// Deferred content that is printed at the end of the current line.
    ///
    /// Used for trailing line comments (`// ...`) which must be rendered before the line break
    /// that ends the current line.
    LineSuffix(Doc<'a>),
    /// Pre-rendered text whose lines after the first were written for column `base`.
    Verbatim { text: Cow<'a, str>, base: usize },
}

/// A composable pretty-printing document.
///
/// `Doc` is cheaply cloneable (internally reference counted) so the printer can perform `fits()`
/// lookahead without copying the full tree.
#[derive(Clone, Debug)]
pub struct Doc<'a>(Rc<DocKind<'a>>);

impl<'a> Doc<'a> {
    fn new(kind: DocKind<'a>) -> Self {
        Self(Rc::new(kind))
    }

    fn kind(&self) -> &DocKind<'a> {
        self.0.as_ref()
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self.kind(), DocKind::Nil)
    }

    pub fn nil() -> Self {
        Self::new(DocKind::Nil)
    }

    pub fn text<T>(text: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Self::new(DocKind::Text(text.into()))
    }

    /// Already rendered text. Lines after the first are re-indented from column `base` to the
    /// indentation in effect when the text is printed.
    pub fn verbatim<T>(text: T, base: usize) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        let text = text.into();
        if text.contains('\n') {
            Self::new(DocKind::Verbatim { text, base })
        } else {
            Self::new(DocKind::Text(text))
        }
    }

    /// Concatenate documents in order.
    ///
    /// Empty docs are discarded and nested concatenations are flattened.
    pub fn concat<I>(docs: I) -> Self
    where
        I: IntoIterator<Item = Doc<'a>>,
    {
        let mut parts = Vec::new();
        for doc in docs {
            match doc.kind() {
                DocKind::Nil => {}
                DocKind::Concat(inner) => parts.extend(inner.iter().cloned()),
                _ => parts.push(doc),
            }
        }

        match parts.pop() {
            None => Self::nil(),
            Some(only) if parts.is_empty() => only,
            Some(last) => {
                parts.push(last);
                Self::new(DocKind::Concat(parts))
            }
        }
    }

    pub fn group(self) -> Self {
        Self::new(DocKind::Group(self))
    }

    /// Increase indentation by `columns` for contained line breaks.
    pub fn nest(self, columns: usize) -> Self {
        Self::new(DocKind::Nest(columns, self))
    }

    /// Increase indentation by one unit for contained line breaks.
    pub fn indent(self) -> Self {
        Self::new(DocKind::Indent(self))
    }

    pub fn line() -> Self {
        Self::new(DocKind::Line(LineKind::Line))
    }

    pub fn softline() -> Self {
        Self::new(DocKind::Line(LineKind::Soft))
    }

    pub fn hardline() -> Self {
        Self::new(DocKind::Line(LineKind::Hard))
    }

    pub fn line_suffix(doc: Doc<'a>) -> Self {
        Self::new(DocKind::LineSuffix(doc))
    }

    /// Join `docs` with `separator` between each element.
    pub fn join<I>(separator: Doc<'a>, docs: I) -> Self
    where
        I: IntoIterator<Item = Doc<'a>>,
    {
        let mut parts = Vec::new();
        for doc in docs {
            if doc.is_nil() {
                continue;
            }
            if !parts.is_empty() {
                parts.push(separator.clone());
            }
            parts.push(doc);
        }
        Self::concat(parts)
    }
}

#[derive(Clone, Debug)]
struct Command<'a> {
    indent: usize,
    mode: Mode,
    doc: Doc<'a>,
}

/// Render `doc` to a `String`, starting at column zero.
#[must_use]
pub fn print(doc: Doc<'_>, config: PrintConfig) -> String {
    print_at(doc, config, 0)
}

/// Render `doc` as if the output starts at column `indent` of a line whose indentation is
/// `indent`. The first line is not prefixed; line breaks return to `indent`.
#[must_use]
pub fn print_at<'a>(doc: Doc<'a>, config: PrintConfig, indent: usize) -> String {
    let mut out = String::new();
    let mut pos: usize = indent;

    let mut stack = vec![Command {
        indent,
        mode: Mode::Break,
        doc,
    }];

    let mut line_suffixes: Vec<Command<'a>> = Vec::new();

    loop {
        let Some(Command { indent, mode, doc }) = stack.pop() else {
            if line_suffixes.is_empty() {
                break;
            }
            flush_line_suffixes(&mut stack, &mut line_suffixes);
            continue;
        };

        match doc.kind() {
            DocKind::Nil => {}
            DocKind::Text(text) => {
                out.push_str(text);
                pos = pos.saturating_add(text_width(text));
            }
            DocKind::Verbatim { text, base } => {
                let delta = indent as isize - *base as isize;
                let shifted = shift_indent(text, delta, config.indent);
                out.push_str(&shifted);
                pos = match shifted.rfind('\n') {
                    Some(nl) => indent_width(&shifted[nl + 1..], config.indent.width.max(1)),
                    None => pos.saturating_add(text_width(&shifted)),
                };
            }
            DocKind::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push(Command {
                        indent,
                        mode,
                        doc: part.clone(),
                    });
                }
            }
            DocKind::Group(inner) => {
                let next_mode = match mode {
                    Mode::Flat => Mode::Flat,
                    Mode::Break => {
                        let remaining_width = config.max_width as isize - pos as isize;
                        let lookahead = [Command {
                            indent,
                            mode: Mode::Flat,
                            doc: inner.clone(),
                        }];
                        if fits(remaining_width, &stack, &lookahead) {
                            Mode::Flat
                        } else {
                            Mode::Break
                        }
                    }
                };
                stack.push(Command {
                    indent,
                    mode: next_mode,
                    doc: inner.clone(),
                });
            }
            DocKind::Nest(columns, inner) => stack.push(Command {
                indent: indent.saturating_add(*columns),
                mode,
                doc: inner.clone(),
            }),
            DocKind::Indent(inner) => stack.push(Command {
                indent: indent.saturating_add(config.indent.width),
                mode,
                doc: inner.clone(),
            }),
            DocKind::Line(kind) => {
                let will_break = mode == Mode::Break || *kind == LineKind::Hard;

                if will_break && !line_suffixes.is_empty() {
                    stack.push(Command {
                        indent,
                        mode,
                        doc: doc.clone(),
                    });
                    flush_line_suffixes(&mut stack, &mut line_suffixes);
                    continue;
                }

                if will_break {
                    trim_trailing_whitespace(&mut out);
                    out.push_str(config.newline);
                    out.push_str(&whitespace_for_width(indent, config.indent));
                    pos = indent;
                } else if *kind == LineKind::Line {
                    out.push(' ');
                    pos = pos.saturating_add(1);
                }
            }
            DocKind::LineSuffix(inner) => {
                line_suffixes.push(Command {
                    indent,
                    mode,
                    doc: inner.clone(),
                });
            }
        }
    }

    out
}

fn trim_trailing_whitespace(out: &mut String) {
    while matches!(out.as_bytes().last(), Some(b' ' | b'\t')) {
        out.pop();
    }
}

fn text_width(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().count()
    }
}

fn flush_line_suffixes<'a>(stack: &mut Vec<Command<'a>>, line_suffixes: &mut Vec<Command<'a>>) {
    // `line_suffixes` is stored in insertion order. We push them onto the stack in reverse so they
    // are popped/printed in the original order.
    for cmd in line_suffixes.drain(..).rev() {
        stack.push(cmd);
    }
}

fn fits<'a>(
    mut remaining_width: isize,
    base_stack: &[Command<'a>],
    lookahead: &[Command<'a>],
) -> bool {
    // Cap the amount of work `fits` can do to avoid pathological O(n^2) behavior with deeply
    // nested groups. If we hit the cap, prefer breaking to keep output deterministic.
    const MAX_STEPS: usize = 32_768;
    let mut steps = 0usize;

    let mut idx = base_stack.len();
    let mut stack: Vec<Command<'a>> = lookahead.to_vec();

    while remaining_width >= 0 {
        if steps >= MAX_STEPS {
            return false;
        }
        steps += 1;

        let cmd = if let Some(cmd) = stack.pop() {
            cmd
        } else if idx > 0 {
            idx -= 1;
            base_stack[idx].clone()
        } else {
            return true;
        };

        let Command { indent, mode, doc } = cmd;
        match doc.kind() {
            DocKind::Nil | DocKind::LineSuffix(_) => {}
            DocKind::Text(text) => remaining_width -= text_width(text) as isize,
            // Multi-line text never fits on one line.
            DocKind::Verbatim { .. } => return mode == Mode::Break,
            DocKind::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push(Command {
                        indent,
                        mode,
                        doc: part.clone(),
                    });
                }
            }
            DocKind::Group(inner) | DocKind::Nest(_, inner) | DocKind::Indent(inner) => {
                stack.push(Command {
                    indent,
                    mode,
                    doc: inner.clone(),
                })
            }
            DocKind::Line(kind) => match mode {
                Mode::Flat => match kind {
                    LineKind::Line => remaining_width -= 1,
                    LineKind::Soft => {}
                    LineKind::Hard => return false,
                },
                Mode::Break => return true,
            },
        }
    }

    false
}
