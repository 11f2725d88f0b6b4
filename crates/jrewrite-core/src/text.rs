//! Text model primitives: sizes, ranges and line lookup.

pub use text_size::{TextRange, TextSize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = Vec::with_capacity(128);
        let mut line_ends = Vec::with_capacity(128);
        line_starts.push(TextSize::from(0));

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        line_ends.push(TextSize::from(i as u32));
                        line_starts.push(TextSize::from((i + 2) as u32));
                        i += 2;
                    } else {
                        line_ends.push(TextSize::from(i as u32));
                        line_starts.push(TextSize::from((i + 1) as u32));
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }

    #[inline]
    pub fn line_end(&self, line: u32) -> Option<TextSize> {
        self.line_ends.get(line as usize).copied()
    }

    /// Zero-based line number containing `offset`.
    pub fn line_of(&self, offset: TextSize) -> u32 {
        // Offsets past the end are clamped; callers pass `text_len` for EOF.
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        };
        line as u32
    }

    /// Returns `true` when both offsets lie on the same line.
    pub fn same_line(&self, a: TextSize, b: TextSize) -> bool {
        self.line_of(a) == self.line_of(b)
    }

    /// Number of line breaks between two offsets (`a <= b`).
    pub fn lines_between(&self, a: TextSize, b: TextSize) -> u32 {
        self.line_of(b).saturating_sub(self.line_of(a))
    }

    /// Convert a byte offset to a UTF-8 (byte) line/column pair.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = self.line_of(offset) as usize;
        let line_start = self.line_starts[line];
        let line_end = self.line_ends[line];
        let col = offset.min(line_end) - line_start;
        LineCol {
            line: line as u32,
            col: u32::from(col),
        }
    }

    /// Convert a UTF-8 (byte) line/column pair to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = self.line_start(line_col.line)?;
        let end = self.line_end(line_col.line)?;
        let offset = start + TextSize::from(line_col.col);
        if offset > end {
            return None;
        }
        Some(offset)
    }
}
