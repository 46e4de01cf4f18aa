use crate::token::Position;

const BOM: &str = "\u{FEFF}";

/// Read position over an immutable source string.
///
/// Lookahead past the end yields `None` rather than failing, and
/// `forward` at the end is a no-op.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `source`, skipping a UTF-8 BOM.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let offset = if source.starts_with(BOM) {
            BOM.len()
        } else {
            0
        };
        Self {
            source,
            offset,
            position: Position::START,
        }
    }

    #[must_use]
    pub const fn eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[must_use]
    pub fn peek_next(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    #[must_use]
    pub fn peek_next_next(&self) -> Option<char> {
        self.rest().chars().nth(2)
    }

    /// Advance one character, tracking line and column.
    pub fn forward(&mut self) {
        let Some(ch) = self.peek() else {
            return;
        };
        self.offset += ch.len_utf8();
        self.position.index += 1;
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
    }

    /// Advance over `count` characters.
    pub fn forward_by(&mut self, count: usize) {
        for _ in 0..count {
            self.forward();
        }
    }

    /// Skip spaces and tabs. Newlines are significant and left in place.
    /// Returns whether anything was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        let before = self.offset;
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.forward();
        }
        self.offset != before
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Byte offset of the read position, for use with [`Cursor::slice_from`].
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Source text between an earlier offset and the read position.
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.offset]
    }

    /// Unread remainder of the source.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Whether the unread input starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }
}
