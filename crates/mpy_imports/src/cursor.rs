use std::str::Chars;

use memchr::memchr;
use text_size::{TextLen, TextSize};

pub(crate) const EOF_CHAR: char = '\0';

/// A character cursor over source text, tracking absolute byte offsets.
#[derive(Clone, Debug)]
pub(crate) struct Cursor<'src> {
    chars: Chars<'src>,
    source_length: TextSize,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars(),
            source_length: source.text_len(),
        }
    }

    /// Peeks the next character without consuming it. Returns [`EOF_CHAR`] at
    /// the end of the source.
    pub(crate) fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// The byte offset of the cursor from the start of the source.
    pub(crate) fn offset(&self) -> TextSize {
        self.source_length - self.chars.as_str().text_len()
    }

    /// The source text that has not been consumed yet.
    pub(crate) fn rest(&self) -> &'src str {
        self.chars.as_str()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Consumes the next character if it equals `c`.
    pub(crate) fn eat_char(&mut self, c: char) -> bool {
        if self.first() == c && !self.is_eof() {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `predicate` holds.
    pub(crate) fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_eof() && predicate(self.first()) {
            self.bump();
        }
    }

    /// Advances to the next `\n`, which is not consumed, or to the end of the
    /// source.
    pub(crate) fn eat_until_newline(&mut self) {
        let rest = self.chars.as_str();
        match memchr(b'\n', rest.as_bytes()) {
            Some(index) => self.chars = rest[index..].chars(),
            None => self.chars = rest[rest.len()..].chars(),
        }
    }
}
