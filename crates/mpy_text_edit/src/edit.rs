#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use text_size::{TextRange, TextSize};

/// A text edit to be applied to a source document. Inserts, deletes, or
/// replaces content at a given range.
///
/// Offsets are byte offsets into the original, unmodified document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edit {
    /// The replacement content to insert at `range`.
    content: String,
    /// The half-open range of the original document replaced by `content`.
    range: TextRange,
}

impl Edit {
    pub fn insertion(content: String, at: TextSize) -> Self {
        debug_assert!(!content.is_empty(), "Insert content is empty");

        Self {
            content,
            range: TextRange::empty(at),
        }
    }

    pub fn deletion(start: TextSize, end: TextSize) -> Self {
        Self {
            content: String::new(),
            range: TextRange::new(start, end),
        }
    }

    pub fn range_replacement(content: String, range: TextRange) -> Self {
        debug_assert!(!content.is_empty(), "Prefer `Edit::deletion`");

        Self { content, range }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn start(&self) -> TextSize {
        self.range.start()
    }

    pub fn end(&self) -> TextSize {
        self.range.end()
    }

    /// Returns `true` if the edit replaces an empty range.
    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }

    /// Returns `true` if the edit inserts no content.
    pub fn is_deletion(&self) -> bool {
        self.content.is_empty()
    }
}
