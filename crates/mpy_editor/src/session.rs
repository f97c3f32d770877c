//! Session state for copied code snippets.
//!
//! The clipboard can't reliably carry structured snippet data across
//! browsers, so copying a documentation snippet records it in a single-slot
//! session owned by the editor integration. On paste, the slot is consulted:
//! if the clipboard text still matches the recorded snippet the paste is
//! upgraded to a full merge (imports included); otherwise the slot is
//! discarded, since the clipboard must have changed since the copy.

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use mpy_text_edit::Edit;

use crate::snippet::merge_snippet_at_line;

/// How a snippet is meant to be inserted into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CodeInsertKind {
    /// A self-contained example.
    Example,
    /// A call to be completed by the user.
    Call,
}

/// The last copied code snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PasteContext {
    /// The snippet as written to the clipboard.
    pub code: String,
    /// The snippet with its import statements included.
    pub code_with_imports: String,
    pub kind: CodeInsertKind,
    /// An identifier for event logging.
    pub id: Option<String>,
}

/// Single-slot state recording the last copied snippet. One use per copy.
#[derive(Debug, Default)]
pub struct PasteSession {
    context: Option<PasteContext>,
}

impl PasteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the copied snippet, replacing any previous one.
    pub fn copy(&mut self, context: PasteContext) {
        self.context = Some(context);
    }

    pub fn clear(&mut self) {
        self.context = None;
    }

    /// Consume the recorded snippet if `clipboard` still matches its code.
    ///
    /// Line endings in `clipboard` are normalized before comparing. A
    /// mismatch clears the slot: the clipboard must have changed since the
    /// snippet was copied.
    pub fn take_if_matches(&mut self, clipboard: &str) -> Option<PasteContext> {
        let context = self.context.take()?;
        if clipboard.replace("\r\n", "\n") != context.code {
            debug!("discarding paste context: clipboard no longer matches");
            return None;
        }
        debug!("code paste accepted: {:?}", context.id);
        Some(context)
    }
}

/// Handle a paste into `source` at the given 1-based line: if the clipboard
/// still holds the last copied snippet, compute the edits that merge the
/// snippet's imports and insert its code. Returns `None` for ordinary pastes,
/// which the caller should let through unchanged.
pub fn paste_snippet(
    session: &mut PasteSession,
    source: &str,
    clipboard: &str,
    line: usize,
) -> Option<Vec<Edit>> {
    let context = session.take_if_matches(clipboard)?;
    Some(merge_snippet_at_line(
        source,
        &context.code_with_imports,
        line,
    ))
}

#[cfg(test)]
mod tests {
    use mpy_text_edit::apply_edits;

    use super::{paste_snippet, CodeInsertKind, PasteContext, PasteSession};

    fn context() -> PasteContext {
        PasteContext {
            code: "display.scroll('Hello')".to_string(),
            code_with_imports: "from microbit import *\ndisplay.scroll('Hello')".to_string(),
            kind: CodeInsertKind::Example,
            id: Some("display-scroll".to_string()),
        }
    }

    #[test]
    fn matching_clipboard_consumes_the_context() {
        let mut session = PasteSession::new();
        session.copy(context());
        assert_eq!(
            session.take_if_matches("display.scroll('Hello')"),
            Some(context())
        );
        // One use per copy.
        assert_eq!(session.take_if_matches("display.scroll('Hello')"), None);
    }

    #[test]
    fn crlf_clipboard_is_normalized() {
        let mut session = PasteSession::new();
        session.copy(PasteContext {
            code: "a = 1\nb = 2".to_string(),
            code_with_imports: "a = 1\nb = 2".to_string(),
            kind: CodeInsertKind::Example,
            id: None,
        });
        assert!(session.take_if_matches("a = 1\r\nb = 2").is_some());
    }

    #[test]
    fn mismatch_clears_the_slot() {
        let mut session = PasteSession::new();
        session.copy(context());
        assert_eq!(session.take_if_matches("something else"), None);
        // The slot is gone even for a now-matching paste.
        assert_eq!(session.take_if_matches("display.scroll('Hello')"), None);
    }

    #[test]
    fn paste_merges_the_snippet() {
        let mut session = PasteSession::new();
        session.copy(context());
        let source = "import radio\n";
        let edits = paste_snippet(&mut session, source, "display.scroll('Hello')", 2)
            .expect("paste should match");
        assert_eq!(
            apply_edits(source, &edits),
            "import radio\nfrom microbit import *\ndisplay.scroll('Hello')\n"
        );
    }

    #[test]
    fn ordinary_paste_is_ignored() {
        let mut session = PasteSession::new();
        assert_eq!(paste_snippet(&mut session, "", "x = 1", 1), None);
    }
}
