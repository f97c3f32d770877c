//! The editor-integration layer of the MicroPython editor core.
//!
//! Code snippets arriving from documentation (dragged, pasted, or inserted)
//! declare the imports they rely on. This crate computes the minimal text
//! edits that make those imports available in the target document without
//! duplicating or disturbing unrelated imports, plus the snippet-level and
//! paste-session plumbing around that computation.
//!
//! All APIs are pure and advisory: they return [`mpy_text_edit::Edit`]s for
//! the caller's own text buffer or transaction mechanism and never mutate a
//! document themselves.

mod importer;
mod insertion;
mod session;
mod snippet;

pub use importer::{reconcile, RequiredImport};
pub use session::{paste_snippet, CodeInsertKind, PasteContext, PasteSession};
pub use snippet::{
    insert_snippet, merge_snippet, merge_snippet_at_line, required_imports, CodeWithImports,
};
