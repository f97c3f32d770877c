//! Merging a snippet of Python code into a document.
//!
//! A snippet arrives either as plain text whose leading import statements
//! declare what it needs (the paste path), or as code paired with an explicit
//! [`RequiredImport`] (the documentation drag-and-drop path). Either way the
//! import requirements are reconciled against the document's existing imports
//! and the remaining code is inserted as-is.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use mpy_imports::{scan_imports, AnyImport};
use mpy_text_edit::Edit;
use text_size::{TextLen, TextSize};

use crate::importer::{
    from_import_candidates, module_import_satisfied, reconcile, wildcard_import_satisfied,
    RequiredImport, WILDCARD,
};
use crate::insertion::Insertion;

/// A code snippet paired with the import it requires, as carried by
/// documentation drag-and-drop data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodeWithImports {
    pub code: String,
    pub required_import: RequiredImport,
}

/// The imports a snippet declares via its own top-level import statements,
/// flattened to one requirement per imported name.
pub fn required_imports(snippet: &str) -> Vec<RequiredImport> {
    scan_imports(snippet)
        .iter()
        .flat_map(|import| match import {
            AnyImport::Import(import) => vec![RequiredImport::module(import.module)],
            AnyImport::ImportFrom(import) => import
                .names
                .iter()
                .map(|alias| {
                    if alias.name == WILDCARD {
                        RequiredImport::wildcard(import.module)
                    } else {
                        RequiredImport::member(import.module, alias.name)
                    }
                })
                .collect(),
        })
        .collect()
}

/// Merge `snippet` into `source`, appending its non-import code at the end of
/// the document.
pub fn merge_snippet(source: &str, snippet: &str) -> Vec<Edit> {
    merge(source, snippet, source.text_len())
}

/// Merge `snippet` into `source`, inserting its non-import code at the start
/// of the given 1-based line (clamped to the end of the document).
pub fn merge_snippet_at_line(source: &str, snippet: &str, line: usize) -> Vec<Edit> {
    merge(source, snippet, line_offset(source, line))
}

/// Insert a dragged snippet: reconcile its declared import and place its code
/// at the start of the given 1-based line.
pub fn insert_snippet(source: &str, snippet: &CodeWithImports, line: usize) -> Vec<Edit> {
    let mut edits = reconcile(source, &snippet.required_import);
    if let Some(edit) = body_edit(source, &snippet.code, line_offset(source, line)) {
        edits.push(edit);
    }
    edits.sort_by_key(|edit| edit.start());
    edits
}

/// A new import statement queued for insertion after the document's existing
/// imports. Named imports for the same module are folded into one statement.
enum Pending {
    Module(String),
    Wildcard(String),
    From { module: String, names: Vec<String> },
}

impl Pending {
    fn render(&self) -> String {
        match self {
            Pending::Module(module) => format!("import {module}"),
            Pending::Wildcard(module) => format!("from {module} import *"),
            Pending::From { module, names } => {
                format!("from {module} import {}", names.join(", "))
            }
        }
    }
}

fn merge(source: &str, snippet: &str, at: TextSize) -> Vec<Edit> {
    let imports = scan_imports(source);

    let mut edits = Vec::new();
    let mut pending: Vec<Pending> = Vec::new();
    let mut processed: Vec<RequiredImport> = Vec::new();

    for required in required_imports(snippet) {
        if processed.contains(&required) {
            continue;
        }
        match required.member_name() {
            None => {
                if !module_import_satisfied(&imports, required.module_name()) {
                    pending.push(Pending::Module(required.module_name().to_string()));
                }
            }
            Some(WILDCARD) => {
                if !wildcard_import_satisfied(&imports, required.module_name()) {
                    pending.push(Pending::Wildcard(required.module_name().to_string()));
                }
            }
            Some(member) => {
                let candidates = from_import_candidates(&imports, required.module_name());
                if candidates.iter().any(|import| import.imports_name(member)) {
                    // Already satisfied.
                } else if let Some(names) = pending.iter_mut().find_map(|pending| match pending {
                    Pending::From { module, names } if module == required.module_name() => {
                        Some(names)
                    }
                    _ => None,
                }) {
                    names.push(member.to_string());
                } else if let Some(last) = candidates.first().and_then(|first| first.names.last())
                {
                    edits.push(Edit::insertion(format!(", {member}"), last.range.end()));
                } else {
                    pending.push(Pending::From {
                        module: required.module_name().to_string(),
                        names: vec![member.to_string()],
                    });
                }
            }
        }
        processed.push(required);
    }

    if !pending.is_empty() {
        let statements = pending
            .iter()
            .map(Pending::render)
            .collect::<Vec<_>>()
            .join("\n");
        edits.push(Insertion::after_imports(&imports).into_edit(&statements));
    }

    if let Some(edit) = body_edit(source, &snippet_body(snippet), at) {
        edits.push(edit);
    }

    edits.sort_by_key(|edit| edit.start());
    edits
}

/// The snippet with its recognized import statements (and their lines)
/// removed.
fn snippet_body(snippet: &str) -> String {
    let mut body = String::new();
    let mut last = 0;
    for import in &scan_imports(snippet) {
        let start = line_start(snippet, usize::from(import.range().start()));
        let end = full_line_end(snippet, usize::from(import.range().end()));
        body.push_str(&snippet[last..start]);
        last = end;
    }
    body.push_str(&snippet[last..]);
    body
}

fn body_edit(source: &str, body: &str, at: TextSize) -> Option<Edit> {
    let body = body.trim_matches('\n');
    if body.trim().is_empty() {
        return None;
    }
    let mut content = String::new();
    if usize::from(at) == source.len() && !source.is_empty() && !source.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(body);
    content.push('\n');
    Some(Edit::insertion(content, at))
}

/// The offset of the start of the given 1-based line, clamped to the end of
/// the document.
fn line_offset(source: &str, line: usize) -> TextSize {
    if line <= 1 {
        return TextSize::default();
    }
    let mut remaining = line - 1;
    for (index, _) in source.match_indices('\n') {
        remaining -= 1;
        if remaining == 0 {
            return TextSize::of(&source[..=index]);
        }
    }
    source.text_len()
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |index| index + 1)
}

fn full_line_end(source: &str, offset: usize) -> usize {
    source[offset..]
        .find('\n')
        .map_or(source.len(), |index| offset + index + 1)
}
