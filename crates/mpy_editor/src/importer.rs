//! Ensures a required import is present in a document, reusing existing
//! import statements where possible.

use mpy_imports::{scan_imports, AnyImport, ImportFrom};
use mpy_text_edit::Edit;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::insertion::Insertion;

/// The name imported from a wildcard `from module import *` statement.
pub(crate) const WILDCARD: &str = "*";

/// A module or module member that inserted code requires to be importable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RequiredImport {
    module: String,
    member: Option<String>,
}

impl RequiredImport {
    /// Require `import module`.
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            member: None,
        }
    }

    /// Require `from module import member`.
    pub fn member(module: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            member: Some(member.into()),
        }
    }

    /// Require `from module import *`.
    pub fn wildcard(module: impl Into<String>) -> Self {
        Self::member(module, WILDCARD)
    }

    pub fn module_name(&self) -> &str {
        &self.module
    }

    pub fn member_name(&self) -> Option<&str> {
        self.member.as_deref()
    }
}

/// Compute the edits needed to make `required` importable in `source`.
///
/// Returns at most one edit, with offsets relative to the unmodified
/// `source`. The result is idempotent: reconciling the updated document with
/// the same requirement again yields no edits. Imports unrelated to the
/// requirement are never touched.
pub fn reconcile(source: &str, required: &RequiredImport) -> Vec<Edit> {
    let imports = scan_imports(source);
    match required.member_name() {
        None => ensure_module_import(&imports, required.module_name()),
        Some(WILDCARD) => ensure_wildcard_import(&imports, required.module_name()),
        Some(member) => ensure_member_import(&imports, required.module_name(), member),
    }
}

fn ensure_module_import(imports: &[AnyImport], module: &str) -> Vec<Edit> {
    if module_import_satisfied(imports, module) {
        return Vec::new();
    }
    vec![Insertion::after_imports(imports).into_edit(&format!("import {module}"))]
}

fn ensure_wildcard_import(imports: &[AnyImport], module: &str) -> Vec<Edit> {
    if wildcard_import_satisfied(imports, module) {
        return Vec::new();
    }
    vec![Insertion::after_imports(imports).into_edit(&format!("from {module} import *"))]
}

fn ensure_member_import(imports: &[AnyImport], module: &str, member: &str) -> Vec<Edit> {
    let candidates = from_import_candidates(imports, module);
    if candidates
        .iter()
        .any(|import| import.imports_name(member))
    {
        return Vec::new();
    }
    // Extend the first existing statement for the module rather than adding
    // another one. The insertion lands right after its last imported name, so
    // a parenthesized list stays inside its parentheses.
    if let Some(last) = candidates.first().and_then(|first| first.names.last()) {
        return vec![Edit::insertion(format!(", {member}"), last.range.end())];
    }
    vec![Insertion::after_imports(imports).into_edit(&format!("from {module} import {member}"))]
}

/// Returns `true` if an unaliased `import module` statement already exists.
pub(crate) fn module_import_satisfied(imports: &[AnyImport], module: &str) -> bool {
    imports.iter().any(|import| {
        matches!(import, AnyImport::Import(import) if import.module == module && import.as_name.is_none())
    })
}

/// Returns `true` if a `from module import *` statement already exists.
pub(crate) fn wildcard_import_satisfied(imports: &[AnyImport], module: &str) -> bool {
    imports.iter().any(|import| {
        matches!(import, AnyImport::ImportFrom(import) if import.module == module && import.is_wildcard())
    })
}

/// The from-imports for `module` that a named import may extend, in document
/// order. A wildcard import is not a candidate: it doesn't name the member,
/// and appending to it would produce `import *, name`.
pub(crate) fn from_import_candidates<'a, 'src>(
    imports: &'a [AnyImport<'src>],
    module: &str,
) -> Vec<&'a ImportFrom<'src>> {
    imports
        .iter()
        .filter_map(|import| match import {
            AnyImport::ImportFrom(import) if import.module == module && !import.is_wildcard() => {
                Some(import)
            }
            _ => None,
        })
        .collect()
}
