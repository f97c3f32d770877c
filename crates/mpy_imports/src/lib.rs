//! Recognition of top-level `import` and `from ... import` statements in
//! Python source text.
//!
//! The scanner is deliberately restricted to the two statement shapes above:
//! it does not depend on a full Python grammar, and it is total over all
//! inputs. Statements that don't match a recognized shape (relative imports,
//! comma-form `import a, b`, or anything malformed) are silently skipped and
//! left untouched by downstream edits, as is everything that isn't a
//! top-level import in the first place.

use text_size::TextRange;

mod cursor;
mod scanner;

pub use scanner::scan_imports;

/// A recognized top-level import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyImport<'a> {
    Import(Import<'a>),
    ImportFrom(ImportFrom<'a>),
}

/// An `import module [as name]` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import<'a> {
    /// The dotted module path.
    pub module: &'a str,
    /// The rename, for `import module as name`.
    pub as_name: Option<&'a str>,
    /// The statement's source range, ending at its last meaningful token.
    pub range: TextRange,
}

/// A `from module import ...` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFrom<'a> {
    /// The dotted module path.
    pub module: &'a str,
    /// The imported names, in source order. A sole `*` marks a wildcard
    /// import.
    pub names: Vec<Alias<'a>>,
    /// The statement's source range, ending at its last meaningful token.
    pub range: TextRange,
}

/// An individual imported name with its optional rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias<'a> {
    pub name: &'a str,
    pub as_name: Option<&'a str>,
    /// The source range of the `name [as alias]` clause.
    pub range: TextRange,
}

impl AnyImport<'_> {
    pub fn module(&self) -> &str {
        match self {
            AnyImport::Import(import) => import.module,
            AnyImport::ImportFrom(import) => import.module,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            AnyImport::Import(import) => import.range,
            AnyImport::ImportFrom(import) => import.range,
        }
    }
}

impl ImportFrom<'_> {
    /// Returns `true` for a `from module import *` statement.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.names.as_slice(), [Alias { name: "*", .. }])
    }

    /// Returns `true` if the statement imports `name` under its own name.
    pub fn imports_name(&self, name: &str) -> bool {
        self.names
            .iter()
            .any(|alias| alias.name == name && alias.as_name.is_none())
    }
}
