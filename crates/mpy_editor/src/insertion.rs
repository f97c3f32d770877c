use mpy_imports::AnyImport;
use mpy_text_edit::Edit;
use text_size::TextSize;

/// Where and how to insert a new import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Insertion {
    /// The content to add before the insertion.
    prefix: &'static str,
    /// The location at which to insert.
    location: TextSize,
    /// The content to add after the insertion.
    suffix: &'static str,
}

impl Insertion {
    /// Create an [`Insertion`] to add an import statement after the given
    /// imports.
    ///
    /// New statements go immediately after the last recognized import. A
    /// document with no recognized imports gets the statement at the very
    /// top, followed by a blank line separating it from whatever content
    /// follows.
    pub(crate) fn after_imports(imports: &[AnyImport]) -> Insertion {
        match imports.last() {
            Some(last) => Insertion::new("\n", last.range().end(), ""),
            None => Insertion::new("", TextSize::default(), "\n\n"),
        }
    }

    fn new(prefix: &'static str, location: TextSize, suffix: &'static str) -> Self {
        Self {
            prefix,
            location,
            suffix,
        }
    }

    /// Convert this [`Insertion`] into an [`Edit`] that inserts the given
    /// content.
    pub(crate) fn into_edit(self, content: &str) -> Edit {
        let Insertion {
            prefix,
            location,
            suffix,
        } = self;
        Edit::insertion(format!("{prefix}{content}{suffix}"), location)
    }
}

#[cfg(test)]
mod tests {
    use mpy_imports::scan_imports;
    use text_size::TextSize;

    use super::Insertion;

    fn insert(contents: &str) -> Insertion {
        Insertion::after_imports(&scan_imports(contents))
    }

    #[test]
    fn after_imports() {
        let contents = "";
        assert_eq!(insert(contents), Insertion::new("", TextSize::from(0), "\n\n"));

        let contents = "import audio";
        assert_eq!(insert(contents), Insertion::new("\n", TextSize::from(12), ""));

        let contents = "import audio\n\nwhile True:\n    pass\n";
        assert_eq!(insert(contents), Insertion::new("\n", TextSize::from(12), ""));

        // No recognized imports: the statement goes at the very top.
        let contents = "x = 1\n";
        assert_eq!(insert(contents), Insertion::new("", TextSize::from(0), "\n\n"));
    }

    #[test]
    fn into_edit() {
        let edit = insert("import audio").into_edit("import radio");
        assert_eq!(edit.content(), "\nimport radio");
        assert_eq!(edit.start(), TextSize::from(12));
    }
}
