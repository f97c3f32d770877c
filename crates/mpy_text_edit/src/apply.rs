use text_size::TextSize;

use crate::Edit;

/// Apply a sequence of edits to `source`, returning the updated text.
///
/// All edit offsets are interpreted relative to the original, unmodified
/// `source`. Edits are applied in the order given; edits anchored at the same
/// zero-width position therefore land in sequence order. An edit that begins
/// before the end of the previously applied edit is skipped (best-effort).
pub fn apply_edits<'a, I>(source: &str, edits: I) -> String
where
    I: IntoIterator<Item = &'a Edit>,
{
    let mut output = String::with_capacity(source.len());
    let mut last_pos = TextSize::default();

    for edit in edits {
        if edit.start() < last_pos {
            continue;
        }

        // Add all content from `last_pos` to the start of the edit.
        output.push_str(&source[usize::from(last_pos)..usize::from(edit.start())]);

        // Add the edit itself.
        output.push_str(edit.content());

        last_pos = edit.end();
    }

    // Add the remaining content.
    output.push_str(&source[usize::from(last_pos)..]);
    output
}

#[cfg(test)]
mod tests {
    use text_size::{TextRange, TextSize};

    use crate::{apply_edits, Edit};

    #[test]
    fn empty_document() {
        assert_eq!(apply_edits("", &[]), "");
    }

    #[test]
    fn no_edits() {
        assert_eq!(apply_edits("import audio\n", &[]), "import audio\n");
    }

    #[test]
    fn one_replacement() {
        let edits = [Edit::range_replacement(
            "radio".to_string(),
            TextRange::new(TextSize::from(7), TextSize::from(12)),
        )];
        assert_eq!(apply_edits("import audio\n", &edits), "import radio\n");
    }

    #[test]
    fn one_removal() {
        let edits = [Edit::deletion(TextSize::from(12), TextSize::from(19))];
        assert_eq!(apply_edits("import audio as foo\n", &edits), "import audio\n");
    }

    #[test]
    fn two_insertions() {
        let edits = [
            Edit::insertion("import radio\n".to_string(), TextSize::from(0)),
            Edit::insertion("\nsleep(100)".to_string(), TextSize::from(13)),
        ];
        assert_eq!(
            apply_edits("import audio\n", &edits),
            "import radio\nimport audio\n\nsleep(100)"
        );
    }

    #[test]
    fn insertions_at_the_same_offset_land_in_order() {
        let edits = [
            Edit::insertion("\nimport audio".to_string(), TextSize::from(12)),
            Edit::insertion("\nimport radio".to_string(), TextSize::from(12)),
        ];
        assert_eq!(
            apply_edits("import music", &edits),
            "import music\nimport audio\nimport radio"
        );
    }

    #[test]
    fn ignore_overlapping_edits() {
        let edits = [
            Edit::range_replacement(
                "radio".to_string(),
                TextRange::new(TextSize::from(7), TextSize::from(12)),
            ),
            Edit::range_replacement(
                "ignored".to_string(),
                TextRange::new(TextSize::from(9), TextSize::from(11)),
            ),
        ];
        assert_eq!(apply_edits("import audio\n", &edits), "import radio\n");
    }
}
