use text_size::{TextRange, TextSize};
use unicode_ident::{is_xid_continue, is_xid_start};

use crate::cursor::Cursor;
use crate::{Alias, AnyImport, Import, ImportFrom};

/// Scan `source` for top-level import statements, in document order.
///
/// The list is recomputed fresh on every call; nothing is cached or mutated
/// in place. `source` as a whole need not be valid Python: only statements
/// matching one of the two recognized import shapes are returned, and
/// everything else is skipped.
pub fn scan_imports(source: &str) -> Vec<AnyImport<'_>> {
    Scanner::new(source).scan()
}

struct Scanner<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    imports: Vec<AnyImport<'src>>,
}

impl<'src> Scanner<'src> {
    fn new(source: &'src str) -> Self {
        let mut cursor = Cursor::new(source);
        cursor.eat_char('\u{feff}');
        Self {
            source,
            cursor,
            imports: Vec::new(),
        }
    }

    fn scan(mut self) -> Vec<AnyImport<'src>> {
        // Each iteration starts at the beginning of a logical line. Import
        // statements are only recognized at the top level, so anything
        // indented (or any continuation line) never reaches the parsers.
        while !self.cursor.is_eof() {
            let start = self.cursor.offset();
            if self.at_keyword("import") {
                if let Some(import) = self.parse_import(start) {
                    self.imports.push(AnyImport::Import(import));
                }
            } else if self.at_keyword("from") {
                if let Some(import) = self.parse_import_from(start) {
                    self.imports.push(AnyImport::ImportFrom(import));
                }
            }
            self.skip_logical_line();
        }
        self.imports
    }

    /// Parse `import module [as name]` with the cursor on the `import`
    /// keyword. Returns `None` for anything else, including the comma form
    /// `import a, b`.
    fn parse_import(&mut self, start: TextSize) -> Option<Import<'src>> {
        self.eat_keyword("import");
        self.skip_inline_space();

        let module = self.eat_dotted_name()?;
        let mut end = module.end();
        self.skip_inline_space();

        let mut as_name = None;
        if self.at_keyword("as") {
            self.eat_keyword("as");
            self.skip_inline_space();
            let alias = self.eat_identifier()?;
            as_name = Some(self.text(alias));
            end = alias.end();
            self.skip_inline_space();
        }

        self.at_line_end().then(|| Import {
            module: self.text(module),
            as_name,
            range: TextRange::new(start, end),
        })
    }

    /// Parse `from module import *` or `from module import name [as alias]
    /// [, ...]` (optionally parenthesized) with the cursor on the `from`
    /// keyword. Relative imports are not recognized.
    fn parse_import_from(&mut self, start: TextSize) -> Option<ImportFrom<'src>> {
        self.eat_keyword("from");
        self.skip_inline_space();

        if self.cursor.first() == '.' {
            return None;
        }
        let module = self.eat_dotted_name()?;
        self.skip_inline_space();

        if !self.at_keyword("import") {
            return None;
        }
        self.eat_keyword("import");
        self.skip_inline_space();

        let star_start = self.cursor.offset();
        if self.cursor.eat_char('*') {
            let end = self.cursor.offset();
            self.skip_inline_space();
            return self.at_line_end().then(|| ImportFrom {
                module: self.text(module),
                names: vec![Alias {
                    name: "*",
                    as_name: None,
                    range: TextRange::new(star_start, end),
                }],
                range: TextRange::new(start, end),
            });
        }

        // Inside parentheses the name list may span lines and carry comments.
        let parenthesized = self.cursor.eat_char('(');
        let mut names = Vec::new();
        let mut end;
        loop {
            self.skip_space(parenthesized);
            let name = self.eat_identifier()?;
            let mut clause_end = name.end();
            let mut as_name = None;
            self.skip_space(parenthesized);
            if self.at_keyword("as") {
                self.eat_keyword("as");
                self.skip_space(parenthesized);
                let alias = self.eat_identifier()?;
                as_name = Some(self.text(alias));
                clause_end = alias.end();
                self.skip_space(parenthesized);
            }
            names.push(Alias {
                name: self.text(name),
                as_name,
                range: TextRange::new(name.start(), clause_end),
            });
            end = clause_end;

            if self.cursor.eat_char(',') {
                self.skip_space(parenthesized);
                if parenthesized {
                    if self.cursor.eat_char(')') {
                        end = self.cursor.offset();
                        break;
                    }
                    continue;
                }
                // A trailing comma ends an unparenthesized list.
                if self.at_line_end() {
                    break;
                }
                continue;
            }
            if parenthesized {
                if self.cursor.eat_char(')') {
                    end = self.cursor.offset();
                    break;
                }
                return None;
            }
            break;
        }

        self.skip_inline_space();
        self.at_line_end().then(|| ImportFrom {
            module: self.text(module),
            names,
            range: TextRange::new(start, end),
        })
    }

    /// Returns `true` if the unconsumed source starts with `keyword` at an
    /// identifier boundary.
    fn at_keyword(&self, keyword: &str) -> bool {
        let rest = self.cursor.rest();
        rest.starts_with(keyword)
            && !rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(|c| c == '_' || is_xid_continue(c))
    }

    fn eat_keyword(&mut self, keyword: &str) {
        debug_assert!(self.at_keyword(keyword));
        for _ in keyword.chars() {
            self.cursor.bump();
        }
    }

    fn eat_identifier(&mut self) -> Option<TextRange> {
        let start = self.cursor.offset();
        let first = self.cursor.first();
        if first == '_' || is_xid_start(first) {
            self.cursor.bump();
        } else {
            return None;
        }
        self.cursor.eat_while(is_xid_continue);
        Some(TextRange::new(start, self.cursor.offset()))
    }

    fn eat_dotted_name(&mut self) -> Option<TextRange> {
        let start = self.eat_identifier()?.start();
        while self.cursor.eat_char('.') {
            self.eat_identifier()?;
        }
        Some(TextRange::new(start, self.cursor.offset()))
    }

    /// Skip spaces, tabs, form-feeds, and backslash line continuations.
    fn skip_inline_space(&mut self) {
        loop {
            match self.cursor.first() {
                c if is_python_whitespace(c) => {
                    self.cursor.bump();
                }
                '\\' => {
                    let mut lookahead = self.cursor.clone();
                    lookahead.bump();
                    lookahead.eat_char('\r');
                    if lookahead.eat_char('\n') {
                        self.cursor = lookahead;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Like [`Scanner::skip_inline_space`], but inside parentheses newlines
    /// and comments are trivia too.
    fn skip_grouped_space(&mut self) {
        loop {
            match self.cursor.first() {
                c if is_python_whitespace(c) || c == '\n' || c == '\r' => {
                    if self.cursor.bump().is_none() {
                        break;
                    }
                }
                '#' => self.cursor.eat_until_newline(),
                '\\' => {
                    let mut lookahead = self.cursor.clone();
                    lookahead.bump();
                    lookahead.eat_char('\r');
                    if lookahead.eat_char('\n') {
                        self.cursor = lookahead;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_space(&mut self, grouped: bool) {
        if grouped {
            self.skip_grouped_space();
        } else {
            self.skip_inline_space();
        }
    }

    /// Returns `true` if the statement has reached its end: end of line, a
    /// comment, a semicolon, or the end of the source.
    fn at_line_end(&self) -> bool {
        self.cursor.is_eof() || matches!(self.cursor.first(), '\n' | '\r' | '#' | ';')
    }

    /// Consume the rest of the current logical line, including its trailing
    /// newline. Strings, comments, bracket nesting, and backslash
    /// continuations are honored so that the next iteration starts on a real
    /// line boundary.
    fn skip_logical_line(&mut self) {
        let mut depth = 0u32;
        loop {
            if self.cursor.is_eof() {
                return;
            }
            match self.cursor.first() {
                '\n' => {
                    self.cursor.bump();
                    if depth == 0 {
                        return;
                    }
                }
                '#' => self.cursor.eat_until_newline(),
                '(' | '[' | '{' => {
                    depth += 1;
                    self.cursor.bump();
                }
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    self.cursor.bump();
                }
                '\\' => {
                    self.cursor.bump();
                    self.cursor.eat_char('\r');
                    self.cursor.eat_char('\n');
                }
                quote @ ('\'' | '"') => self.skip_string(quote),
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// Consume a string literal starting at its opening quote. Unterminated
    /// single-quoted strings end at the newline, which is left for the
    /// caller.
    fn skip_string(&mut self, quote: char) {
        self.cursor.bump();
        let triple = if self.cursor.first() == quote {
            self.cursor.bump();
            if self.cursor.first() == quote {
                self.cursor.bump();
                true
            } else {
                // An empty string.
                return;
            }
        } else {
            false
        };

        loop {
            if self.cursor.is_eof() {
                return;
            }
            match self.cursor.first() {
                '\\' => {
                    self.cursor.bump();
                    self.cursor.bump();
                }
                '\n' if !triple => return,
                c if c == quote => {
                    self.cursor.bump();
                    if !triple || (self.cursor.eat_char(quote) && self.cursor.eat_char(quote)) {
                        return;
                    }
                }
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    fn text(&self, range: TextRange) -> &'src str {
        &self.source[usize::from(range.start())..usize::from(range.end())]
    }
}

/// Returns `true` for [whitespace](https://docs.python.org/3/reference/lexical_analysis.html#whitespace-between-tokens)
/// characters.
const fn is_python_whitespace(c: char) -> bool {
    matches!(
        c,
        // Space, tab, or form-feed
        ' ' | '\t' | '\x0C'
    )
}

#[cfg(test)]
mod tests {
    use test_case::test_case;
    use text_size::{TextRange, TextSize};

    use crate::{scan_imports, AnyImport};

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    #[test]
    fn module_import() {
        let imports = scan_imports("import audio\n");
        assert_eq!(imports.len(), 1);
        let AnyImport::Import(import) = &imports[0] else {
            panic!("expected a module import");
        };
        assert_eq!(import.module, "audio");
        assert_eq!(import.as_name, None);
        assert_eq!(import.range, range(0, 12));
    }

    #[test]
    fn aliased_module_import() {
        let imports = scan_imports("import audio as foo");
        let AnyImport::Import(import) = &imports[0] else {
            panic!("expected a module import");
        };
        assert_eq!(import.module, "audio");
        assert_eq!(import.as_name, Some("foo"));
        assert_eq!(import.range, range(0, 19));
    }

    #[test]
    fn dotted_module_import() {
        let imports = scan_imports("import machine.pin\n");
        let AnyImport::Import(import) = &imports[0] else {
            panic!("expected a module import");
        };
        assert_eq!(import.module, "machine.pin");
    }

    #[test]
    fn statement_range_excludes_trailing_comment() {
        let imports = scan_imports("import audio  # start-up sound\n");
        assert_eq!(imports[0].range(), range(0, 12));
    }

    #[test]
    fn from_import_single_name() {
        let imports = scan_imports("from random import randrange");
        let AnyImport::ImportFrom(import) = &imports[0] else {
            panic!("expected a from-import");
        };
        assert_eq!(import.module, "random");
        assert_eq!(import.names.len(), 1);
        assert_eq!(import.names[0].name, "randrange");
        assert_eq!(import.names[0].as_name, None);
        assert_eq!(import.names[0].range, range(19, 28));
        assert_eq!(import.range, range(0, 28));
        assert!(!import.is_wildcard());
        assert!(import.imports_name("randrange"));
    }

    #[test]
    fn from_import_aliased_name() {
        let imports = scan_imports("from random import randrange as foo");
        let AnyImport::ImportFrom(import) = &imports[0] else {
            panic!("expected a from-import");
        };
        assert_eq!(import.names[0].name, "randrange");
        assert_eq!(import.names[0].as_name, Some("foo"));
        assert_eq!(import.names[0].range, range(19, 35));
        assert_eq!(import.range, range(0, 35));
        // An aliased name doesn't make the name itself available.
        assert!(!import.imports_name("randrange"));
    }

    #[test]
    fn from_import_multiple_names() {
        let imports = scan_imports("from microbit import display, sleep");
        let AnyImport::ImportFrom(import) = &imports[0] else {
            panic!("expected a from-import");
        };
        assert_eq!(import.names.len(), 2);
        assert_eq!(import.names[0].name, "display");
        assert_eq!(import.names[1].name, "sleep");
        assert_eq!(import.range, range(0, 35));
    }

    #[test]
    fn wildcard_import() {
        let imports = scan_imports("from microbit import *");
        let AnyImport::ImportFrom(import) = &imports[0] else {
            panic!("expected a from-import");
        };
        assert!(import.is_wildcard());
        assert_eq!(import.names[0].range, range(21, 22));
        assert_eq!(import.range, range(0, 22));
    }

    #[test]
    fn parenthesized_from_import_spans_lines() {
        let source = "from microbit import (\n    display,\n    sleep,\n)\n";
        let imports = scan_imports(source);
        let AnyImport::ImportFrom(import) = &imports[0] else {
            panic!("expected a from-import");
        };
        assert_eq!(import.names.len(), 2);
        assert_eq!(import.names[1].name, "sleep");
        assert_eq!(import.names[1].range, range(40, 45));
        // The statement range includes the closing parenthesis.
        assert_eq!(import.range, range(0, 48));
    }

    #[test]
    fn document_order_is_preserved() {
        let source = "from microbit import *\nimport radio\nfrom random import randrange\n";
        let imports = scan_imports(source);
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].module(), "microbit");
        assert_eq!(imports[1].module(), "radio");
        assert_eq!(imports[2].module(), "random");
    }

    #[test]
    fn crlf_line_endings() {
        let imports = scan_imports("import audio\r\nimport radio\r\n");
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].range(), range(0, 12));
        assert_eq!(imports[1].range(), range(14, 26));
    }

    #[test]
    fn only_the_first_statement_on_a_line_is_recognized() {
        let imports = scan_imports("import audio; import radio\n");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module(), "audio");
    }

    #[test]
    fn import_inside_docstring_is_skipped() {
        let source = "\"\"\"\nimport audio\n\"\"\"\nimport radio\n";
        let imports = scan_imports(source);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module(), "radio");
        assert_eq!(imports[0].range(), range(21, 33));
    }

    #[test]
    fn import_on_a_continuation_line_is_skipped() {
        let source = "x = [\n1,\nimport audio\n]\nimport radio\n";
        let imports = scan_imports(source);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module(), "radio");
    }

    #[test_case("import a, b"; "comma form module import")]
    #[test_case("from . import display"; "relative import")]
    #[test_case("from ..pkg import display"; "parent relative import")]
    #[test_case("import"; "bare import keyword")]
    #[test_case("from"; "bare from keyword")]
    #[test_case("from microbit import"; "missing name list")]
    #[test_case("from microbit import (display"; "unclosed parenthesis")]
    #[test_case("import audio as"; "missing alias")]
    #[test_case("import audio as foo bar"; "trailing garbage")]
    #[test_case("    import audio"; "indented import")]
    #[test_case("importable = 1"; "identifier prefixed by keyword")]
    #[test_case("x = 1"; "not an import")]
    #[test_case(""; "empty document")]
    fn unrecognized(source: &str) {
        assert_eq!(scan_imports(source), Vec::new());
    }
}
