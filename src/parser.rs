//! Structural parsing.
//!
//! This module provides the [`Parser`] that turns document text into a
//! [`Document`].
//!
//! ## Overview
//!
//! - **Logical lines**: a physical line break is ignored while an array is
//!   open, so array values may span several lines. Comments are stripped in
//!   the same forward scan, which tracks quote and bracket state so a `#`
//!   inside a string is kept.
//! - **Headers**: `[a.b]` selects (creating as needed) a nested table;
//!   `[[a.b]]` appends a fresh table to a table array and selects it.
//! - **Assignments**: `key = value` lines are handed to the value classifier
//!   and inserted into the selected table.
//!
//! The selected table is tracked as an owned [`Cursor`] (a key path from the
//! root) rather than a reference into the tree. Every header replaces it.
//!
//! ## Usage
//!
//! ```rust
//! use serde_tomlite::Parser;
//!
//! let mut parser = Parser::new();
//! let doc = parser.parse("[server]\nport = 8080").unwrap();
//! assert_eq!(doc.get_path("server.port").and_then(|v| v.as_i64()), Some(8080));
//! ```

use crate::classify::Classifier;
use crate::scanner::is_key_byte;
use crate::{Document, Error, ParseOptions, Result, Value};
use log::{debug, trace};
use std::iter::Peekable;
use std::str::Chars;

/// The key path from the root to the table receiving assignments.
///
/// An empty path is the root. A segment naming a table array refers to that
/// array's most recently appended table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    path: Vec<String>,
}

impl Cursor {
    /// The root table.
    #[must_use]
    pub fn root() -> Self {
        Cursor::default()
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    fn dotted(&self) -> String {
        self.path.join(".")
    }

    /// Follows the path from `root` to the selected table.
    fn resolve<'d>(&self, root: &'d mut Document, line: usize) -> Result<&'d mut Document> {
        let mut current = root;
        for key in &self.path {
            current = match current.get_mut(key) {
                Some(Value::Table(doc)) => doc,
                Some(Value::TableArray(docs)) => docs
                    .last_mut()
                    .ok_or_else(|| Error::key_redefinition(key, line))?,
                _ => return Err(Error::key_redefinition(key, line)),
            };
        }
        Ok(current)
    }
}

/// A line of input with comments removed and, for multi-line arrays, the
/// physical line breaks folded into spaces.
#[derive(Debug, PartialEq)]
struct LogicalLine {
    text: String,
    /// Physical line the logical line starts on.
    line: usize,
}

/// Splits input into [`LogicalLine`]s.
///
/// One forward scan carries `(in_string, depth)` so that comments inside
/// arrays, brackets inside strings and `#` inside strings all interact
/// correctly.
struct LineSplitter<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    done: bool,
}

impl<'a> LineSplitter<'a> {
    fn new(input: &'a str) -> Self {
        LineSplitter {
            chars: input.chars().peekable(),
            line: 1,
            done: false,
        }
    }

    /// Consumes a line break if `ch` starts one.
    fn is_line_break(&mut self, ch: char) -> bool {
        match ch {
            '\n' => true,
            '\r' => {
                if self.chars.peek() == Some(&'\n') {
                    self.chars.next();
                }
                true
            }
            _ => false,
        }
    }

    fn fail(&mut self, err: Error) -> Option<Result<LogicalLine>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for LineSplitter<'a> {
    type Item = Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.line;
        let mut text = String::new();
        let mut in_string = false;
        let mut escaped = false;
        let mut in_comment = false;
        let mut depth = 0usize;

        loop {
            let Some(ch) = self.chars.next() else {
                self.done = true;
                if in_string {
                    return Some(Err(Error::UnterminatedString { line: self.line }));
                }
                if depth > 0 {
                    return Some(Err(Error::UnterminatedArray { line: start }));
                }
                return Some(Ok(LogicalLine { text, line: start }));
            };

            if self.is_line_break(ch) {
                if in_string {
                    return self.fail(Error::UnterminatedString { line: self.line });
                }
                self.line += 1;
                in_comment = false;
                if depth == 0 {
                    return Some(Ok(LogicalLine { text, line: start }));
                }
                text.push(' ');
                continue;
            }

            if in_comment {
                continue;
            }

            if in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
            } else {
                match ch {
                    '"' => in_string = true,
                    '#' => {
                        in_comment = true;
                        continue;
                    }
                    '[' => depth += 1,
                    ']' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }

            text.push(ch);
        }
    }
}

/// Splits a header body such as `a.b.c` into validated bare-key segments.
fn header_path(inner: &str) -> Option<Vec<String>> {
    inner
        .trim()
        .split('.')
        .map(|segment| is_bare_key(segment).then(|| segment.to_string()))
        .collect()
}

fn is_bare_key(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_key_byte)
}

/// Splits `key = value` into its key and (trimmed, non-empty) value text.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let key_len = line.bytes().take_while(|b| is_key_byte(*b)).count();
    if key_len == 0 {
        return None;
    }
    let (key, rest) = line.split_at(key_len);
    let value = rest
        .trim_start_matches(|c: char| c == ' ' || c == '\t')
        .strip_prefix('=')?
        .trim();
    (!value.is_empty()).then_some((key, value))
}

/// Walks `segments` from `root`, creating ordinary tables where missing.
///
/// A table array along the way is entered through its last table.
fn walk<'d>(
    root: &'d mut Document,
    segments: &[String],
    header: &str,
    line: usize,
) -> Result<&'d mut Document> {
    let mut current = root;
    for key in segments {
        if !current.contains_key(key) {
            current.insert(key.clone(), Value::Table(Document::new()));
        }
        current = match current.get_mut(key) {
            Some(Value::Table(doc)) => doc,
            Some(Value::TableArray(docs)) => docs
                .last_mut()
                .ok_or_else(|| Error::key_redefinition(header, line))?,
            _ => return Err(Error::key_redefinition(header, line)),
        };
    }
    Ok(current)
}

/// A re-usable parser.
///
/// All state (the document under construction, the cursor and the line
/// counter) is reset at the start of every [`Parser::parse`] call, so one
/// `Parser` may parse many inputs, including after a failure.
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::Parser;
///
/// let mut parser = Parser::new();
/// assert!(parser.parse("a = ").is_err());
/// let doc = parser.parse("a = 1").unwrap();
/// assert_eq!(doc.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    options: ParseOptions,
    document: Document,
    cursor: Cursor,
    line: usize,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Parser {
            options,
            document: Document::new(),
            cursor: Cursor::root(),
            line: 0,
        }
    }

    /// The options this parser was created with.
    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses `input` into a document.
    ///
    /// # Errors
    ///
    /// Returns the first structural, classification or redefinition error.
    /// No partial document is returned.
    pub fn parse(&mut self, input: &str) -> Result<Document> {
        self.reset();
        let result = self.parse_lines(input);
        let document = std::mem::take(&mut self.document);
        self.reset();
        result.map(|()| {
            debug!("parsed document with {} top-level keys", document.len());
            document
        })
    }

    fn reset(&mut self) {
        self.document = Document::new();
        self.cursor = Cursor::root();
        self.line = 0;
    }

    fn parse_lines(&mut self, input: &str) -> Result<()> {
        for logical in LineSplitter::new(input) {
            let LogicalLine { text, line } = logical?;
            self.line = line;
            self.process_line(&text)?;
        }
        Ok(())
    }

    fn process_line(&mut self, raw: &str) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }
        trace!("line {}: {}", self.line, line);

        if let Some(inner) = line.strip_prefix("[[").and_then(|s| s.strip_suffix("]]")) {
            let path = header_path(inner).ok_or_else(|| Error::invalid_line(line, self.line))?;
            return self.open_table_array(path);
        }

        if let Some(inner) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let path = header_path(inner).ok_or_else(|| Error::invalid_line(line, self.line))?;
            return self.open_table(path);
        }

        if let Some((key, value)) = split_assignment(line) {
            let value = Classifier::new(self.line, self.options.max_depth).classify(value)?;
            return self.insert(key, value);
        }

        Err(Error::invalid_line(line, self.line))
    }

    /// Handles `[a.b.c]`.
    fn open_table(&mut self, path: Vec<String>) -> Result<()> {
        let header = path.join(".");
        let Some((last, parents)) = path.split_last() else {
            return Err(Error::invalid_line(&header, self.line));
        };

        let parent = walk(&mut self.document, parents, &header, self.line)?;
        match parent.get(last) {
            None => {
                parent.insert(last.clone(), Value::Table(Document::new()));
            }
            Some(Value::Table(_)) => {}
            Some(_) => return Err(Error::key_redefinition(&header, self.line)),
        }

        debug!("line {}: selected table [{}]", self.line, header);
        self.cursor = Cursor { path };
        Ok(())
    }

    /// Handles `[[a.b.c]]`.
    fn open_table_array(&mut self, path: Vec<String>) -> Result<()> {
        let header = path.join(".");
        let Some((last, parents)) = path.split_last() else {
            return Err(Error::invalid_line(&header, self.line));
        };

        let parent = walk(&mut self.document, parents, &header, self.line)?;
        let entries = match parent.get_mut(last) {
            None => {
                parent.insert(last.clone(), Value::TableArray(vec![Document::new()]));
                1
            }
            Some(Value::TableArray(docs)) => {
                docs.push(Document::new());
                docs.len()
            }
            Some(_) => return Err(Error::key_redefinition(&header, self.line)),
        };

        debug!(
            "line {}: appended table #{} to [[{}]]",
            self.line, entries, header
        );
        self.cursor = Cursor { path };
        Ok(())
    }

    fn insert(&mut self, key: &str, value: Value) -> Result<()> {
        let table = self.cursor.resolve(&mut self.document, self.line)?;
        if table.contains_key(key) {
            let full_key = if self.cursor.path().is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", self.cursor.dotted(), key)
            };
            return Err(Error::key_redefinition(&full_key, self.line));
        }
        table.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> Vec<(String, usize)> {
        LineSplitter::new(input)
            .map(|l| l.map(|l| (l.text, l.line)))
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_splitter_strips_comments() {
        assert_eq!(
            lines("a = 1 # one\n# whole line\nb = \"#2\" # two"),
            vec![
                ("a = 1 ".to_string(), 1),
                ("".to_string(), 2),
                ("b = \"#2\" ".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_splitter_joins_open_arrays() {
        assert_eq!(
            lines("a = [\n  1, # first\n  2,\n]\nb = 3"),
            vec![
                ("a = [   1,    2, ]".to_string(), 1),
                ("b = 3".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_splitter_handles_crlf() {
        assert_eq!(
            lines("a = 1\r\nb = 2"),
            vec![("a = 1".to_string(), 1), ("b = 2".to_string(), 2)]
        );
    }

    #[test]
    fn test_splitter_errors() {
        let mut splitter = LineSplitter::new("a = \"open\nb = 2");
        assert_eq!(
            splitter.next(),
            Some(Err(Error::UnterminatedString { line: 1 }))
        );
        assert_eq!(splitter.next(), None);

        let mut splitter = LineSplitter::new("x = 1\na = [1,\n2");
        assert!(matches!(splitter.next(), Some(Ok(_))));
        assert_eq!(
            splitter.next(),
            Some(Err(Error::UnterminatedArray { line: 2 }))
        );
    }

    #[test]
    fn test_header_path() {
        assert_eq!(
            header_path("a.b-c.d_e"),
            Some(vec!["a".to_string(), "b-c".to_string(), "d_e".to_string()])
        );
        assert_eq!(header_path(" a.b "), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(header_path("a . b"), None);
        assert_eq!(header_path("a..b"), None);
        assert_eq!(header_path(""), None);
        assert_eq!(header_path("a b"), None);
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("a = 1"), Some(("a", "1")));
        assert_eq!(split_assignment("a-b_c=\"x\""), Some(("a-b_c", "\"x\"")));
        assert_eq!(split_assignment("a ="), None);
        assert_eq!(split_assignment("= 1"), None);
        assert_eq!(split_assignment("a b = 1"), None);
    }

    #[test]
    fn test_cursor_tracks_headers() {
        let mut parser = Parser::new();
        parser.parse_lines("[a.b]").unwrap();
        assert_eq!(parser.cursor.path(), &["a".to_string(), "b".to_string()]);
        parser.parse_lines("[[c]]").unwrap();
        assert_eq!(parser.cursor.path(), &["c".to_string()]);
    }

    #[test]
    fn test_parser_reset_between_runs() {
        let mut parser = Parser::new();
        assert!(parser.parse("[a]\nx = 1\nx = 2").is_err());
        assert_eq!(parser.cursor, Cursor::root());
        assert!(parser.document.is_empty());

        let doc = parser.parse("x = 1").unwrap();
        assert_eq!(doc.get("x"), Some(&Value::Integer(1)));
    }
}
