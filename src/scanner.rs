//! Lexical scanner.
//!
//! The scanner turns raw document text into an ordered sequence of
//! [`Token`]s, each tagged with a [`TokenKind`] and its source position.
//!
//! Several token patterns overlap (`true` is also a valid bare key, `1979`
//! is the start of both an integer and a date-time), so the scanner tries an
//! ordered list of matchers at the current offset and the first one that
//! matches wins. Every matcher is anchored at the current offset, which keeps
//! the scan linear in the input length.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlite::scanner::{tokenize, TokenKind};
//!
//! let tokens = tokenize("port = 8080").unwrap();
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Key,
//!         TokenKind::Whitespace,
//!         TokenKind::Assignment,
//!         TokenKind::Whitespace,
//!         TokenKind::Integer,
//!     ]
//! );
//! ```

use crate::{Error, Result};
use std::fmt;

/// The classification of a scanned token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `=`
    Assignment,
    /// `true` or `false`
    Boolean,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    DateTime,
    /// `-?digits.digits`
    Float,
    /// `-?digits`
    Integer,
    /// Letters, digits, `_` and `-`
    Key,
    /// `[[name(.name)*]]`
    TableArray,
    /// `[name(.name)*]`
    Table,
    /// A double-quoted string, escapes included verbatim
    String,
    /// `#` to end of line
    Comment,
    /// Spaces and tabs
    Whitespace,
    /// `\n`, `\r\n` or `\r`
    Newline,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `,`
    ArraySeparator,
}

impl TokenKind {
    /// Returns a short, stable name for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Assignment => "assignment",
            TokenKind::Boolean => "boolean",
            TokenKind::DateTime => "datetime",
            TokenKind::Float => "float",
            TokenKind::Integer => "integer",
            TokenKind::Key => "key",
            TokenKind::TableArray => "table-array",
            TokenKind::Table => "table",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::ArrayStart => "array-start",
            TokenKind::ArrayEnd => "array-end",
            TokenKind::ArraySeparator => "array-separator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of the input.
///
/// `line` and `column` are 1-based and count characters; `offset` is the
/// byte offset of the token's first byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// Returns the byte length of the match anchored at the start of the input.
type Matcher = fn(&str) -> Option<usize>;

/// Token rules in priority order.
const RULES: &[(TokenKind, Matcher)] = &[
    (TokenKind::Assignment, match_assignment),
    (TokenKind::Boolean, match_boolean),
    (TokenKind::DateTime, match_datetime),
    (TokenKind::Float, match_float),
    (TokenKind::Integer, match_integer),
    (TokenKind::Key, match_key),
    (TokenKind::TableArray, match_table_array),
    (TokenKind::Table, match_table),
    (TokenKind::String, match_string),
    (TokenKind::Comment, match_comment),
    (TokenKind::Whitespace, match_whitespace),
    (TokenKind::Newline, match_newline),
    (TokenKind::ArrayStart, match_array_start),
    (TokenKind::ArrayEnd, match_array_end),
    (TokenKind::ArraySeparator, match_array_separator),
];

#[inline]
pub(crate) fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

#[inline]
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length of `-?digits` at the start, or 0 when there are no digits.
fn signed_digits(bytes: &[u8]) -> usize {
    let sign = usize::from(bytes.first() == Some(&b'-'));
    match count_digits(&bytes[sign..]) {
        0 => 0,
        n => sign + n,
    }
}

fn match_assignment(input: &str) -> Option<usize> {
    input.starts_with('=').then_some(1)
}

fn match_boolean(input: &str) -> Option<usize> {
    if input.starts_with("true") {
        Some(4)
    } else if input.starts_with("false") {
        Some(5)
    } else {
        None
    }
}

/// Matches exactly `dddd-dd-ddTdd:dd:ddZ`.
pub(crate) fn match_datetime(input: &str) -> Option<usize> {
    const SHAPE: &[u8; 20] = b"0000-00-00T00:00:00Z";
    let bytes = input.as_bytes().get(..SHAPE.len())?;
    let matches = bytes.iter().zip(SHAPE.iter()).all(|(b, s)| match s {
        b'0' => b.is_ascii_digit(),
        _ => b == s,
    });
    matches.then_some(SHAPE.len())
}

fn match_float(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let int_len = signed_digits(bytes);
    if int_len == 0 || bytes.get(int_len) != Some(&b'.') {
        return None;
    }
    match count_digits(&bytes[int_len + 1..]) {
        0 => None,
        frac_len => Some(int_len + 1 + frac_len),
    }
}

fn match_integer(input: &str) -> Option<usize> {
    match signed_digits(input.as_bytes()) {
        0 => None,
        n => Some(n),
    }
}

fn match_key(input: &str) -> Option<usize> {
    match input.bytes().take_while(|b| is_key_byte(*b)).count() {
        0 => None,
        n => Some(n),
    }
}

/// Length of a `name(.name)*`-ish run of key bytes and dots.
fn header_name_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| is_key_byte(**b) || **b == b'.')
        .count()
}

fn match_table_array(input: &str) -> Option<usize> {
    let rest = input.strip_prefix("[[")?.as_bytes();
    let name_len = header_name_len(rest);
    (name_len > 0 && rest[name_len..].starts_with(b"]]")).then_some(name_len + 4)
}

fn match_table(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('[')?.as_bytes();
    let name_len = header_name_len(rest);
    (name_len > 0 && rest.get(name_len) == Some(&b']')).then_some(name_len + 2)
}

fn match_string(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('"')?;
    let mut chars = rest.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Some(idx + 2),
            '\\' => match chars.next() {
                Some((_, '\n' | '\r')) | None => return None,
                Some(_) => {}
            },
            _ => {}
        }
    }
    None
}

fn match_comment(input: &str) -> Option<usize> {
    if !input.starts_with('#') {
        return None;
    }
    Some(input.find(|c: char| c == '\r' || c == '\n').unwrap_or(input.len()))
}

fn match_whitespace(input: &str) -> Option<usize> {
    let len: usize = input
        .chars()
        .take_while(|c| c.is_whitespace() && *c != '\r' && *c != '\n')
        .map(char::len_utf8)
        .sum();
    (len > 0).then_some(len)
}

fn match_newline(input: &str) -> Option<usize> {
    if input.starts_with("\r\n") {
        Some(2)
    } else if input.starts_with('\r') || input.starts_with('\n') {
        Some(1)
    } else {
        None
    }
}

fn match_array_start(input: &str) -> Option<usize> {
    input.starts_with('[').then_some(1)
}

fn match_array_end(input: &str) -> Option<usize> {
    input.starts_with(']').then_some(1)
}

fn match_array_separator(input: &str) -> Option<usize> {
    input.starts_with(',').then_some(1)
}

/// An iterator over the tokens of an input string.
///
/// Yields `Err` once, at the first unrecognized character, and then stops.
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::scanner::Scanner;
/// use serde_tomlite::Error;
///
/// let mut scanner = Scanner::new("a = .");
/// let err = scanner.find_map(|t| t.err()).unwrap();
/// assert_eq!(err, Error::unexpected_character('.', 1, 5));
/// ```
pub struct Scanner<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Scanner {
            input,
            offset: 0,
            line: 1,
            column: 1,
            failed: false,
        }
    }

    fn next_token(&mut self) -> Option<Result<Token<'a>>> {
        let rest = &self.input[self.offset..];
        let ch = rest.chars().next()?;

        let Some((kind, len)) = RULES
            .iter()
            .find_map(|(kind, matcher)| matcher(rest).map(|len| (*kind, len)))
        else {
            self.failed = true;
            return Some(Err(Error::unexpected_character(ch, self.line, self.column)));
        };

        let token = Token {
            kind,
            text: &rest[..len],
            line: self.line,
            column: self.column,
            offset: self.offset,
        };
        self.offset += len;
        self.advance_position(&token);
        Some(Ok(token))
    }

    /// Moves the line/column counters past `token`.
    fn advance_position(&mut self, token: &Token<'a>) {
        if token.kind == TokenKind::Newline {
            self.line += 1;
            self.column = 1;
            return;
        }

        // Only quoted strings can span lines; continue counting from the
        // text after their last line break.
        let mut breaks = 0;
        let mut tail_start = None;
        let mut chars = token.text.char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                '\r' => {
                    if let Some((_, '\n')) = chars.peek() {
                        chars.next();
                        tail_start = Some(idx + 2);
                    } else {
                        tail_start = Some(idx + 1);
                    }
                    breaks += 1;
                }
                '\n' => {
                    tail_start = Some(idx + 1);
                    breaks += 1;
                }
                _ => {}
            }
        }

        match tail_start {
            Some(start) => {
                self.line += breaks;
                self.column = token.text[start..].chars().count() + 1;
            }
            None => self.column += token.text.chars().count(),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_token()
    }
}

/// Scans the whole input into tokens, failing at the first unrecognized
/// character.
///
/// # Errors
///
/// Returns [`Error::UnexpectedCharacter`] with the 1-based line and column of
/// the offending character.
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::scanner::tokenize;
/// use serde_tomlite::Error;
///
/// assert_eq!(
///     tokenize(".").unwrap_err(),
///     Error::unexpected_character('.', 1, 1)
/// );
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    Scanner::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_boolean_wins_over_key() {
        assert_eq!(kinds("true"), vec![TokenKind::Boolean]);
        assert_eq!(kinds("trueish"), vec![TokenKind::Boolean, TokenKind::Key]);
    }

    #[test]
    fn test_datetime_wins_over_integer() {
        assert_eq!(kinds("1979-05-27T07:32:00Z"), vec![TokenKind::DateTime]);
        assert_eq!(kinds("1979-05"), vec![TokenKind::Integer, TokenKind::Integer]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("3.14"), vec![TokenKind::Float]);
        assert_eq!(kinds("-3.14"), vec![TokenKind::Float]);
        assert_eq!(kinds("42"), vec![TokenKind::Integer]);
        assert_eq!(kinds("-42"), vec![TokenKind::Integer]);
        // No fraction digits: integer then an unknown '.'
        assert!(tokenize("3.").is_err());
    }

    #[test]
    fn test_headers_and_brackets() {
        assert_eq!(kinds("[a.b]"), vec![TokenKind::Table]);
        assert_eq!(kinds("[[a.b]]"), vec![TokenKind::TableArray]);
        assert_eq!(kinds("[1]"), vec![TokenKind::Table]);
        assert_eq!(
            kinds("[ 1 ]"),
            vec![
                TokenKind::ArrayStart,
                TokenKind::Whitespace,
                TokenKind::Integer,
                TokenKind::Whitespace,
                TokenKind::ArrayEnd,
            ]
        );
        assert_eq!(
            kinds("[\"a\",\"b\"]"),
            vec![
                TokenKind::ArrayStart,
                TokenKind::String,
                TokenKind::ArraySeparator,
                TokenKind::String,
                TokenKind::ArrayEnd,
            ]
        );
    }

    #[test]
    fn test_string_with_escapes() {
        let tokens = tokenize(r#""say \"hi\" \\""#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, r#""say \"hi\" \\""#);
    }

    #[test]
    fn test_comments() {
        assert_eq!(kinds("# note"), vec![TokenKind::Comment]);
        assert_eq!(kinds("#\n"), vec![TokenKind::Comment, TokenKind::Newline]);
    }

    #[test]
    fn test_newline_variants() {
        let tokens = tokenize("a\r\nb\rc\nd").unwrap();
        let lines: Vec<usize> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Key)
            .map(|t| t.line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_offsets_are_bytes_columns_are_chars() {
        let tokens = tokenize("\"é\" x").unwrap();
        let key = tokens.last().unwrap();
        assert_eq!(key.kind, TokenKind::Key);
        assert_eq!(key.offset, 5);
        assert_eq!(key.column, 5);
    }

    #[test]
    fn test_scanner_stops_after_error() {
        let mut scanner = Scanner::new("a . b");
        assert!(matches!(scanner.next(), Some(Ok(_))));
        assert!(matches!(scanner.next(), Some(Ok(_))));
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }
}
