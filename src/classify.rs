//! Value classification.
//!
//! Turns the raw text on the right-hand side of `key = value` into a typed
//! [`Value`]. Checks run in a fixed order and the first match wins:
//!
//! 1. `true` / `false`
//! 2. `YYYY-MM-DDTHH:MM:SSZ` date-times
//! 3. floats (`-?digits.digits`)
//! 4. integers (`-?digits`)
//! 5. double-quoted strings
//! 6. arrays, recursively
//!
//! ```rust
//! use serde_tomlite::classify::classify;
//! use serde_tomlite::Value;
//!
//! assert_eq!(classify("27", 1).unwrap(), Value::Integer(27));
//! assert_eq!(classify("\"27\"", 1).unwrap(), Value::from("27"));
//! assert!(classify(".000001", 1).is_err());
//! ```

use crate::options::DEFAULT_MAX_DEPTH;
use crate::scanner::match_datetime;
use crate::value::parse_datetime;
use crate::{Error, Result, Value};

/// Classifies `raw` with the default nesting limit.
///
/// `line` is only used for error reporting.
///
/// # Errors
///
/// Returns a classification error (`InvalidFloat`, `MixedArrayTypes`,
/// `UnterminatedString`, ...) when the text is not a valid value.
pub fn classify(raw: &str, line: usize) -> Result<Value> {
    Classifier::new(line, DEFAULT_MAX_DEPTH).classify(raw)
}

pub(crate) struct Classifier {
    line: usize,
    max_depth: usize,
}

impl Classifier {
    pub(crate) fn new(line: usize, max_depth: usize) -> Self {
        Classifier { line, max_depth }
    }

    pub(crate) fn classify(&self, raw: &str) -> Result<Value> {
        self.value(raw, 0)
    }

    fn value(&self, raw: &str, depth: usize) -> Result<Value> {
        let raw = raw.trim();

        if raw == "true" || raw == "false" {
            return Ok(Value::Boolean(raw == "true"));
        }

        if looks_like_datetime(raw) {
            return match match_datetime(raw).and_then(|_| parse_datetime(raw)) {
                Some(dt) => Ok(Value::DateTime(dt)),
                None => Err(Error::invalid_datetime(raw, self.line)),
            };
        }

        if is_float(raw) {
            return raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| Error::invalid_float(raw, self.line));
        }
        if looks_numeric(raw) && raw.contains('.') {
            return Err(Error::invalid_float(raw, self.line));
        }

        if is_integer(raw) {
            return raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Error::invalid_integer(raw, self.line));
        }

        if raw.starts_with('"') {
            return self.string(raw).map(Value::String);
        }

        if raw.starts_with('[') {
            if raw.ends_with(']') {
                return self.array(raw, depth + 1);
            }
            if !opening_bracket_closes(raw) {
                return Err(Error::UnterminatedArray { line: self.line });
            }
        }

        Err(Error::unknown_value_type(raw, self.line))
    }

    /// Decodes a quoted string, escapes included.
    fn string(&self, raw: &str) -> Result<String> {
        let mut chars = raw.char_indices().skip(1);
        let mut out = String::with_capacity(raw.len());

        while let Some((idx, ch)) = chars.next() {
            match ch {
                '"' => {
                    if idx + 1 != raw.len() {
                        return Err(Error::unknown_value_type(raw, self.line));
                    }
                    return Ok(out);
                }
                '\\' => {
                    let Some((_, escape)) = chars.next() else {
                        break;
                    };
                    let decoded = match escape {
                        '0' => '\0',
                        'b' => '\u{0008}',
                        't' => '\t',
                        'n' => '\n',
                        'f' => '\u{000C}',
                        'r' => '\r',
                        '"' => '"',
                        '\\' => '\\',
                        'u' => {
                            let hex: String = chars.by_ref().take(4).map(|(_, c)| c).collect();
                            self.unicode_escape(&hex)?
                        }
                        other => {
                            return Err(Error::invalid_escape(&format!("\\{}", other), self.line))
                        }
                    };
                    out.push(decoded);
                }
                '\n' | '\r' => break,
                other => out.push(other),
            }
        }

        Err(Error::UnterminatedString { line: self.line })
    }

    fn unicode_escape(&self, hex: &str) -> Result<char> {
        let invalid = || Error::invalid_escape(&format!("\\u{}", hex), self.line);
        if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(invalid)
    }

    /// Parses `[a, b, ...]` into a homogeneous array.
    fn array(&self, raw: &str, depth: usize) -> Result<Value> {
        if depth > self.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.max_depth,
                line: self.line,
            });
        }

        let inner = raw
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or(Error::UnterminatedArray { line: self.line })?;

        let mut values: Vec<Value> = Vec::new();
        for element in self.split_elements(inner)? {
            let value = self.value(element, depth)?;
            if let Some(first) = values.first() {
                if first.kind() != value.kind() {
                    return Err(Error::mixed_array_types(
                        first.type_name(),
                        value.type_name(),
                        self.line,
                    ));
                }
            }
            values.push(value);
        }

        Ok(Value::Array(values))
    }

    /// Splits array contents on commas outside nested brackets and strings.
    ///
    /// A trailing comma yields no empty final element.
    fn split_elements<'a>(&self, inner: &'a str) -> Result<Vec<&'a str>> {
        let mut elements = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut start = 0;

        for (idx, ch) in inner.char_indices() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }

            match ch {
                '"' => in_string = true,
                '[' => depth += 1,
                ']' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or(Error::UnterminatedArray { line: self.line })?;
                }
                ',' if depth == 0 => {
                    elements.push(&inner[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            }
        }

        if in_string {
            return Err(Error::UnterminatedString { line: self.line });
        }
        if depth != 0 {
            return Err(Error::UnterminatedArray { line: self.line });
        }

        let last = &inner[start..];
        if !last.trim().is_empty() {
            elements.push(last);
        }
        Ok(elements)
    }
}

/// Date-time shaped enough that a failure to parse is an error rather than
/// a fallthrough to the other rules.
fn looks_like_datetime(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 20
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b'T'
        && bytes[19] == b'Z'
}

/// Whether the `[` at the start of `raw` is matched somewhere in it.
fn opening_bracket_closes(raw: &str) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for ch in raw.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// `-?digits.digits`, the whole string.
fn is_float(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    match digits.split_once('.') {
        Some((int, frac)) => is_digits(int) && is_digits(frac),
        None => false,
    }
}

/// `-?digits`, the whole string.
fn is_integer(raw: &str) -> bool {
    is_digits(raw.strip_prefix('-').unwrap_or(raw))
}

/// Only an optional leading `-`, digits and dots, with at least one digit.
fn looks_numeric(raw: &str) -> bool {
    let body = raw.strip_prefix('-').unwrap_or(raw);
    body.bytes().any(|b| b.is_ascii_digit())
        && body.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
