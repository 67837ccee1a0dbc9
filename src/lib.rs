//! # serde_tomlite
//!
//! A parser for a compact subset of TOML, producing an ordered [`Document`]
//! tree and feeding it to Serde.
//!
//! ## Supported Syntax
//!
//! - **Assignments**: `key = value` with bare keys made of `A-Z a-z 0-9 _ -`
//! - **Tables**: `[a.b.c]` headers that create nested tables on demand
//! - **Arrays of tables**: `[[products]]` headers, each appending a fresh table
//! - **Scalars**: strings with escapes, integers, floats, booleans and
//!   `YYYY-MM-DDTHH:MM:SSZ` datetimes
//! - **Arrays**: homogeneous, nestable, and allowed to span several lines
//! - **Comments**: `#` to end of line, outside of strings
//!
//! Inline tables, literal strings, multi-line strings and dotted keys on the
//! left of `=` are not supported.
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_tomlite = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Parsing into a Document
//!
//! ```rust
//! use serde_tomlite::{parse, Value};
//!
//! let doc = parse("title = \"example\"\n[owner]\nage = 27").unwrap();
//! assert_eq!(doc.get("title"), Some(&Value::from("example")));
//! assert_eq!(doc.get_path("owner.age"), Some(&Value::Integer(27)));
//! ```
//!
//! ### Deserializing into Rust Types
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_tomlite::from_str;
//!
//! #[derive(Deserialize, PartialEq, Debug)]
//! struct Product {
//!     name: String,
//!     sku: Option<i64>,
//! }
//!
//! #[derive(Deserialize, PartialEq, Debug)]
//! struct Catalog {
//!     products: Vec<Product>,
//! }
//!
//! let input = r#"
//! [[products]]
//! name = "Hammer"
//! sku = 738594937
//!
//! [[products]]
//! name = "Nail"
//! "#;
//!
//! let catalog: Catalog = from_str(input).unwrap();
//! assert_eq!(catalog.products.len(), 2);
//! assert_eq!(catalog.products[1].sku, None);
//! ```
//!
//! ### Tokens
//!
//! The [`scanner`] splits raw input into positioned tokens on its own,
//! which is handy for highlighting and diagnostics:
//!
//! ```rust
//! use serde_tomlite::{tokenize, TokenKind};
//!
//! let tokens = tokenize("a = 1").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Key);
//! assert_eq!(tokens[2].kind, TokenKind::Assignment);
//! ```
//!
//! ### Errors
//!
//! Every failure is an [`Error`] carrying the 1-based line it was detected on:
//!
//! ```rust
//! use serde_tomlite::{parse, Error};
//!
//! let err = parse("a = [1, \"two\"]").unwrap_err();
//! assert!(matches!(err, Error::MixedArrayTypes { line: 1, .. }));
//! ```

pub mod classify;
pub mod de;
pub mod document;
pub mod error;
pub mod macros;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod tagged;
pub mod value;

pub use de::Deserializer;
pub use document::Document;
pub use error::{Error, Result};
pub use options::ParseOptions;
pub use parser::{Cursor, Parser};
pub use scanner::{tokenize, Token, TokenKind};
pub use tagged::Tagged;
pub use value::{Value, ValueKind};

use serde::Deserialize;
use std::io;
use std::path::Path;

/// Parse a document with the default [`ParseOptions`].
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::parse;
///
/// let doc = parse("[a.b]\nc = true").unwrap();
/// assert_eq!(doc.get_path("a.b.c").and_then(|v| v.as_bool()), Some(true));
/// ```
///
/// # Errors
///
/// Returns the first error found; no partial document is produced.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse a document with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::{parse_with_options, Error, ParseOptions};
///
/// let options = ParseOptions::new().with_max_depth(1);
/// let err = parse_with_options("a = [[1]]", options).unwrap_err();
/// assert!(matches!(err, Error::NestingTooDeep { limit: 1, .. }));
/// ```
///
/// # Errors
///
/// Returns the first error found.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Document> {
    Parser::with_options(options).parse(input)
}

/// Read a file and parse its contents.
///
/// # Errors
///
/// Returns [`Error::SourceUnavailable`] if the file cannot be read, or any
/// parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)
        .map_err(|e| Error::source_unavailable(&path.display().to_string(), &e.to_string()))?;
    log::debug!("parsing {} ({} bytes)", path.display(), input.len());
    parse(&input)
}

/// Deserialize an instance of type `T` from a string.
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a parse error, or an error if the document does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    from_document(parse(s)?)
}

/// Deserialize an instance of type `T` from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, fail to parse, or do
/// not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let s = std::str::from_utf8(v).map_err(Error::custom)?;
    from_str(s)
}

/// Deserialize an instance of type `T` from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails, the input fails to parse, or the
/// document does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::source_unavailable("<reader>", &e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from a file.
///
/// # Errors
///
/// Returns [`Error::SourceUnavailable`] if the file cannot be read, or any
/// parse or deserialization error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_file<P, T>(path: P) -> Result<T>
where
    P: AsRef<Path>,
    T: for<'de> Deserialize<'de>,
{
    from_document(parse_file(path)?)
}

/// Deserialize an instance of type `T` from an already parsed document.
///
/// # Errors
///
/// Returns an error if the document does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document<T>(document: Document) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(Deserializer::from_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Owner {
        name: String,
        dob: String,
    }

    #[test]
    fn test_from_str_nested() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Root {
            title: String,
            owner: Owner,
        }

        let input = "title = \"TOML\"\n[owner]\nname = \"Tom\"\ndob = 1979-05-27T07:32:00Z";
        let root: Root = from_str(input).unwrap();
        assert_eq!(root.title, "TOML");
        assert_eq!(root.owner.dob, "1979-05-27T07:32:00Z");
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let result: Result<HashMap<String, i64>> = from_slice(&[b'a', b' ', b'=', 0xff]);
        assert!(matches!(result, Err(Error::Message(_))));
    }

    #[test]
    fn test_from_reader() {
        let cursor = io::Cursor::new(b"a = 1\nb = 2".to_vec());
        let map: HashMap<String, i64> = from_reader(cursor).unwrap();
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/nonexistent/serde_tomlite/config.toml").unwrap_err();
        match err {
            Error::SourceUnavailable { path, .. } => assert!(path.ends_with("config.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_reads_contents() {
        let path = std::env::temp_dir().join(format!("serde_tomlite_{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();
        let doc = parse_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(doc.get_path("server.port"), Some(&Value::Integer(8080)));
    }
}
