//! Configuration options for parsing.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlite::{parse_with_options, ParseOptions};
//!
//! let options = ParseOptions::new().with_max_depth(2);
//! assert!(parse_with_options("a = [[1], [2]]", options.clone()).is_ok());
//! assert!(parse_with_options("a = [[[1]]]", options).is_err());
//! ```

/// Default limit on how deeply array values may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration options for the [`Parser`](crate::Parser).
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.max_depth, 64);
///
/// let options = ParseOptions::new().with_max_depth(8);
/// assert_eq!(options.max_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting depth of array values. A flat array has depth 1.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum array nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
