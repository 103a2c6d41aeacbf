//! Configuration options for SNBT encoding and decoding.
//!
//! [`SnbtOptions`] controls the encoder layout and the decoder nesting limit.
//! The defaults produce the canonical single-line form:
//!
//! ```rust
//! use serde_snbt::{decode, encode_with_options, SnbtOptions};
//!
//! let value = decode("{ b: [1, 2], a: {} }").unwrap();
//!
//! let compact = encode_with_options(&value, &SnbtOptions::new()).unwrap();
//! assert_eq!(compact, "{ a: {}, b: [ 1, 2 ] }");
//!
//! let pretty = encode_with_options(&value, &SnbtOptions::pretty()).unwrap();
//! assert_eq!(pretty, "{\n  a: {}\n  b: [\n    1\n    2\n  ]\n}");
//! ```

/// Default maximum nesting depth accepted by the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration options for SNBT encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::SnbtOptions;
///
/// // Canonical single-line output
/// let options = SnbtOptions::new();
/// assert!(!options.pretty);
///
/// // One entry per line, four-space indentation, tighter depth limit
/// let options = SnbtOptions::pretty()
///     .with_indent(4)
///     .with_max_depth(64);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnbtOptions {
    /// Spaces per nesting level in pretty output.
    pub indent: usize,
    /// Write one entry per line instead of the canonical single-line form.
    pub pretty: bool,
    /// Deepest container nesting the decoder accepts.
    pub max_depth: usize,
}

impl Default for SnbtOptions {
    fn default() -> Self {
        SnbtOptions {
            indent: 2,
            pretty: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SnbtOptions {
    /// Creates default options (canonical form, depth limit of 512).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for multi-line output.
    ///
    /// Entries are separated by newlines alone, which the decoder accepts in
    /// place of commas.
    #[must_use]
    pub fn pretty() -> Self {
        SnbtOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size. Only affects pretty output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the maximum nesting depth accepted by the decoder.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
