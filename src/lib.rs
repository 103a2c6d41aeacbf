//! # serde_snbt
//!
//! A codec for SNBT, the stringified typed data format used by quest-book
//! chapter files, with Serde support.
//!
//! ## What is SNBT?
//!
//! SNBT is a JSON-like text format: compounds (`{ key: value }`), lists
//! (`[a, b]`), quoted strings, `true`/`false` and numbers. It differs from JSON
//! in three ways that matter to a codec:
//!
//! - keys may be unquoted
//! - commas are optional; a newline is enough to separate items
//! - numbers may carry a type suffix (`12s` short, `12l` long, `1.5f` float,
//!   `-0.75d` decimal) that has to survive a round trip unchanged
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_snbt = "0.1"
//! ```
//!
//! ### Editing a document
//!
//! ```rust
//! use serde_snbt::{decode, encode, Value};
//!
//! let mut chapter = decode(r#"{
//!     id: "5A1B"
//!     x: -0.75d
//!     title: "Getting Started"
//! }"#).unwrap();
//!
//! chapter
//!     .as_compound_mut()
//!     .unwrap()
//!     .insert("title", Value::from("First Steps"));
//!
//! // Keys come out sorted; the decimal keeps its exact text.
//! assert_eq!(
//!     encode(&chapter).unwrap(),
//!     r#"{ id: "5A1B", title: "First Steps", x: -0.75d }"#
//! );
//! ```
//!
//! ### Typed data
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_snbt::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Task {
//!     item: String,
//!     count: u32,
//! }
//!
//! let task = Task { item: "minecraft:oak_log".to_string(), count: 16 };
//! let text = to_string(&task).unwrap();
//! assert_eq!(text, r#"{ count: 16, item: "minecraft:oak_log" }"#);
//!
//! let back: Task = from_str(&text).unwrap();
//! assert_eq!(task, back);
//! ```
//!
//! ### Building values with `snbt!`
//!
//! ```rust
//! use serde_snbt::{snbt, Value};
//!
//! let value = snbt!({
//!     "title": "Gather wood",
//!     "tags": ["early", "wood"]
//! });
//! assert_eq!(value.to_string(), r#"{ tags: [ "early", "wood" ], title: "Gather wood" }"#);
//! ```
//!
//! ## Round trips
//!
//! `encode(decode(x))` is stable: encoding it again yields the same text.
//! Suffixed literals are stored as text, not converted to host numbers, so
//! `-0.75d`, `+2D` and `0.50F` come back byte for byte.
//!
//! ## Logging
//!
//! The codec emits `tracing` events: `debug` at decode/encode boundaries and
//! `trace` for every container the parser opens and closes. No subscriber is
//! installed by the library.

mod builder;
pub mod de;
pub mod error;
mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use map::Compound;
pub use options::SnbtOptions;
pub use ser::{Encoder, ValueSerializer};
pub use value::{Literal, LiteralKind, Number, Sign, Value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;
use tracing::debug;

/// Parses SNBT text into a [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::{decode, Value};
///
/// let value = decode("{ min_width: 250, shape: \"hexagon\" }").unwrap();
/// let map = value.as_compound().unwrap();
/// assert_eq!(map["min_width"], Value::from(250));
/// ```
///
/// # Errors
///
/// Returns [`Error::Lex`], [`Error::Syntax`], [`Error::NumberRange`] or
/// [`Error::DepthLimit`], each with the position of the problem.
pub fn decode(input: &str) -> Result<Value> {
    decode_with_options(input, &SnbtOptions::default())
}

/// Parses SNBT text with custom decoder limits.
///
/// ```rust
/// use serde_snbt::{decode_with_options, Error, SnbtOptions};
///
/// let options = SnbtOptions::new().with_max_depth(2);
/// assert!(decode_with_options("[[1]]", &options).is_ok());
/// assert!(matches!(
///     decode_with_options("[[[1]]]", &options),
///     Err(Error::DepthLimit { .. })
/// ));
/// ```
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_options(input: &str, options: &SnbtOptions) -> Result<Value> {
    debug!(len = input.len(), max_depth = options.max_depth, "decoding SNBT");
    let value = Deserializer::with_options(input, options).parse_document();
    match &value {
        Ok(v) => debug!(root = v.type_name(), "decoded SNBT"),
        Err(e) => debug!(error = %e, "SNBT decode failed"),
    }
    value
}

/// Parses SNBT from UTF-8 bytes.
///
/// # Errors
///
/// Returns [`Error::Custom`] if the bytes are not UTF-8, otherwise see [`decode`].
pub fn decode_slice(input: &[u8]) -> Result<Value> {
    let s = std::str::from_utf8(input).map_err(|e| Error::custom(e.to_string()))?;
    decode(s)
}

/// Reads a whole stream and parses it as SNBT.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise see [`decode`].
pub fn decode_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut string = String::new();
    reader.read_to_string(&mut string)?;
    decode(&string)
}

/// Encodes a [`Value`] tree in canonical form.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::{decode, encode};
///
/// let value = decode("[1.5f 2S\n\"x\"]").unwrap();
/// assert_eq!(encode(&value).unwrap(), r#"[ 1.5f, 2S, "x" ]"#);
/// ```
///
/// # Errors
///
/// Returns [`Error::Encode`] if the tree contains a NaN or infinite double.
pub fn encode(value: &Value) -> Result<String> {
    encode_with_options(value, &SnbtOptions::default())
}

/// Encodes a [`Value`] tree with custom layout options.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_with_options(value: &Value, options: &SnbtOptions) -> Result<String> {
    let mut encoder = Encoder::new(options);
    encoder.write(value)?;
    let output = encoder.into_inner();
    debug!(len = output.len(), pretty = options.pretty, "encoded SNBT");
    Ok(output)
}

/// Encodes a [`Value`] tree in canonical form to a writer.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails, otherwise see [`encode`].
pub fn encode_to_writer<W>(mut writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    let text = encode(value)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Serialize any `T: Serialize` to an SNBT string.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "{ x: 1, y: 2 }");
/// ```
///
/// # Errors
///
/// Returns [`Error::Absent`] for a top-level `None` or unit, and
/// [`Error::Encode`] for non-finite floats and non-string map keys.
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &SnbtOptions::default())
}

/// Serialize any `T: Serialize` to multi-line SNBT.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::to_string_pretty;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string_pretty(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, "{\n  x: 1\n  y: 2\n}");
/// ```
///
/// # Errors
///
/// See [`to_string`].
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &SnbtOptions::pretty())
}

/// Serialize any `T: Serialize` to SNBT with custom layout options.
///
/// # Errors
///
/// See [`to_string`].
pub fn to_string_with_options<T>(value: &T, options: &SnbtOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    encode_with_options(&to_value(value)?, options)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// Suffixed literals held by `T` (as [`Literal`] or [`Value`] fields) keep
/// their exact text.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::{decode, to_value};
///
/// let original = decode("{ x: -0.75d }").unwrap();
/// assert_eq!(to_value(&original).unwrap(), original);
/// ```
///
/// # Errors
///
/// See [`to_string`].
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a writer as canonical SNBT.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails, otherwise see [`to_string`].
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Deserialize an instance of type `T` from SNBT text.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{ x: 1\n y: 2 }").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a decode error (see [`decode`]) if the text is not valid SNBT, or
/// [`Error::Custom`] if it does not match the shape of `T`.
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::from_str(s);
    T::deserialize(&mut deserializer)
}

/// Deserialize an instance of type `T` from SNBT bytes.
///
/// # Errors
///
/// Returns [`Error::Custom`] if the bytes are not UTF-8, otherwise see [`from_str`].
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Deserialize an instance of type `T` from an I/O stream of SNBT.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise see [`from_str`].
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader.read_to_string(&mut string)?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from a [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::{decode, from_value};
///
/// let value = decode("[1s, 2l, 3]").unwrap();
/// let numbers: Vec<i64> = from_value(value).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Custom`] if the tree does not match the shape of `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(de::ValueDeserializer::new(value))
}
