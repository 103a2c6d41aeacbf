//! SNBT encoding.
//!
//! This module turns [`Value`] trees into text and converts arbitrary
//! `Serialize` types into [`Value`] trees.
//!
//! ## Canonical form
//!
//! The [`Encoder`] writes a deterministic layout regardless of how the input
//! was formatted:
//!
//! - compounds as `{ k1: v1, k2: v2 }` with keys sorted by byte order, `{}` when empty
//! - lists as `[ v1, v2 ]`, `[]` when empty
//! - keys unquoted when they look like identifiers (`[A-Za-z_][A-Za-z0-9_-]*`)
//! - strings quoted, with `\\ \" \n \r \t` escaped and other control characters as `\u00XX`
//! - doubles in their shortest round-trip form, always with a `.`, `e` or `E`
//! - suffixed literals exactly as they were read
//!
//! ```rust
//! use serde_snbt::{decode, encode};
//!
//! let value = decode("{ z: -0.75d\n a: \"tab\there\" }").unwrap();
//! assert_eq!(encode(&value).unwrap(), r#"{ a: "tab\there", z: -0.75d }"#);
//! ```
//!
//! ## Serde types
//!
//! [`ValueSerializer`] builds a [`Value`] from anything implementing
//! `Serialize`; the crate-root [`to_string`](crate::to_string) then encodes it.
//! `None` and unit have no SNBT form: they are rejected with
//! [`Error::Absent`] except as struct fields or map values, where the entry is
//! left out.

use crate::value::LITERAL_TOKEN;
use crate::{Compound, Error, Literal, Number, Result, SnbtOptions, Value};
use serde::{ser, Serialize};

/// Writes [`Value`] trees as SNBT text.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::{Encoder, SnbtOptions, Value};
///
/// let options = SnbtOptions::new();
/// let mut encoder = Encoder::new(&options);
/// encoder.write(&Value::from(vec![Value::from(1), Value::from("a")])).unwrap();
/// assert_eq!(encoder.into_inner(), r#"[ 1, "a" ]"#);
/// ```
pub struct Encoder<'o> {
    output: String,
    options: &'o SnbtOptions,
    /// Reject values with no SNBT form instead of rendering them loosely.
    strict: bool,
}

impl<'o> Encoder<'o> {
    pub fn new(options: &'o SnbtOptions) -> Self {
        Encoder {
            output: String::with_capacity(256),
            options,
            strict: true,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the encoding of `value` to the output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the tree holds a NaN or infinite double.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        self.write_value(value, 0)
    }

    fn write_indent(&mut self, level: usize) {
        for _ in 0..level * self.options.indent {
            self.output.push(' ');
        }
    }

    fn write_value(&mut self, value: &Value, level: usize) -> Result<()> {
        match value {
            Value::Compound(map) => self.write_compound(map, level),
            Value::List(items) => self.write_list(items, level),
            Value::String(s) => {
                write_quoted(&mut self.output, s);
                Ok(())
            }
            Value::Bool(b) => {
                self.output.push_str(if *b { "true" } else { "false" });
                Ok(())
            }
            Value::Number(n) => self.write_number(n),
        }
    }

    fn write_number(&mut self, number: &Number) -> Result<()> {
        match number {
            Number::Integer(i) => self.output.push_str(&i.to_string()),
            Number::Double(d) => {
                if self.strict && !d.is_finite() {
                    return Err(Error::encode(format!(
                        "{} has no SNBT representation",
                        d
                    )));
                }
                self.output.push_str(&format_double(*d));
            }
            Number::Short(lit) | Number::Long(lit) | Number::Float(lit) | Number::Decimal(lit) => {
                self.write_literal(lit)
            }
        }
        Ok(())
    }

    fn write_literal(&mut self, lit: &Literal) {
        self.output.push_str(lit.sign().as_str());
        self.output.push_str(lit.int_part());
        if !lit.frac_part().is_empty() {
            self.output.push('.');
            self.output.push_str(lit.frac_part());
        }
        self.output.push(lit.suffix());
    }

    fn write_key(&mut self, key: &str) {
        if is_bare_key(key) {
            self.output.push_str(key);
        } else {
            write_quoted(&mut self.output, key);
        }
    }

    fn write_compound(&mut self, map: &Compound, level: usize) -> Result<()> {
        if map.is_empty() {
            self.output.push_str("{}");
            return Ok(());
        }

        self.output.push('{');
        for (i, (key, value)) in map.sorted_entries().into_iter().enumerate() {
            self.open_entry(i, level);
            self.write_key(key);
            self.output.push_str(": ");
            self.write_value(value, level + 1)?;
        }
        self.close(level);
        self.output.push('}');
        Ok(())
    }

    fn write_list(&mut self, items: &[Value], level: usize) -> Result<()> {
        if items.is_empty() {
            self.output.push_str("[]");
            return Ok(());
        }

        self.output.push('[');
        for (i, item) in items.iter().enumerate() {
            self.open_entry(i, level);
            self.write_value(item, level + 1)?;
        }
        self.close(level);
        self.output.push(']');
        Ok(())
    }

    /// Separator before the `i`-th entry of a container at `level`.
    fn open_entry(&mut self, i: usize, level: usize) {
        if self.options.pretty {
            self.output.push('\n');
            self.write_indent(level + 1);
        } else if i == 0 {
            self.output.push(' ');
        } else {
            self.output.push_str(", ");
        }
    }

    fn close(&mut self, level: usize) {
        if self.options.pretty {
            self.output.push('\n');
            self.write_indent(level);
        } else {
            self.output.push(' ');
        }
    }
}

/// Returns `true` if `key` can be written without quotes.
pub(crate) fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(crate::lexer::is_ident_char),
        _ => false,
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Shortest text that reads back as `value`, marked as floating point.
pub(crate) fn format_double(value: f64) -> String {
    // `Debug` is the shortest round-trip form and switches to exponent
    // notation for very large and very small magnitudes.
    let text = format!("{:?}", value);
    if !value.is_finite() || text.contains(['.', 'e', 'E']) {
        text
    } else {
        text + ".0"
    }
}

/// Lenient rendering used by `Display`.
pub(crate) fn display(value: &Value) -> String {
    let options = SnbtOptions::default();
    let mut encoder = Encoder::new(&options);
    encoder.strict = false;
    match encoder.write(value) {
        Ok(()) => encoder.into_inner(),
        Err(err) => format!("<{}>", err),
    }
}

/// Serializer that builds a [`Value`] from any `Serialize` type.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Compound,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

/// Wraps `value` as `{ variant: value }`, the externally tagged enum layout.
fn tagged(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut map = Compound::with_capacity(1);
            map.insert(name, value);
            Value::Compound(map)
        }
        None => value,
    }
}

fn to_snbt_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Like [`to_snbt_value`] but maps an absent value to `None`.
fn to_field_value<T>(value: &T) -> Result<Option<Value>>
where
    T: ?Sized + Serialize,
{
    match value.serialize(ValueSerializer) {
        Ok(v) => Ok(Some(v)),
        Err(Error::Absent) => Ok(None),
        Err(e) => Err(e),
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::from(i)),
            // Too big for a plain integer; a long literal keeps every digit.
            Err(_) => Literal::new(crate::Sign::Unsigned, v.to_string(), "", 'l').map(Value::from),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::List(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(Error::Absent)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Compound(Compound::new()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        if name == LITERAL_TOKEN {
            return match value.serialize(self)? {
                Value::String(text) => Literal::parse(&text).map(Value::from),
                other => Err(Error::encode(format!(
                    "literal marker wraps a {}",
                    other.type_name()
                ))),
            };
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(Some(variant), to_snbt_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_snbt_value(value)?);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::List(self.vec)))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Compound::new(),
            current_key: None,
            variant,
        }
    }

    fn field<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(value) = to_field_value(value)? {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::Compound(self.map)))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_snbt_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            Value::Number(Number::Integer(i)) => {
                self.current_key = Some(i.to_string());
                Ok(())
            }
            other => Err(Error::encode(format!(
                "compound keys must be strings, found {}",
                other.type_name()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.field(key, value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(value: &Value) -> String {
        let options = SnbtOptions::default();
        let mut encoder = Encoder::new(&options);
        encoder.write(value).unwrap();
        encoder.into_inner()
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(compact(&Value::Compound(Compound::new())), "{}");
        assert_eq!(compact(&Value::List(vec![])), "[]");
    }

    #[test]
    fn test_keys_sorted_and_quoted_when_needed() {
        let mut map = Compound::new();
        map.insert("zeta", Value::from(1));
        map.insert("has space", Value::from(2));
        map.insert("1st", Value::from(3));
        map.insert("_ok-key9", Value::from(4));
        map.insert("", Value::from(5));
        assert_eq!(
            compact(&Value::Compound(map)),
            r#"{ "": 5, "1st": 3, _ok-key9: 4, "has space": 2, zeta: 1 }"#
        );
    }

    #[test]
    fn test_string_escapes() {
        let value = Value::from("a\\b\"c\nd\re\tf\u{1}g\u{7f}αβ");
        assert_eq!(compact(&value), "\"a\\\\b\\\"c\\nd\\re\\tf\\u0001g\u{7f}αβ\"");
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(1.0), "1.0");
        assert_eq!(format_double(-0.5), "-0.5");
        assert_eq!(format_double(0.1), "0.1");
        assert_eq!(format_double(1e300), "1e300");
        assert_eq!(format_double(2.5e-8), "2.5e-8");
    }

    #[test]
    fn test_non_finite_double_rejected() {
        let options = SnbtOptions::default();
        let mut encoder = Encoder::new(&options);
        let err = encoder.write(&Value::from(f64::NAN)).unwrap_err();
        assert!(err.is_encode());
        assert_eq!(display(&Value::from(f64::INFINITY)), "inf");
    }

    #[test]
    fn test_literals_written_verbatim() {
        for text in ["-0.75d", "123s", "-123l", "1.5f", "+2D", "0.50F"] {
            let value = Value::from(Literal::parse(text).unwrap());
            assert_eq!(compact(&value), text);
        }
    }

    #[test]
    fn test_pretty_layout() {
        let options = SnbtOptions::pretty();
        let mut encoder = Encoder::new(&options);
        let mut inner = Compound::new();
        inner.insert("x", Value::from(1));
        let mut map = Compound::new();
        map.insert("list", Value::List(vec![Value::Compound(inner), Value::List(vec![])]));
        encoder.write(&Value::Compound(map)).unwrap();
        assert_eq!(
            encoder.into_inner(),
            "{\n  list: [\n    {\n      x: 1\n    }\n    []\n  ]\n}"
        );
    }

    #[test]
    fn test_value_serializer_absent() {
        assert_eq!(Option::<i32>::None.serialize(ValueSerializer), Err(Error::Absent));
        assert_eq!(().serialize(ValueSerializer), Err(Error::Absent));
        assert_eq!(Some(3).serialize(ValueSerializer), Ok(Value::from(3)));
    }

    #[test]
    fn test_value_serializer_large_u64_becomes_long() {
        let value = u64::MAX.serialize(ValueSerializer).unwrap();
        assert_eq!(compact(&value), "18446744073709551615l");
    }

    #[test]
    fn test_literal_survives_value_serializer() {
        let lit = Literal::parse("-0.75d").unwrap();
        let value = lit.serialize(ValueSerializer).unwrap();
        assert_eq!(value, Value::Number(Number::Decimal(lit)));
    }
}
