//! SNBT decoding.
//!
//! This module provides the [`Deserializer`], a hand-written parser over the
//! token stream of [`crate::lexer`] with one token of lookahead. Parsed items
//! are fed to a [`Builder`] that assembles the [`Value`] tree and keeps track
//! of the open containers.
//!
//! ## Grammar
//!
//! ```text
//! value    := compound | list | string | number | true | false
//! compound := '{' (key ':' value [','])* '}'
//! key      := bare-word | string | number-shaped word
//! list     := '[' (value [','])* ']'
//! ```
//!
//! Commas are optional. An item ends at a comma or simply where the next key,
//! element or closing bracket starts, so these decode to the same tree:
//!
//! ```rust
//! use serde_snbt::decode;
//!
//! let a = decode("{ a: [], \n b: true }").unwrap();
//! let b = decode("{ a: []\n b: true }").unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! ## Typed decoding
//!
//! `Deserializer` also implements `serde::Deserializer`; the crate-root
//! [`from_str`](crate::from_str) uses it to decode straight into Rust types.
//! Numbers are coerced to what the target asks for: shorts and longs read as
//! integers, floats and decimals as `f64`.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_snbt::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Reward { item: String, count: u8, xp: f64 }
//!
//! let reward: Reward = from_str(r#"{ item: "minecraft:apple", count: 3s, xp: 1.5d }"#).unwrap();
//! assert_eq!(reward, Reward { item: "minecraft:apple".into(), count: 3, xp: 1.5 });
//! ```

use crate::builder::{Builder, Container};
use crate::lexer::{unescape, Lexer, NumberParts, Token, TokenKind};
use crate::value::LITERAL_TOKEN;
use crate::{Compound, Error, Literal, Number, Result, SnbtOptions, Sign, Value};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use tracing::trace;

/// The SNBT parser.
///
/// Created via [`Deserializer::from_str`] or [`Deserializer::with_options`].
/// One instance decodes one document.
pub struct Deserializer<'de> {
    lexer: Lexer<'de>,
    peeked: Option<Token<'de>>,
    builder: Builder,
    max_depth: usize,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Self::with_options(input, &SnbtOptions::default())
    }

    pub fn with_options(input: &'de str, options: &SnbtOptions) -> Self {
        Deserializer {
            lexer: Lexer::new(input),
            peeked: None,
            builder: Builder::new(),
            max_depth: options.max_depth,
        }
    }

    fn input(&self) -> &'de str {
        self.lexer.input()
    }

    fn peek(&mut self) -> Result<Token<'de>> {
        match self.peeked {
            Some(token) => Ok(token),
            None => {
                let token = self.lexer.next_token()?;
                self.peeked = Some(token);
                Ok(token)
            }
        }
    }

    fn next(&mut self) -> Result<Token<'de>> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn unexpected(&self, token: &Token<'de>, expected: &str) -> Error {
        Error::syntax(self.input(), token.offset, expected, &token.describe())
    }

    /// Parses the whole input as one document.
    ///
    /// Only whitespace may follow the root value.
    pub fn parse_document(&mut self) -> Result<Value> {
        self.parse_value()?;

        let token = self.next()?;
        if token.kind != TokenKind::Eof {
            return Err(self.unexpected(&token, "end of input"));
        }
        std::mem::take(&mut self.builder).finish()
    }

    /// Parses one value, nested containers included.
    ///
    /// Open containers live on the builder's stacks, not the call stack.
    fn parse_value(&mut self) -> Result<()> {
        let mut token = self.next()?;
        loop {
            let mut finished = self.begin_value(&token)?;

            // Attach finished values and close containers until the next
            // item starts or the root is complete.
            loop {
                if finished {
                    match self.builder.innermost() {
                        None => return Ok(()),
                        Some(Container::Compound) => self.builder.commit_pair()?,
                        Some(Container::List) => self.builder.commit_list_item()?,
                    }
                    self.skip_separator()?;
                }
                match self.next_item()? {
                    Some(next) => {
                        token = next;
                        break;
                    }
                    None => finished = true,
                }
            }
        }
    }

    /// Starts the value beginning at `token`. Returns `true` when the value is
    /// already complete, `false` when it opened a container.
    fn begin_value(&mut self, token: &Token<'de>) -> Result<bool> {
        match token.kind {
            TokenKind::LeftBrace => {
                self.enter(token)?;
                self.builder.begin_compound();
                trace!(offset = token.offset, depth = self.builder.depth(), "begin compound");
                Ok(false)
            }
            TokenKind::LeftBracket => {
                self.enter(token)?;
                self.builder.begin_list();
                trace!(offset = token.offset, depth = self.builder.depth(), "begin list");
                Ok(false)
            }
            TokenKind::Str(body) => {
                let s = unescape(self.input(), body, token.offset + 1)?;
                self.builder.push_scalar(Value::String(s));
                Ok(true)
            }
            TokenKind::Number(parts) => {
                let number = self.parse_number(token.offset, &parts)?;
                self.builder.push_scalar(Value::Number(number));
                Ok(true)
            }
            TokenKind::Word("true") => {
                self.builder.push_scalar(Value::Bool(true));
                Ok(true)
            }
            TokenKind::Word("false") => {
                self.builder.push_scalar(Value::Bool(false));
                Ok(true)
            }
            _ => Err(self.unexpected(token, "value")),
        }
    }

    /// Checks the depth limit before a container opens.
    fn enter(&self, token: &Token<'de>) -> Result<()> {
        if self.builder.depth() >= self.max_depth {
            return Err(Error::depth_limit(self.input(), token.offset, self.max_depth));
        }
        Ok(())
    }

    /// Consumes one optional comma after an item.
    fn skip_separator(&mut self) -> Result<()> {
        if self.peek()?.kind == TokenKind::Comma {
            self.next()?;
        }
        Ok(())
    }

    /// Advances to the first token of the next item in the innermost open
    /// container, consuming a compound key and its colon. Returns `None` once
    /// the container is closed instead.
    fn next_item(&mut self) -> Result<Option<Token<'de>>> {
        match self.builder.innermost() {
            Some(Container::List) => {
                let token = self.next()?;
                match token.kind {
                    TokenKind::RightBracket => {
                        trace!(depth = self.builder.depth(), "end list");
                        self.builder.end_list()?;
                        Ok(None)
                    }
                    TokenKind::Eof => Err(self.unexpected(&token, "value or ']'")),
                    _ => Ok(Some(token)),
                }
            }
            Some(Container::Compound) => {
                let token = self.next()?;
                let key = match token.kind {
                    TokenKind::RightBrace => {
                        trace!(depth = self.builder.depth(), "end compound");
                        self.builder.end_compound()?;
                        return Ok(None);
                    }
                    TokenKind::Word(word) => word.to_string(),
                    TokenKind::Str(body) => unescape(self.input(), body, token.offset + 1)?,
                    // `1st: ...` or `0: ...`; the key is the raw text.
                    TokenKind::Number(parts) => parts.text.to_string(),
                    _ => return Err(self.unexpected(&token, "key or '}'")),
                };

                let colon = self.next()?;
                if colon.kind != TokenKind::Colon {
                    return Err(self.unexpected(&colon, "':'"));
                }

                self.builder.set_pending_key(key);
                self.next().map(Some)
            }
            None => Err(Error::internal("no open container to read an item from")),
        }
    }

    fn parse_number(&self, offset: usize, parts: &NumberParts<'de>) -> Result<Number> {
        if let Some(suffix) = parts.suffix {
            let literal = Literal::new(parts.sign, parts.int, parts.frac, suffix)?;
            return Ok(Number::from_literal(literal));
        }

        if parts.has_dot || parts.exponent.is_some() {
            return match parts.text.parse::<f64>() {
                Ok(d) if d.is_finite() => Ok(Number::Double(d)),
                _ => Err(Error::number_range(self.input(), offset, parts.text)),
            };
        }

        parts
            .text
            .parse::<i64>()
            .map(Number::Integer)
            .map_err(|_| Error::number_range(self.input(), offset, parts.text))
    }
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_document()?).deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_document()?).deserialize_option(visitor)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_document()?).deserialize_unit(visitor)
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_document()?).deserialize_unit_struct(name, visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_document()?).deserialize_newtype_struct(name, visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.parse_document()?).deserialize_enum(name, variants, visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf seq tuple tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Compound) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(MapKeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Compound keys are always text. Integer targets parse the text, so maps
/// keyed by integers read back what the serializer wrote (`{ "1": ... }`).
struct MapKeyDeserializer {
    key: String,
}

macro_rules! deserialize_integer_key {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.key.parse::<$ty>() {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => Err(Error::custom(format!(
                        "expected {} compound key, found \"{}\"",
                        stringify!($ty),
                        self.key
                    ))),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    deserialize_integer_key! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        bool f32 f64 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Compound(map) if map.is_empty() => Ok(()),
            other => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.type_name()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            other => Err(Error::custom(format!(
                "expected tuple variant, found {}",
                other.type_name()
            ))),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Compound(map) => visitor.visit_map(MapDeserializer::new(map)),
            other => Err(Error::custom(format!(
                "expected struct variant, found {}",
                other.type_name()
            ))),
        }
    }
}

/// Deserializes Rust types out of an owned [`Value`] tree.
pub(crate) struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub(crate) fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

/// Integral view of a short or long literal, widening to `u64` when the value
/// only fits there.
fn visit_integral<'de, V>(lit: &Literal, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    if let Some(i) = lit.to_i64() {
        return visitor.visit_i64(i);
    }
    let whole = lit.frac_part().bytes().all(|b| b == b'0');
    if whole && lit.sign() != Sign::Minus {
        if let Ok(u) = lit.int_part().parse::<u64>() {
            return visitor.visit_u64(u);
        }
    }
    visitor.visit_f64(lit.to_f64())
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::Double(d)) => visitor.visit_f64(d),
            Value::Number(Number::Short(lit) | Number::Long(lit)) => visit_integral(&lit, visitor),
            Value::Number(Number::Float(lit) | Number::Decimal(lit)) => {
                visitor.visit_f64(lit.to_f64())
            }
            Value::String(s) => visitor.visit_string(s),
            Value::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Value::Compound(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    // A value that is present is always `Some`; missing fields are handled
    // by serde's derive.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Compound(map) if map.is_empty() => visitor.visit_unit(),
            other => Err(Error::custom(format!(
                "expected empty compound, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name != LITERAL_TOKEN {
            return visitor.visit_newtype_struct(self);
        }
        match self.value {
            Value::Number(n) => match n.literal().map(Literal::to_string) {
                Some(text) => visitor.visit_str(&text),
                None => Err(Error::custom("expected suffixed literal, found plain number")),
            },
            Value::String(s) => visitor.visit_str(&s),
            other => Err(Error::custom(format!(
                "expected suffixed literal, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Compound(map) if map.len() == 1 => match map.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                None => Err(Error::custom("expected enum variant")),
            },
            other => Err(Error::custom(format!(
                "expected enum variant, found {}",
                other.type_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf seq tuple tuple_struct map struct identifier ignored_any
    }
}
