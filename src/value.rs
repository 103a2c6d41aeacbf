//! Dynamic value representation for SNBT data.
//!
//! This module provides the [`Value`] tree produced by [`decode`](crate::decode)
//! and consumed by [`encode`](crate::encode).
//!
//! ## Core Types
//!
//! - [`Value`]: compound, list, string, boolean or number
//! - [`Number`]: plain integers and doubles plus the four suffixed kinds
//! - [`Literal`]: the preserved text of a suffixed number (`-0.75d`, `12S`)
//!
//! ## Why suffixed numbers keep their text
//!
//! A decoded `-0.75d` is not stored as an `f64`. The sign, both digit runs and
//! the suffix letter are kept verbatim so that re-encoding an untouched value
//! reproduces the exact bytes of the source file. The numeric value is computed
//! on demand:
//!
//! ```rust
//! use serde_snbt::{decode, Number, Value};
//!
//! let value = decode("-0.75d").unwrap();
//! match &value {
//!     Value::Number(Number::Decimal(lit)) => {
//!         assert_eq!(lit.to_f64(), -0.75);
//!         assert_eq!(lit.to_string(), "-0.75d");
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! assert_eq!(value.as_f64(), Some(-0.75));
//! ```

use crate::{Compound, Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Newtype-struct name that lets suffixed literals pass through serde without
/// collapsing into plain numbers.
pub(crate) const LITERAL_TOKEN: &str = "$serde_snbt::private::Literal";

/// A dynamically-typed SNBT value.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::{Compound, Value};
///
/// let mut quest = Compound::new();
/// quest.insert("title", Value::from("Gather wood"));
/// quest.insert("x", Value::from(2.5));
/// let value = Value::from(quest);
///
/// assert!(value.is_compound());
/// assert_eq!(value.to_string(), r#"{ title: "Gather wood", x: 2.5 }"#);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Compound(Compound),
    List(Vec<Value>),
    String(String),
    Bool(bool),
    Number(Number),
}

/// A numeric SNBT value.
///
/// Unsuffixed literals become [`Number::Integer`] or [`Number::Double`];
/// suffixed literals keep their text in a [`Literal`].
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    /// Bare integer such as `250` or `-3`.
    Integer(i64),
    /// Bare number with a fraction or exponent, such as `0.5` or `1e3`.
    Double(f64),
    /// `s`/`S` suffix.
    Short(Literal),
    /// `l`/`L` suffix.
    Long(Literal),
    /// `f`/`F` suffix.
    Float(Literal),
    /// `d`/`D` suffix.
    Decimal(Literal),
}

/// Sign of a suffixed literal as written in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    /// No sign character.
    #[default]
    Unsigned,
    /// Explicit `+`.
    Plus,
    /// `-`.
    Minus,
}

impl Sign {
    /// `-1` for [`Sign::Minus`], `1` otherwise.
    #[must_use]
    pub const fn signum(self) -> i32 {
        match self {
            Sign::Minus => -1,
            _ => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Sign::Unsigned => "",
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

/// The four suffixed numeric kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Short,
    Long,
    Float,
    Decimal,
}

impl LiteralKind {
    /// Maps a suffix letter (either case) to its kind.
    ///
    /// ```rust
    /// use serde_snbt::LiteralKind;
    ///
    /// assert_eq!(LiteralKind::from_suffix('D'), Some(LiteralKind::Decimal));
    /// assert_eq!(LiteralKind::from_suffix('x'), None);
    /// ```
    #[must_use]
    pub const fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            's' | 'S' => Some(LiteralKind::Short),
            'l' | 'L' => Some(LiteralKind::Long),
            'f' | 'F' => Some(LiteralKind::Float),
            'd' | 'D' => Some(LiteralKind::Decimal),
            _ => None,
        }
    }

    /// Lowercase suffix used when building literals from host numbers.
    #[must_use]
    pub const fn suffix(self) -> char {
        match self {
            LiteralKind::Short => 's',
            LiteralKind::Long => 'l',
            LiteralKind::Float => 'f',
            LiteralKind::Decimal => 'd',
        }
    }
}

/// The preserved text of a suffixed numeric literal.
///
/// A literal is `[sign] int [. frac] suffix`. Both digit runs hold ASCII
/// digits only, at least one of them is non-empty, and the suffix is one of
/// `sSlLfFdD`. These invariants are checked by every constructor.
///
/// # Examples
///
/// ```rust
/// use serde_snbt::{Literal, LiteralKind, Sign};
///
/// let lit: Literal = "+2.50F".parse().unwrap();
/// assert_eq!(lit.sign(), Sign::Plus);
/// assert_eq!(lit.int_part(), "2");
/// assert_eq!(lit.frac_part(), "50");
/// assert_eq!(lit.kind(), LiteralKind::Float);
/// assert_eq!(lit.to_string(), "+2.50F");
/// assert_eq!(lit.to_f64(), 2.5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    sign: Sign,
    int: String,
    frac: String,
    suffix: char,
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl Literal {
    /// Builds a literal from its parts, validating the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLiteral`] if a digit run contains a non-digit,
    /// both runs are empty, or `suffix` is not a known suffix letter.
    pub fn new(
        sign: Sign,
        int: impl Into<String>,
        frac: impl Into<String>,
        suffix: char,
    ) -> Result<Self> {
        let int = int.into();
        let frac = frac.into();
        if !all_digits(&int) || !all_digits(&frac) {
            return Err(Error::invalid_literal(format!(
                "digit runs must be ASCII digits, got `{}` and `{}`",
                int, frac
            )));
        }
        if int.is_empty() && frac.is_empty() {
            return Err(Error::invalid_literal("literal has no digits"));
        }
        if LiteralKind::from_suffix(suffix).is_none() {
            return Err(Error::invalid_literal(format!(
                "unknown suffix `{}`",
                suffix
            )));
        }
        Ok(Literal {
            sign,
            int,
            frac,
            suffix,
        })
    }

    /// Builds an integral literal of the given kind from a host integer.
    ///
    /// ```rust
    /// use serde_snbt::{Literal, LiteralKind};
    ///
    /// assert_eq!(Literal::from_i64(-12, LiteralKind::Long).to_string(), "-12l");
    /// ```
    #[must_use]
    pub fn from_i64(value: i64, kind: LiteralKind) -> Self {
        let sign = if value < 0 { Sign::Minus } else { Sign::Unsigned };
        Literal {
            sign,
            int: value.unsigned_abs().to_string(),
            frac: String::new(),
            suffix: kind.suffix(),
        }
    }

    /// Builds a literal of the given kind from a host float, using the
    /// shortest decimal text that reads back as the same value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLiteral`] for NaN and infinities.
    pub fn from_f64(value: f64, kind: LiteralKind) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_literal(format!(
                "{} has no literal form",
                value
            )));
        }
        // `Display` for f64 never uses exponent notation.
        let text = format!("{}", value.abs());
        let (int, frac) = match text.split_once('.') {
            Some((int, frac)) => (int.to_string(), frac.to_string()),
            None => (text, String::new()),
        };
        let sign = if value.is_sign_negative() {
            Sign::Minus
        } else {
            Sign::Unsigned
        };
        Literal::new(sign, int, frac, kind.suffix())
    }

    /// Parses the full text of a suffixed literal such as `-0.75d`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLiteral`] if `text` is not a suffixed literal.
    pub fn parse(text: &str) -> Result<Self> {
        match crate::lexer::split_number(text) {
            Some(parts) if parts.exponent.is_none() => match parts.suffix {
                Some(suffix) => Literal::new(parts.sign, parts.int, parts.frac, suffix),
                None => Err(Error::invalid_literal(format!(
                    "`{}` has no type suffix",
                    text
                ))),
            },
            _ => Err(Error::invalid_literal(format!(
                "`{}` is not a numeric literal",
                text
            ))),
        }
    }

    #[must_use]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// `-1` for negative literals, `1` otherwise.
    #[must_use]
    pub fn signum(&self) -> i32 {
        self.sign.signum()
    }

    /// Digits left of the decimal point. May be empty (`.5d`).
    #[must_use]
    pub fn int_part(&self) -> &str {
        &self.int
    }

    /// Digits right of the decimal point, empty when there is no fraction.
    #[must_use]
    pub fn frac_part(&self) -> &str {
        &self.frac
    }

    /// The suffix letter exactly as written.
    #[must_use]
    pub fn suffix(&self) -> char {
        self.suffix
    }

    #[must_use]
    pub fn kind(&self) -> LiteralKind {
        match LiteralKind::from_suffix(self.suffix) {
            Some(kind) => kind,
            // Constructors reject any other suffix.
            None => unreachable!("literal with invalid suffix `{}`", self.suffix),
        }
    }

    /// Computes `sign × int.frac` as a host float.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        let int = if self.int.is_empty() { "0" } else { &self.int };
        let frac = if self.frac.is_empty() { "0" } else { &self.frac };
        let magnitude: f64 = format!("{}.{}", int, frac).parse().unwrap_or(0.0);
        if self.sign == Sign::Minus {
            -magnitude
        } else {
            magnitude
        }
    }

    /// The integral value, if the fraction is absent or all zeros and the
    /// value fits in `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        if !self.frac.bytes().all(|b| b == b'0') {
            return None;
        }
        if self.int.is_empty() {
            return Some(0);
        }
        let signed = match self.sign {
            Sign::Minus => format!("-{}", self.int),
            _ => self.int.clone(),
        };
        signed.parse().ok()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sign.as_str())?;
        f.write_str(&self.int)?;
        if !self.frac.is_empty() {
            write!(f, ".{}", self.frac)?;
        }
        write!(f, "{}", self.suffix)
    }
}

impl FromStr for Literal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Literal::parse(s)
    }
}

impl Serialize for Literal {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(LITERAL_TOKEN, &self.to_string())
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct LiteralVisitor;

        impl<'de> Visitor<'de> for LiteralVisitor {
            type Value = Literal;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a suffixed SNBT numeric literal")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Literal, E>
            where
                E: de::Error,
            {
                Literal::parse(value).map_err(E::custom)
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Literal, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str(self)
            }
        }

        deserializer.deserialize_newtype_struct(LITERAL_TOKEN, LiteralVisitor)
    }
}

impl Number {
    /// Short literal from a host integer, e.g. `12s`.
    #[must_use]
    pub fn short(value: i16) -> Self {
        Number::Short(Literal::from_i64(value.into(), LiteralKind::Short))
    }

    /// Long literal from a host integer, e.g. `12l`.
    #[must_use]
    pub fn long(value: i64) -> Self {
        Number::Long(Literal::from_i64(value, LiteralKind::Long))
    }

    /// Float literal from a host float, e.g. `1.5f`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLiteral`] for NaN and infinities.
    pub fn float(value: f32) -> Result<Self> {
        // Go through the f32 text so `0.1f32` stays `0.1f`.
        let text = format!("{}", value);
        let value: f64 = text.parse().unwrap_or(f64::NAN);
        Literal::from_f64(value, LiteralKind::Float).map(Number::Float)
    }

    /// Decimal literal from a host float, e.g. `-0.75d`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLiteral`] for NaN and infinities.
    pub fn decimal(value: f64) -> Result<Self> {
        Literal::from_f64(value, LiteralKind::Decimal).map(Number::Decimal)
    }

    /// Wraps a literal in the variant its suffix names.
    #[must_use]
    pub fn from_literal(literal: Literal) -> Self {
        match literal.kind() {
            LiteralKind::Short => Number::Short(literal),
            LiteralKind::Long => Number::Long(literal),
            LiteralKind::Float => Number::Float(literal),
            LiteralKind::Decimal => Number::Decimal(literal),
        }
    }

    /// The preserved literal of a suffixed number.
    #[must_use]
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Number::Short(lit) | Number::Long(lit) | Number::Float(lit) | Number::Decimal(lit) => {
                Some(lit)
            }
            Number::Integer(_) | Number::Double(_) => None,
        }
    }

    /// Returns `true` for [`Number::Integer`].
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` for [`Number::Double`].
    #[inline]
    #[must_use]
    pub const fn is_double(&self) -> bool {
        matches!(self, Number::Double(_))
    }

    /// Returns `true` for the four suffixed kinds, which carry a [`Literal`].
    #[inline]
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        !matches!(self, Number::Integer(_) | Number::Double(_))
    }

    /// Integral value of integers, shorts and longs (and whole-number
    /// floats/decimals).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Double(_) => None,
            Number::Short(lit) | Number::Long(lit) | Number::Float(lit) | Number::Decimal(lit) => {
                lit.to_i64()
            }
        }
    }

    /// The value as a host float. Always succeeds.
    ///
    /// ```rust
    /// use serde_snbt::Number;
    ///
    /// assert_eq!(Number::Integer(3).as_f64(), 3.0);
    /// assert_eq!(Number::decimal(-0.75).unwrap().as_f64(), -0.75);
    /// ```
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Double(f) => *f,
            Number::Short(lit) | Number::Long(lit) | Number::Float(lit) | Number::Decimal(lit) => {
                lit.to_f64()
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Double(d) => f.write_str(&crate::ser::format_double(*d)),
            Number::Short(lit) | Number::Long(lit) | Number::Float(lit) | Number::Decimal(lit) => {
                write!(f, "{}", lit)
            }
        }
    }
}

impl From<Literal> for Number {
    fn from(literal: Literal) -> Self {
        Number::from_literal(literal)
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Value::Compound(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Human-readable name of the variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Compound(_) => "compound",
            Value::List(_) => "list",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Number(Number::Integer(_)) => "integer",
            Value::Number(Number::Double(_)) => "double",
            Value::Number(Number::Short(_)) => "short",
            Value::Number(Number::Long(_)) => "long",
            Value::Number(Number::Float(_)) => "float",
            Value::Number(Number::Decimal(_)) => "decimal",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// ```rust
    /// use serde_snbt::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Integral value of any integral number. See [`Number::as_i64`].
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// Floating value of any number, suffixed or not.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Value::Compound(map) => Some(map),
            _ => None,
        }
    }
}

/// Canonical compact SNBT text, as produced by [`encode`](crate::encode).
///
/// Non-finite doubles, which `encode` rejects, are shown as `NaN`/`inf`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ser::display(self))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Compound(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::List(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Double(d)) => serializer.serialize_f64(*d),
            Value::Number(
                Number::Short(lit) | Number::Long(lit) | Number::Float(lit) | Number::Decimal(lit),
            ) => lit.serialize(serializer),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| Error::custom(format!("expected integer, found {}", value.type_name())))
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::custom(format!("expected number, found {}", value.type_name())))
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::custom(format!(
                "expected boolean, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::custom(format!(
                "expected string, found {}",
                other.type_name()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::Integer(i64::from(value)))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::Double(f64::from(value)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Double(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Compound> for Value {
    fn from(value: Compound) -> Self {
        Value::Compound(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        Value::Number(Number::from_literal(value))
    }
}
