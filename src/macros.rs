//! The [`snbt!`](crate::snbt) macro for building [`Value`](crate::Value) trees inline.
//!
//! Keys are string literals. Any other leaf goes through `Value::from`, so it
//! accepts primitives, strings, [`Number`](crate::Number)s, [`Literal`](crate::Literal)s
//! and already-built values:
//!
//! ```rust
//! use serde_snbt::{snbt, Literal, Number};
//!
//! let reward = snbt!({
//!     "item": "minecraft:apple",
//!     "count": (Number::short(3)),
//!     "x": (Literal::parse("-0.75d").unwrap())
//! });
//! assert_eq!(reward.to_string(), r#"{ count: 3s, item: "minecraft:apple", x: -0.75d }"#);
//! ```

#[macro_export]
macro_rules! snbt {
    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::snbt!($elem)),*])
    };

    ({}) => {
        $crate::Value::Compound($crate::Compound::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut compound = $crate::Compound::new();
        $(
            compound.insert($key, $crate::snbt!($value));
        )*
        $crate::Value::Compound(compound)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Compound, Number, Value};

    #[test]
    fn test_snbt_macro_scalars() {
        assert_eq!(snbt!(true), Value::Bool(true));
        assert_eq!(snbt!(false), Value::Bool(false));
        assert_eq!(snbt!(42), Value::Number(Number::Integer(42)));
        assert_eq!(snbt!(3.5), Value::Number(Number::Double(3.5)));
        assert_eq!(snbt!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_snbt_macro_lists() {
        assert_eq!(snbt!([]), Value::List(vec![]));
        assert_eq!(
            snbt!([1, "a", [true]]),
            Value::List(vec![
                Value::from(1),
                Value::from("a"),
                Value::List(vec![Value::Bool(true)]),
            ])
        );
    }

    #[test]
    fn test_snbt_macro_compounds() {
        assert_eq!(snbt!({}), Value::Compound(Compound::new()));

        let value = snbt!({
            "name": "Alice",
            "stats": { "level": 30 },
        });
        let map = value.as_compound().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_str("name"), Some("Alice"));
        assert_eq!(
            map.get_compound("stats").and_then(|s| s.get("level")),
            Some(&Value::from(30))
        );
    }
}
