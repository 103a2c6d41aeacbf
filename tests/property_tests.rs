//! Property-based tests for the round-trip guarantees.
//!
//! Generated `Value` trees must survive `decode(encode(v))` unchanged, and
//! encoding the decoded tree again must reproduce the same text.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_snbt::{
    decode, encode, encode_with_options, from_str, to_string, Compound, Literal, Sign,
    SnbtOptions, Value,
};

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

fn arb_literal() -> impl Strategy<Value = Literal> {
    (
        prop_oneof![Just(Sign::Unsigned), Just(Sign::Plus), Just(Sign::Minus)],
        "[0-9]{0,6}",
        "[0-9]{0,4}",
        prop::sample::select(vec!['s', 'S', 'l', 'L', 'f', 'F', 'd', 'D']),
    )
        .prop_filter("literal needs a digit", |(_, int, frac, _)| {
            !int.is_empty() || !frac.is_empty()
        })
        .prop_map(|(sign, int, frac, suffix)| Literal::new(sign, int, frac, suffix).unwrap())
}

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_-]{0,8}",
        "[0-9][a-z0-9]{0,3}",
        any::<String>(),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        any::<String>().prop_map(Value::from),
        arb_literal().prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Compound(entries.into_iter().collect::<Compound>())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_value_roundtrip(value in arb_value()) {
        let text = encode(&value).unwrap();
        let decoded = decode(&text).unwrap();
        prop_assert_eq!(&decoded, &value, "encoded as {}", text);
    }

    #[test]
    fn prop_encode_idempotent(value in arb_value()) {
        let once = encode(&value).unwrap();
        let twice = encode(&decode(&once).unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_pretty_roundtrip(value in arb_value()) {
        let text = encode_with_options(&value, &SnbtOptions::pretty()).unwrap();
        prop_assert_eq!(decode(&text).unwrap(), value);
    }

    #[test]
    fn prop_literal_text_stable(lit in arb_literal()) {
        let text = lit.to_string();
        prop_assert_eq!(encode(&decode(&text).unwrap()).unwrap(), text);
    }

    #[test]
    fn prop_decode_never_panics(input in "[\\[\\]{}:, a-z0-9.\"\\\\+-]{0,40}") {
        let _ = decode(&input);
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_tuple_i32_bool(t in (any::<i32>(), any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }
}
