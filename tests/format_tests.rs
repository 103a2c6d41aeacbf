use serde_snbt::{
    decode, encode, encode_with_options, Compound, Error, Literal, LiteralKind, Number, Sign,
    SnbtOptions, Value,
};

fn roundtrip(text: &str) -> String {
    encode(&decode(text).unwrap()).unwrap()
}

#[test]
fn test_decimal_roundtrip() {
    let value = decode("-0.75d").unwrap();
    match &value {
        Value::Number(Number::Decimal(lit)) => {
            assert_eq!(lit.sign(), Sign::Minus);
            assert_eq!(lit.int_part(), "0");
            assert_eq!(lit.frac_part(), "75");
            assert_eq!(lit.suffix(), 'd');
        }
        other => panic!("expected decimal, got {:?}", other),
    }
    assert_eq!(encode(&value).unwrap(), "-0.75d");
}

#[test]
fn test_literal_byte_stability() {
    for text in ["-0.75d", "123s", "-123l", "1.5f", "+2D", "0.50F", "007L", "-.5d", "1.0S"] {
        assert_eq!(roundtrip(text), text, "literal {}", text);
    }
}

#[test]
fn test_suffix_kinds() {
    let value = decode("[1s, 1S, 1l, 1L, 1f, 1F, 1d, 1D]").unwrap();
    let kinds: Vec<_> = value
        .as_list()
        .unwrap()
        .iter()
        .map(|v| v.as_number().and_then(Number::literal).map(Literal::kind))
        .collect();
    use LiteralKind::*;
    assert_eq!(
        kinds,
        [Short, Short, Long, Long, Float, Float, Decimal, Decimal].map(Some)
    );
}

#[test]
fn test_plain_numbers() {
    assert_eq!(decode("250").unwrap(), Value::Number(Number::Integer(250)));
    assert_eq!(decode("-0").unwrap(), Value::Number(Number::Integer(0)));
    assert_eq!(decode("1.5").unwrap(), Value::Number(Number::Double(1.5)));
    assert_eq!(decode("2E2").unwrap(), Value::Number(Number::Double(200.0)));
    assert_eq!(decode("-1e-2").unwrap(), Value::Number(Number::Double(-0.01)));

    assert_eq!(roundtrip("1.50"), "1.5");
    assert_eq!(roundtrip("3e0"), "3.0");
    assert_eq!(roundtrip("1e300"), "1e300");
    assert_eq!(roundtrip("+17"), "17");
}

#[test]
fn test_empty_containers() {
    assert_eq!(roundtrip("{}"), "{}");
    assert_eq!(roundtrip("[]"), "[]");
    assert_eq!(roundtrip("{ a: {}, b: [] }"), "{ a: {}, b: [] }");
    assert_eq!(roundtrip("[ {\n}, [\n] ]"), "[ {}, [] ]");

    assert_eq!(decode("[ ]").unwrap(), Value::List(vec![]));
    assert_eq!(
        decode("[1]").unwrap(),
        Value::List(vec![Value::Number(Number::Integer(1))])
    );
    assert_eq!(roundtrip("[1]"), "[ 1 ]");
}

#[test]
fn test_elided_commas() {
    let with_comma = decode("{ a: [], \n b: true }").unwrap();
    let without_comma = decode("{ a: []\n b: true }").unwrap();
    assert_eq!(with_comma, without_comma);

    let map = with_comma.as_compound().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["a"], Value::List(vec![]));
    assert_eq!(map["b"], Value::Bool(true));
}

#[test]
fn test_number_then_comma() {
    let value = decode("{ min_width: 250, shape: \"hexagon\" }").unwrap();
    let map = value.as_compound().unwrap();
    assert_eq!(map["min_width"], Value::Number(Number::Integer(250)));
    assert_eq!(map.get_str("shape"), Some("hexagon"));

    let value = decode("[1.5d,2s,3]").unwrap();
    assert_eq!(value.as_list().unwrap().len(), 3);
}

#[test]
fn test_unicode_preservation() {
    let value = decode(r#"{ t: "こんにちは世界" }"#).unwrap();
    assert_eq!(
        value.as_compound().unwrap().get_str("t"),
        Some("こんにちは世界")
    );
    assert_eq!(encode(&value).unwrap(), r#"{ t: "こんにちは世界" }"#);

    let value = decode(r#""é 😀 😀""#).unwrap();
    assert_eq!(value.as_str(), Some("é 😀 😀"));
    assert_eq!(encode(&value).unwrap(), "\"é 😀 😀\"");
}

#[test]
fn test_string_escapes_roundtrip() {
    let text = r#""line\nnext\ttab \"quoted\" back\\slash \u0001""#;
    let value = decode(text).unwrap();
    assert_eq!(
        value.as_str(),
        Some("line\nnext\ttab \"quoted\" back\\slash \u{1}")
    );
    assert_eq!(encode(&value).unwrap(), text);
}

#[test]
fn test_canonical_output() {
    let text = "{\n\tzeta: 1\n\t\"alpha beta\": [1b, 2]\n}";
    assert!(decode(text).is_err());

    let text = "{\n\tzeta: 1\n\t\"alpha beta\": [true, 2]\n\tmid: { \"k\": \"v\" }\n}";
    assert_eq!(
        roundtrip(text),
        r#"{ "alpha beta": [ true, 2 ], mid: { k: "v" }, zeta: 1 }"#
    );
}

#[test]
fn test_encode_is_idempotent() {
    let text = r#"{ b: [1, 2.0, 3s, "x"] a: { "c d": -0.5D, e: false } }"#;
    let once = roundtrip(text);
    let twice = roundtrip(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_duplicate_keys_last_write_wins() {
    let value = decode("{ a: 1, b: 2, a: 3 }").unwrap();
    let map = value.as_compound().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["a"], Value::from(3));
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_pretty_output_redecodes() {
    let value = decode(r#"{ list: [1, [], {}, { x: 1.5f }], s: "a b" }"#).unwrap();
    let pretty = encode_with_options(&value, &SnbtOptions::pretty()).unwrap();
    assert_eq!(
        pretty,
        "{\n  list: [\n    1\n    []\n    {}\n    {\n      x: 1.5f\n    }\n  ]\n  s: \"a b\"\n}"
    );
    assert_eq!(decode(&pretty).unwrap(), value);
}

#[test]
fn test_byte_order_mark_is_skipped() {
    assert_eq!(decode("\u{feff}{ a: 1 }").unwrap(), decode("{ a: 1 }").unwrap());
}

#[test]
fn test_nan_cannot_be_encoded() {
    let mut map = Compound::new();
    map.insert("x", Value::from(f64::NAN));
    let err = encode(&Value::from(map)).unwrap_err();
    assert!(matches!(err, Error::Encode(_)));
}

#[test]
fn test_error_unterminated_string() {
    let err = decode("{ a: \"open }").unwrap_err();
    assert!(matches!(err, Error::Lex { offset: 5, line: 1, col: 6, .. }));
}

#[test]
fn test_error_bad_escape() {
    let err = decode(r#"["\x41"]"#).unwrap_err();
    assert!(matches!(err, Error::Syntax { offset: 2, .. }));
}

#[test]
fn test_error_bare_word_value() {
    let err = decode("{ shape: hexagon }").unwrap_err();
    match err {
        Error::Syntax {
            offset, found, ..
        } => {
            assert_eq!(offset, 9);
            assert!(found.contains("hexagon"));
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_error_integer_overflow() {
    let err = decode("{ big: 18446744073709551616 }").unwrap_err();
    match err {
        Error::NumberRange { offset, literal, .. } => {
            assert_eq!(offset, 7);
            assert_eq!(literal, "18446744073709551616");
        }
        other => panic!("expected range error, got {:?}", other),
    }
}

#[test]
fn test_error_missing_bracket() {
    let err = decode("{ a: [1, 2 }").unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.offset(), Some(11));

    let err = decode("{ a: [1, 2]").unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.offset(), Some(11));
}

#[test]
fn test_error_trailing_garbage() {
    let err = decode("{ a: 1 } }").unwrap_err();
    assert!(matches!(err, Error::Syntax { offset: 9, .. }));
}

#[test]
fn test_error_position_on_later_line() {
    let err = decode("{\n  a: 1\n  b: @\n}").unwrap_err();
    assert!(matches!(err, Error::Lex { line: 3, col: 6, .. }));
}

#[test]
fn test_error_malformed_numbers() {
    assert!(matches!(decode("5."), Err(Error::Lex { .. })));
    assert!(matches!(decode("[1.2.3]"), Err(Error::Lex { .. })));
    assert!(decode("1e5d").unwrap_err().is_syntax());
}

#[test]
fn test_error_depth_limit() {
    let options = SnbtOptions::new().with_max_depth(4);
    let text = "{ a: { b: { c: { d: { } } } } }";
    let err = serde_snbt::decode_with_options(text, &options).unwrap_err();
    assert!(matches!(err, Error::DepthLimit { limit: 4, .. }));
    assert!(decode(text).is_ok());
}

#[test]
fn test_error_messages_carry_position() {
    let err = decode("[1,\n 2,\n }").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 3"), "{}", message);
    assert!(message.contains("column 2"), "{}", message);
}
