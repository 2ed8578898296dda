/// Encoder contract tests: compact and pretty layouts, string escaping and
/// number formatting.
use feather_core::{encode, parse, CodecOptions, FeatherError, JsonValue, Map};

fn compact(value: &JsonValue) -> String {
    encode(value, &CodecOptions::compact()).unwrap()
}

fn pretty(value: &JsonValue) -> String {
    encode(value, &CodecOptions::pretty()).unwrap()
}

fn tree(text: &str) -> JsonValue {
    parse(text).unwrap().unwrap()
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn encode_literals() {
    assert_eq!(compact(&JsonValue::Null), "null");
    assert_eq!(compact(&JsonValue::Bool(true)), "true");
    assert_eq!(compact(&JsonValue::Bool(false)), "false");
}

#[test]
fn encode_numbers() {
    assert_eq!(compact(&JsonValue::Number(4.0)), "4");
    assert_eq!(compact(&JsonValue::Number(-0.5)), "-0.5");
    assert_eq!(compact(&JsonValue::Number(1e300)), "1e300");
    assert_eq!(compact(&JsonValue::Number(9007199254740991.0)), "9007199254740991");
}

#[test]
fn encode_rejects_non_finite_numbers() {
    for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let nested = JsonValue::Array(vec![JsonValue::Number(n)]);
        assert!(matches!(
            encode(&nested, &CodecOptions::compact()),
            Err(FeatherError::Encode(_))
        ));
    }
}

#[test]
fn encode_escapes() {
    assert_eq!(compact(&JsonValue::from("a\"b")), r#""a\"b""#);
    assert_eq!(compact(&JsonValue::from("tab\there")), r#""tab\there""#);
    assert_eq!(compact(&JsonValue::from("\u{1f}")), r#""\u001f""#);
}

#[test]
fn output_is_ascii_only() {
    let text = compact(&JsonValue::from("naïve 你好 😀"));
    assert!(text.is_ascii());
    assert_eq!(text, r#""na\u00efve \u4f60\u597d \ud83d\ude00""#);
    // and it reads back to the original text
    assert_eq!(tree(&text), JsonValue::from("naïve 你好 😀"));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn compact_containers_have_no_whitespace() {
    let value = tree(r#" { "a" : [ 1 , 2 ] , "b" : { } , "c" : [ ] } "#);
    assert_eq!(compact(&value), r#"{"a":[1,2],"b":{},"c":[]}"#);
}

#[test]
fn pretty_object() {
    let value = tree(r#"{"name":"x","tags":["a","b"],"empty":{}}"#);
    let expected = "{\n  \"name\": \"x\",\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ],\n  \"empty\": {}\n}";
    assert_eq!(pretty(&value), expected);
}

#[test]
fn pretty_nested_arrays() {
    let value = tree("[[1],[]]");
    assert_eq!(pretty(&value), "[\n  [\n    1\n  ],\n  []\n]");
}

#[test]
fn pretty_scalar_is_unchanged() {
    assert_eq!(pretty(&JsonValue::from("x")), r#""x""#);
}

#[test]
fn encoder_preserves_insertion_order() {
    let mut map = Map::new();
    map.insert("second".into(), 2.into());
    map.insert("first".into(), 1.into());
    assert_eq!(compact(&JsonValue::Object(map)), r#"{"second":2,"first":1}"#);
}
