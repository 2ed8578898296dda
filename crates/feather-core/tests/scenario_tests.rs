/// End-to-end scenarios through the string facade.
use feather_core::{from_str, json_record, to_string, Bytes, CodecOptions, FeatherError};
use indexmap::IndexMap;

#[derive(Debug, Default, PartialEq)]
struct Holder {
    #[allow(non_snake_case)]
    Field: Option<String>,
}
json_record!(Holder { Field });

#[test]
fn integer_round_trip() {
    let options = CodecOptions::compact();
    assert_eq!(to_string(&4, &options).unwrap(), "4");
    assert_eq!(from_str::<i32>("4", &options).unwrap(), 4);
}

#[test]
fn boolean_round_trip() {
    let options = CodecOptions::compact();
    assert_eq!(to_string(&true, &options).unwrap(), "true");
    assert!(from_str::<bool>("true", &options).unwrap());
}

#[test]
fn single_entry_map_round_trip() {
    let options = CodecOptions::compact();
    let mut map = IndexMap::new();
    map.insert("Key".to_string(), "Value".to_string());
    let text = to_string(&map, &options).unwrap();
    assert_eq!(text, r#"{"Key":"Value"}"#);
    let back: IndexMap<String, String> = from_str(&text, &options).unwrap();
    assert_eq!(back, map);
}

#[test]
fn null_member_toggle() {
    let holder = Holder { Field: None };
    let written = to_string(&holder, &CodecOptions::compact()).unwrap();
    assert!(written.contains(r#""Field":null"#));

    let omitting = CodecOptions::compact().with_omit_null_or_undefined(true);
    let omitted = to_string(&holder, &omitting).unwrap();
    assert!(!omitted.contains("Field"));
}

#[test]
fn byte_buffer_round_trip() {
    let options = CodecOptions::compact();
    let text = to_string(&Bytes(vec![0x41, 0x42]), &options).unwrap();
    assert_eq!(text, r#""QUI=""#);
    assert_eq!(from_str::<Bytes>(&text, &options).unwrap().0, vec![0x41, 0x42]);
}

#[test]
fn malformed_document_surfaces_an_error() {
    let err = from_str::<Holder>(r#"{"a":}"#, &CodecOptions::compact()).unwrap_err();
    assert!(matches!(err, FeatherError::Syntax { .. }));
}

#[test]
fn pretty_record_layout() {
    let holder = Holder {
        Field: Some("v".into()),
    };
    assert_eq!(
        to_string(&holder, &CodecOptions::pretty()).unwrap(),
        "{\n  \"Field\": \"v\"\n}"
    );
}
