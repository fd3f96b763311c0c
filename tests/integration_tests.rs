use chrono::{FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use serde_textplist::{
    from_slice_with_options, from_str, from_str_with_options, looks_like_text_plist, parse_slice,
    parse_str, plist, to_string, to_string_with_options, write_to_string, write_to_vec, Dialect,
    DictContainer, Error, FormatRegistry, ParseOptions, PlistMap, Uid, Value, WriteOptions,
    TEXT_FORMAT,
};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

fn sample_order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.5,
                quantity: 1,
            },
        ],
        total: 109.48,
        note: None,
    }
}

fn read(text: &str) -> Value {
    parse_str(text, &ParseOptions::default()).unwrap()
}

fn write(value: &Value, dialect: Dialect) -> String {
    write_to_string(value, &WriteOptions::new().with_dialect(dialect)).unwrap()
}

#[test]
fn test_nested_struct_round_trip() {
    let order = sample_order();
    let text = to_string(&order).unwrap();
    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_nested_struct_round_trip_openstep() {
    let order = sample_order();
    let options = WriteOptions::new().with_dialect(Dialect::OpenStep);
    let text = to_string_with_options(&order, &options).unwrap();
    assert!(!text.contains("<*"));
    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_cfuid_collapsing() {
    let text = r#"{ "CF$UID" = <*I7>; }"#;
    assert_eq!(read(text), Value::Uid(Uid::new(7)));

    let options = ParseOptions::new().with_cfuid_collapsing(false);
    let value = parse_str(text, &options).unwrap();
    let mut expected = PlistMap::new();
    expected.insert("CF$UID".to_string(), Value::Int(7));
    assert_eq!(value, Value::Dict(expected));
}

#[test]
fn test_escape_decoding() {
    assert_eq!(read(r#""\t\101\x42\u0043""#), Value::from("\tABC"));
}

#[test]
fn test_binary_break_even() {
    let four = Value::Data(vec![0xde, 0xad, 0xbe, 0xef]);
    let six = Value::Data(vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
    assert_eq!(write(&four, Dialect::GNUstep), "<[3q2+7w==]>");
    assert_eq!(write(&six, Dialect::GNUstep), "<deadbeef 0001>");
    assert_eq!(read("<[3q2+7w==]>"), four);
    assert_eq!(read("<deadbeef 0001>"), six);
}

#[test]
fn test_strings_file_mode() {
    let value = parse_str("\"a\" = \"1\";\n\"b\";\n", &ParseOptions::strings_file()).unwrap();
    let mut expected = PlistMap::new();
    expected.insert("a".to_string(), Value::from("1"));
    expected.insert("b".to_string(), Value::Null);
    assert_eq!(value, Value::Dict(expected));

    let text = write_to_string(&value, &WriteOptions::strings_file()).unwrap();
    assert_eq!(text, "\"a\" = \"1\";\n\"b\";\n");
}

#[test]
fn test_strings_file_with_comments() {
    let text = "/* Title of the main window */\n\"title\" = \"Fen\u{ea}tre\";\n\n// Quit menu item\n\"quit\" = \"Quitter\";\n";
    let table: std::collections::BTreeMap<String, String> =
        from_str_with_options(text, &ParseOptions::strings_file()).unwrap();
    assert_eq!(table.get("title").map(String::as_str), Some("Fen\u{ea}tre"));
    assert_eq!(table.get("quit").map(String::as_str), Some("Quitter"));
}

#[test]
fn test_sniffing() {
    assert!(looks_like_text_plist(b"{ a = b; }"));
    assert!(!looks_like_text_plist(b"<?xml version=\"1.0\"?>"));
    assert!(looks_like_text_plist(b"k=v"));
}

#[test]
fn test_dialect_richness() {
    let openstep_value = plist!({
        "name": "x",
        "list": ["a", "b"],
        "nested": { "blob": (Value::Data(vec![1, 2, 3])) }
    });
    for dialect in [Dialect::OpenStep, Dialect::GNUstep, Dialect::ExtendedText] {
        let options = WriteOptions::new()
            .with_dialect(dialect)
            .with_fallback(false);
        let text = write_to_string(&openstep_value, &options).unwrap();
        assert_eq!(read(&text), openstep_value, "dialect {}", dialect);
    }
}

#[test]
fn test_null_fallback() {
    let options = WriteOptions::new().with_dialect(Dialect::GNUstep);
    assert_eq!(write_to_string(&Value::Null, &options).unwrap(), "\"\"");

    let strict = options.with_fallback(false);
    let err = write_to_string(&Value::Null, &strict).unwrap_err();
    assert_eq!(
        err.to_string(),
        "null is not representable in the GNUstep dialect"
    );

    assert_eq!(write(&Value::Null, Dialect::ExtendedText), "<*N>");
    assert_eq!(read("<*N>"), Value::Null);
}

#[test]
fn test_uid_rewrite_below_extended() {
    let value = Value::Array(vec![Value::Uid(Uid::new(3))]);
    let gnustep = write(&value, Dialect::GNUstep);
    assert_eq!(gnustep, "(\n\t{\n\t\t\"CF$UID\" = <*I3>;\n\t},\n)");
    assert_eq!(read(&gnustep), value);

    let extended = write(&value, Dialect::ExtendedText);
    assert_eq!(extended, "(\n\t<*U3>,\n)");
    assert_eq!(read(&extended), value);
}

#[test]
fn test_dates_round_trip_in_utc() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let date = tokyo.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
    let text = write(&Value::Date(date), Dialect::GNUstep);
    assert_eq!(text, "<*D2023-05-31 23:00:00 +0000>");
    assert_eq!(read(&text), Value::Date(date));
}

#[test]
fn test_grammar_error_position() {
    let err = parse_str("{\n\tkey = value;\n\tbroken = (a, b;\n}", &ParseOptions::default())
        .unwrap_err();
    match err {
        Error::Grammar { line, col, .. } => {
            assert_eq!(line, 3);
            assert_eq!(col, 16);
        }
        other => panic!("expected grammar error, got {:?}", other),
    }
}

#[test]
fn test_malformed_inputs_are_errors() {
    let options = ParseOptions::default();
    for input in [
        "{ a = b }",
        "( a b )",
        "\"unterminated",
        "<zz>",
        "<*Q1>",
        "<*I>",
        "<*D2024-13-45 99:00:00 +0000>",
        "{ a = b; } trailing",
        "/* unterminated comment",
    ] {
        assert!(parse_str(input, &options).is_err(), "accepted {:?}", input);
    }
}

#[test]
fn test_last_write_wins_and_sorted_container() {
    let value = read("{ b = 1; a = 2; b = 3; }");
    let dict = value.as_dict().unwrap();
    let keys: Vec<_> = dict.keys().cloned().collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(dict.get("b"), Some(&Value::from("3")));

    let options = ParseOptions::new().with_dict_container(DictContainer::Sorted);
    let value = parse_str("{ b = 1; a = 2; }", &options).unwrap();
    let keys: Vec<_> = value.as_dict().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn test_escape_all_non_ascii() {
    let options = WriteOptions::new().with_escape_all_non_ascii(true);
    let value = Value::from("na\u{ef}ve \u{1F600}");
    let text = write_to_string(&value, &options).unwrap();
    assert_eq!(text, r#""na\u00efve \ud83d\ude00""#);
    assert_eq!(read(&text), value);
}

#[test]
fn test_byte_level_encodings() {
    let options = ParseOptions::new().with_encoding(encoding_rs::UTF_16LE);
    let bytes: Vec<u8> = "{ k = v; }"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let value = parse_slice(&bytes, &options).unwrap();
    assert_eq!(value, plist!({ "k": "v" }));

    let write_options = WriteOptions::new().with_encoding(encoding_rs::SHIFT_JIS);
    let bytes = write_to_vec(&Value::from("\u{65e5}\u{672c}"), &write_options).unwrap();
    let options = ParseOptions::new().with_encoding_label("shift_jis").unwrap();
    let text: String = from_slice_with_options(&bytes, &options).unwrap();
    assert_eq!(text, "\u{65e5}\u{672c}");
}

#[test]
fn test_registry_round_trip() {
    let registry = FormatRegistry::default();
    let value = plist!({ "answer": 42, "tags": ["a", "b"] });

    let mut out = Vec::new();
    registry
        .dump(&value, &mut out, TEXT_FORMAT, &WriteOptions::default())
        .unwrap();
    assert_eq!(registry.detect(&out), Some(TEXT_FORMAT));

    let loaded = registry
        .load(&out, None, &ParseOptions::default())
        .unwrap();
    assert_eq!(loaded, value);
}

#[test]
fn test_real_world_project_snippet() {
    let text = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 46;
	objects = {
		1D6058910D05DD3D006BFB54 /* App.app */ = {isa = PBXFileReference; explicitFileType = wrapper.application; path = App.app; sourceTree = BUILT_PRODUCTS_DIR; };
	};
	rootObject = 29B97313FDCFA39411CA2CEA /* Project object */;
}
"#;
    let value = read(text);
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.get("objectVersion"), Some(&Value::from("46")));
    let objects = dict.get("objects").and_then(Value::as_dict).unwrap();
    let file = objects
        .get("1D6058910D05DD3D006BFB54")
        .and_then(Value::as_dict)
        .unwrap();
    assert_eq!(file.get("path"), Some(&Value::from("App.app")));
    assert_eq!(
        dict.get("rootObject"),
        Some(&Value::from("29B97313FDCFA39411CA2CEA"))
    );
}

#[test]
fn test_deep_nesting_is_an_error_not_a_crash() {
    let options = ParseOptions::default();
    for depth in [500, 2000, 50_000] {
        let input = "(".repeat(depth) + &")".repeat(depth);
        match parse_str(&input, &options) {
            Err(Error::Grammar { expected, .. }) => assert_eq!(expected, "shallower nesting"),
            other => panic!("depth {}: expected grammar error, got {:?}", depth, other),
        }
    }
    assert!(parse_str(&"(".repeat(100), &options).is_err());
    assert!(parse_str(&("(".repeat(100) + &")".repeat(100)), &options).is_ok());
}

#[test]
fn test_typed_literals_with_padding() {
    let value = read(r#"{ n = <* I "42" >; when = <*D 2024-01-15 10:30:00 +0000 >; }"#);
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.get("n"), Some(&Value::Int(42)));
    assert!(dict.get("when").map_or(false, Value::is_date));
}
