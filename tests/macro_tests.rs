use serde_textplist::{plist, write_to_string, Dialect, PlistMap, Uid, Value, WriteOptions};

#[test]
fn test_plist_macro_null() {
    let value = plist!(null);
    assert_eq!(value, Value::Null);
}

#[test]
fn test_plist_macro_booleans() {
    assert_eq!(plist!(true), Value::Bool(true));
    assert_eq!(plist!(false), Value::Bool(false));
}

#[test]
fn test_plist_macro_numbers() {
    assert_eq!(plist!(42), Value::Int(42));
    assert_eq!(plist!(3.5), Value::Real(3.5));
    assert_eq!(plist!(-123), Value::Int(-123));
    assert_eq!(plist!(u64::MAX), Value::Real(u64::MAX as f64));
}

#[test]
fn test_plist_macro_strings() {
    assert_eq!(plist!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(plist!(""), Value::String(String::new()));
}

#[test]
fn test_plist_macro_arrays() {
    assert_eq!(plist!([]), Value::Array(vec![]));
    assert_eq!(
        plist!([1, "two", true, null]),
        Value::Array(vec![
            Value::Int(1),
            Value::from("two"),
            Value::Bool(true),
            Value::Null,
        ])
    );
}

#[test]
fn test_plist_macro_dicts() {
    let value = plist!({
        "name": "Alice",
        "age": 30,
        "roles": ["admin"],
        "address": { "city": "Paris" },
    });

    let mut address = PlistMap::new();
    address.insert("city".to_string(), Value::from("Paris"));
    let mut expected = PlistMap::new();
    expected.insert("name".to_string(), Value::from("Alice"));
    expected.insert("age".to_string(), Value::Int(30));
    expected.insert(
        "roles".to_string(),
        Value::Array(vec![Value::from("admin")]),
    );
    expected.insert("address".to_string(), Value::Dict(address));

    assert_eq!(value, Value::Dict(expected));
}

#[test]
fn test_plist_macro_expressions() {
    let name = String::from("Bob");
    let tags = vec!["a", "b"];
    let value = plist!({
        "name": name,
        "tags": tags,
        "ref": (Uid::new(9)),
        "blob": (Value::Data(vec![0xca, 0xfe]))
    });
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.get("name"), Some(&Value::from("Bob")));
    assert_eq!(
        dict.get("tags"),
        Some(&Value::Array(vec![Value::from("a"), Value::from("b")]))
    );
    assert_eq!(dict.get("ref"), Some(&Value::Uid(Uid::new(9))));
    assert_eq!(dict.get("blob"), Some(&Value::Data(vec![0xca, 0xfe])));
}

#[test]
fn test_plist_macro_output() {
    let value = plist!({ "b": [1, 2], "a": "x" });
    let text = write_to_string(&value, &WriteOptions::new()).unwrap();
    assert_eq!(text, "{\n\t\"a\" = \"x\";\n\t\"b\" = (\n\t\t<*I1>,\n\t\t<*I2>,\n\t);\n}");

    let options = WriteOptions::new().with_dialect(Dialect::OpenStep);
    let text = write_to_string(&value, &options).unwrap();
    assert_eq!(text, "{\n\t\"a\" = \"x\";\n\t\"b\" = (\n\t\t1,\n\t\t2,\n\t);\n}");
}
