//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_textplist::{
    parse_str, plist, to_value, write_to_string, ParseOptions, Uid, Value, WriteOptions,
};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = WriteOptions::default();

    let config = plist!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true,
        "owner": (Uid::new(7))
    });

    println!("Config as plist:\n{}\n", write_to_string(&config, &options)?);

    if let Value::Dict(dict) = &config {
        if let Some(host) = dict.get("host").and_then(Value::as_str) {
            println!("Accessing field 'host': {}", host);
        }
        if let Some(port) = dict.get("port").and_then(Value::as_i64) {
            println!("Accessing field 'port': {}", port);
        }
        if let Some(Value::Array(features)) = dict.get("features") {
            println!("Accessing field 'features': {} items", features.len());
        }
        if let Some(owner) = dict.get("owner").and_then(Value::as_uid) {
            println!("Accessing field 'owner': UID {}\n", owner);
        }
    }

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    let user_value = to_value(&user)?;
    println!("User as plist:\n{}\n", write_to_string(&user_value, &options)?);

    let parsed = parse_str(
        "{ icon = <89504e47>; created = <*D2024-01-15 10:30:00 +0000>; }",
        &ParseOptions::default(),
    )?;
    println!("Parsed kinds:");
    if let Some(dict) = parsed.as_dict() {
        for (key, value) in dict {
            println!("  {}: {}", key, value.kind());
        }
    }

    Ok(())
}
