//! Writing one value in each dialect, with and without fallback.
//!
//! Run with: cargo run --example dialects

use serde_textplist::{plist, write_to_string, Dialect, Uid, Value, WriteOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let value = plist!({
        "name": "sample",
        "count": 3,
        "ratio": 0.25,
        "enabled": true,
        "digest": (Value::Data(vec![0xde, 0xad, 0xbe, 0xef])),
        "parent": (Uid::new(1)),
        "missing": null
    });

    for dialect in [Dialect::OpenStep, Dialect::GNUstep, Dialect::ExtendedText] {
        let options = WriteOptions::new().with_dialect(dialect);
        println!("{}:\n{}\n", dialect, write_to_string(&value, &options)?);

        match write_to_string(&value, &options.with_fallback(false)) {
            Ok(_) => println!("  (no fallback needed)\n"),
            Err(e) => println!("  without fallback: {}\n", e),
        }
    }

    Ok(())
}
