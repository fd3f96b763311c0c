//! Reading and writing localization `.strings` tables.
//!
//! Run with: cargo run --example strings_file

use serde_textplist::{from_str_with_options, to_string_with_options, ParseOptions, WriteOptions};
use std::collections::BTreeMap;
use std::error::Error;

const ENGLISH: &str = r#"/* Menu titles */
"File" = "File";
"Edit" = "Edit";

// Shown when a document cannot be saved
"SaveFailed" = "The document \"%@\" could not be saved.";
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let table: BTreeMap<String, String> =
        from_str_with_options(ENGLISH, &ParseOptions::strings_file())?;
    for (key, text) in &table {
        println!("{:>12} -> {}", key, text);
    }

    let french: BTreeMap<String, String> = table
        .keys()
        .map(|key| {
            let text = match key.as_str() {
                "File" => "Fichier",
                "Edit" => "\u{c9}dition",
                _ => "Le document \u{ab} %@ \u{bb} n'a pas pu \u{ea}tre enregistr\u{e9}.",
            };
            (key.clone(), text.to_string())
        })
        .collect();

    println!(
        "\nFrench table:\n{}",
        to_string_with_options(&french, &WriteOptions::strings_file())?
    );

    Ok(())
}
