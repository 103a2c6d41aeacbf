//! Decode a chapter, edit a few fields, and write it back.
//!
//! Run with: cargo run --example quest_edit

use serde_snbt::{decode, encode, encode_with_options, snbt, SnbtOptions, Value};
use std::error::Error;

const CHAPTER: &str = r#"{
	default_hide_dependency_lines: false
	filename: "getting_started"
	id: "2B6E9F1C0A7D3E45"
	quests: [
		{
			id: "1A2B3C4D5E6F7081"
			shape: "hexagon"
			size: 1.5d
			tasks: [{ count: 16L, id: "0F0E0D0C0B0A0908", item: "minecraft:oak_log", type: "item" }]
			title: "Gather wood"
			x: -0.75d
			y: 0.0d
		}
	]
	title: "Getting Started"
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    let mut chapter = decode(CHAPTER)?;

    let root = chapter
        .as_compound_mut()
        .ok_or("chapter root is not a compound")?;
    root.insert("title", Value::from("First Steps"));

    if let Some(Value::List(quests)) = root.get_mut("quests") {
        for quest in quests.iter_mut().filter_map(Value::as_compound_mut) {
            println!(
                "quest {} at x = {:?}",
                quest.get_str("id").unwrap_or("?"),
                quest.get("x").and_then(Value::as_f64)
            );
            quest.insert(
                "subtitle",
                snbt!(["Chop any log", "Logs of every kind count"]),
            );
        }
    }

    // Untouched decimals such as `-0.75d` and `0.0d` keep their exact text.
    println!("Canonical:\n{}\n", encode(&chapter)?);
    println!(
        "Pretty:\n{}",
        encode_with_options(&chapter, &SnbtOptions::pretty().with_indent(4))?
    );

    Ok(())
}
