use resxgen::{ResourceEntry, ResxReader, ident::escape_identifier, resx::decode};
use serde::Serialize;
use std::fs::File;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::parse_encoding;

const VALUE_WIDTH: usize = 50;

/// An entry as shown by `view`, with the accessor it generates.
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub key: String,
    pub accessor: String,
    pub value: String,
}

impl From<ResourceEntry> for EntryView {
    fn from(entry: ResourceEntry) -> Self {
        Self {
            accessor: escape_identifier(&entry.key).unwrap_or_else(|| entry.key.clone()),
            key: entry.key,
            value: entry.value,
        }
    }
}

pub fn read_entries(input: &str, encoding: Option<&str>) -> Result<Vec<EntryView>, String> {
    let encoding = encoding.map(parse_encoding).transpose()?;
    let file = File::open(input).map_err(|e| format!("Error reading {}: {}", input, e))?;
    ResxReader::from_reader(decode(file, encoding))
        .map(|entry| entry.map(EntryView::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Error reading {}: {}", input, e))
}

/// Cuts `value` to at most `width` terminal columns, on a character boundary.
fn truncate_to_width(value: &str, width: usize) -> String {
    if value.width() <= width {
        return value.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width.saturating_sub(3) {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

fn single_line(value: &str) -> String {
    value.trim().replace("\r\n", "\n").replace(['\r', '\n'], "⏎")
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.width());
    format!("{}{}", value, " ".repeat(fill))
}

/// Print the entries of a resource file as a table or as JSON.
pub fn print_view(input: &str, encoding: Option<&str>, json: bool, full: bool) -> Result<(), String> {
    let entries = read_entries(input, encoding)?;

    if json {
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Error serializing to JSON: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!("No entries found in {}", input);
        return Ok(());
    }

    let key_width = entries
        .iter()
        .map(|e| e.accessor.width())
        .max()
        .unwrap_or(0)
        .max("ACCESSOR".len());

    println!("{}  VALUE", pad("ACCESSOR", key_width));
    for entry in &entries {
        let value = single_line(&entry.value);
        let value = if full {
            value
        } else {
            truncate_to_width(&value, VALUE_WIDTH)
        };
        println!("{}  {}", pad(&entry.accessor, key_width), value);
    }
    eprintln!("✅ {} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
    Ok(())
}
