//! Generic formatters used when no custom renderer is registered, and by views that only
//! need to pick fields.
//!
//! Values are walked through their serde representation, so fields appear in declaration
//! order (serde_json is built with `preserve_order`).

use crate::error::CliError;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

/// Placeholder printed for null fields.
pub const NULL_PLACEHOLDER: &str = "-";

/// `Field:\tvalue` lines for one value.
pub fn format_value<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    let value = serde_json::to_value(value)?;
    Ok(format_json_block(&value))
}

/// One block per element, blocks separated by a blank line.
pub fn format_sequence<T: Serialize>(values: &[T]) -> Result<String, CliError> {
    let blocks = values
        .iter()
        .map(|v| format_value(v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(blocks.join("\n"))
}

/// Table with one column per field of the first row.
pub fn format_table<T: Serialize>(rows: &[T]) -> Result<String, CliError> {
    let rows = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        Some(_) => vec!["Value".to_string()],
        None => return Ok(String::new()),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.clone());
    for row in &rows {
        let cells: Vec<String> = match row {
            Value::Object(map) => headers
                .iter()
                .map(|h| map.get(h).map(scalar).unwrap_or_default())
                .collect(),
            other => vec![scalar(other)],
        };
        table.add_row(cells);
    }
    Ok(format!("{}\n", table))
}

fn format_json_block(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, field)| format!("{}:\t{}\n", key, scalar(field)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(format_json_block)
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("{}\n", scalar(other)),
    }
}

/// Inline text for one field value.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::Null => NULL_PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.iter().all(is_plain) => {
            if items.is_empty() {
                NULL_PLACEHOLDER.to_string()
            } else {
                items.iter().map(scalar).collect::<Vec<_>>().join(", ")
            }
        }
        Value::Object(map) if map.is_empty() => NULL_PLACEHOLDER.to_string(),
        other => other.to_string(),
    }
}

fn is_plain(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
