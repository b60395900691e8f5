pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The calculator figures inside an output envelope.
///
/// Tagged `calculate` responses wrap the figures one level deeper
/// (`{"result": {"fha": {...}}}`); that wrapper is skipped.
pub(crate) fn result_body(value: &Value) -> Option<&Value> {
    let result = value.as_object()?.get("result")?;
    match result {
        Value::Object(map) if map.len() == 1 => match map.values().next() {
            Some(inner @ Value::Object(_)) => Some(inner),
            _ => Some(result),
        },
        _ => Some(result),
    }
}
