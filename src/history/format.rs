//! Human-readable rendering of record details.

use serde_json::{Map, Value};

use super::detail::FieldChange;

/// Render a detail (or any JSON object) as indented text.
///
/// ```text
/// age: 29 -> 30
/// address:
///   city: "NY" -> "LA"
///
/// ```
pub fn format_changes(changes: &Value) -> String {
    match changes {
        Value::Object(map) => format_map(map, ""),
        _ => "No changes".to_string(),
    }
}

fn format_map(map: &Map<String, Value>, indent: &str) -> String {
    let mut lines = Vec::new();

    for (key, value) in map {
        match FieldChange::classify(value) {
            FieldChange::Pair { before, after } => {
                lines.push(format!("{indent}{key}: {before} -> {after}"));
            }
            FieldChange::Nested(nested) => {
                let inner = format_map(nested, &format!("{indent}  "));
                if !inner.is_empty() {
                    lines.push(format!("{indent}{key}: "));
                    lines.push(inner);
                    lines.push(indent.to_string());
                }
            }
            FieldChange::Literal(literal) => {
                lines.push(format!("{indent}{key}: {literal}"));
            }
        }
    }

    lines.join("\n")
}
