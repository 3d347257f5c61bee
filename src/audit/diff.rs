//! Field-level diff generation for update audit records

use serde_json::Value;

/// Generate a human-readable diff between two serialized entities
///
/// Only top-level fields are compared; returns None when nothing
/// changed. Bookkeeping timestamps are skipped.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return if before != after {
            Some(format!("{} -> {}", format_value(before), format_value(after)))
        } else {
            None
        };
    };

    let mut changes = Vec::new();

    for (key, before_val) in before_obj {
        if key == "updated_at" || key == "created_at" {
            continue;
        }
        match after_obj.get(key) {
            Some(after_val) if before_val != after_val => {
                changes.push(format!(
                    "{}: {} -> {}",
                    key,
                    format_value(before_val),
                    format_value(after_val)
                ));
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
        }
    }

    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Format a JSON value for display, truncating long strings
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.len() > 50 {
                format!("\"{}...\"", &s[..47])
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
