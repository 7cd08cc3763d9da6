use serde_json::Value;

use super::{flatten, scalar_text};

/// Headline fields, most important first. Matched against the last segment
/// of a flattened key, so `affordability.risk_level` counts as `risk_level`.
const PRIORITY_KEYS: [&str; 4] = ["risk_level", "installment", "shocked_installment", "verdict"];

/// Fields printed per record when the result is a list.
const RECORD_KEYS: [&str; 5] = [
    "tenure_years",
    "shock_percent",
    "installment",
    "risk_level",
    "recommended",
];

/// Print just the key answer from the output.
///
/// Objects print their highest-priority headline value. Lists print one
/// `key=value` line per record.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(_) => println!("{}", headline(result)),
        Value::Array(items) => {
            for item in items {
                println!("{}", record_line(item));
            }
        }
        other => println!("{}", scalar_text(other)),
    }
}

fn lookup(fields: &[(String, Value)], key: &str) -> Option<String> {
    fields
        .iter()
        .find(|(path, val)| last_segment(path) == key && !val.is_null())
        .map(|(_, val)| scalar_text(val))
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn headline(value: &Value) -> String {
    let fields = flatten(value);
    PRIORITY_KEYS
        .iter()
        .find_map(|key| lookup(&fields, key))
        .or_else(|| {
            fields
                .first()
                .map(|(key, val)| format!("{}: {}", key, scalar_text(val)))
        })
        .unwrap_or_default()
}

fn record_line(value: &Value) -> String {
    let fields = flatten(value);
    let parts: Vec<String> = RECORD_KEYS
        .iter()
        .filter_map(|key| lookup(&fields, key).map(|v| format!("{}={}", key, v)))
        .collect();
    if parts.is_empty() {
        scalar_text(value)
    } else {
        parts.join(" ")
    }
}
