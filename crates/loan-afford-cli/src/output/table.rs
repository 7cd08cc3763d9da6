use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, is_record_list, scalar_text};

/// Format output as tables using the tabled crate.
///
/// Scalar fields go into a Field/Value table; lists of records (scenarios,
/// rate shocks) each get their own table with one row per record.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_object(result);
                print_envelope_notes(map);
            } else {
                print_object(value);
            }
        }
        Value::Array(arr) => print_records(arr),
        _ => println!("{}", value),
    }
}

fn print_object(value: &Value) {
    let fields = flatten(value);
    let (lists, scalars): (Vec<_>, Vec<_>) =
        fields.into_iter().partition(|(_, v)| is_record_list(v));

    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &scalars {
            builder.push_record([key.clone(), scalar_text(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, list) in &lists {
        if let Value::Array(items) = list {
            println!("\n{}:", key);
            print_records(items);
        }
    }
}

fn print_records(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let rows: Vec<Vec<(String, Value)>> = arr.iter().map(flatten).collect();
    let headers: Vec<String> = match rows.first() {
        Some(first) if !first.is_empty() => first.iter().map(|(k, _)| k.clone()).collect(),
        _ => {
            for item in arr {
                println!("{}", scalar_text(item));
            }
            return;
        }
    };

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| scalar_text(v))
                    .unwrap_or_default()
            })
            .collect();
        builder.push_record(cells);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
