use serde_json::Value;
use std::io;

use super::{flatten, is_record_list, scalar_text};

/// Write output as CSV to stdout.
///
/// Record lists become one row per record with dotted column names. A
/// single object becomes two-column `field,value` rows; nested record lists
/// inside it are written as JSON cells.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(arr) => write_records(&mut wtr, arr),
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten(body) {
                let cell = if is_record_list(&val) {
                    serde_json::to_string(&val).unwrap_or_default()
                } else {
                    scalar_text(&val)
                };
                let _ = wtr.write_record([key.as_str(), cell.as_str()]);
            }
        }
        _ => {
            let _ = wtr.write_record([scalar_text(body)]);
        }
    }

    let _ = wtr.flush();
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let rows: Vec<Vec<(String, Value)>> = arr.iter().map(flatten).collect();
    let Some(first) = rows.first() else {
        return;
    };

    if first.is_empty() {
        for item in arr {
            let _ = wtr.write_record([scalar_text(item)]);
        }
        return;
    }

    let headers: Vec<&str> = first.iter().map(|(k, _)| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(k, _)| k.as_str() == *h)
                    .map(|(_, v)| scalar_text(v))
                    .unwrap_or_default()
            })
            .collect();
        let _ = wtr.write_record(&cells);
    }
}
