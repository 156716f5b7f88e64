use serde_json::Value;
use std::io;

use super::{format_value, result_object};

/// Write output as two-column CSV (`field,value`) to stdout.
///
/// Warnings follow the result rows as `warning,<message>`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = wtr.write_record(["field", "value"]);
    match result_object(value).or_else(|| value.as_object()) {
        Some(map) => {
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_value(val)]);
            }
        }
        None => {
            let _ = wtr.write_record(["value", &format_value(value)]);
        }
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings {
            let _ = wtr.write_record(["warning", &format_value(w)]);
        }
    }

    let _ = wtr.flush();
}
