use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_value, result_object};

/// Format output as a two-column table using the tabled crate, followed by
/// any warnings and the methodology line.
pub fn print_table(value: &Value) {
    let Some(result) = result_object(value).or_else(|| value.as_object()) else {
        println!("{}", format_value(value));
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", format_value(w));
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
