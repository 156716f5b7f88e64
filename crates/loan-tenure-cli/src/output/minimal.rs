use serde_json::Value;

use super::{format_value, result_object};

/// Print just the headline answer: months saved, or the remaining tenure
/// when the loan never closes and there is nothing to compare.
pub fn print_minimal(value: &Value) {
    let Some(result) = result_object(value) else {
        println!("{}", format_value(value));
        return;
    };

    match result.get("months_saved") {
        Some(saved) if !saved.is_null() => println!("{}", format_value(saved)),
        _ => {
            let tenure = result.get("remaining_tenure").unwrap_or(&Value::Null);
            println!("{}", format_value(tenure));
        }
    }
}
