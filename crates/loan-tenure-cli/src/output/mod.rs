pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod report;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
        OutputFormat::Report => report::print_report(value),
    }
}

/// The `result` object of a computation envelope, if present.
fn result_object(value: &Value) -> Option<&Map<String, Value>> {
    value.get("result").and_then(Value::as_object)
}

/// Render a scalar or one of the engine's small compound values as text.
///
/// Calendar months (`{year, month}`) become `YYYY-MM`, tenures
/// (`{"months": n}` / `"never"`) become `n months` / `never`.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        Value::Object(map) => {
            let year = map.get("year").and_then(Value::as_i64);
            let month = map.get("month").and_then(Value::as_u64);
            if let (Some(y), Some(m)) = (year, month) {
                return format!("{y:04}-{m:02}");
            }
            if let Some(n) = map.get("months") {
                return format!("{} months", n);
            }
            serde_json::to_string(value).unwrap_or_default()
        }
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_calendar_month() {
        assert_eq!(format_value(&json!({ "year": 2045, "month": 9 })), "2045-09");
    }

    #[test]
    fn formats_tenure_variants() {
        assert_eq!(format_value(&json!({ "months": 253 })), "253 months");
        assert_eq!(format_value(&json!("never")), "never");
        assert_eq!(format_value(&Value::Null), "n/a");
    }

    #[test]
    fn finds_result_object() {
        let v = json!({ "result": { "months_saved": 34 }, "warnings": [] });
        assert_eq!(result_object(&v).unwrap()["months_saved"], json!(34));
        assert!(result_object(&json!([1, 2])).is_none());
    }
}
