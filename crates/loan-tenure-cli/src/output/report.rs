use serde_json::Value;

use loan_tenure_core::amortization::{render_report, LoanOutcome};
use loan_tenure_core::ComputationOutput;

/// Print the labelled plain-text summary. Warnings are already on stderr via
/// tracing. Falls back to JSON when the value is not a loan outcome envelope.
pub fn print_report(value: &Value) {
    match serde_json::from_value::<ComputationOutput<LoanOutcome>>(value.clone()) {
        Ok(output) => println!("{}", render_report(&output.result)),
        Err(e) => {
            tracing::debug!(error = %e, "value is not a loan outcome; printing JSON");
            super::json::print_json(value);
        }
    }
}
