use napi::Result as NapiResult;
use napi_derive::napi;

use loan_tenure_core::amortization::{self, LoanOutcomeInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<LoanOutcomeInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Full computation envelope for `{ "terms": {...}, "prepayment": {...} }`, as JSON.
#[napi]
pub fn loan_outcome(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = amortization::analyze_loan_outcome(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Labelled plain-text summary for the same input.
#[napi]
pub fn loan_report(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = amortization::analyze_loan_outcome(&input).map_err(to_napi_error)?;
    Ok(amortization::render_report(&output.result))
}
