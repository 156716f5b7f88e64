pub mod prepayment;
pub mod report;

pub use crate::calendar::compute_elapsed_months;
pub use crate::time_value::{remaining_principal, remaining_tenure};
pub use prepayment::{
    analyze_loan_outcome, compute_from_fields, compute_loan_outcome, LoanOutcome,
    LoanOutcomeInput, LoanTerms, Prepayment,
};
pub use report::render_report;
