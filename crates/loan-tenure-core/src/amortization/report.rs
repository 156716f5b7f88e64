//! Plain-text summary of a loan outcome.

use rust_decimal::Decimal;

use crate::amortization::prepayment::LoanOutcome;
use crate::types::Tenure;

const NOT_APPLICABLE: &str = "n/a";

/// Labelled summary block: start, installment and prepayment, followed by
/// the new and original payoff horizons. Amounts are rounded to whole units.
pub fn render_report(outcome: &LoanOutcome) -> String {
    let remaining = match outcome.remaining_tenure {
        Tenure::Months(m) => format!("{m} months"),
        Tenure::Never => "never (installment does not cover interest)".to_string(),
    };
    let new_closure = outcome
        .new_closure
        .map(|m| m.label())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());
    let saved = outcome
        .months_saved
        .map(|m| format!("{m} months"))
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());

    [
        format!("Loan Starts: {}", outcome.start.label()),
        format!("EMI: {}/month", whole(outcome.installment)),
        format!(
            "Prepayment: {} in {}",
            whole(outcome.prepayment_amount),
            outcome.prepayment_date.label()
        ),
        String::new(),
        format!("Remaining Tenure: {remaining}"),
        format!("New Loan Closure: {new_closure}"),
        format!("Tenure Saved: {saved}"),
        format!("Original Closure: {}", outcome.original_closure.label()),
    ]
    .join("\n")
}

fn whole(amount: Decimal) -> Decimal {
    amount.round_dp(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::LoanMonth;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn ym(year: i32, month: u32) -> LoanMonth {
        LoanMonth::new(year, month).unwrap()
    }

    fn sample_outcome() -> LoanOutcome {
        LoanOutcome {
            start: ym(2023, 7),
            installment: dec!(41_200),
            prepayment_amount: dec!(200_000.40),
            prepayment_date: ym(2024, 8),
            months_to_prepayment: 13,
            principal_before_prepayment: dec!(4_963_531.90),
            principal_after_prepayment: dec!(4_763_531.50),
            remaining_tenure: Tenure::Months(253),
            total_tenure: Tenure::Months(266),
            new_closure: Some(ym(2045, 9)),
            months_saved: Some(34),
            original_tenure_months: 300,
            original_closure: ym(2048, 7),
        }
    }

    #[test]
    fn test_report_layout() {
        let expected = "\
Loan Starts: July 2023
EMI: 41200/month
Prepayment: 200000 in August 2024

Remaining Tenure: 253 months
New Loan Closure: September 2045
Tenure Saved: 34 months
Original Closure: July 2048";
        assert_eq!(render_report(&sample_outcome()), expected);
    }

    #[test]
    fn test_report_for_loan_that_never_closes() {
        let mut outcome = sample_outcome();
        outcome.remaining_tenure = Tenure::Never;
        outcome.total_tenure = Tenure::Never;
        outcome.new_closure = None;
        outcome.months_saved = None;

        let report = render_report(&outcome);
        assert!(report.contains("Remaining Tenure: never (installment does not cover interest)"));
        assert!(report.contains("New Loan Closure: n/a"));
        assert!(report.contains("Tenure Saved: n/a"));
        assert!(report.ends_with("Original Closure: July 2048"));
    }
}
