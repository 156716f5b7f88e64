//! Loan outcome after a single lump-sum prepayment.
//!
//! Reconstructs the outstanding balance at the prepayment month in closed
//! form, applies the lump sum, and re-solves the payoff horizon for the same
//! fixed installment. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::calendar::{compute_elapsed_months, LoanMonth};
use crate::error::LoanError;
use crate::time_value::{monthly_interest, remaining_principal, remaining_tenure};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Tenure};
use crate::LoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const METHODOLOGY: &str = "Closed-form annuity amortization with single prepayment";

/// Annual rates above this (in percent) are flagged in the warnings.
const HIGH_RATE_PCT: Decimal = dec!(50);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Original terms of a fixed-rate installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount originally borrowed.
    pub principal: Money,
    /// Nominal annual interest rate as a percentage (e.g., 8.7 = 8.7%).
    pub annual_rate_pct: Decimal,
    /// Fixed monthly installment (EMI).
    pub installment: Money,
    /// Month of the loan start.
    pub start: LoanMonth,
    /// Contracted tenure in whole years.
    pub tenure_years: u32,
}

impl LoanTerms {
    /// Monthly rate as a decimal: annual % / 12 / 100.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_pct / dec!(12) / dec!(100)
    }

    pub fn original_tenure_months(&self) -> u32 {
        self.tenure_years.saturating_mul(12)
    }
}

/// One-off extra principal payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prepayment {
    pub amount: Money,
    /// Month in which the lump sum is applied.
    pub date: LoanMonth,
}

/// Top-level input for JSON callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOutcomeInput {
    pub terms: LoanTerms,
    pub prepayment: Prepayment,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOutcome {
    pub start: LoanMonth,
    pub installment: Money,
    pub prepayment_amount: Money,
    pub prepayment_date: LoanMonth,
    /// Whole months from loan start to the prepayment month.
    pub months_to_prepayment: u32,
    /// Scheduled balance at the prepayment month. Negative if the
    /// installments had already overpaid the loan.
    pub principal_before_prepayment: Money,
    /// Balance once the lump sum is applied. Negative on overpayment.
    pub principal_after_prepayment: Money,
    /// Months still to pay after the prepayment month.
    pub remaining_tenure: Tenure,
    /// Months from loan start to closure.
    pub total_tenure: Tenure,
    /// `None` when the loan never closes.
    pub new_closure: Option<LoanMonth>,
    /// Original tenure minus total tenure; `None` when the loan never closes.
    pub months_saved: Option<i64>,
    pub original_tenure_months: u32,
    pub original_closure: LoanMonth,
}

#[derive(Serialize)]
struct Assumptions<'a> {
    terms: &'a LoanTerms,
    prepayment: &'a Prepayment,
    monthly_rate: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a loan from a combined JSON-style input.
pub fn analyze_loan_outcome(
    input: &LoanOutcomeInput,
) -> LoanResult<ComputationOutput<LoanOutcome>> {
    compute_loan_outcome(&input.terms, &input.prepayment)
}

/// Nine-scalar entry point, mirroring a form with one field per input.
#[allow(clippy::too_many_arguments)]
pub fn compute_from_fields(
    loan_amount: Money,
    annual_rate_pct: Decimal,
    installment: Money,
    start_month: u32,
    start_year: i32,
    original_tenure_years: u32,
    prepayment_amount: Money,
    prepayment_month: u32,
    prepayment_year: i32,
) -> LoanResult<ComputationOutput<LoanOutcome>> {
    let terms = LoanTerms {
        principal: loan_amount,
        annual_rate_pct,
        installment,
        start: LoanMonth::new(start_year, start_month)?,
        tenure_years: original_tenure_years,
    };
    let prepayment = Prepayment {
        amount: prepayment_amount,
        date: LoanMonth::new(prepayment_year, prepayment_month)?,
    };
    compute_loan_outcome(&terms, &prepayment)
}

/// Payoff horizon of `terms` after applying `prepayment`, compared with the
/// contracted schedule.
pub fn compute_loan_outcome(
    terms: &LoanTerms,
    prepayment: &Prepayment,
) -> LoanResult<ComputationOutput<LoanOutcome>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(terms, prepayment)?;

    if terms.annual_rate_pct > HIGH_RATE_PCT {
        flag(
            &mut warnings,
            format!(
                "Annual rate of {}% is unusually high",
                terms.annual_rate_pct
            ),
        );
    }

    let monthly_rate = terms.monthly_rate();
    let months_to_prepayment = prepayment_offset(terms.start, prepayment.date)?;

    let principal_before = remaining_principal(
        terms.principal,
        monthly_rate,
        terms.installment,
        months_to_prepayment,
    )?;
    debug!(
        months_to_prepayment,
        %monthly_rate,
        %principal_before,
        "reconstructed balance at prepayment month"
    );

    let (principal_after, remaining, total) = if principal_before <= Decimal::ZERO {
        // Scheduled installments close the loan before the lump sum lands.
        let from_start = remaining_tenure(terms.principal, monthly_rate, terms.installment)?;
        flag(
            &mut warnings,
            format!(
                "Scheduled installments retire the loan before {}; prepayment has no effect",
                prepayment.date
            ),
        );
        (principal_before, Tenure::Months(0), from_start)
    } else {
        let adjusted = principal_before - prepayment.amount;
        let remaining = remaining_tenure(adjusted, monthly_rate, terms.installment)?;

        if adjusted <= Decimal::ZERO {
            flag(
                &mut warnings,
                format!(
                    "Prepayment of {} covers the outstanding balance of {}; loan closes in {}",
                    prepayment.amount.round_dp(2),
                    principal_before.round_dp(2),
                    prepayment.date
                ),
            );
        }
        if remaining == Tenure::Never {
            let interest = monthly_interest(adjusted, monthly_rate)?;
            flag(
                &mut warnings,
                format!(
                    "Installment of {} does not cover monthly interest of {}; loan never closes",
                    terms.installment,
                    interest.round_dp(2)
                ),
            );
        }

        (
            adjusted,
            remaining,
            remaining.offset_by(months_to_prepayment),
        )
    };
    debug!(?remaining, ?total, %principal_after, "solved payoff horizon");

    let original_tenure_months = terms.original_tenure_months();
    let original_closure = terms.start.add_months(original_tenure_months);
    let new_closure = total.months().map(|m| terms.start.add_months(m));
    let months_saved = total
        .months()
        .map(|m| i64::from(original_tenure_months) - i64::from(m));

    if let Some(saved) = months_saved {
        if saved < 0 {
            flag(
                &mut warnings,
                format!(
                    "Payoff runs {} months past the original {}-month schedule; installment is below the scheduled EMI",
                    -saved, original_tenure_months
                ),
            );
        }
    }

    let outcome = LoanOutcome {
        start: terms.start,
        installment: terms.installment,
        prepayment_amount: prepayment.amount,
        prepayment_date: prepayment.date,
        months_to_prepayment,
        principal_before_prepayment: principal_before,
        principal_after_prepayment: principal_after,
        remaining_tenure: remaining,
        total_tenure: total,
        new_closure,
        months_saved,
        original_tenure_months,
        original_closure,
    };

    let assumptions = Assumptions {
        terms,
        prepayment,
        monthly_rate,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        &assumptions,
        warnings,
        elapsed,
        outcome,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate(terms: &LoanTerms, prepayment: &Prepayment) -> LoanResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "principal".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    if terms.installment <= Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "installment".into(),
            reason: "Installment must be positive".into(),
        });
    }
    if terms.annual_rate_pct < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if terms.tenure_years == 0 {
        return Err(LoanError::InvalidInput {
            field: "tenure_years".into(),
            reason: "Original tenure must be at least one year".into(),
        });
    }
    if prepayment.amount < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "prepayment.amount".into(),
            reason: "Prepayment amount cannot be negative".into(),
        });
    }
    terms.start.validate()?;
    prepayment.date.validate()?;
    Ok(())
}

fn prepayment_offset(start: LoanMonth, date: LoanMonth) -> LoanResult<u32> {
    let elapsed = compute_elapsed_months(start, date);
    if elapsed < 0 {
        return Err(LoanError::DateError(format!(
            "Prepayment date {date} precedes loan start {start}"
        )));
    }
    u32::try_from(elapsed).map_err(|_| {
        LoanError::DateError(format!(
            "Prepayment date {date} is {elapsed} months after loan start"
        ))
    })
}

fn flag(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ym(year: i32, month: u32) -> LoanMonth {
        LoanMonth::new(year, month).unwrap()
    }

    fn terms(principal: Money, rate_pct: Decimal, installment: Money, years: u32) -> LoanTerms {
        LoanTerms {
            principal,
            annual_rate_pct: rate_pct,
            installment,
            start: ym(2024, 1),
            tenure_years: years,
        }
    }

    fn prepay(amount: Money, date: LoanMonth) -> Prepayment {
        Prepayment { amount, date }
    }

    #[test]
    fn test_monthly_rate_from_percentage() {
        let t = terms(dec!(1), dec!(8.7), dec!(1), 1);
        assert_eq!(t.monthly_rate(), dec!(0.00725));
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let t = terms(Decimal::ZERO, dec!(10), dec!(100), 1);
        let err = compute_loan_outcome(&t, &prepay(Decimal::ZERO, ym(2024, 1))).unwrap_err();
        match err {
            LoanError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_tenure() {
        let t = terms(dec!(1_000), dec!(10), dec!(100), 0);
        let err = compute_loan_outcome(&t, &prepay(Decimal::ZERO, ym(2024, 1))).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_negative_prepayment() {
        let t = terms(dec!(1_000), dec!(10), dec!(100), 1);
        let err = compute_loan_outcome(&t, &prepay(dec!(-1), ym(2024, 3))).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_prepayment_before_start() {
        let t = terms(dec!(1_000), dec!(10), dec!(100), 1);
        let err = compute_loan_outcome(&t, &prepay(dec!(10), ym(2023, 12))).unwrap_err();
        assert!(matches!(err, LoanError::DateError(_)));
    }

    #[test]
    fn test_rejects_invalid_month_in_json_input() {
        let mut t = terms(dec!(1_000), dec!(10), dec!(100), 1);
        t.start = LoanMonth { year: 2024, month: 13 };
        let err = compute_loan_outcome(&t, &prepay(dec!(10), ym(2025, 1))).unwrap_err();
        assert!(matches!(err, LoanError::DateError(_)));
    }

    #[test]
    fn test_prepayment_in_start_month() {
        let t = terms(dec!(100_000), dec!(12), dec!(2_000), 5);
        let out = compute_loan_outcome(&t, &prepay(dec!(10_000), ym(2024, 1)))
            .unwrap()
            .result;
        assert_eq!(out.months_to_prepayment, 0);
        assert_eq!(out.principal_before_prepayment, dec!(100_000));
        assert_eq!(out.principal_after_prepayment, dec!(90_000));
        assert_eq!(out.total_tenure, out.remaining_tenure);
    }

    #[test]
    fn test_overpayment_closes_loan_at_prepayment_month() {
        let t = terms(dec!(100_000), dec!(12), dec!(2_000), 5);
        let output = compute_loan_outcome(&t, &prepay(dec!(200_000), ym(2024, 7))).unwrap();
        let out = &output.result;
        assert!(out.principal_after_prepayment < Decimal::ZERO);
        assert_eq!(out.remaining_tenure, Tenure::Months(0));
        assert_eq!(out.total_tenure, Tenure::Months(6));
        assert_eq!(out.new_closure, Some(ym(2024, 7)));
        assert_eq!(out.months_saved, Some(54));
        assert!(output.warnings.iter().any(|w| w.contains("covers the outstanding balance")));
    }

    #[test]
    fn test_loan_retired_before_prepayment_date() {
        let t = terms(dec!(12_000), Decimal::ZERO, dec!(1_000), 1);
        let output = compute_loan_outcome(&t, &prepay(dec!(500), ym(2026, 1))).unwrap();
        let out = &output.result;
        assert_eq!(out.months_to_prepayment, 24);
        assert_eq!(out.principal_before_prepayment, dec!(-12_000));
        assert_eq!(out.remaining_tenure, Tenure::Months(0));
        assert_eq!(out.total_tenure, Tenure::Months(12));
        assert_eq!(out.new_closure, Some(ym(2025, 1)));
        assert_eq!(out.months_saved, Some(0));
        assert!(output.warnings.iter().any(|w| w.contains("no effect")));
    }

    #[test]
    fn test_installment_equal_to_interest_never_closes() {
        let t = terms(dec!(1_000_000), dec!(12), dec!(10_000), 30);
        let output = compute_loan_outcome(&t, &prepay(Decimal::ZERO, ym(2024, 1))).unwrap();
        let out = &output.result;
        assert_eq!(out.remaining_tenure, Tenure::Never);
        assert_eq!(out.total_tenure, Tenure::Never);
        assert_eq!(out.new_closure, None);
        assert_eq!(out.months_saved, None);
        assert_eq!(out.original_closure, ym(2054, 1));
        assert!(output.warnings.iter().any(|w| w.contains("never closes")));
    }

    #[test]
    fn test_underpaying_installment_reports_negative_savings() {
        let t = terms(dec!(100_000), dec!(12), dec!(1_100), 10);
        let output = compute_loan_outcome(&t, &prepay(Decimal::ZERO, ym(2024, 1))).unwrap();
        assert_eq!(output.result.total_tenure, Tenure::Months(241));
        assert_eq!(output.result.months_saved, Some(-121));
        assert!(output.warnings.iter().any(|w| w.contains("below the scheduled EMI")));
    }

    #[test]
    fn test_balance_beyond_decimal_range_is_an_error() {
        let t = terms(
            dec!(50_000_000_000_000_000_000_000_000_000),
            dec!(2400),
            dec!(1),
            1,
        );
        let err = compute_loan_outcome(&t, &prepay(Decimal::ZERO, ym(2024, 1))).unwrap_err();
        assert!(matches!(err, LoanError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_zero_rate_loan() {
        let t = terms(dec!(12_000), Decimal::ZERO, dec!(1_000), 1);
        let out = compute_loan_outcome(&t, &prepay(dec!(3_000), ym(2024, 4)))
            .unwrap()
            .result;
        // 3 installments paid (9_000 left), then 3_000 prepaid: 6 months remain.
        assert_eq!(out.principal_before_prepayment, dec!(9_000));
        assert_eq!(out.remaining_tenure, Tenure::Months(6));
        assert_eq!(out.total_tenure, Tenure::Months(9));
        assert_eq!(out.months_saved, Some(3));
        assert_eq!(out.new_closure, Some(ym(2024, 10)));
    }

    #[test]
    fn test_high_rate_is_flagged() {
        let t = terms(dec!(10_000), dec!(60), dec!(1_000), 2);
        let output = compute_loan_outcome(&t, &prepay(Decimal::ZERO, ym(2024, 1))).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("unusually high")));
    }

    #[test]
    fn test_assumptions_echo_monthly_rate() {
        let t = terms(dec!(100_000), dec!(12), dec!(2_000), 5);
        let output = compute_loan_outcome(&t, &prepay(Decimal::ZERO, ym(2024, 1))).unwrap();
        let rate: Decimal = output.assumptions["monthly_rate"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(rate, dec!(0.01));
        assert_eq!(output.methodology, METHODOLOGY);
    }

    #[test]
    fn test_analyze_matches_direct_call() {
        let input = LoanOutcomeInput {
            terms: terms(dec!(100_000), dec!(12), dec!(2_000), 5),
            prepayment: prepay(dec!(5_000), ym(2024, 9)),
        };
        let a = analyze_loan_outcome(&input).unwrap().result;
        let b = compute_loan_outcome(&input.terms, &input.prepayment)
            .unwrap()
            .result;
        assert_eq!(a, b);
    }
}
