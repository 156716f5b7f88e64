use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LoanError;
use crate::types::{Money, Rate, Tenure};
use crate::LoanResult;

/// ln(2) to 28 decimal places.
const LN_2: Decimal = dec!(0.6931471805599453094172321215);

const ATANH_MAX_TERMS: u32 = 60;
const ATANH_TERM_EPSILON: Decimal = dec!(0.0000000000000000000000000001);

/// Monthly rates below this are not inverted through ln(1 + r).
const LN_RATE_FLOOR: Decimal = dec!(0.00000000000001);

const MAX_SETTLE_STEPS: u32 = 10_000;

/// Outstanding balance after `elapsed_months` level installments.
///
/// Closed form of the recurrence `b = b * (1 + r) - installment`:
/// `P(1+r)^n - E((1+r)^n - 1) / r`, or `P - E*n` when `r` is zero.
/// A negative result means the installments have overpaid the loan.
pub fn remaining_principal(
    principal: Money,
    monthly_rate: Rate,
    installment: Money,
    elapsed_months: u32,
) -> LoanResult<Money> {
    if monthly_rate < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Monthly rate cannot be negative".into(),
        });
    }

    if monthly_rate.is_zero() {
        return installment
            .checked_mul(Decimal::from(elapsed_months))
            .and_then(|paid| principal.checked_sub(paid))
            .ok_or_else(|| overflow("installments paid", elapsed_months));
    }

    let growth = compound_growth(monthly_rate, elapsed_months)?;
    let accrued = principal
        .checked_mul(growth)
        .ok_or_else(|| overflow("accrued interest", elapsed_months))?;
    let paid = installment
        .checked_mul(growth)
        .and_then(|v| v.checked_div(monthly_rate))
        .ok_or_else(|| overflow("accumulated installments", elapsed_months))?;

    principal
        .checked_add(accrued)
        .and_then(|grown| grown.checked_sub(paid))
        .ok_or_else(|| overflow("outstanding balance", elapsed_months))
}

/// Interest accruing on `principal` over one month.
pub fn monthly_interest(principal: Money, monthly_rate: Rate) -> LoanResult<Money> {
    principal.checked_mul(monthly_rate).ok_or_else(|| {
        LoanError::FinancialImpossibility(format!(
            "monthly interest on {principal} at {monthly_rate} exceeds decimal range"
        ))
    })
}

/// Months of level installments needed to retire `principal`.
///
/// Inverts the annuity formula: `N = ceil(-ln(1 - P*r/E) / ln(1 + r))`.
/// Returns `Tenure::Never` when the installment does not exceed the interest
/// accruing on the balance, and `Months(0)` when nothing is outstanding.
pub fn remaining_tenure(
    principal: Money,
    monthly_rate: Rate,
    installment: Money,
) -> LoanResult<Tenure> {
    if installment <= Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "installment".into(),
            reason: "Installment must be positive".into(),
        });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Monthly rate cannot be negative".into(),
        });
    }

    if principal <= Decimal::ZERO {
        return Ok(Tenure::Months(0));
    }

    let linear = principal
        .checked_div(installment)
        .map(|n| n.ceil())
        .ok_or_else(|| {
            LoanError::FinancialImpossibility(format!(
                "{principal} in installments of {installment} exceeds decimal range"
            ))
        })?;
    if monthly_rate.is_zero() {
        return whole_months(linear);
    }

    let interest = monthly_interest(principal, monthly_rate)?;
    if installment <= interest {
        return Ok(Tenure::Never);
    }

    // Below the floor, ln(1 + r) keeps too few digits to invert; start from
    // the zero-rate horizon instead.
    let estimate = if monthly_rate < LN_RATE_FLOOR {
        linear
    } else {
        let numerator = -decimal_ln(Decimal::ONE - interest / installment)?;
        let denominator = decimal_ln(Decimal::ONE + monthly_rate)?;
        numerator
            .checked_div(denominator)
            .map(|n| n.ceil())
            .unwrap_or(linear)
    };

    let months = whole_months(estimate)?.months().unwrap_or(0);
    settle_payoff_month(principal, monthly_rate, installment, months).map(Tenure::Months)
}

/// Walk `months` to the first month whose balance is at or below zero, so
/// that the balance one month earlier is still positive.
fn settle_payoff_month(
    principal: Money,
    monthly_rate: Rate,
    installment: Money,
    mut months: u32,
) -> LoanResult<u32> {
    for _ in 0..MAX_SETTLE_STEPS {
        if months > 0
            && remaining_principal(principal, monthly_rate, installment, months - 1)?
                <= Decimal::ZERO
        {
            months -= 1;
        } else if remaining_principal(principal, monthly_rate, installment, months)?
            > Decimal::ZERO
        {
            months = months.checked_add(1).ok_or_else(|| {
                LoanError::FinancialImpossibility("tenure exceeds u32 months".into())
            })?;
        } else {
            return Ok(months);
        }
    }
    Err(LoanError::FinancialImpossibility(format!(
        "payoff month did not settle within {MAX_SETTLE_STEPS} steps of the estimate"
    )))
}

/// (1 + rate)^n - 1 by square-and-multiply on the excess over one, with
/// overflow checks. Tracking the excess keeps its digits when `rate` is tiny.
pub fn compound_growth(rate: Rate, n: u32) -> LoanResult<Decimal> {
    let step = |a: Decimal, b: Decimal| {
        a.checked_mul(b)
            .and_then(|ab| ab.checked_add(a))
            .and_then(|v| v.checked_add(b))
            .ok_or_else(|| overflow("compound growth", n))
    };

    let mut base = rate;
    let mut exp = n;
    let mut result = Decimal::ZERO;

    while exp > 0 {
        if exp & 1 == 1 {
            result = step(result, base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = step(base, base)?;
        }
    }

    Ok(result)
}

/// Natural logarithm in decimal precision.
///
/// Range-reduces into [0.5, 2] by powers of two, then evaluates
/// ln(v) = 2 atanh((v - 1) / (v + 1)).
pub fn decimal_ln(x: Decimal) -> LoanResult<Decimal> {
    if x <= Decimal::ZERO {
        return Err(LoanError::FinancialImpossibility(format!(
            "logarithm of non-positive value {x}"
        )));
    }

    let two = dec!(2);
    let half = dec!(0.5);
    let mut v = x;
    let mut k: i64 = 0;
    while v > two {
        v /= two;
        k += 1;
    }
    while v < half {
        v *= two;
        k -= 1;
    }

    let y = (v - Decimal::ONE) / (v + Decimal::ONE);
    Ok(two_atanh(y) + Decimal::from(k) * LN_2)
}

/// 2 * (y + y^3/3 + y^5/5 + ...), valid for |y| < 1.
fn two_atanh(y: Decimal) -> Decimal {
    let y2 = y * y;
    let mut term = y;
    let mut sum = y;
    for k in 1..=ATANH_MAX_TERMS {
        term *= y2;
        let step = term / Decimal::from(2 * k + 1);
        if step.abs() < ATANH_TERM_EPSILON {
            break;
        }
        sum += step;
    }
    sum * dec!(2)
}

fn whole_months(n: Decimal) -> LoanResult<Tenure> {
    n.to_u32().map(Tenure::Months).ok_or_else(|| {
        LoanError::FinancialImpossibility(format!("tenure of {n} months is out of range"))
    })
}

fn overflow(context: &str, months: u32) -> LoanError {
    LoanError::FinancialImpossibility(format!(
        "{context} over {months} months exceeds decimal range"
    ))
}
