//! Calendar-month arithmetic for monthly amortizing loans.
//!
//! Loans in this crate are always dated to the 1st of a month, so a
//! `LoanMonth` carries only the year and month. Month addition is plain
//! integer arithmetic with carry into the year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LoanError;
use crate::LoanResult;

/// A calendar month (the day is implicitly the 1st).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoanMonth {
    pub year: i32,
    /// 1 = January, 12 = December.
    pub month: u32,
}

impl LoanMonth {
    /// Build a validated month.
    pub fn new(year: i32, month: u32) -> LoanResult<Self> {
        let m = LoanMonth { year, month };
        m.validate()?;
        Ok(m)
    }

    pub fn validate(self) -> LoanResult<()> {
        self.to_date().map(|_| ())
    }

    /// First day of the month as a chrono date.
    pub fn to_date(self) -> LoanResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| {
            LoanError::DateError(format!(
                "{:04}-{:02} is not a valid year/month",
                self.year, self.month
            ))
        })
    }

    /// Long-form label, e.g. "July 2023".
    pub fn label(self) -> String {
        match self.to_date() {
            Ok(d) => d.format("%B %Y").to_string(),
            Err(_) => format!("{:04}-{:02}", self.year, self.month),
        }
    }

    /// Advance by `n` months:
    /// month = ((month - 1 + n) mod 12) + 1, year += (month - 1 + n) div 12.
    pub fn add_months(self, n: u32) -> LoanMonth {
        let total = i64::from(self.month) - 1 + i64::from(n);
        LoanMonth {
            year: self.year + (total / 12) as i32,
            month: (total % 12) as u32 + 1,
        }
    }
}

impl From<NaiveDate> for LoanMonth {
    fn from(d: NaiveDate) -> Self {
        LoanMonth {
            year: d.year(),
            month: d.month(),
        }
    }
}

impl fmt::Display for LoanMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Whole months from `start` to `target`, using only year and month.
///
/// Negative when `target` precedes `start`; callers decide whether that is
/// acceptable.
pub fn compute_elapsed_months(start: LoanMonth, target: LoanMonth) -> i64 {
    (i64::from(target.year) - i64::from(start.year)) * 12
        + (i64::from(target.month) - i64::from(start.month))
}
