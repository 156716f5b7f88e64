pub mod calendar;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

pub use calendar::LoanMonth;
pub use error::LoanError;
pub use types::*;

/// Standard result type for all loan-tenure operations
pub type LoanResult<T> = Result<T, LoanError>;
