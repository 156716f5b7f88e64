use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.00725 = 0.725% per month).
pub type Rate = Decimal;

/// Number of monthly payments needed to retire a balance.
///
/// `Never` is returned when the installment does not cover the interest
/// accruing on the balance, so the balance never reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tenure {
    Months(u32),
    Never,
}

impl Tenure {
    pub fn months(self) -> Option<u32> {
        match self {
            Tenure::Months(m) => Some(m),
            Tenure::Never => None,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Tenure::Months(_))
    }

    /// Shift by a fixed number of elapsed months. `Never` stays `Never`.
    pub fn offset_by(self, months: u32) -> Tenure {
        match self {
            Tenure::Months(m) => Tenure::Months(m.saturating_add(months)),
            Tenure::Never => Tenure::Never,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenure_offset_keeps_never() {
        assert_eq!(Tenure::Months(10).offset_by(5), Tenure::Months(15));
        assert_eq!(Tenure::Never.offset_by(5), Tenure::Never);
    }

    #[test]
    fn test_tenure_serializes_snake_case() {
        let json = serde_json::to_value(Tenure::Months(253)).unwrap();
        assert_eq!(json, serde_json::json!({ "months": 253 }));
        let json = serde_json::to_value(Tenure::Never).unwrap();
        assert_eq!(json, serde_json::json!("never"));
    }
}
