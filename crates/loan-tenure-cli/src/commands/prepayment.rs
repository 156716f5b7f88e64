use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_tenure_core::amortization::prepayment::{
    self, LoanOutcomeInput, LoanTerms, Prepayment,
};
use loan_tenure_core::LoanMonth;

use crate::input;

/// Arguments for the prepayment outcome calculation
#[derive(Args)]
pub struct PrepaymentArgs {
    /// Loan amount originally borrowed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 8.7 for 8.7%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Fixed monthly installment (EMI)
    #[arg(long, alias = "emi")]
    pub installment: Option<Decimal>,

    /// Loan start month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub start_month: Option<u32>,

    /// Loan start year (e.g. 2023)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Original tenure in years
    #[arg(long)]
    pub tenure_years: Option<u32>,

    /// Lump-sum prepayment amount
    #[arg(long, default_value = "0")]
    pub prepayment_amount: Decimal,

    /// Month the prepayment is made (1-12); defaults to the start month when no prepayment
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub prepayment_month: Option<u32>,

    /// Year the prepayment is made; defaults to the start year when no prepayment
    #[arg(long)]
    pub prepayment_year: Option<i32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_prepayment(args: PrepaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanOutcomeInput = match input::read_document(args.input.as_deref())? {
        Some(doc) => doc,
        None => input_from_flags(&args)?,
    };
    let result = prepayment::analyze_loan_outcome(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

fn input_from_flags(args: &PrepaymentArgs) -> Result<LoanOutcomeInput, Box<dyn std::error::Error>> {
    let start = LoanMonth::new(
        args.start_year
            .ok_or("--start-year is required (or provide --input)")?,
        args.start_month
            .ok_or("--start-month is required (or provide --input)")?,
    )?;

    let date = match (args.prepayment_year, args.prepayment_month) {
        (Some(year), Some(month)) => LoanMonth::new(year, month)?,
        (None, None) if args.prepayment_amount.is_zero() => start,
        _ => {
            return Err(
                "--prepayment-month and --prepayment-year are required with a prepayment".into(),
            )
        }
    };

    Ok(LoanOutcomeInput {
        terms: LoanTerms {
            principal: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            installment: args
                .installment
                .ok_or("--installment is required (or provide --input)")?,
            start,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
        },
        prepayment: Prepayment {
            amount: args.prepayment_amount,
            date,
        },
    })
}
