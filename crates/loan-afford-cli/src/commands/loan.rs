use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_afford_core::affordability::{AffordabilityClassifier, AffordabilityInput};
use loan_afford_core::amortization::{self, InstallmentInput};

use super::required;
use crate::input;

/// Arguments for installment calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 11 for 11%)
    #[arg(long, alias = "annual-rate-percent")]
    pub rate: Option<Decimal>,

    /// Tenure in whole years
    #[arg(long, alias = "tenure-years")]
    pub years: Option<u32>,
}

/// Arguments for affordability classification
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly salary
    #[arg(long, alias = "monthly-salary")]
    pub salary: Option<Decimal>,

    /// Monthly installment to assess
    #[arg(long, alias = "emi")]
    pub installment: Option<Decimal>,

    /// Fixed monthly expenses
    #[arg(long, alias = "monthly-expenses", default_value = "0")]
    pub expenses: Decimal,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: InstallmentInput = match input::load(args.input.as_deref())? {
        Some(loan) => loan,
        None => installment_input_from_flags(args)?,
    };

    let result = amortization::calculate_installment(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_affordability(
    args: AffordabilityArgs,
    classifier: &AffordabilityClassifier,
) -> Result<Value, Box<dyn std::error::Error>> {
    let budget: AffordabilityInput = match input::load(args.input.as_deref())? {
        Some(budget) => budget,
        None => AffordabilityInput {
            monthly_salary: required(args.salary, "salary")?,
            installment: required(args.installment, "installment")?,
            monthly_expenses: args.expenses,
        },
    };

    let result = classifier.assess(
        budget.monthly_salary,
        budget.installment,
        budget.monthly_expenses,
    )?;
    Ok(serde_json::to_value(result)?)
}

fn installment_input_from_flags(
    args: EmiArgs,
) -> Result<InstallmentInput, Box<dyn std::error::Error>> {
    Ok(InstallmentInput {
        principal: required(args.principal, "principal")?,
        annual_rate_percent: required(args.rate, "rate")?,
        tenure_years: required(args.years, "years")?,
    })
}
