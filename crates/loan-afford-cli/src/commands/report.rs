use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_afford_core::affordability::AffordabilityClassifier;
use loan_afford_core::report::{self, AffordabilityRequest};
use loan_afford_core::scenarios::{DEFAULT_RATE_SHOCKS, DEFAULT_TENURES_YEARS};

use super::required;
use crate::input;

/// Arguments for the full affordability report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly salary
    #[arg(long, alias = "monthly-salary")]
    pub salary: Option<Decimal>,

    /// Fixed monthly expenses
    #[arg(long, alias = "monthly-expenses", default_value = "0")]
    pub expenses: Decimal,

    /// Requested loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "annual-rate-percent")]
    pub rate: Option<Decimal>,

    /// Requested tenure in whole years
    #[arg(long, alias = "tenure-years")]
    pub years: Option<u32>,

    /// Skip the rate-shock stress test
    #[arg(long)]
    pub no_stress: bool,

    /// Comma-separated tenure options to compare (default 3,5,7)
    #[arg(long, value_delimiter = ',')]
    pub tenures: Vec<u32>,

    /// Comma-separated rate shocks in percentage points (default 1,2)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub shocks: Vec<Decimal>,
}

pub fn run_report(
    args: ReportArgs,
    classifier: &AffordabilityClassifier,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AffordabilityRequest = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => request_from_flags(args)?,
    };

    let result = report::analyze_affordability_with(classifier, &request)?;
    Ok(serde_json::to_value(result)?)
}

fn request_from_flags(args: ReportArgs) -> Result<AffordabilityRequest, Box<dyn std::error::Error>> {
    Ok(AffordabilityRequest {
        monthly_salary: required(args.salary, "salary")?,
        monthly_expenses: args.expenses,
        principal: required(args.principal, "principal")?,
        annual_rate_percent: required(args.rate, "rate")?,
        tenure_years: required(args.years, "years")?,
        run_stress_test: !args.no_stress,
        scenario_tenures: if args.tenures.is_empty() {
            DEFAULT_TENURES_YEARS.to_vec()
        } else {
            args.tenures
        },
        rate_shocks: if args.shocks.is_empty() {
            DEFAULT_RATE_SHOCKS.to_vec()
        } else {
            args.shocks
        },
    })
}
