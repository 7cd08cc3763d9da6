use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_afford_core::affordability::AffordabilityClassifier;
use loan_afford_core::scenarios::{self, StressInput, DEFAULT_RATE_SHOCKS};

use super::required;
use crate::input;

/// Arguments for rate-shock stress testing
#[derive(Args)]
pub struct StressArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Baseline annual interest rate in percent
    #[arg(long, alias = "annual-rate-percent")]
    pub rate: Option<Decimal>,

    /// Tenure in whole years
    #[arg(long, alias = "tenure-years")]
    pub years: Option<u32>,

    /// Gross monthly salary
    #[arg(long, alias = "monthly-salary")]
    pub salary: Option<Decimal>,

    /// Fixed monthly expenses
    #[arg(long, alias = "monthly-expenses", default_value = "0")]
    pub expenses: Decimal,

    /// Comma-separated rate shocks in percentage points (default 1,2)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub shocks: Vec<Decimal>,
}

pub fn run_stress(
    args: StressArgs,
    classifier: &AffordabilityClassifier,
) -> Result<Value, Box<dyn std::error::Error>> {
    let stress_input: StressInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => stress_input_from_flags(args)?,
    };

    let result = scenarios::stress_test_with(classifier, &stress_input)?;
    Ok(serde_json::to_value(result)?)
}

fn stress_input_from_flags(args: StressArgs) -> Result<StressInput, Box<dyn std::error::Error>> {
    Ok(StressInput {
        principal: required(args.principal, "principal")?,
        annual_rate_percent: required(args.rate, "rate")?,
        tenure_years: required(args.years, "years")?,
        monthly_salary: required(args.salary, "salary")?,
        monthly_expenses: args.expenses,
        rate_shocks: if args.shocks.is_empty() {
            DEFAULT_RATE_SHOCKS.to_vec()
        } else {
            args.shocks
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: StressArgs,
    }

    fn parse(argv: &[&str]) -> StressArgs {
        Harness::try_parse_from(std::iter::once("stress").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_flags_match_json_input() {
        let from_flags = stress_input_from_flags(parse(&[
            "--principal", "1000000", "--rate", "11", "--years", "5",
            "--salary", "50000", "--expenses", "15000", "--shocks", "-1,2",
        ]))
        .unwrap();
        let from_json: StressInput = serde_json::from_value(serde_json::json!({
            "principal": "1000000",
            "annual_rate_percent": "11",
            "tenure_years": 5,
            "monthly_salary": "50000",
            "monthly_expenses": "15000",
            "rate_shocks": ["-1", "2"]
        }))
        .unwrap();
        assert_eq!(from_flags.rate_shocks, vec![dec!(-1), dec!(2)]);
        assert_eq!(
            serde_json::to_value(&from_flags).unwrap(),
            serde_json::to_value(&from_json).unwrap()
        );
    }

    #[test]
    fn test_default_shocks_and_expenses() {
        let input = stress_input_from_flags(parse(&[
            "--principal", "500000", "--rate", "9", "--years", "3", "--salary", "60000",
        ]))
        .unwrap();
        assert_eq!(input.rate_shocks, DEFAULT_RATE_SHOCKS.to_vec());
        assert_eq!(input.monthly_expenses, Decimal::ZERO);
    }

    #[test]
    fn test_missing_salary_flag_named() {
        let err = stress_input_from_flags(parse(&[
            "--principal", "500000", "--rate", "9", "--years", "3",
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "--salary is required (or provide --input)");
    }
}
