use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_afford_core::affordability::AffordabilityClassifier;
use loan_afford_core::scenarios::{self, ScenarioInput, DEFAULT_TENURES_YEARS};

use super::required;
use crate::input;

/// Arguments for tenure comparison
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "annual-rate-percent")]
    pub rate: Option<Decimal>,

    /// Gross monthly salary
    #[arg(long, alias = "monthly-salary")]
    pub salary: Option<Decimal>,

    /// Fixed monthly expenses
    #[arg(long, alias = "monthly-expenses", default_value = "0")]
    pub expenses: Decimal,

    /// Comma-separated tenure options in years (default 3,5,7)
    #[arg(long, value_delimiter = ',')]
    pub tenures: Vec<u32>,
}

pub fn run_scenarios(
    args: ScenariosArgs,
    classifier: &AffordabilityClassifier,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario_input: ScenarioInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => scenario_input_from_flags(args)?,
    };

    let result = scenarios::compare_scenarios_with(classifier, &scenario_input)?;
    Ok(serde_json::to_value(result)?)
}

fn scenario_input_from_flags(
    args: ScenariosArgs,
) -> Result<ScenarioInput, Box<dyn std::error::Error>> {
    Ok(ScenarioInput {
        principal: required(args.principal, "principal")?,
        annual_rate_percent: required(args.rate, "rate")?,
        monthly_salary: required(args.salary, "salary")?,
        monthly_expenses: args.expenses,
        tenure_years: if args.tenures.is_empty() {
            DEFAULT_TENURES_YEARS.to_vec()
        } else {
            args.tenures
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ScenariosArgs,
    }

    fn parse(argv: &[&str]) -> ScenariosArgs {
        Harness::try_parse_from(std::iter::once("scenarios").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_tenure_list_kept_in_order() {
        let input = scenario_input_from_flags(parse(&[
            "--principal", "1000000", "--rate", "11", "--salary", "50000", "--tenures", "10,3,5",
        ]))
        .unwrap();
        assert_eq!(input.tenure_years, vec![10, 3, 5]);
    }

    #[test]
    fn test_default_tenures_when_flag_omitted() {
        let input = scenario_input_from_flags(parse(&[
            "--principal", "1000000", "--rate", "11", "--salary", "50000",
        ]))
        .unwrap();
        assert_eq!(input.tenure_years, DEFAULT_TENURES_YEARS.to_vec());
    }
}
