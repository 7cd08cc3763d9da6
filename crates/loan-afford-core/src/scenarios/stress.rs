use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::affordability::classifier::validate_inputs;
use crate::affordability::{AffordabilityAssessment, AffordabilityClassifier};
use crate::amortization::compute_installment;
use crate::error::AffordError;
use crate::types::{Money, Percent};
use crate::AffordResult;

/// Additive rate shocks applied when the caller supplies none (+1% and +2%).
pub const DEFAULT_RATE_SHOCKS: [Percent; 2] = [dec!(1.0), dec!(2.0)];

pub(crate) fn default_shocks() -> Vec<Percent> {
    DEFAULT_RATE_SHOCKS.to_vec()
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_years: u32,
    pub monthly_salary: Money,
    #[serde(default)]
    pub monthly_expenses: Money,
    /// Percentage-point shocks added to the baseline rate. Negative values
    /// model rate relief.
    #[serde(default = "default_shocks")]
    pub rate_shocks: Vec<Percent>,
}

impl StressInput {
    /// Input over the default +1% and +2% shocks.
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        tenure_years: u32,
        monthly_salary: Money,
        monthly_expenses: Money,
    ) -> Self {
        StressInput {
            principal,
            annual_rate_percent,
            tenure_years,
            monthly_salary,
            monthly_expenses,
            rate_shocks: default_shocks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockResult {
    pub shock_percent: Percent,
    pub original_rate: Percent,
    pub shocked_rate: Percent,
    pub original_installment: Money,
    pub shocked_installment: Money,
    /// Shocked minus original installment; negative under rate relief.
    pub installment_increase: Money,
    /// Assessment at the shocked installment.
    pub affordability: AffordabilityAssessment,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Stress test using the default threshold table.
pub fn stress_test(input: &StressInput) -> AffordResult<Vec<ShockResult>> {
    stress_test_with(&AffordabilityClassifier::default(), input)
}

/// Re-price the loan under each rate shock and re-assess affordability.
/// Every shock is validated before any result is produced.
pub fn stress_test_with(
    classifier: &AffordabilityClassifier,
    input: &StressInput,
) -> AffordResult<Vec<ShockResult>> {
    let baseline = compute_installment(
        input.principal,
        input.annual_rate_percent,
        input.tenure_years,
    )?;
    validate_inputs(
        input.monthly_salary,
        baseline.installment,
        input.monthly_expenses,
    )?;
    validate_shocks(input.annual_rate_percent, &input.rate_shocks)?;

    input
        .rate_shocks
        .iter()
        .enumerate()
        .map(|(i, &shock)| {
            let shocked_rate = apply_shock(input.annual_rate_percent, shock, i)?;
            let shocked = compute_installment(input.principal, shocked_rate, input.tenure_years)?;
            let affordability = classifier.assess(
                input.monthly_salary,
                shocked.installment,
                input.monthly_expenses,
            )?;
            let installment_increase = shocked.installment - baseline.installment;

            debug!(
                shock_percent = %shock,
                shocked_rate = %shocked_rate,
                installment_increase = %installment_increase,
                risk_level = %affordability.risk_level,
                "rate shock applied"
            );

            Ok(ShockResult {
                shock_percent: shock,
                original_rate: input.annual_rate_percent,
                shocked_rate,
                original_installment: baseline.installment,
                shocked_installment: shocked.installment,
                installment_increase,
                affordability,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn apply_shock(annual_rate_percent: Percent, shock: Percent, i: usize) -> AffordResult<Percent> {
    annual_rate_percent.checked_add(shock).ok_or_else(|| {
        AffordError::invalid(
            format!("rate_shocks[{i}]"),
            format!("A shock of {shock}% exceeds the supported numeric range."),
        )
    })
}

fn validate_shocks(annual_rate_percent: Percent, shocks: &[Percent]) -> AffordResult<()> {
    for (i, &shock) in shocks.iter().enumerate() {
        if apply_shock(annual_rate_percent, shock, i)? < Decimal::ZERO {
            return Err(AffordError::invalid(
                format!("rate_shocks[{i}]"),
                format!(
                    "A shock of {shock}% drives the {annual_rate_percent}% rate below zero."
                ),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affordability::RiskLevel;
    use rust_decimal_macros::dec;

    fn reference_input() -> StressInput {
        StressInput::new(dec!(1_000_000), dec!(11), 5, dec!(50_000), dec!(15_000))
    }

    #[test]
    fn test_default_shocks() {
        let results = stress_test(&reference_input()).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].shock_percent, dec!(1));
        assert_eq!(results[0].shocked_rate, dec!(12));
        assert_eq!(results[0].original_installment, dec!(21742.42));
        assert_eq!(results[0].shocked_installment, dec!(22244.45));
        assert_eq!(results[0].installment_increase, dec!(502.03));

        assert_eq!(results[1].shocked_rate, dec!(13));
        assert_eq!(results[1].shocked_installment, dec!(22753.07));
        assert_eq!(results[1].installment_increase, dec!(1010.65));
        assert_eq!(results[1].affordability.risk_level, RiskLevel::Risky);
    }

    #[test]
    fn test_zero_shock_has_no_increase() {
        let mut input = reference_input();
        input.rate_shocks = vec![Decimal::ZERO];
        let results = stress_test(&input).unwrap();
        assert_eq!(results[0].installment_increase, Decimal::ZERO);
        assert_eq!(results[0].shocked_installment, results[0].original_installment);
    }

    #[test]
    fn test_relief_down_to_zero_rate() {
        let mut input = reference_input();
        input.rate_shocks = vec![dec!(-11)];
        let results = stress_test(&input).unwrap();
        assert_eq!(results[0].shocked_rate, Decimal::ZERO);
        // 1M / 60 months
        assert_eq!(results[0].shocked_installment, dec!(16666.67));
        assert!(results[0].installment_increase < Decimal::ZERO);
    }

    #[test]
    fn test_shock_below_zero_rate_rejected() {
        let mut input = reference_input();
        input.rate_shocks = vec![dec!(1), dec!(-11.5)];
        let err = stress_test(&input).unwrap_err();
        assert_eq!(err.field(), "rate_shocks[1]");
    }

    #[test]
    fn test_shock_can_change_risk_level() {
        // Baseline 7y at 11% is Moderate for this borrower (34.24%)
        let input = StressInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(11),
            tenure_years: 7,
            monthly_salary: dec!(50_000),
            monthly_expenses: dec!(15_000),
            rate_shocks: vec![dec!(0), dec!(8)],
        };
        let results = stress_test(&input).unwrap();
        assert_eq!(results[0].affordability.risk_level, RiskLevel::Moderate);
        assert_eq!(results[1].affordability.risk_level, RiskLevel::Risky);
    }

    #[test]
    fn test_overflowing_shock_rejected() {
        let mut input = reference_input();
        input.rate_shocks = vec![dec!(1), Decimal::MAX];
        let err = stress_test(&input).unwrap_err();
        assert_eq!(err.field(), "rate_shocks[1]");
        assert!(err.to_string().contains("exceeds the supported numeric range"));
    }

    #[test]
    fn test_huge_shock_within_range_rejected_by_pricing() {
        let mut input = reference_input();
        input.rate_shocks = vec![dec!(1_000_000_000)];
        let err = stress_test(&input).unwrap_err();
        assert_eq!(err.field(), "annual_rate_percent");
    }

    #[test]
    fn test_ascending_shocks_non_decreasing_installments() {
        let mut input = reference_input();
        input.rate_shocks = vec![dec!(-2), dec!(-0.5), dec!(0), dec!(0.25), dec!(3)];
        let results = stress_test(&input).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].shocked_installment <= pair[1].shocked_installment);
        }
    }

    #[test]
    fn test_empty_shock_list() {
        let mut input = reference_input();
        input.rate_shocks.clear();
        assert!(stress_test(&input).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_salary_rejected_even_without_shocks() {
        let mut input = reference_input();
        input.monthly_salary = Decimal::ZERO;
        input.rate_shocks.clear();
        let err = stress_test(&input).unwrap_err();
        assert_eq!(err.field(), "monthly_salary");
    }

    #[test]
    fn test_invalid_baseline_rejected() {
        let mut input = reference_input();
        input.principal = Decimal::ZERO;
        let err = stress_test(&input).unwrap_err();
        assert_eq!(err.field(), "principal");
    }
}
