use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{
    AffordabilityAssessment, AffordabilityThresholds, DecisiveFactor, ExplanationTrace,
    IncomeBreakdown, RiskLevel,
};
use crate::error::AffordError;
use crate::types::{round2, Money, Percent};
use crate::AffordResult;

const SAFE_VERDICT: &str = "Your EMI is well within the recommended limit and you retain healthy \
     disposable income after all expenses.";
const MODERATE_VERDICT: &str = "Your EMI is approaching the upper limit. After expenses, your remaining \
     cashflow is tight. Consider building an emergency fund first.";
const NOT_AFFORDABLE_VERDICT: &str = "After expenses and EMI, you would have negative or zero disposable \
     income. This loan is not affordable at current income/expense levels.";
const OVER_THRESHOLD_VERDICT: &str = "Your EMI exceeds the safe threshold and/or leaves very little \
     disposable income. This could strain your monthly budget significantly.";

/// One row of the classification table. `None` bounds always match.
#[derive(Debug, Clone, Copy)]
struct RiskBand {
    level: RiskLevel,
    max_ratio: Option<Percent>,
    min_disposable_percent: Option<Percent>,
}

impl RiskBand {
    fn matches(&self, emi_ratio: Percent, disposable_percent: Percent) -> bool {
        self.max_ratio.map_or(true, |max| emi_ratio <= max)
            && self
                .min_disposable_percent
                .map_or(true, |min| disposable_percent >= min)
    }
}

/// Classifies repayment risk against a fixed threshold table captured at
/// construction. Bands are evaluated top-down; the first match wins.
#[derive(Debug, Clone)]
pub struct AffordabilityClassifier {
    thresholds: AffordabilityThresholds,
    bands: [RiskBand; 3],
}

impl Default for AffordabilityClassifier {
    fn default() -> Self {
        Self::from_valid(AffordabilityThresholds::default())
    }
}

impl AffordabilityClassifier {
    pub fn new(thresholds: AffordabilityThresholds) -> AffordResult<Self> {
        thresholds.validate()?;
        Ok(Self::from_valid(thresholds))
    }

    fn from_valid(thresholds: AffordabilityThresholds) -> Self {
        let bands = [
            RiskBand {
                level: RiskLevel::Safe,
                max_ratio: Some(thresholds.safe_max_ratio),
                min_disposable_percent: Some(thresholds.min_disposable_percent),
            },
            RiskBand {
                level: RiskLevel::Moderate,
                max_ratio: Some(thresholds.moderate_max_ratio),
                min_disposable_percent: Some(thresholds.moderate_min_disposable_percent),
            },
            RiskBand {
                level: RiskLevel::Risky,
                max_ratio: None,
                min_disposable_percent: None,
            },
        ];
        AffordabilityClassifier { thresholds, bands }
    }

    pub fn thresholds(&self) -> &AffordabilityThresholds {
        &self.thresholds
    }

    pub fn assess(
        &self,
        monthly_salary: Money,
        installment: Money,
        monthly_expenses: Money,
    ) -> AffordResult<AffordabilityAssessment> {
        validate_inputs(monthly_salary, installment, monthly_expenses)?;

        let emi_ratio = percent_of_salary(installment, monthly_salary, "installment")?;
        let disposable_income = monthly_salary
            .checked_sub(monthly_expenses)
            .and_then(|rest| rest.checked_sub(installment))
            .ok_or_else(|| out_of_range("monthly_expenses"))?;
        let disposable_percent =
            percent_of_salary(disposable_income, monthly_salary, "monthly_salary")?;

        let risk_level = self.classify(emi_ratio, disposable_percent);
        let decisive_factor = self.decisive_factor(emi_ratio, disposable_percent);

        let explanation = ExplanationTrace {
            rules_applied: self.thresholds.rule_descriptions(),
            thresholds: self.thresholds,
            income_breakdown: IncomeBreakdown {
                gross_salary: round2(monthly_salary),
                fixed_expenses: round2(monthly_expenses),
                installment: round2(installment),
                disposable_income: round2(disposable_income),
                disposable_percent: round2(disposable_percent),
            },
            decisive_factor,
        };

        Ok(AffordabilityAssessment {
            installment: round2(installment),
            monthly_salary: round2(monthly_salary),
            monthly_expenses: round2(monthly_expenses),
            emi_to_salary_ratio: round2(emi_ratio),
            disposable_income: round2(disposable_income),
            disposable_percent: round2(disposable_percent),
            risk_level,
            verdict: verdict(risk_level, disposable_income).to_string(),
            explanation,
        })
    }

    fn classify(&self, emi_ratio: Percent, disposable_percent: Percent) -> RiskLevel {
        self.bands
            .iter()
            .find(|band| band.matches(emi_ratio, disposable_percent))
            .map(|band| band.level)
            .unwrap_or(RiskLevel::Risky)
    }

    /// Cashflow decides when the ratio alone stays within the moderate
    /// ceiling but disposable income falls below the safe floor.
    fn decisive_factor(&self, emi_ratio: Percent, disposable_percent: Percent) -> DecisiveFactor {
        if emi_ratio <= self.thresholds.moderate_max_ratio
            && disposable_percent < self.thresholds.min_disposable_percent
        {
            DecisiveFactor::Cashflow
        } else {
            DecisiveFactor::EmiRatio
        }
    }
}

pub(crate) fn validate_inputs(
    salary: Money,
    installment: Money,
    expenses: Money,
) -> AffordResult<()> {
    if salary <= Decimal::ZERO {
        return Err(AffordError::invalid(
            "monthly_salary",
            "Monthly salary must be positive.",
        ));
    }
    if installment < Decimal::ZERO {
        return Err(AffordError::invalid("installment", "EMI cannot be negative."));
    }
    if expenses < Decimal::ZERO {
        return Err(AffordError::invalid(
            "monthly_expenses",
            "Monthly expenses cannot be negative.",
        ));
    }
    Ok(())
}

/// `amount` as a percentage of `salary`, unrounded.
fn percent_of_salary(amount: Money, salary: Money, field: &str) -> AffordResult<Percent> {
    amount
        .checked_div(salary)
        .and_then(|share| share.checked_mul(dec!(100)))
        .ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> AffordError {
    AffordError::invalid(
        field,
        "Salary, expenses and EMI combination exceeds the supported numeric range.",
    )
}

fn verdict(level: RiskLevel, disposable_income: Money) -> &'static str {
    match level {
        RiskLevel::Safe => SAFE_VERDICT,
        RiskLevel::Moderate => MODERATE_VERDICT,
        RiskLevel::Risky if disposable_income <= Decimal::ZERO => NOT_AFFORDABLE_VERDICT,
        RiskLevel::Risky => OVER_THRESHOLD_VERDICT,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn classifier() -> AffordabilityClassifier {
        AffordabilityClassifier::default()
    }

    #[test]
    fn test_ratio_boundary_is_inclusive() {
        let result = classifier()
            .assess(dec!(100_000), dec!(30_000), Decimal::ZERO)
            .unwrap();
        assert_eq!(result.emi_to_salary_ratio, dec!(30));
        assert_eq!(result.disposable_percent, dec!(70));
        assert_eq!(result.risk_level, RiskLevel::Safe);
        assert_eq!(result.explanation.decisive_factor, DecisiveFactor::EmiRatio);
    }

    #[test]
    fn test_ratio_just_above_safe_ceiling_is_moderate() {
        // Disposable stays at ~70%, but Safe needs both legs of the rule.
        let result = classifier()
            .assess(dec!(100_000), dec!(30_001), Decimal::ZERO)
            .unwrap();
        assert_eq!(result.emi_to_salary_ratio, dec!(30.00));
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.verdict, MODERATE_VERDICT);
    }

    #[test]
    fn test_moderate_ceiling_is_inclusive() {
        let result = classifier()
            .assess(dec!(100_000), dec!(40_000), dec!(10_000))
            .unwrap();
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.disposable_income, dec!(50_000));
    }

    #[test]
    fn test_low_ratio_tight_cashflow_is_moderate_by_cashflow() {
        // ratio 25%, disposable 10% => fails Safe floor, meets Moderate floor
        let result = classifier()
            .assess(dec!(100_000), dec!(25_000), dec!(65_000))
            .unwrap();
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.disposable_percent, dec!(10));
        assert_eq!(result.explanation.decisive_factor, DecisiveFactor::Cashflow);
    }

    #[test]
    fn test_low_ratio_thin_cashflow_is_risky() {
        // ratio 20%, disposable 5%
        let result = classifier()
            .assess(dec!(100_000), dec!(20_000), dec!(75_000))
            .unwrap();
        assert_eq!(result.risk_level, RiskLevel::Risky);
        assert_eq!(result.verdict, OVER_THRESHOLD_VERDICT);
        assert_eq!(result.explanation.decisive_factor, DecisiveFactor::Cashflow);
    }

    #[test]
    fn test_negative_disposable_not_affordable() {
        let result = classifier()
            .assess(dec!(50_000), dec!(20_000), dec!(40_000))
            .unwrap();
        assert_eq!(result.risk_level, RiskLevel::Risky);
        assert_eq!(result.disposable_income, dec!(-10_000));
        assert_eq!(result.disposable_percent, dec!(-20));
        assert_eq!(result.verdict, NOT_AFFORDABLE_VERDICT);
        assert_eq!(result.explanation.decisive_factor, DecisiveFactor::Cashflow);
    }

    #[test]
    fn test_zero_disposable_not_affordable() {
        let result = classifier()
            .assess(dec!(50_000), dec!(10_000), dec!(40_000))
            .unwrap();
        assert_eq!(result.risk_level, RiskLevel::Risky);
        assert_eq!(result.verdict, NOT_AFFORDABLE_VERDICT);
    }

    #[test]
    fn test_high_ratio_is_risky_by_emi_ratio() {
        let result = classifier()
            .assess(dec!(50_000), dec!(25_000), Decimal::ZERO)
            .unwrap();
        assert_eq!(result.emi_to_salary_ratio, dec!(50));
        assert_eq!(result.risk_level, RiskLevel::Risky);
        assert_eq!(result.verdict, OVER_THRESHOLD_VERDICT);
        assert_eq!(result.explanation.decisive_factor, DecisiveFactor::EmiRatio);
    }

    #[test]
    fn test_reference_installment_is_risky() {
        let result = classifier()
            .assess(dec!(50_000), dec!(21742.42), dec!(15_000))
            .unwrap();
        assert_eq!(result.emi_to_salary_ratio, dec!(43.48));
        assert_eq!(result.disposable_income, dec!(13257.58));
        assert_eq!(result.risk_level, RiskLevel::Risky);
        assert_eq!(result.explanation.decisive_factor, DecisiveFactor::EmiRatio);
    }

    #[test]
    fn test_zero_installment_allowed() {
        let result = classifier()
            .assess(dec!(40_000), Decimal::ZERO, dec!(10_000))
            .unwrap();
        assert_eq!(result.emi_to_salary_ratio, Decimal::ZERO);
        assert_eq!(result.risk_level, RiskLevel::Safe);
    }

    #[test]
    fn test_rules_are_identical_for_every_outcome() {
        let c = classifier();
        let safe = c.assess(dec!(100_000), dec!(10_000), Decimal::ZERO).unwrap();
        let risky = c.assess(dec!(100_000), dec!(90_000), Decimal::ZERO).unwrap();
        assert_eq!(safe.explanation.rules_applied.len(), 4);
        assert_eq!(
            safe.explanation.rules_applied,
            risky.explanation.rules_applied
        );
    }

    #[test]
    fn test_income_breakdown() {
        let result = classifier()
            .assess(dec!(80_000), dec!(16_000), dec!(24_000))
            .unwrap();
        assert_eq!(
            result.explanation.income_breakdown,
            IncomeBreakdown {
                gross_salary: dec!(80_000),
                fixed_expenses: dec!(24_000),
                installment: dec!(16_000),
                disposable_income: dec!(40_000),
                disposable_percent: dec!(50),
            }
        );
        assert_eq!(result.explanation.thresholds, AffordabilityThresholds::default());
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = AffordabilityClassifier::new(AffordabilityThresholds {
            safe_max_ratio: dec!(20),
            moderate_max_ratio: dec!(30),
            min_disposable_percent: dec!(30),
            moderate_min_disposable_percent: dec!(15),
        })
        .unwrap();
        let result = strict.assess(dec!(100_000), dec!(25_000), Decimal::ZERO).unwrap();
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.explanation.rules_applied[0], "EMI <= 20% of salary -> Safe");
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let err = AffordabilityClassifier::new(AffordabilityThresholds {
            safe_max_ratio: dec!(50),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.field(), "safe_max_ratio");
    }

    #[test]
    fn test_non_positive_salary_rejected() {
        for salary in [Decimal::ZERO, dec!(-100)] {
            let err = classifier().assess(salary, dec!(100), Decimal::ZERO).unwrap_err();
            assert_eq!(err.field(), "monthly_salary");
        }
    }

    #[test]
    fn test_negative_installment_rejected() {
        let err = classifier()
            .assess(dec!(50_000), dec!(-1), Decimal::ZERO)
            .unwrap_err();
        assert_eq!(err.field(), "installment");
    }

    #[test]
    fn test_negative_expenses_rejected() {
        let err = classifier()
            .assess(dec!(50_000), dec!(1_000), dec!(-1))
            .unwrap_err();
        assert_eq!(err.field(), "monthly_expenses");
    }

    #[test]
    fn test_ratio_overflow_is_invalid_input() {
        let err = classifier()
            .assess(dec!(0.0000000000000000000000000001), dec!(1_000_000), Decimal::ZERO)
            .unwrap_err();
        assert_eq!(err.field(), "installment");
        assert!(err.to_string().contains("exceeds the supported numeric range"));
    }

    #[test]
    fn test_extreme_amounts_are_invalid_input() {
        let err = classifier()
            .assess(Decimal::ONE, Decimal::MAX, Decimal::MAX)
            .unwrap_err();
        assert_eq!(err.field(), "installment");
    }

    #[test]
    fn test_disposable_underflow_is_invalid_input() {
        // ratio fits, but 1 - MAX - MAX / 10_000 does not
        let err = classifier()
            .assess(Decimal::ONE, Decimal::MAX / dec!(10_000), Decimal::MAX)
            .unwrap_err();
        assert_eq!(err.field(), "monthly_expenses");
    }
}
