//! Budget-aware affordability assessment with an explainability trace.
//!
//! Risk is classified from two signals: the EMI-to-salary ratio and the share
//! of salary left after fixed expenses and the installment. Every assessment
//! carries the rules and thresholds that produced it.

pub mod classifier;
pub mod thresholds;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Money, Percent};
use crate::AffordResult;

pub use classifier::AffordabilityClassifier;
pub use thresholds::AffordabilityThresholds;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_salary: Money,
    pub installment: Money,
    #[serde(default)]
    pub monthly_expenses: Money,
}

/// Repayment risk, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Moderate,
    Risky,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Risky => "Risky",
        };
        f.write_str(label)
    }
}

/// Which signal determined the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisiveFactor {
    EmiRatio,
    Cashflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub gross_salary: Money,
    pub fixed_expenses: Money,
    pub installment: Money,
    pub disposable_income: Money,
    pub disposable_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationTrace {
    /// Fixed description of the policy, identical for every outcome.
    pub rules_applied: Vec<String>,
    pub thresholds: AffordabilityThresholds,
    pub income_breakdown: IncomeBreakdown,
    pub decisive_factor: DecisiveFactor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityAssessment {
    pub installment: Money,
    pub monthly_salary: Money,
    pub monthly_expenses: Money,
    pub emi_to_salary_ratio: Percent,
    /// Salary minus expenses minus installment; negative when over budget.
    pub disposable_income: Money,
    pub disposable_percent: Percent,
    pub risk_level: RiskLevel,
    pub verdict: String,
    pub explanation: ExplanationTrace,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Assess affordability against the default threshold table.
pub fn assess(
    monthly_salary: Money,
    installment: Money,
    monthly_expenses: Money,
) -> AffordResult<AffordabilityAssessment> {
    AffordabilityClassifier::default().assess(monthly_salary, installment, monthly_expenses)
}

/// [`assess`] over a deserialised input.
pub fn assess_affordability(input: &AffordabilityInput) -> AffordResult<AffordabilityAssessment> {
    assess(input.monthly_salary, input.installment, input.monthly_expenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Safe < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::Risky);
        assert_eq!(
            [RiskLevel::Risky, RiskLevel::Safe, RiskLevel::Moderate]
                .iter()
                .max(),
            Some(&RiskLevel::Risky)
        );
    }

    #[test]
    fn test_decisive_factor_serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&DecisiveFactor::EmiRatio).unwrap(),
            "\"emi_ratio\""
        );
        assert_eq!(
            serde_json::to_string(&DecisiveFactor::Cashflow).unwrap(),
            "\"cashflow\""
        );
    }

    #[test]
    fn test_expenses_default_to_zero() {
        let input: AffordabilityInput =
            serde_json::from_str(r#"{"monthly_salary": "50000", "installment": "10000"}"#)
                .unwrap();
        let result = assess_affordability(&input).unwrap();
        assert_eq!(result.monthly_expenses, dec!(0));
        assert_eq!(result.risk_level, RiskLevel::Safe);
    }
}
