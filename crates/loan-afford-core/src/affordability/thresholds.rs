use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AffordError;
use crate::types::Percent;
use crate::AffordResult;

/// Decision thresholds for the affordability rules, all in percent of gross
/// monthly salary. Reported verbatim in every explanation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordabilityThresholds {
    /// Highest EMI-to-salary ratio still classed as Safe.
    pub safe_max_ratio: Percent,
    /// Highest EMI-to-salary ratio still classed as Moderate.
    pub moderate_max_ratio: Percent,
    /// Disposable income floor for Safe; below it cashflow escalates risk.
    pub min_disposable_percent: Percent,
    /// Disposable income floor for Moderate.
    pub moderate_min_disposable_percent: Percent,
}

impl Default for AffordabilityThresholds {
    fn default() -> Self {
        AffordabilityThresholds {
            safe_max_ratio: dec!(30),
            moderate_max_ratio: dec!(40),
            min_disposable_percent: dec!(20),
            moderate_min_disposable_percent: dec!(10),
        }
    }
}

impl AffordabilityThresholds {
    pub fn validate(&self) -> AffordResult<()> {
        let fields = [
            ("safe_max_ratio", self.safe_max_ratio),
            ("moderate_max_ratio", self.moderate_max_ratio),
            ("min_disposable_percent", self.min_disposable_percent),
            (
                "moderate_min_disposable_percent",
                self.moderate_min_disposable_percent,
            ),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(AffordError::invalid(field, "Threshold cannot be negative."));
            }
        }
        if self.safe_max_ratio > self.moderate_max_ratio {
            return Err(AffordError::invalid(
                "safe_max_ratio",
                "Safe ratio ceiling cannot exceed the moderate ratio ceiling.",
            ));
        }
        if self.moderate_min_disposable_percent > self.min_disposable_percent {
            return Err(AffordError::invalid(
                "moderate_min_disposable_percent",
                "Moderate disposable floor cannot exceed the safe disposable floor.",
            ));
        }
        Ok(())
    }

    /// The four canonical policy rules, in evaluation order.
    pub fn rule_descriptions(&self) -> Vec<String> {
        vec![
            format!("EMI <= {}% of salary -> Safe", self.safe_max_ratio),
            format!(
                "EMI {}-{}% of salary -> Moderate",
                self.safe_max_ratio, self.moderate_max_ratio
            ),
            format!("EMI > {}% of salary -> Risky", self.moderate_max_ratio),
            format!(
                "Disposable income < {}% of salary -> escalates risk",
                self.min_disposable_percent
            ),
        ]
    }
}
