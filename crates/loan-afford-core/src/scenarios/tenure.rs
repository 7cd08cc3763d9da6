use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::affordability::{AffordabilityAssessment, AffordabilityClassifier, RiskLevel};
use crate::amortization::{compute_installment, InstallmentResult};
use crate::error::AffordError;
use crate::types::{Money, Percent};
use crate::AffordResult;

pub const DEFAULT_TENURES_YEARS: [u32; 3] = [3, 5, 7];

pub(crate) fn default_tenures() -> Vec<u32> {
    DEFAULT_TENURES_YEARS.to_vec()
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub monthly_salary: Money,
    #[serde(default)]
    pub monthly_expenses: Money,
    /// Tenure options in years, evaluated in order.
    #[serde(default = "default_tenures")]
    pub tenure_years: Vec<u32>,
}

impl ScenarioInput {
    /// Input over the default 3, 5 and 7 year tenures.
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        monthly_salary: Money,
        monthly_expenses: Money,
    ) -> Self {
        ScenarioInput {
            principal,
            annual_rate_percent,
            monthly_salary,
            monthly_expenses,
            tenure_years: default_tenures(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub tenure_years: u32,
    pub loan: InstallmentResult,
    pub affordability: AffordabilityAssessment,
    /// Set on exactly one result per comparison.
    pub recommended: bool,
}

// ---------------------------------------------------------------------------
// Recommendation policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preference {
    LowestTotalPayment,
    LongestTenure,
}

/// Fallback passes, most preferred first. Each pass keeps only scenarios at
/// its risk level and picks one by its preference.
const RECOMMENDATION_PASSES: [(RiskLevel, Preference); 3] = [
    (RiskLevel::Safe, Preference::LowestTotalPayment),
    (RiskLevel::Moderate, Preference::LowestTotalPayment),
    (RiskLevel::Risky, Preference::LongestTenure),
];

/// Index of the scenario to recommend, or `None` for an empty slice.
///
/// Ties within a pass resolve to the earliest scenario in input order.
pub fn select_recommended(scenarios: &[ScenarioResult]) -> Option<usize> {
    RECOMMENDATION_PASSES
        .iter()
        .find_map(|&(level, preference)| {
            let candidates = scenarios
                .iter()
                .enumerate()
                .filter(|(_, s)| s.affordability.risk_level == level);

            // `min_by` keeps the first of equal elements.
            let pick = match preference {
                Preference::LowestTotalPayment => candidates
                    .min_by(|(_, a), (_, b)| a.loan.total_payment.cmp(&b.loan.total_payment)),
                Preference::LongestTenure => {
                    candidates.min_by(|(_, a), (_, b)| b.tenure_years.cmp(&a.tenure_years))
                }
            };

            pick.map(|(idx, s)| {
                debug!(
                    risk_level = %level,
                    preference = ?preference,
                    tenure_years = s.tenure_years,
                    "recommendation pass selected scenario"
                );
                idx
            })
        })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare tenures using the default threshold table.
pub fn compare_scenarios(input: &ScenarioInput) -> AffordResult<Vec<ScenarioResult>> {
    compare_scenarios_with(&AffordabilityClassifier::default(), input)
}

/// Amortize and assess each tenure option, then flag exactly one as
/// recommended. Any invalid tenure fails the whole comparison.
pub fn compare_scenarios_with(
    classifier: &AffordabilityClassifier,
    input: &ScenarioInput,
) -> AffordResult<Vec<ScenarioResult>> {
    if input.tenure_years.is_empty() {
        return Err(AffordError::invalid(
            "tenure_years",
            "At least one tenure option is required.",
        ));
    }

    let mut scenarios = input
        .tenure_years
        .iter()
        .map(|&years| {
            let loan = compute_installment(input.principal, input.annual_rate_percent, years)?;
            let affordability = classifier.assess(
                input.monthly_salary,
                loan.installment,
                input.monthly_expenses,
            )?;
            debug!(
                tenure_years = years,
                installment = %loan.installment,
                total_payment = %loan.total_payment,
                risk_level = %affordability.risk_level,
                "scenario evaluated"
            );
            Ok(ScenarioResult {
                tenure_years: years,
                loan,
                affordability,
                recommended: false,
            })
        })
        .collect::<AffordResult<Vec<_>>>()?;

    if let Some(idx) = select_recommended(&scenarios) {
        scenarios[idx].recommended = true;
    }

    Ok(scenarios)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
