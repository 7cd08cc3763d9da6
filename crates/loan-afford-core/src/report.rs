//! End-to-end affordability report: installment, assessment, tenure
//! comparison and (optionally) a rate-shock stress test in one envelope.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::affordability::{AffordabilityAssessment, AffordabilityClassifier};
use crate::amortization::{compute_installment, InstallmentResult};
use crate::error::AffordError;
use crate::scenarios::stress::{default_shocks, stress_test_with, ShockResult, StressInput};
use crate::scenarios::tenure::{
    compare_scenarios_with, default_tenures, ScenarioInput, ScenarioResult,
};
use crate::types::*;
use crate::AffordResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityRequest {
    pub monthly_salary: Money,
    #[serde(default)]
    pub monthly_expenses: Money,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_years: u32,
    #[serde(default = "default_true")]
    pub run_stress_test: bool,
    #[serde(default = "default_tenures")]
    pub scenario_tenures: Vec<u32>,
    #[serde(default = "default_shocks")]
    pub rate_shocks: Vec<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityReport {
    pub installment: InstallmentResult,
    pub affordability: AffordabilityAssessment,
    pub scenarios: Vec<ScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_test: Option<Vec<ShockResult>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check every precondition of the request at once.
///
/// Unlike the individual calculators, which stop at the first bad argument,
/// this collects all violations into a single `InvalidInput` whose `field`
/// lists each offending field.
pub fn validate_request(request: &AffordabilityRequest) -> AffordResult<()> {
    let mut violations: Vec<(String, String)> = Vec::new();
    let mut push = |field: &str, reason: &str| violations.push((field.into(), reason.into()));

    if request.monthly_salary <= Decimal::ZERO {
        push("monthly_salary", "Salary must be positive.");
    }
    if request.principal <= Decimal::ZERO {
        push("principal", "Loan amount must be positive.");
    }
    if request.annual_rate_percent < Decimal::ZERO {
        push("annual_rate_percent", "Interest rate cannot be negative.");
    }
    if request.tenure_years == 0 {
        push("tenure_years", "Tenure must be at least 1 year.");
    }
    if request.monthly_expenses < Decimal::ZERO {
        push("monthly_expenses", "Expenses cannot be negative.");
    }
    if request.scenario_tenures.is_empty() {
        push("scenario_tenures", "At least one tenure option is required.");
    } else if request.scenario_tenures.contains(&0) {
        push("scenario_tenures", "Every tenure option must be at least 1 year.");
    }
    if request.run_stress_test && request.annual_rate_percent >= Decimal::ZERO {
        let shocked: Vec<Option<Percent>> = request
            .rate_shocks
            .iter()
            .map(|shock| request.annual_rate_percent.checked_add(*shock))
            .collect();
        if shocked.iter().any(Option::is_none) {
            push("rate_shocks", "Rate shocks exceed the supported numeric range.");
        } else if shocked.iter().flatten().any(|rate| *rate < Decimal::ZERO) {
            push("rate_shocks", "Rate shocks cannot drive the rate below zero.");
        }
    }

    if violations.is_empty() {
        return Ok(());
    }

    let (fields, reasons): (Vec<String>, Vec<String>) = violations.into_iter().unzip();
    Err(AffordError::InvalidInput {
        field: fields.join(", "),
        reason: reasons.join(" "),
    })
}

/// Build the full report using the default threshold table.
pub fn analyze_affordability(
    request: &AffordabilityRequest,
) -> AffordResult<ComputationOutput<AffordabilityReport>> {
    analyze_affordability_with(&AffordabilityClassifier::default(), request)
}

/// Run every calculator for the request and summarise notable outcomes as
/// warnings.
pub fn analyze_affordability_with(
    classifier: &AffordabilityClassifier,
    request: &AffordabilityRequest,
) -> AffordResult<ComputationOutput<AffordabilityReport>> {
    let start = Instant::now();
    validate_request(request)?;

    let installment = compute_installment(
        request.principal,
        request.annual_rate_percent,
        request.tenure_years,
    )?;
    let affordability = classifier.assess(
        request.monthly_salary,
        installment.installment,
        request.monthly_expenses,
    )?;

    let scenarios = compare_scenarios_with(
        classifier,
        &ScenarioInput {
            principal: request.principal,
            annual_rate_percent: request.annual_rate_percent,
            monthly_salary: request.monthly_salary,
            monthly_expenses: request.monthly_expenses,
            tenure_years: request.scenario_tenures.clone(),
        },
    )?;

    let stress_test = if request.run_stress_test {
        Some(stress_test_with(
            classifier,
            &StressInput {
                principal: request.principal,
                annual_rate_percent: request.annual_rate_percent,
                tenure_years: request.tenure_years,
                monthly_salary: request.monthly_salary,
                monthly_expenses: request.monthly_expenses,
                rate_shocks: request.rate_shocks.clone(),
            },
        )?)
    } else {
        None
    };

    let report = AffordabilityReport {
        installment,
        affordability,
        scenarios,
        stress_test,
    };
    let warnings = collect_warnings(request, &report);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "thresholds": classifier.thresholds(),
        "scenario_tenures": request.scenario_tenures,
        "rate_shocks": request.rate_shocks,
        "rounding": "2 dp on reported figures; classification on unrounded ratios",
    });

    Ok(with_metadata(
        "Annuity EMI with budget-aware affordability classification",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_warnings(request: &AffordabilityRequest, report: &AffordabilityReport) -> Vec<String> {
    let mut warnings = Vec::new();
    let baseline = &report.affordability;

    if baseline.disposable_income <= Decimal::ZERO {
        warnings.push(format!(
            "Disposable income after expenses and EMI is {}; the requested loan leaves no monthly buffer.",
            baseline.disposable_income
        ));
    }

    if let Some(pick) = report.scenarios.iter().find(|s| s.recommended) {
        if pick.tenure_years != request.tenure_years {
            warnings.push(format!(
                "A {}-year tenure ({}) is recommended over the requested {} years ({}).",
                pick.tenure_years,
                pick.affordability.risk_level,
                request.tenure_years,
                baseline.risk_level
            ));
        }
    }

    for shock in report.stress_test.iter().flatten() {
        if shock.affordability.risk_level > baseline.risk_level {
            warnings.push(format!(
                "A {}% rate shock raises risk from {} to {}.",
                shock.shock_percent, baseline.risk_level, shock.affordability.risk_level
            ));
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
