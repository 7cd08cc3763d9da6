use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use loan_afford_core::affordability::{
    AffordabilityClassifier, AffordabilityInput, AffordabilityThresholds,
};
use loan_afford_core::amortization::InstallmentInput;
use loan_afford_core::report::AffordabilityRequest;
use loan_afford_core::scenarios::{ScenarioInput, StressInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: DeserializeOwned>(json: &str) -> NapiResult<T> {
    serde_json::from_str(json).map_err(to_napi_error)
}

fn render<T: Serialize>(output: &T) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

/// Default classifier, or one built from a JSON threshold table.
fn classifier(thresholds_json: Option<String>) -> NapiResult<AffordabilityClassifier> {
    match thresholds_json {
        Some(json) => {
            let thresholds: AffordabilityThresholds = parse(&json)?;
            AffordabilityClassifier::new(thresholds).map_err(to_napi_error)
        }
        None => Ok(AffordabilityClassifier::default()),
    }
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_installment(input_json: String) -> NapiResult<String> {
    let input: InstallmentInput = parse(&input_json)?;
    let output =
        loan_afford_core::amortization::calculate_installment(&input).map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_affordability(
    input_json: String,
    thresholds_json: Option<String>,
) -> NapiResult<String> {
    let input: AffordabilityInput = parse(&input_json)?;
    let output = classifier(thresholds_json)?
        .assess(input.monthly_salary, input.installment, input.monthly_expenses)
        .map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_scenarios(input_json: String, thresholds_json: Option<String>) -> NapiResult<String> {
    let input: ScenarioInput = parse(&input_json)?;
    let output = loan_afford_core::scenarios::compare_scenarios_with(
        &classifier(thresholds_json)?,
        &input,
    )
    .map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn stress_test(input_json: String, thresholds_json: Option<String>) -> NapiResult<String> {
    let input: StressInput = parse(&input_json)?;
    let output =
        loan_afford_core::scenarios::stress_test_with(&classifier(thresholds_json)?, &input)
            .map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[napi]
pub fn affordability_report(
    input_json: String,
    thresholds_json: Option<String>,
) -> NapiResult<String> {
    let input: AffordabilityRequest = parse(&input_json)?;
    let output = loan_afford_core::report::analyze_affordability_with(
        &classifier(thresholds_json)?,
        &input,
    )
    .map_err(to_napi_error)?;
    render(&output)
}
