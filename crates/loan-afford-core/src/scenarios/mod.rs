//! What-if analysis over the baseline loan: alternative tenures and
//! interest-rate shocks.

pub mod stress;
pub mod tenure;

pub use stress::{stress_test, stress_test_with, ShockResult, StressInput, DEFAULT_RATE_SHOCKS};
pub use tenure::{
    compare_scenarios, compare_scenarios_with, select_recommended, ScenarioInput,
    ScenarioResult, DEFAULT_TENURES_YEARS,
};
