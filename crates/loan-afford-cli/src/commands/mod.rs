pub mod loan;
pub mod report;
pub mod scenarios;
pub mod stress;

/// Unwrap a required flag, naming it in the error when absent.
pub(crate) fn required<T>(value: Option<T>, flag: &str) -> Result<T, Box<dyn std::error::Error>> {
    value.ok_or_else(|| format!("--{} is required (or provide --input)", flag).into())
}
