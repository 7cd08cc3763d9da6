pub mod affordability;
pub mod amortization;
pub mod error;
pub mod report;
pub mod scenarios;
pub mod types;

pub use error::AffordError;
pub use types::*;

/// Standard result type for all loan-afford operations
pub type AffordResult<T> = Result<T, AffordError>;
