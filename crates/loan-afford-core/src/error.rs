use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AffordError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl AffordError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AffordError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the argument that failed validation.
    pub fn field(&self) -> &str {
        match self {
            AffordError::InvalidInput { field, .. } => field,
        }
    }
}
