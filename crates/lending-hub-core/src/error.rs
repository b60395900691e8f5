use thiserror::Error;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LendingError {
    /// Shorthand used by the calculators' input validation.
    pub fn invalid(field: &str, reason: &str) -> Self {
        LendingError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Field name for validation failures, so form layers can highlight it.
    pub fn field(&self) -> Option<&str> {
        match self {
            LendingError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LendingError {
    fn from(e: serde_json::Error) -> Self {
        LendingError::SerializationError(e.to_string())
    }
}
