//! Error types for the planning engine
//!
//! Business outcomes (negative liquidity, missed deadlines, unrealistic growth)
//! are never errors; they are reported as blockers and warnings in the
//! evaluation result. This enum only covers genuine data faults and I/O.

use thiserror::Error;

/// Errors raised by the planning engine
#[derive(Error, Debug)]
pub enum PlanError {
    /// A single input field could not be turned into a valid number.
    /// Only `money::normalize` produces this kind.
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PlanError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Field path the error is scoped to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl PartialEq for PlanError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvalidInput { field: fa, reason: ra },
                Self::InvalidInput { field: fb, reason: rb },
            ) => fa == fb && ra == rb,
            (a, b) => a.to_string() == b.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
