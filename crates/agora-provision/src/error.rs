//! Community validation errors.

use agora_core::error::AgoraError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("community name must not be empty")]
    EmptyName,

    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("unknown publication workflow: {0}")]
    UnknownWorkflow(String),

    #[error("configured {field} limit {configured} exceeds the stored maximum of {max}")]
    LimitAboveStoreMaximum {
        field: &'static str,
        configured: usize,
        max: usize,
    },
}

impl From<ValidationError> for AgoraError {
    fn from(err: ValidationError) -> Self {
        AgoraError::Validation {
            message: err.to_string(),
        }
    }
}
