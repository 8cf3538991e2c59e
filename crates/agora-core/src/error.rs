//! Error types for Agora.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgoraError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A uniqueness constraint rejected the write (community name, role
    /// name, grant tuple or OAI set spec).
    #[error("Entity already exists: {entity} with key {key}")]
    AlreadyExists { entity: String, key: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgoraError {
    /// Returns `true` for uniqueness violations.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, AgoraError::AlreadyExists { .. })
    }
}

pub type AgoraResult<T> = Result<T, AgoraError>;
