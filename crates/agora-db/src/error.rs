//! Database-specific error types and conversions.

use std::collections::HashMap;

use agora_core::error::AgoraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unique index {index} rejected write: {detail}")]
    UniqueViolation { index: String, detail: String },

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a statement error returned by `Response::check`.
    ///
    /// SurrealDB reports unique index violations as
    /// ``Database index `idx_x` already contains ...``.
    pub(crate) fn from_statement(err: surrealdb::Error) -> Self {
        let detail = err.to_string();
        if !detail.contains("already contains") {
            return DbError::Query(detail);
        }
        let index = detail
            .split('`')
            .nth(1)
            .unwrap_or_default()
            .to_owned();
        DbError::UniqueViolation { index, detail }
    }

    /// Classify the statement errors of a failed transaction script.
    ///
    /// Once one statement fails, SurrealDB reports every other statement
    /// of the script as not executed, so the index violation may sit at
    /// any position. Returns `None` when no statement failed.
    pub(crate) fn from_transaction(errors: HashMap<usize, surrealdb::Error>) -> Option<Self> {
        let mut errors: Vec<_> = errors.into_iter().collect();
        errors.sort_by_key(|(index, _)| *index);

        let mut first = None;
        for (_, err) in errors {
            match Self::from_statement(err) {
                violation @ DbError::UniqueViolation { .. } => return Some(violation),
                other => {
                    first.get_or_insert(other);
                }
            }
        }
        first
    }
}

/// Entity kind guarded by each unique index in the schema.
fn index_entity(index: &str) -> &'static str {
    match index {
        "idx_community_name" => "community",
        "idx_role_name" => "role",
        "idx_role_grant_unique" => "role_grant",
        "idx_oai_set_spec" => "oai_set",
        _ => "unknown",
    }
}

impl From<DbError> for AgoraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AgoraError::NotFound { entity, id },
            DbError::UniqueViolation { index, detail } => AgoraError::AlreadyExists {
                entity: index_entity(&index).into(),
                key: detail,
            },
            other => AgoraError::Database(other.to_string()),
        }
    }
}
