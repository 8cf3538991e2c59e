//! SurrealDB implementation of [`GrantRepository`].

use agora_core::error::AgoraResult;
use agora_core::models::grant::Grant;
use agora_core::repository::GrantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Stored form of an absent need argument.
pub(crate) const NO_ARGUMENT: &str = "";

pub(crate) fn encode_argument(argument: Option<&str>) -> String {
    argument.unwrap_or(NO_ARGUMENT).to_owned()
}

#[derive(Debug, SurrealValue)]
struct GrantRow {
    role_id: String,
    action: String,
    argument: String,
    exclude: bool,
}

impl GrantRow {
    fn try_into_grant(self) -> Result<Grant, DbError> {
        let role_id = Uuid::parse_str(&self.role_id)
            .map_err(|e| DbError::InvalidRow(format!("invalid role UUID: {e}")))?;
        let argument = (self.argument != NO_ARGUMENT).then_some(self.argument);
        Ok(Grant {
            role_id,
            action: self.action,
            argument,
            exclude: self.exclude,
        })
    }
}

/// SurrealDB implementation of the Grant repository.
#[derive(Clone)]
pub struct SurrealGrantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGrantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    pub(crate) async fn find(&self, grant: &Grant) -> Result<Option<Grant>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT role_id, action, argument, exclude FROM role_grant \
                 WHERE role_id = $role_id AND action = $action \
                 AND argument = $argument AND exclude = $exclude LIMIT 1",
            )
            .bind(("role_id", grant.role_id.to_string()))
            .bind(("action", grant.action.clone()))
            .bind(("argument", encode_argument(grant.argument.as_deref())))
            .bind(("exclude", grant.exclude))
            .await?;

        let rows: Vec<GrantRow> = result.take(0)?;
        rows.into_iter().next().map(GrantRow::try_into_grant).transpose()
    }
}

impl<C: Connection> GrantRepository for SurrealGrantRepository<C> {
    async fn list_for_role(&self, role_id: Uuid) -> AgoraResult<Vec<Grant>> {
        let mut result = self
            .db
            .query(
                "SELECT role_id, action, argument, exclude FROM role_grant \
                 WHERE role_id = $role_id \
                 ORDER BY action ASC, argument ASC",
            )
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GrantRow> = result.take(0).map_err(DbError::from)?;
        let grants = rows
            .into_iter()
            .map(GrantRow::try_into_grant)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(grants)
    }
}
