//! SurrealDB implementation of [`RoleRepository`].

use agora_core::error::AgoraResult;
use agora_core::models::role::Role;
use agora_core::repository::RoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    record_id: String,
    name: String,
    description: String,
}

impl RoleRow {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidRow(format!("invalid role UUID: {e}")))?;
        Ok(Role {
            id,
            name: self.name,
            description: self.description,
        })
    }
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    pub(crate) async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE name = $name LIMIT 1",
            )
            .bind(("name", name.to_owned()))
            .await?;

        let rows: Vec<RoleRow> = result.take(0)?;
        rows.into_iter().next().map(RoleRow::try_into_role).transpose()
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn get_by_id(&self, id: Uuid) -> AgoraResult<Role> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('role', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.try_into_role()?)
    }

    async fn get_by_name(&self, name: &str) -> AgoraResult<Role> {
        self.find_by_name(name).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "role".into(),
                id: name.into(),
            }
            .into()
        })
    }
}
