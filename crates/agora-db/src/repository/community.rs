//! SurrealDB implementation of [`CommunityRepository`].

use agora_core::error::AgoraResult;
use agora_core::models::community::{Community, UpdateCommunity};
use agora_core::repository::{CommunityRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CommunityRow {
    record_id: String,
    name: String,
    description: String,
    logo: Option<String>,
    deleted: bool,
    publication_workflow: String,
    restricted_submission: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommunityRow {
    fn try_into_community(self) -> Result<Community, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidRow(format!("invalid community UUID: {e}")))?;
        Ok(Community {
            id,
            name: self.name,
            description: self.description,
            logo: self.logo,
            deleted: self.deleted,
            publication_workflow: self.publication_workflow,
            restricted_submission: self.restricted_submission,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Community repository.
///
/// Communities are only created through a unit of work (see
/// [`SurrealStore`](crate::SurrealStore)) so that their roles and OAI set
/// are written in the same transaction.
#[derive(Clone)]
pub struct SurrealCommunityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCommunityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    pub(crate) async fn find_by_name(&self, name: &str) -> Result<Option<Community>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM community \
                 WHERE name = $name LIMIT 1",
            )
            .bind(("name", name.to_owned()))
            .await?;

        let rows: Vec<CommunityRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(CommunityRow::try_into_community)
            .transpose()
    }
}

impl<C: Connection> CommunityRepository for SurrealCommunityRepository<C> {
    async fn get_by_id(&self, id: Uuid) -> AgoraResult<Community> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('community', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommunityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "community".into(),
            id: id_str,
        })?;

        Ok(row.try_into_community()?)
    }

    async fn get_by_name(&self, name: &str) -> AgoraResult<Community> {
        self.find_by_name(name).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "community".into(),
                id: name.into(),
            }
            .into()
        })
    }

    async fn update(&self, id: Uuid, input: UpdateCommunity) -> AgoraResult<Community> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.logo.is_some() {
            sets.push("logo = $logo");
        }
        if input.publication_workflow.is_some() {
            sets.push("publication_workflow = $publication_workflow");
        }
        if input.restricted_submission.is_some() {
            sets.push("restricted_submission = $restricted_submission");
        }
        sets.push("updated_at = time::now()");

        // UPDATE does not create records; make a missing id a NotFound.
        self.get_by_id(id).await?;

        let query = format!(
            "UPDATE type::record('community', $id) SET {}; \
             SELECT meta::id(id) AS record_id, * FROM type::record('community', $id);",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(logo) = input.logo {
            builder = builder.bind(("logo", logo));
        }
        if let Some(workflow) = input.publication_workflow {
            builder = builder.bind(("publication_workflow", workflow));
        }
        if let Some(restricted) = input.restricted_submission {
            builder = builder.bind(("restricted_submission", restricted));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from_statement)?;

        let rows: Vec<CommunityRow> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "community".into(),
            id: id_str,
        })?;

        Ok(row.try_into_community()?)
    }

    async fn soft_delete(&self, id: Uuid) -> AgoraResult<()> {
        self.get_by_id(id).await?;

        self.db
            .query(
                "UPDATE type::record('community', $id) \
                 SET deleted = true, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from_statement)?;

        Ok(())
    }

    async fn list(
        &self,
        pagination: Pagination,
        include_deleted: bool,
    ) -> AgoraResult<PaginatedResult<Community>> {
        let filter = if include_deleted {
            ""
        } else {
            "WHERE deleted = false"
        };

        let mut count_result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM community {filter} GROUP ALL"
            ))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map_or(0, |r| r.total);

        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * FROM community {filter} \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset"
            ))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommunityRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(CommunityRow::try_into_community)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
