//! SurrealDB implementation of [`OaiSetRepository`].

use agora_core::error::AgoraResult;
use agora_core::models::oai_set::OaiSet;
use agora_core::repository::OaiSetRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OaiSetRow {
    spec: String,
    name: String,
    description: String,
}

impl From<OaiSetRow> for OaiSet {
    fn from(row: OaiSetRow) -> Self {
        OaiSet {
            spec: row.spec,
            name: row.name,
            description: row.description,
        }
    }
}

/// SurrealDB implementation of the OAI set repository.
#[derive(Clone)]
pub struct SurrealOaiSetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOaiSetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    pub(crate) async fn find_by_spec(&self, spec: &str) -> Result<Option<OaiSet>, DbError> {
        let mut result = self
            .db
            .query("SELECT spec, name, description FROM oai_set WHERE spec = $spec LIMIT 1")
            .bind(("spec", spec.to_owned()))
            .await?;

        let rows: Vec<OaiSetRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(OaiSet::from))
    }
}

impl<C: Connection> OaiSetRepository for SurrealOaiSetRepository<C> {
    async fn get_by_spec(&self, spec: &str) -> AgoraResult<OaiSet> {
        self.find_by_spec(spec).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "oai_set".into(),
                id: spec.into(),
            }
            .into()
        })
    }
}
