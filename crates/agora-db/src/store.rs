//! SurrealDB-backed [`Store`] used by the unit of work.

use agora_core::error::AgoraResult;
use agora_core::models::{community::Community, grant::Grant, oai_set::OaiSet, role::Role};
use agora_core::repository::{Record, Store, UniqueKey};
use surrealdb::{Connection, Surreal};
use tracing::{debug, info};

use crate::error::DbError;
use crate::repository::{
    SurrealCommunityRepository, SurrealGrantRepository, SurrealOaiSetRepository,
    SurrealRoleRepository, encode_argument,
};

/// A value bound to a statement parameter.
enum Param {
    Text(String),
    OptionalText(Option<String>),
    Flag(bool),
}

/// One `CREATE` statement plus the parameters it references.
struct Statement {
    sql: String,
    params: Vec<(String, Param)>,
}

impl Statement {
    fn create(index: usize, record: Record) -> Self {
        let p = |field: &str| format!("r{index}_{field}");
        match record {
            Record::Community(Community {
                id,
                name,
                description,
                logo,
                deleted,
                publication_workflow,
                restricted_submission,
                ..
            }) => Statement {
                sql: format!(
                    "CREATE type::record('community', ${id}) SET \
                     name = ${name}, description = ${description}, logo = ${logo}, \
                     deleted = ${deleted}, publication_workflow = ${workflow}, \
                     restricted_submission = ${restricted}, \
                     created_at = time::now(), updated_at = time::now();",
                    id = p("id"),
                    name = p("name"),
                    description = p("description"),
                    logo = p("logo"),
                    deleted = p("deleted"),
                    workflow = p("publication_workflow"),
                    restricted = p("restricted_submission"),
                ),
                params: vec![
                    (p("id"), Param::Text(id.to_string())),
                    (p("name"), Param::Text(name)),
                    (p("description"), Param::Text(description)),
                    (p("logo"), Param::OptionalText(logo)),
                    (p("deleted"), Param::Flag(deleted)),
                    (p("publication_workflow"), Param::Text(publication_workflow)),
                    (p("restricted_submission"), Param::Flag(restricted_submission)),
                ],
            },
            Record::Role(Role {
                id,
                name,
                description,
            }) => Statement {
                sql: format!(
                    "CREATE type::record('role', ${id}) SET \
                     name = ${name}, description = ${description};",
                    id = p("id"),
                    name = p("name"),
                    description = p("description"),
                ),
                params: vec![
                    (p("id"), Param::Text(id.to_string())),
                    (p("name"), Param::Text(name)),
                    (p("description"), Param::Text(description)),
                ],
            },
            Record::Grant(Grant {
                role_id,
                action,
                argument,
                exclude,
            }) => Statement {
                sql: format!(
                    "CREATE role_grant SET role_id = ${role_id}, action = ${action}, \
                     argument = ${argument}, exclude = ${exclude};",
                    role_id = p("role_id"),
                    action = p("action"),
                    argument = p("argument"),
                    exclude = p("exclude"),
                ),
                params: vec![
                    (p("role_id"), Param::Text(role_id.to_string())),
                    (p("action"), Param::Text(action)),
                    (
                        p("argument"),
                        Param::Text(encode_argument(argument.as_deref())),
                    ),
                    (p("exclude"), Param::Flag(exclude)),
                ],
            },
            Record::OaiSet(OaiSet {
                spec,
                name,
                description,
            }) => Statement {
                sql: format!(
                    "CREATE oai_set SET spec = ${spec}, name = ${name}, \
                     description = ${description};",
                    spec = p("spec"),
                    name = p("name"),
                    description = p("description"),
                ),
                params: vec![
                    (p("spec"), Param::Text(spec)),
                    (p("name"), Param::Text(name)),
                    (p("description"), Param::Text(description)),
                ],
            },
        }
    }
}

/// [`Store`] implementation over a SurrealDB connection.
///
/// `apply` sends every record as one `BEGIN TRANSACTION … COMMIT
/// TRANSACTION` script, so a failing statement cancels all of them.
#[derive(Clone)]
pub struct SurrealStore<C: Connection> {
    db: Surreal<C>,
    communities: SurrealCommunityRepository<C>,
    roles: SurrealRoleRepository<C>,
    grants: SurrealGrantRepository<C>,
    oai_sets: SurrealOaiSetRepository<C>,
}

impl<C: Connection> SurrealStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            communities: SurrealCommunityRepository::new(db.clone()),
            roles: SurrealRoleRepository::new(db.clone()),
            grants: SurrealGrantRepository::new(db.clone()),
            oai_sets: SurrealOaiSetRepository::new(db.clone()),
            db,
        }
    }
}

impl<C: Connection> Store for SurrealStore<C> {
    async fn find(&self, key: &UniqueKey) -> AgoraResult<Option<Record>> {
        let record = match key {
            UniqueKey::CommunityName(name) => self
                .communities
                .find_by_name(name)
                .await?
                .map(Record::Community),
            UniqueKey::RoleName(name) => self.roles.find_by_name(name).await?.map(Record::Role),
            UniqueKey::Grant(grant) => self.grants.find(grant).await?.map(Record::Grant),
            UniqueKey::OaiSetSpec(spec) => {
                self.oai_sets.find_by_spec(spec).await?.map(Record::OaiSet)
            }
        };
        Ok(record)
    }

    async fn apply(&self, records: Vec<Record>) -> AgoraResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let count = records.len();

        let statements: Vec<Statement> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Statement::create(index, record))
            .collect();

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for statement in &statements {
            sql.push_str(&statement.sql);
            sql.push('\n');
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut builder = self.db.query(sql);
        for (name, param) in statements.into_iter().flat_map(|s| s.params) {
            builder = match param {
                Param::Text(value) => builder.bind((name, value)),
                Param::OptionalText(value) => builder.bind((name, value)),
                Param::Flag(value) => builder.bind((name, value)),
            };
        }

        debug!(records = count, "Applying staged records");
        let mut response = builder.await.map_err(DbError::from)?;
        if let Some(err) = DbError::from_transaction(response.take_errors()) {
            debug!(records = count, error = %err, "Transaction cancelled");
            return Err(err.into());
        }

        info!(records = count, "Transaction committed");
        Ok(())
    }
}
