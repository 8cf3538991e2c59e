//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables are SCHEMAFULL. UUIDs are stored as strings. Apart from the
//! timestamps, no field has a server-side default: every value is
//! written explicitly by the caller. Each natural key (community name,
//! role name, grant tuple, OAI set spec) has a UNIQUE index.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Communities
-- =======================================================================
DEFINE TABLE community SCHEMAFULL;
DEFINE FIELD name ON TABLE community TYPE string \
    ASSERT string::len($value) > 0 AND string::len($value) <= 80;
DEFINE FIELD description ON TABLE community TYPE string \
    ASSERT string::len($value) <= 2000;
DEFINE FIELD logo ON TABLE community TYPE option<string>;
DEFINE FIELD deleted ON TABLE community TYPE bool;
DEFINE FIELD publication_workflow ON TABLE community TYPE string;
DEFINE FIELD restricted_submission ON TABLE community TYPE bool;
DEFINE FIELD created_at ON TABLE community TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE community TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_community_name ON TABLE community \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Roles
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Role grants (role -> need). An unparameterized need is stored with an
-- empty argument so the unique index covers it.
-- =======================================================================
DEFINE TABLE role_grant SCHEMAFULL;
DEFINE FIELD role_id ON TABLE role_grant TYPE string;
DEFINE FIELD action ON TABLE role_grant TYPE string;
DEFINE FIELD argument ON TABLE role_grant TYPE string;
DEFINE FIELD exclude ON TABLE role_grant TYPE bool;
DEFINE INDEX idx_role_grant_unique ON TABLE role_grant \
    COLUMNS role_id, action, argument, exclude UNIQUE;
DEFINE INDEX idx_role_grant_role ON TABLE role_grant COLUMNS role_id;

-- =======================================================================
-- OAI sets
-- =======================================================================
DEFINE TABLE oai_set SCHEMAFULL;
DEFINE FIELD spec ON TABLE oai_set TYPE string;
DEFINE FIELD name ON TABLE oai_set TYPE string;
DEFINE FIELD description ON TABLE oai_set TYPE string;
DEFINE INDEX idx_oai_set_spec ON TABLE oai_set COLUMNS spec UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// The `_migration` table tracks applied versions; only migrations newer
/// than the recorded maximum run. Calling this repeatedly is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let current = current_version(db).await?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();
    if pending.is_empty() {
        debug!(version = current, "Schema is up to date");
        return Ok(());
    }

    for migration in pending {
        apply(db, migration).await?;
    }
    Ok(())
}

async fn current_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    Ok(records.first().map_or(0, |m| m.version))
}

/// Apply one migration, then record it in `_migration`.
async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    info!(
        version = migration.version,
        name = migration.name,
        "Applying migration"
    );

    db.query(migration.sql).await?.check().map_err(|e| {
        DbError::Migration(format!(
            "migration v{} '{}' failed: {e}",
            migration.version, migration.name,
        ))
    })?;

    db.query("CREATE _migration SET version = $version, name = $name")
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "failed to record migration v{}: {e}",
                migration.version,
            ))
        })?;

    info!(version = migration.version, "Migration applied");
    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn every_natural_key_has_a_unique_index() {
        for index in [
            "idx_community_name",
            "idx_role_name",
            "idx_role_grant_unique",
            "idx_oai_set_spec",
        ] {
            let line = SCHEMA_V1
                .lines()
                .position(|l| l.contains(&format!("DEFINE INDEX {index} ")))
                .unwrap_or_else(|| panic!("missing index {index}"));
            let definition: String = SCHEMA_V1.lines().skip(line).take(2).collect();
            assert!(definition.contains("UNIQUE"), "{index} is not UNIQUE");
        }
    }

    #[test]
    fn community_length_asserts_match_shared_limits() {
        use agora_core::models::community::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};

        let field = |name: &str| -> String {
            let start = SCHEMA_V1
                .find(&format!("DEFINE FIELD {name} ON TABLE community"))
                .unwrap_or_else(|| panic!("missing field {name}"));
            SCHEMA_V1[start..].split(';').next().unwrap_or_default().to_owned()
        };
        assert!(field("name").contains(&format!("<= {MAX_NAME_LENGTH}")));
        assert!(field("description").contains(&format!("<= {MAX_DESCRIPTION_LENGTH}")));
    }

    #[test]
    fn community_flags_have_no_server_default() {
        for field in ["deleted", "restricted_submission", "publication_workflow"] {
            let line = SCHEMA_V1
                .lines()
                .find(|l| l.starts_with(&format!("DEFINE FIELD {field} ON TABLE community")))
                .unwrap();
            assert!(!line.contains("DEFAULT"), "{field} must not have a default");
        }
    }
}
