//! SurrealDB connection management.

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::repository::{
    SurrealCommunityRepository, SurrealGrantRepository, SurrealOaiSetRepository,
    SurrealRoleRepository,
};
use crate::store::SurrealStore;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// WebSocket address (e.g., `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "agora".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Manages a connection to SurrealDB and hands out stores and
/// repositories bound to it.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, sign in as root and select the configured namespace and
    /// database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Connected to SurrealDB");

        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }

    pub fn store(&self) -> SurrealStore<Client> {
        SurrealStore::new(self.db.clone())
    }

    pub fn communities(&self) -> SurrealCommunityRepository<Client> {
        SurrealCommunityRepository::new(self.db.clone())
    }

    pub fn roles(&self) -> SurrealRoleRepository<Client> {
        SurrealRoleRepository::new(self.db.clone())
    }

    pub fn grants(&self) -> SurrealGrantRepository<Client> {
        SurrealGrantRepository::new(self.db.clone())
    }

    pub fn oai_sets(&self) -> SurrealOaiSetRepository<Client> {
        SurrealOaiSetRepository::new(self.db.clone())
    }
}
