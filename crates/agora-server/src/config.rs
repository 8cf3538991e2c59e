//! Layered application configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional YAML file,
//! then `AGORA_*` environment variables (`__` separates nested keys, e.g.
//! `AGORA_DATABASE__URL`).

use std::path::Path;

use agora_db::DbConfig;
use agora_provision::CommunityConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub community: CommunityConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "agora=info".into(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed("AGORA_").split("__"))
    }

    /// Extract the layered configuration and check it against the
    /// limits the schema enforces.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(path).extract()?;
        config
            .community
            .validate()
            .map_err(|err| figment::Error::from(format!("community: {err}")))?;
        Ok(config)
    }
}
