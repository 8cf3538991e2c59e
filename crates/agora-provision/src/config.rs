//! Community service configuration.

use agora_core::models::community::{
    DEFAULT_PUBLICATION_WORKFLOW, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Limits and defaults applied when communities are created or edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Workflow assigned when the caller does not pick one.
    pub default_publication_workflow: String,
    /// Workflows a community may use.
    pub publication_workflows: Vec<String>,
    /// Maximum community name length in characters (default and upper
    /// bound: 80).
    pub max_name_length: usize,
    /// Maximum description length in characters (default and upper
    /// bound: 2000).
    pub max_description_length: usize,
    /// Maximum logo link length in characters (default: 300).
    pub max_logo_length: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            default_publication_workflow: DEFAULT_PUBLICATION_WORKFLOW.into(),
            publication_workflows: vec![
                DEFAULT_PUBLICATION_WORKFLOW.into(),
                "review_and_publish".into(),
            ],
            max_name_length: MAX_NAME_LENGTH,
            max_description_length: MAX_DESCRIPTION_LENGTH,
            max_logo_length: 300,
        }
    }
}

impl CommunityConfig {
    /// Reject limits the database schema would not honour.
    ///
    /// Limits may be tightened below the stored maximum but never raised
    /// above it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, configured, max) in [
            ("name", self.max_name_length, MAX_NAME_LENGTH),
            ("description", self.max_description_length, MAX_DESCRIPTION_LENGTH),
        ] {
            if configured > max {
                return Err(ValidationError::LimitAboveStoreMaximum {
                    field,
                    configured,
                    max,
                });
            }
        }
        Ok(())
    }
}
