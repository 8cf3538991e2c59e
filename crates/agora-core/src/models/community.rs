//! Community domain model.
//!
//! A community is the organizational unit that owns a pair of roles
//! (administrator and member), their permission grants, and an OAI set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication workflow assigned to new communities.
pub const DEFAULT_PUBLICATION_WORKFLOW: &str = "direct_publish";

/// Longest name, in characters, the store accepts.
pub const MAX_NAME_LENGTH: usize = 80;

/// Longest description, in characters, the store accepts.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: Uuid,
    /// Display name, unique across all communities (deleted ones included).
    pub name: String,
    pub description: String,
    /// Link to the logo.
    pub logo: Option<String>,
    /// Soft-delete marker.
    pub deleted: bool,
    /// Publication workflow used in this community.
    pub publication_workflow: String,
    /// Restrict record creation to community members.
    pub restricted_submission: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Community {
    /// Build a new community with a fresh identifier.
    ///
    /// Every default is set here; the store never fills in missing values.
    pub fn new(input: CreateCommunity) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            logo: input.logo,
            deleted: false,
            publication_workflow: input
                .publication_workflow
                .unwrap_or_else(|| DEFAULT_PUBLICATION_WORKFLOW.into()),
            restricted_submission: input.restricted_submission.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields required to create a new community.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateCommunity {
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub publication_workflow: Option<String>,
    pub restricted_submission: Option<bool>,
}

/// Fields that can be updated on an existing community.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCommunity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub publication_workflow: Option<String>,
    pub restricted_submission: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_community_gets_explicit_defaults() {
        let community = Community::new(CreateCommunity {
            name: "Earth Sciences".into(),
            description: "Rocks and weather".into(),
            ..Default::default()
        });

        assert!(!community.deleted);
        assert!(!community.restricted_submission);
        assert_eq!(community.publication_workflow, DEFAULT_PUBLICATION_WORKFLOW);
        assert_eq!(community.logo, None);
        assert_eq!(community.created_at, community.updated_at);
    }

    #[test]
    fn new_community_keeps_requested_workflow() {
        let community = Community::new(CreateCommunity {
            name: "Linguistics".into(),
            description: String::new(),
            publication_workflow: Some("review_and_publish".into()),
            restricted_submission: Some(true),
            ..Default::default()
        });

        assert_eq!(community.publication_workflow, "review_and_publish");
        assert!(community.restricted_submission);
    }
}
