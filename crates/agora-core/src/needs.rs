//! Need constructors for the deposit, record and account subsystems.
//!
//! This module sits below every subsystem that checks permissions, so
//! the provisioning code and the permission checks share one definition
//! of each need without depending on each other.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::need::{Need, PublicationState};

pub const CREATE_DEPOSIT: &str = "create-deposit";
pub const READ_DEPOSIT: &str = "read-deposit";
pub const UPDATE_DEPOSIT_METADATA: &str = "update-deposit-metadata";
pub const UPDATE_DEPOSIT_PUBLICATION_STATE: &str = "update-deposit-publication-state";
pub const UPDATE_RECORD_METADATA: &str = "update-record-metadata";
pub const ASSIGN_ROLE: &str = "assign-role";
pub const SEARCH_ACCOUNTS: &str = "accounts-search";

/// Build a need whose argument is the canonical JSON encoding of `params`.
fn parameterized(action: &str, params: &[(&str, String)]) -> Need {
    let argument = if params.is_empty() {
        None
    } else {
        let map: BTreeMap<&str, &str> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        // A map of strings always serializes.
        Some(serde_json::to_string(&map).unwrap_or_default())
    };
    Need {
        action: action.into(),
        argument,
    }
}

/// Create a deposit in the community.
pub fn create_deposit_need(community_id: Uuid) -> Need {
    parameterized(CREATE_DEPOSIT, &[("community", community_id.to_string())])
}

/// Read the community's deposits that are in `state`.
pub fn read_deposit_need(community_id: Uuid, state: PublicationState) -> Need {
    parameterized(
        READ_DEPOSIT,
        &[
            ("community", community_id.to_string()),
            ("publication_state", state.as_str().into()),
        ],
    )
}

/// Edit the metadata of the community's deposits that are in `state`.
pub fn update_deposit_metadata_need(community_id: Uuid, state: PublicationState) -> Need {
    parameterized(
        UPDATE_DEPOSIT_METADATA,
        &[
            ("community", community_id.to_string()),
            ("publication_state", state.as_str().into()),
        ],
    )
}

/// Move a deposit of the community from `old_state` to `new_state`.
///
/// Only that one transition is granted; the reverse move is a different
/// need.
pub fn update_deposit_publication_state_need(
    community_id: Uuid,
    old_state: PublicationState,
    new_state: PublicationState,
) -> Need {
    parameterized(
        UPDATE_DEPOSIT_PUBLICATION_STATE,
        &[
            ("community", community_id.to_string()),
            ("new_state", new_state.as_str().into()),
            ("old_state", old_state.as_str().into()),
        ],
    )
}

/// Edit the metadata of the community's published records.
pub fn update_record_metadata_need(community_id: Uuid) -> Need {
    parameterized(
        UPDATE_RECORD_METADATA,
        &[("community", community_id.to_string())],
    )
}

/// Assign any role owned by the community.
pub fn assign_role_need(community_id: Uuid) -> Need {
    parameterized(ASSIGN_ROLE, &[("community", community_id.to_string())])
}

/// List user accounts. Not scoped to a community.
pub fn search_accounts_need() -> Need {
    parameterized(SEARCH_ACCOUNTS, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community() -> Uuid {
        Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap()
    }

    #[test]
    fn argument_is_sorted_compact_json() {
        let need = read_deposit_need(community(), PublicationState::Submitted);
        assert_eq!(need.action, READ_DEPOSIT);
        assert_eq!(
            need.argument.as_deref(),
            Some(
                r#"{"community":"11111111-1111-1111-1111-111111111111","publication_state":"submitted"}"#
            )
        );
    }

    #[test]
    fn transitions_are_directional() {
        let publish = update_deposit_publication_state_need(
            community(),
            PublicationState::Submitted,
            PublicationState::Published,
        );
        let unpublish = update_deposit_publication_state_need(
            community(),
            PublicationState::Published,
            PublicationState::Submitted,
        );
        assert_ne!(publish, unpublish);
    }

    #[test]
    fn needs_are_scoped_by_community() {
        let other = Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap();
        assert_ne!(create_deposit_need(community()), create_deposit_need(other));
        assert_ne!(assign_role_need(community()), assign_role_need(other));
    }

    #[test]
    fn search_accounts_is_unscoped() {
        let need = search_accounts_need();
        assert_eq!(need.action, SEARCH_ACCOUNTS);
        assert_eq!(need.argument, None);
        assert_eq!(need.to_string(), SEARCH_ACCOUNTS);
    }

    #[test]
    fn constructors_are_deterministic() {
        assert_eq!(
            update_record_metadata_need(community()),
            update_record_metadata_need(community())
        );
    }
}
