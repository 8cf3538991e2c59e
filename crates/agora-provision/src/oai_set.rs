//! OAI set registration for communities.

use agora_core::error::AgoraResult;
use agora_core::models::community::Community;
use agora_core::models::oai_set::OaiSet;
use agora_core::repository::Store;
use agora_core::unit_of_work::UnitOfWork;
use tracing::{debug, info};

/// The set a community's records are harvested under.
pub fn community_oai_set(community: &Community) -> OaiSet {
    OaiSet {
        spec: community.id.to_string(),
        name: community.name.clone(),
        description: community.description.clone(),
    }
}

/// Stage the community's OAI set.
///
/// With `fix` set, an existing set with the same spec is kept as is and
/// returned; otherwise it is an `AlreadyExists` error. The flag tells
/// whether a new set was staged.
pub async fn provision_oai_set<S: Store>(
    unit: &mut UnitOfWork<'_, S>,
    community: &Community,
    fix: bool,
) -> AgoraResult<(OaiSet, bool)> {
    let set = community_oai_set(community);
    let (set, created) = if fix {
        unit.add_if_absent(set).await?
    } else {
        (unit.add(set).await?, true)
    };

    if created {
        info!(community_id = %community.id, spec = %set.spec, "Staged community OAI set");
    } else {
        debug!(community_id = %community.id, spec = %set.spec, "OAI set already exists");
    }
    Ok((set, created))
}

#[cfg(test)]
mod tests {
    use agora_core::models::community::CreateCommunity;

    use super::*;

    #[test]
    fn set_mirrors_community_at_creation() {
        let community = Community::new(CreateCommunity {
            name: "Earth Sciences".into(),
            description: "Rocks".into(),
            ..Default::default()
        });
        let set = community_oai_set(&community);

        assert_eq!(set.spec, community.id.to_string());
        assert_eq!(set.name, "Earth Sciences");
        assert_eq!(set.description, "Rocks");
    }
}
