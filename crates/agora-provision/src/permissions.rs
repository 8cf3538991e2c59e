//! Community roles and their permission grants.

use agora_core::error::AgoraResult;
use agora_core::models::community::Community;
use agora_core::models::grant::Grant;
use agora_core::models::need::{Need, PublicationState};
use agora_core::models::role::Role;
use agora_core::needs;
use agora_core::repository::{Persistable, Store};
use agora_core::unit_of_work::{NestedUnit, UnitOfWork};
use tracing::{debug, info};
use uuid::Uuid;

use crate::naming::{admin_role_name, member_role_name};

/// Outcome of provisioning a community's roles.
#[derive(Debug, Clone)]
pub struct ProvisionedRoles {
    pub admin: Role,
    pub member: Role,
    /// Roles staged by this run (less than 2 only in fix mode).
    pub roles_created: usize,
    /// Grants staged by this run.
    pub grants_created: usize,
}

/// Needs held by every member of the community.
pub fn member_needs(community_id: Uuid) -> Vec<Need> {
    vec![needs::create_deposit_need(community_id)]
}

/// Needs held only by the community's administrators.
pub fn admin_needs(community_id: Uuid) -> Vec<Need> {
    use PublicationState::{Draft, Published, Submitted};

    vec![
        needs::read_deposit_need(community_id, Submitted),
        needs::read_deposit_need(community_id, Published),
        needs::update_deposit_metadata_need(community_id, Submitted),
        // publish a submission
        needs::update_deposit_publication_state_need(community_id, Submitted, Published),
        // send a submission back to its owners for fixes
        needs::update_deposit_publication_state_need(community_id, Submitted, Draft),
        needs::update_record_metadata_need(community_id),
        needs::assign_role_need(community_id),
        needs::search_accounts_need(),
    ]
}

/// Create the community's admin and member roles and grant their needs.
///
/// The admin role receives the member needs as well as its own. All
/// writes are staged in one nested unit of `unit`; on error that nested
/// unit is discarded and `unit` is left as it was.
///
/// With `fix` set, roles and grants that already exist are reused instead
/// of failing, so a partially provisioned community can be completed.
pub async fn provision_roles<S: Store>(
    unit: &mut UnitOfWork<'_, S>,
    community: &Community,
    fix: bool,
) -> AgoraResult<ProvisionedRoles> {
    let admin = Role::new(
        admin_role_name(community),
        format!("Admin role of the community \"{}\"", community.name),
    );
    let member = Role::new(
        member_role_name(community),
        format!("Member role of the community \"{}\"", community.name),
    );

    let mut nested = unit.begin_nested();
    match stage_roles(&mut nested, community.id, admin, member, fix).await {
        Ok(provisioned) => {
            nested.commit();
            info!(
                community_id = %community.id,
                fix,
                roles_created = provisioned.roles_created,
                grants_created = provisioned.grants_created,
                "Staged community roles"
            );
            Ok(provisioned)
        }
        Err(err) => {
            nested.rollback();
            Err(err)
        }
    }
}

async fn stage_roles<S: Store>(
    nested: &mut NestedUnit<'_, '_, S>,
    community_id: Uuid,
    admin: Role,
    member: Role,
    fix: bool,
) -> AgoraResult<ProvisionedRoles> {
    let (admin, admin_created) = persist(nested, admin, fix).await?;
    let (member, member_created) = persist(nested, member, fix).await?;

    let member_needs = member_needs(community_id);
    let admin_needs = admin_needs(community_id);

    let mut grants_created = 0;
    for need in &member_needs {
        let (_, created) = persist(nested, Grant::allow(need, &member), fix).await?;
        grants_created += usize::from(created);
    }
    for need in member_needs.iter().chain(&admin_needs) {
        let (_, created) = persist(nested, Grant::allow(need, &admin), fix).await?;
        grants_created += usize::from(created);
    }

    Ok(ProvisionedRoles {
        admin,
        member,
        roles_created: usize::from(admin_created) + usize::from(member_created),
        grants_created,
    })
}

async fn persist<S: Store, E: Persistable>(
    nested: &mut NestedUnit<'_, '_, S>,
    entity: E,
    fix: bool,
) -> AgoraResult<(E, bool)> {
    if !fix {
        return nested.add(entity).await.map(|e| (e, true));
    }
    let key = entity.unique_key();
    let (entity, created) = nested.add_if_absent(entity).await?;
    if !created {
        debug!(entity = key.entity(), key = %key, "Already provisioned");
    }
    Ok((entity, created))
}
