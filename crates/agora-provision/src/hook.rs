//! Provisioning run when a community is created.

use agora_core::error::AgoraResult;
use agora_core::models::community::Community;
use agora_core::models::oai_set::OaiSet;
use agora_core::repository::Store;
use agora_core::unit_of_work::UnitOfWork;
use tracing::info;

use crate::oai_set::provision_oai_set;
use crate::permissions::{ProvisionedRoles, provision_roles};

/// What a provisioning run staged.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub roles: ProvisionedRoles,
    pub oai_set: OaiSet,
    pub oai_set_created: bool,
}

impl ProvisionReport {
    /// `true` when the run found nothing missing.
    pub fn is_noop(&self) -> bool {
        self.roles.roles_created == 0 && self.roles.grants_created == 0 && !self.oai_set_created
    }
}

/// Roles, grants and OAI set for a community, staged into the caller's
/// unit of work.
///
/// The hook never commits: the caller owns the unit, and an error from
/// either step means the unit must be dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommunityLifecycleHook;

impl CommunityLifecycleHook {
    /// Provision a community that was just staged in `unit`.
    ///
    /// Any entity that already exists is an error.
    pub async fn run<S: Store>(
        &self,
        unit: &mut UnitOfWork<'_, S>,
        community: &Community,
    ) -> AgoraResult<ProvisionReport> {
        self.provision(unit, community, false).await
    }

    /// Add whatever is missing for an existing community.
    pub async fn repair<S: Store>(
        &self,
        unit: &mut UnitOfWork<'_, S>,
        community: &Community,
    ) -> AgoraResult<ProvisionReport> {
        self.provision(unit, community, true).await
    }

    async fn provision<S: Store>(
        &self,
        unit: &mut UnitOfWork<'_, S>,
        community: &Community,
        fix: bool,
    ) -> AgoraResult<ProvisionReport> {
        let roles = provision_roles(unit, community, fix).await?;
        let (oai_set, oai_set_created) = provision_oai_set(unit, community, fix).await?;

        info!(community_id = %community.id, fix, "Community provisioning staged");
        Ok(ProvisionReport {
            roles,
            oai_set,
            oai_set_created,
        })
    }
}
