//! Community service: creation, edits, soft deletion and repair.

use agora_core::error::AgoraResult;
use agora_core::models::community::{
    Community, CreateCommunity, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, UpdateCommunity,
};
use agora_core::models::role::Role;
use agora_core::repository::{
    CommunityRepository, PaginatedResult, Pagination, RoleRepository, Store,
};
use agora_core::unit_of_work::UnitOfWork;
use tracing::info;
use uuid::Uuid;

use crate::config::CommunityConfig;
use crate::error::ValidationError;
use crate::hook::{CommunityLifecycleHook, ProvisionReport};
use crate::naming::{admin_role_name, member_role_name};

/// A community's two roles.
#[derive(Debug, Clone)]
pub struct CommunityRoles {
    pub admin: Role,
    pub member: Role,
}

/// Community service.
///
/// Generic over the store and repositories so that it has no dependency
/// on the database crate.
pub struct CommunityService<S: Store, C: CommunityRepository, R: RoleRepository> {
    store: S,
    communities: C,
    roles: R,
    hook: CommunityLifecycleHook,
    config: CommunityConfig,
}

impl<S: Store, C: CommunityRepository, R: RoleRepository> CommunityService<S, C, R> {
    pub fn new(store: S, communities: C, roles: R, config: CommunityConfig) -> Self {
        Self {
            store,
            communities,
            roles,
            hook: CommunityLifecycleHook,
            config,
        }
    }

    /// Create a community together with its roles, grants and OAI set.
    ///
    /// Everything is written in one transaction; if provisioning fails
    /// the community is not created either.
    pub async fn create(&self, mut input: CreateCommunity) -> AgoraResult<Community> {
        let workflow = input
            .publication_workflow
            .get_or_insert_with(|| self.config.default_publication_workflow.clone());
        self.validate_workflow(workflow)?;
        self.validate_name(&input.name)?;
        self.validate_length("description", &input.description, self.max_description_length())?;
        if let Some(logo) = &input.logo {
            self.validate_length("logo", logo, self.config.max_logo_length)?;
        }

        let community = Community::new(input);

        let mut unit = UnitOfWork::new(&self.store);
        let community = unit.add(community).await?;
        self.hook.run(&mut unit, &community).await?;
        unit.commit().await?;

        info!(
            community_id = %community.id,
            name = %community.name,
            "Community created"
        );

        self.communities.get_by_id(community.id).await
    }

    /// Re-run provisioning in fix mode, adding only what is missing.
    pub async fn repair(&self, id: Uuid) -> AgoraResult<ProvisionReport> {
        let community = self.communities.get_by_id(id).await?;

        let mut unit = UnitOfWork::new(&self.store);
        let report = self.hook.repair(&mut unit, &community).await?;
        unit.commit().await?;

        info!(
            community_id = %id,
            roles_created = report.roles.roles_created,
            grants_created = report.roles.grants_created,
            oai_set_created = report.oai_set_created,
            "Community repaired"
        );
        Ok(report)
    }

    pub async fn get(&self, id: Uuid) -> AgoraResult<Community> {
        self.communities.get_by_id(id).await
    }

    pub async fn get_by_name(&self, name: &str) -> AgoraResult<Community> {
        self.communities.get_by_name(name).await
    }

    pub async fn list(
        &self,
        pagination: Pagination,
        include_deleted: bool,
    ) -> AgoraResult<PaginatedResult<Community>> {
        self.communities.list(pagination, include_deleted).await
    }

    /// Edit a community. Its OAI set keeps the name and description it
    /// was created with.
    pub async fn update(&self, id: Uuid, input: UpdateCommunity) -> AgoraResult<Community> {
        if let Some(name) = &input.name {
            self.validate_name(name)?;
        }
        if let Some(description) = &input.description {
            self.validate_length("description", description, self.max_description_length())?;
        }
        if let Some(logo) = &input.logo {
            self.validate_length("logo", logo, self.config.max_logo_length)?;
        }
        if let Some(workflow) = &input.publication_workflow {
            self.validate_workflow(workflow)?;
        }

        let community = self.communities.update(id, input).await?;
        info!(community_id = %id, "Community updated");
        Ok(community)
    }

    /// Mark a community as deleted. Its roles, grants and OAI set stay.
    pub async fn delete(&self, id: Uuid) -> AgoraResult<()> {
        self.communities.soft_delete(id).await?;
        info!(community_id = %id, "Community marked as deleted");
        Ok(())
    }

    /// Look up the community's admin and member roles by name.
    pub async fn roles(&self, id: Uuid) -> AgoraResult<CommunityRoles> {
        let community = self.communities.get_by_id(id).await?;
        let admin = self.roles.get_by_name(&admin_role_name(&community)).await?;
        let member = self.roles.get_by_name(&member_role_name(&community)).await?;
        Ok(CommunityRoles { admin, member })
    }

    fn validate_name(&self, name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.validate_length("name", name, self.config.max_name_length.min(MAX_NAME_LENGTH))
    }

    // The schema rejects anything longer, whatever the config says.
    fn max_description_length(&self) -> usize {
        self.config.max_description_length.min(MAX_DESCRIPTION_LENGTH)
    }

    fn validate_length(
        &self,
        field: &'static str,
        value: &str,
        max: usize,
    ) -> Result<(), ValidationError> {
        if value.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
        Ok(())
    }

    fn validate_workflow(&self, workflow: &str) -> Result<(), ValidationError> {
        if self
            .config
            .publication_workflows
            .iter()
            .any(|w| w == workflow)
        {
            Ok(())
        } else {
            Err(ValidationError::UnknownWorkflow(workflow.into()))
        }
    }
}
