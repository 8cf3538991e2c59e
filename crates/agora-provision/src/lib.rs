//! Agora Provision: community roles, permission grants and OAI set
//! provisioning, plus the community service that drives it.

pub mod config;
pub mod error;
pub mod hook;
pub mod naming;
pub mod oai_set;
pub mod permissions;
pub mod service;

pub use config::CommunityConfig;
pub use error::ValidationError;
pub use hook::{CommunityLifecycleHook, ProvisionReport};
pub use service::{CommunityRoles, CommunityService};
