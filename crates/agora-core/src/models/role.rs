//! Role domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named bundle of grants assignable to user accounts.
///
/// Community roles are linked to their community by naming convention
/// only; the community does not hold a reference to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    /// Globally unique role name.
    pub name: String,
    pub description: String,
}

impl Role {
    /// Build a role record with a fresh identifier.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
        }
    }
}
