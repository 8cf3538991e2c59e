//! Role grant domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::need::Need;
use super::role::Role;

/// Records that a role is allowed (or, with `exclude`, denied) a need.
///
/// A `(role_id, action, argument, exclude)` tuple is stored at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub role_id: Uuid,
    pub action: String,
    pub argument: Option<String>,
    pub exclude: bool,
}

impl Grant {
    /// Allow `need` for `role`.
    pub fn allow(need: &Need, role: &Role) -> Self {
        Self {
            role_id: role.id,
            action: need.action.clone(),
            argument: need.argument.clone(),
            exclude: false,
        }
    }

    /// The need this grant refers to.
    pub fn need(&self) -> Need {
        Need {
            action: self.action.clone(),
            argument: self.argument.clone(),
        }
    }
}
