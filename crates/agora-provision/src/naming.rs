//! Role names derived from community identifiers.
//!
//! The id is rendered as 32 fixed-width hex digits, so no two
//! communities can produce the same name and the `:` separators are never
//! ambiguous.

use std::fmt;

use agora_core::models::community::Community;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Admin,
    Member,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::Member => "member",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `com:<hex id>:<kind>`
pub fn role_name(community: &Community, kind: RoleKind) -> String {
    format!("com:{}:{kind}", community.id.simple())
}

pub fn admin_role_name(community: &Community) -> String {
    role_name(community, RoleKind::Admin)
}

pub fn member_role_name(community: &Community) -> String {
    role_name(community, RoleKind::Member)
}
