//! Storage contracts.
//!
//! Writes go through [`Store`], which the unit of work drives; reads go
//! through the per-entity repository traits. All operations are async.

use std::fmt;

use uuid::Uuid;

use crate::error::AgoraResult;
use crate::models::{
    community::{Community, UpdateCommunity},
    grant::Grant,
    oai_set::OaiSet,
    role::Role,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Write side
// ---------------------------------------------------------------------------

/// The natural key a store enforces uniqueness on, per entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueKey {
    CommunityName(String),
    RoleName(String),
    Grant(Grant),
    OaiSetSpec(String),
}

impl UniqueKey {
    /// Storage name of the entity kind this key belongs to.
    pub fn entity(&self) -> &'static str {
        match self {
            UniqueKey::CommunityName(_) => "community",
            UniqueKey::RoleName(_) => "role",
            UniqueKey::Grant(_) => "role_grant",
            UniqueKey::OaiSetSpec(_) => "oai_set",
        }
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueKey::CommunityName(name) | UniqueKey::RoleName(name) => f.write_str(name),
            UniqueKey::Grant(grant) => write!(f, "{}/{}", grant.role_id, grant.need()),
            UniqueKey::OaiSetSpec(spec) => f.write_str(spec),
        }
    }
}

/// Any entity the unit of work can stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Community(Community),
    Role(Role),
    Grant(Grant),
    OaiSet(OaiSet),
}

impl Record {
    pub fn unique_key(&self) -> UniqueKey {
        match self {
            Record::Community(c) => c.unique_key(),
            Record::Role(r) => r.unique_key(),
            Record::Grant(g) => g.unique_key(),
            Record::OaiSet(s) => s.unique_key(),
        }
    }
}

/// Conversion between a concrete entity and [`Record`].
pub trait Persistable: Clone + Send + Sync + Sized {
    fn unique_key(&self) -> UniqueKey;
    fn into_record(self) -> Record;
    fn from_record(record: Record) -> Option<Self>;
}

impl Persistable for Community {
    fn unique_key(&self) -> UniqueKey {
        UniqueKey::CommunityName(self.name.clone())
    }

    fn into_record(self) -> Record {
        Record::Community(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Community(c) => Some(c),
            _ => None,
        }
    }
}

impl Persistable for Role {
    fn unique_key(&self) -> UniqueKey {
        UniqueKey::RoleName(self.name.clone())
    }

    fn into_record(self) -> Record {
        Record::Role(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Role(r) => Some(r),
            _ => None,
        }
    }
}

impl Persistable for Grant {
    fn unique_key(&self) -> UniqueKey {
        UniqueKey::Grant(self.clone())
    }

    fn into_record(self) -> Record {
        Record::Grant(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Grant(g) => Some(g),
            _ => None,
        }
    }
}

impl Persistable for OaiSet {
    fn unique_key(&self) -> UniqueKey {
        UniqueKey::OaiSetSpec(self.spec.clone())
    }

    fn into_record(self) -> Record {
        Record::OaiSet(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::OaiSet(s) => Some(s),
            _ => None,
        }
    }
}

/// The persistence gateway the unit of work is built on.
pub trait Store: Send + Sync {
    /// Look up a stored entity by its natural key.
    fn find(&self, key: &UniqueKey) -> impl Future<Output = AgoraResult<Option<Record>>> + Send;

    /// Insert all records in one transaction: either every record is
    /// written or none is. A uniqueness violation must surface as
    /// [`AlreadyExists`](crate::error::AgoraError::AlreadyExists).
    fn apply(&self, records: Vec<Record>) -> impl Future<Output = AgoraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Read side
// ---------------------------------------------------------------------------

pub trait CommunityRepository: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgoraResult<Community>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = AgoraResult<Community>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCommunity,
    ) -> impl Future<Output = AgoraResult<Community>> + Send;
    /// Soft-delete: sets the `deleted` flag.
    fn soft_delete(&self, id: Uuid) -> impl Future<Output = AgoraResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
        include_deleted: bool,
    ) -> impl Future<Output = AgoraResult<PaginatedResult<Community>>> + Send;
}

pub trait RoleRepository: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgoraResult<Role>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = AgoraResult<Role>> + Send;
}

pub trait GrantRepository: Send + Sync {
    /// All grants held by a role.
    fn list_for_role(&self, role_id: Uuid) -> impl Future<Output = AgoraResult<Vec<Grant>>> + Send;
}

pub trait OaiSetRepository: Send + Sync {
    fn get_by_spec(&self, spec: &str) -> impl Future<Output = AgoraResult<OaiSet>> + Send;
}
