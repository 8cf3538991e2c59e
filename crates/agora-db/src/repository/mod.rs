//! SurrealDB repository implementations.

mod community;
mod grant;
mod oai_set;
mod role;

pub use community::SurrealCommunityRepository;
pub use grant::SurrealGrantRepository;
pub use oai_set::SurrealOaiSetRepository;
pub use role::SurrealRoleRepository;

pub(crate) use grant::encode_argument;
