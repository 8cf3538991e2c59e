//! Domain models for Agora.

pub mod community;
pub mod grant;
pub mod need;
pub mod oai_set;
pub mod role;
