//! Agora Core: domain models, need registry, storage contracts and the
//! unit of work shared by every Agora crate.

pub mod error;
pub mod models;
pub mod needs;
pub mod repository;
pub mod unit_of_work;

pub use error::{AgoraError, AgoraResult};
pub use unit_of_work::{NestedUnit, UnitOfWork};
