//! OAI set domain model.

use serde::{Deserialize, Serialize};

/// A harvesting set exposed over OAI-PMH.
///
/// Community sets are keyed by the community id; `name` and
/// `description` are copied when the set is created and are not kept in
/// sync with later community edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OaiSet {
    /// Set identifier (`setSpec`).
    pub spec: String,
    pub name: String,
    pub description: String,
}
