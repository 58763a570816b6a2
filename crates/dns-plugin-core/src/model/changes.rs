//! Change set of one reconciliation cycle
//!
//! Each of the four sequences is optional. An unset sequence is encoded as
//! `null` and an empty one as `[]`; plugins are allowed to tell them apart.

use super::endpoint::Endpoint;
use serde::{Deserialize, Serialize};

/// The diff produced by one reconciliation cycle
///
/// Encoded with PascalCase keys in the fixed order `Create`, `UpdateOld`,
/// `UpdateNew`, `Delete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Changes {
    /// Records to create
    pub create: Option<Vec<Endpoint>>,

    /// Previous state of records being updated
    pub update_old: Option<Vec<Endpoint>>,

    /// Desired state of records being updated
    pub update_new: Option<Vec<Endpoint>>,

    /// Records to delete
    pub delete: Option<Vec<Endpoint>>,
}

impl Changes {
    /// Create a change set with every sequence unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the records to create
    pub fn with_create(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.create = Some(endpoints);
        self
    }

    /// Set both halves of an update
    pub fn with_update(mut self, old: Vec<Endpoint>, new: Vec<Endpoint>) -> Self {
        self.update_old = Some(old);
        self.update_new = Some(new);
        self
    }

    /// Set the records to delete
    pub fn with_delete(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.delete = Some(endpoints);
        self
    }

    /// Whether any sequence carries at least one endpoint
    pub fn has_changes(&self) -> bool {
        [&self.create, &self.update_old, &self.update_new, &self.delete]
            .into_iter()
            .any(|seq| seq.as_ref().is_some_and(|s| !s.is_empty()))
    }
}
