//! Snapshot listing model and the name codec.

pub mod naming;

pub use naming::{DEFAULT_NAME_PREFIX, SnapshotNamer, TIMESTAMP_FORMAT};

use crate::error::NamingError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Completion state of a snapshot as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SnapshotState {
    Success,
    /// `FAILED`, `PARTIAL`, `IN_PROGRESS`, `INCOMPATIBLE`, ...
    Other(String),
}

impl From<String> for SnapshotState {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("success") {
            Self::Success
        } else {
            Self::Other(value)
        }
    }
}

impl From<SnapshotState> for String {
    fn from(value: SnapshotState) -> Self {
        match value {
            SnapshotState::Success => "SUCCESS".to_string(),
            SnapshotState::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    #[serde(rename = "snapshot")]
    pub name: String,
    pub state: SnapshotState,
}

impl SnapshotInfo {
    pub fn new(name: impl Into<String>, state: SnapshotState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }
}

/// All snapshots of a repository, partitioned by state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub succeeded: BTreeSet<String>,
    pub other: BTreeSet<String>,
}

impl Inventory {
    /// Partition a listing. If a name is listed twice, its last state wins.
    pub fn from_listing(listing: impl IntoIterator<Item = SnapshotInfo>) -> Self {
        let by_name: BTreeMap<String, SnapshotState> = listing
            .into_iter()
            .map(|info| (info.name, info.state))
            .collect();

        let mut inventory = Self::default();
        for (name, state) in by_name {
            match state {
                SnapshotState::Success => inventory.succeeded.insert(name),
                SnapshotState::Other(_) => inventory.other.insert(name),
            };
        }
        inventory
    }

    pub fn len(&self) -> usize {
        self.succeeded.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.other.is_empty()
    }

    /// Decode every successful snapshot name, failing on the first malformed
    /// one.
    pub fn succeeded_timestamps(
        &self,
        namer: &SnapshotNamer,
    ) -> Result<BTreeSet<NaiveDateTime>, NamingError> {
        self.succeeded
            .iter()
            .map(|name| namer.decode(name))
            .collect()
    }
}
