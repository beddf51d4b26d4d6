use crate::error::{Result, RetentionError};
use crate::retention::{RetentionPolicy, Tier};
use crate::snapshot::{Inventory, SnapshotNamer};
use crate::ui::style as ui;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

/// Keep/delete partition of a repository, computed fresh on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proposal {
    /// Kept snapshot names and the first tier that claimed each.
    pub keep: BTreeMap<String, Tier>,
    /// Successful snapshots not selected, plus every snapshot that did not
    /// succeed.
    pub delete: BTreeSet<String>,
}

impl Proposal {
    pub fn compute(
        inventory: &Inventory,
        namer: &SnapshotNamer,
        policy: &RetentionPolicy,
        now: NaiveDateTime,
    ) -> Result<Self> {
        if inventory.succeeded.is_empty() {
            return Err(RetentionError::EmptyInventory.into());
        }

        let timestamps = inventory.succeeded_timestamps(namer)?;

        let mut keep = BTreeMap::new();
        for (tier, timestamp) in policy.select(&timestamps, now)?.tiered() {
            keep.entry(namer.encode(timestamp)).or_insert(tier);
        }

        let delete = inventory
            .succeeded
            .iter()
            .filter(|name| !keep.contains_key(*name))
            .chain(&inventory.other)
            .cloned()
            .collect();

        Ok(Self { keep, delete })
    }

    pub fn is_noop(&self) -> bool {
        self.delete.is_empty()
    }

    /// One line per snapshot, sorted by name: keepers in green with the tier
    /// that claimed them, deletions in red.
    pub fn render(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.keep.keys().chain(&self.delete).collect();
        names
            .into_iter()
            .map(|name| match self.keep.get(name) {
                Some(tier) => format!("{}  {}", ui::keep(name), ui::dim(tier)),
                None => ui::delete(name),
            })
            .collect()
    }
}
