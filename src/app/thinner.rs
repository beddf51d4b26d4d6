use super::proposal::Proposal;
use crate::error::{Result, StoreError};
use crate::retention::RetentionPolicy;
use crate::snapshot::{Inventory, SnapshotNamer};
use crate::store::{CleanupStats, DeleteOutcome, SnapshotStore};
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// What `apply_proposal` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub deleted: usize,
    pub already_absent: usize,
    /// `None` when there was nothing to delete and cleanup was skipped.
    pub cleanup: Option<CleanupStats>,
}

/// Two-phase thinning of one snapshot repository.
///
/// `compute_proposal` only reads. `apply_proposal` is destructive; the caller
/// gates it on operator approval.
pub struct Thinner<S> {
    store: S,
    namer: SnapshotNamer,
    policy: RetentionPolicy,
}

impl<S: SnapshotStore> Thinner<S> {
    pub fn new(store: S, namer: SnapshotNamer, policy: RetentionPolicy) -> Self {
        Self {
            store,
            namer,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn compute_proposal(&self, now: NaiveDateTime) -> Result<Proposal> {
        self.ensure_no_running_deletions().await?;

        info!("Verifying repository...");
        self.store.verify_repository().await?;

        info!("Listing snapshots...");
        let inventory = Inventory::from_listing(self.store.list_snapshots().await?);
        info!(
            "Found {} snapshots ({} successful)",
            inventory.len(),
            inventory.succeeded.len()
        );
        if !inventory.other.is_empty() {
            warn!(
                "Found unsuccessful snapshots: {}",
                inventory.other.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        Proposal::compute(&inventory, &self.namer, &self.policy, now)
    }

    pub async fn apply_proposal(&self, proposal: &Proposal) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        if proposal.is_noop() {
            return Ok(report);
        }

        self.ensure_no_running_deletions().await?;

        for name in &proposal.delete {
            match self.store.delete_snapshot(name).await? {
                DeleteOutcome::Deleted => report.deleted += 1,
                DeleteOutcome::AlreadyAbsent => report.already_absent += 1,
            }
        }

        info!("Cleaning up repository...");
        report.cleanup = Some(self.store.cleanup_repository().await?);
        Ok(report)
    }

    async fn ensure_no_running_deletions(&self) -> std::result::Result<(), StoreError> {
        info!("Checking for running snapshot delete tasks...");
        let tasks = self.store.running_deletions().await?;
        if tasks > 0 {
            return Err(StoreError::DeletionInProgress { tasks });
        }
        Ok(())
    }
}
