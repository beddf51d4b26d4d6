//! Remote snapshot repository access.

pub mod elasticsearch;
pub mod http_client;

pub use elasticsearch::ElasticsearchStore;

use crate::error::StoreError;
use crate::snapshot::SnapshotInfo;
use std::future::Future;
use std::pin::Pin;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Result of deleting a single snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The snapshot was already gone. Not an error.
    AlreadyAbsent,
}

/// Space reclaimed by a repository cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub deleted_bytes: u64,
    pub deleted_blobs: u64,
}

/// A repository of named snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Number of snapshot delete operations currently running against the
    /// backing store.
    fn running_deletions(&self) -> StoreFuture<'_, usize>;

    fn verify_repository(&self) -> StoreFuture<'_, ()>;

    fn list_snapshots(&self) -> StoreFuture<'_, Vec<SnapshotInfo>>;

    fn delete_snapshot<'a>(&'a self, name: &'a str) -> StoreFuture<'a, DeleteOutcome>;

    /// Remove unreferenced data left behind by deletions.
    fn cleanup_repository(&self) -> StoreFuture<'_, CleanupStats>;
}
