#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use snapthin::error::StoreError;
use snapthin::snapshot::{SnapshotInfo, SnapshotNamer, SnapshotState};
use snapthin::store::{CleanupStats, DeleteOutcome, SnapshotStore, StoreFuture};

/// In-memory snapshot repository that records every call made against it.
#[derive(Default)]
pub struct FakeStore {
    snapshots: Mutex<BTreeMap<String, SnapshotState>>,
    running_deletions: Mutex<usize>,
    calls: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = SnapshotInfo>) -> Self {
        let store = Self::default();
        store
            .snapshots
            .lock()
            .unwrap()
            .extend(snapshots.into_iter().map(|info| (info.name, info.state)));
        store
    }

    pub fn set_running_deletions(&self, tasks: usize) {
        *self.running_deletions.lock().unwrap() = tasks;
    }

    /// Remove a snapshot behind the thinner's back.
    pub fn vanish(&self, name: &str) {
        self.snapshots.lock().unwrap().remove(name);
    }

    pub fn names(&self) -> Vec<String> {
        self.snapshots.lock().unwrap().keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl SnapshotStore for FakeStore {
    fn running_deletions(&self) -> StoreFuture<'_, usize> {
        self.record("running_deletions");
        let tasks = *self.running_deletions.lock().unwrap();
        Box::pin(async move { Ok(tasks) })
    }

    fn verify_repository(&self) -> StoreFuture<'_, ()> {
        self.record("verify_repository");
        Box::pin(async move { Ok(()) })
    }

    fn list_snapshots(&self) -> StoreFuture<'_, Vec<SnapshotInfo>> {
        self.record("list_snapshots");
        let listing = self
            .snapshots
            .lock()
            .unwrap()
            .iter()
            .map(|(name, state)| SnapshotInfo::new(name.clone(), state.clone()))
            .collect();
        Box::pin(async move { Ok(listing) })
    }

    fn delete_snapshot<'a>(&'a self, name: &'a str) -> StoreFuture<'a, DeleteOutcome> {
        self.record(format!("delete {name}"));
        let outcome = match self.snapshots.lock().unwrap().remove(name) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::AlreadyAbsent,
        };
        Box::pin(async move { Ok(outcome) })
    }

    fn cleanup_repository(&self) -> StoreFuture<'_, CleanupStats> {
        self.record("cleanup_repository");
        Box::pin(async move {
            Ok::<_, StoreError>(CleanupStats {
                deleted_bytes: 1024,
                deleted_blobs: 4,
            })
        })
    }
}

pub fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(4, 16, 0)
        .unwrap()
}

pub fn name_days_ago(days: i64) -> String {
    SnapshotNamer::default().encode(reference_now() - TimeDelta::days(days))
}

pub fn successful(days: &[i64]) -> Vec<SnapshotInfo> {
    days.iter()
        .map(|&d| SnapshotInfo::new(name_days_ago(d), SnapshotState::Success))
        .collect()
}
