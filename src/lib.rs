#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

//! Tiered time-decay thinning of snapshot repositories.
//!
//! The retention decision lives in [`retention`] and is pure. Everything else
//! reads snapshots from a store, proposes a keep/delete partition, and applies
//! it once an operator approves.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod retention;
pub mod snapshot;
pub mod store;
pub mod ui;

pub use app::{ApplyReport, Proposal, Thinner};
pub use config::Config;
pub use error::{Result, SnapthinError};
pub use retention::{RetentionPolicy, Selection, Tier, select};
pub use snapshot::{Inventory, SnapshotInfo, SnapshotNamer, SnapshotState};
pub use store::{ElasticsearchStore, SnapshotStore};
