//! Tiered time-decay retention.
//!
//! Given the timestamps of all successful snapshots and a reference instant,
//! decide which snapshots to keep:
//! - every snapshot of the last week
//! - the oldest snapshot of the prior weeks up to four weeks, plus two
//!   snapshots trisecting the gap between it and the last weekly one
//! - one snapshot every four weeks back to the start of history
//! - the very first snapshot
//!
//! Selection is pure. It never reads the clock and never touches a store.

mod policy;

pub use policy::{
    DEFAULT_CHECKPOINT_INTERVAL_DAYS, DEFAULT_DAILY_DAYS, DEFAULT_SPREAD_DAYS, RetentionPolicy,
};

use crate::error::RetentionError;
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::BTreeSet;
use std::iter::FusedIterator;
use strum::Display;

/// The tier that claimed a kept snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    Daily,
    Spread,
    Checkpoint,
    Earliest,
}

/// Select keepers from `timestamps` under the default policy.
pub fn select(
    timestamps: &BTreeSet<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<Selection<'_>, RetentionError> {
    RetentionPolicy::default().select(timestamps, now)
}

impl RetentionPolicy {
    /// Select keepers from `timestamps` relative to `now`.
    ///
    /// The returned sequence may yield the same instant more than once; callers
    /// collect it into a set. The daily and spread tiers are resolved up
    /// front, the checkpoint tier is walked lazily.
    pub fn select<'a>(
        &self,
        timestamps: &'a BTreeSet<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<Selection<'a>, RetentionError> {
        let Some(&earliest) = timestamps.first() else {
            return Err(RetentionError::EmptyInventory);
        };

        let mut leading = Vec::new();
        let mut last_daily = None;
        let mut last_monthly = None;

        for &timestamp in timestamps.iter().rev() {
            let age = now - timestamp;
            if age < self.daily_window {
                leading.push((Tier::Daily, timestamp));
                last_daily = Some(timestamp);
            } else if age < self.spread_window {
                last_monthly = Some(timestamp);
            } else {
                break;
            }
        }

        if let Some(anchor) = last_monthly {
            leading.push((Tier::Spread, anchor));

            if let Some(last_daily) = last_daily {
                let span = (anchor - last_daily) / 3;
                let first = last_daily + span;
                let second = first + span;
                for target in [first, second] {
                    leading.extend(closest(timestamps, target).map(|found| (Tier::Spread, found)));
                }
            }
        }

        Ok(Selection {
            timestamps,
            earliest,
            leading: leading.into_iter(),
            next_checkpoint: now.checked_sub_signed(self.checkpoint_interval),
            checkpoint_interval: self.checkpoint_interval,
            earliest_pending: true,
        })
    }
}

/// Lazy, finite sequence of kept instants.
///
/// Iterating yields bare instants; [`Selection::tiered`] also reports the tier
/// that produced each one.
#[derive(Debug)]
pub struct Selection<'a> {
    timestamps: &'a BTreeSet<NaiveDateTime>,
    earliest: NaiveDateTime,
    leading: std::vec::IntoIter<(Tier, NaiveDateTime)>,
    next_checkpoint: Option<NaiveDateTime>,
    checkpoint_interval: TimeDelta,
    earliest_pending: bool,
}

impl<'a> Selection<'a> {
    pub fn tiered(mut self) -> impl Iterator<Item = (Tier, NaiveDateTime)> + 'a {
        std::iter::from_fn(move || self.next_tiered())
    }

    fn next_tiered(&mut self) -> Option<(Tier, NaiveDateTime)> {
        if let Some(item) = self.leading.next() {
            return Some(item);
        }

        if let Some(ideal) = self.next_checkpoint.take()
            && ideal > self.earliest
        {
            self.next_checkpoint = ideal.checked_sub_signed(self.checkpoint_interval);
            if let Some(found) = closest(self.timestamps, ideal) {
                return Some((Tier::Checkpoint, found));
            }
        }

        if self.earliest_pending {
            self.earliest_pending = false;
            return Some((Tier::Earliest, self.earliest));
        }

        None
    }
}

impl Iterator for Selection<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_tiered().map(|(_, timestamp)| timestamp)
    }
}

impl FusedIterator for Selection<'_> {}

/// The timestamp nearest to `target` by whole-day distance.
///
/// Candidates are visited newest first and only a strictly smaller distance
/// replaces the current best, so ties resolve to the most recent candidate.
/// Returns `None` only when `timestamps` is empty.
pub fn closest(
    timestamps: &BTreeSet<NaiveDateTime>,
    target: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let mut best: Option<(i64, NaiveDateTime)> = None;
    for &candidate in timestamps.iter().rev() {
        let distance = floor_days(target - candidate).abs();
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Whole days in `delta`, rounded towards negative infinity.
fn floor_days(delta: TimeDelta) -> i64 {
    let days = delta.num_days();
    if delta < TimeDelta::zero() && delta != TimeDelta::days(days) {
        days - 1
    } else {
        days
    }
}
