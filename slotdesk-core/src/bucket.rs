//! Day-keyed timestamp buckets.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::time::{DayKey, Timestamp};

/// Timestamps of one availability partition, grouped by the day they fall on.
///
/// Within a day, entries keep the order they were added in; nothing here sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityBucket(BTreeMap<DayKey, Vec<Timestamp>>);

impl AvailabilityBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan a flat list of timestamps out into day buckets.
    ///
    /// Every input ends up under exactly one day, duplicates included.
    pub fn group_by_day<I>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = Timestamp>,
    {
        let mut days: BTreeMap<DayKey, Vec<Timestamp>> = BTreeMap::new();
        for ts in timestamps {
            days.entry(ts.day_key()).or_default().push(ts);
        }
        AvailabilityBucket(days)
    }

    pub fn get(&self, day: &DayKey) -> Option<&[Timestamp]> {
        self.0.get(day).map(Vec::as_slice)
    }

    pub fn days(&self) -> impl Iterator<Item = &DayKey> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DayKey, &Vec<Timestamp>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All timestamps across all days.
    pub fn flatten(&self) -> Vec<Timestamp> {
        self.0.values().flatten().copied().collect()
    }

    pub fn has_times_on(&self, day: &DayKey) -> bool {
        self.0.get(day).is_some_and(|times| !times.is_empty())
    }

    /// True when no day holds a time. An empty bucket counts as all-empty.
    pub fn every_day_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Replace one day's times, leaving every other day alone.
    /// Repeated instants collapse to their first occurrence.
    pub fn set_day(&mut self, day: DayKey, times: impl IntoIterator<Item = Timestamp>) {
        self.0.insert(day, dedup(times));
    }

    /// Add times to one day, keeping what is already there.
    ///
    /// Incoming times come first, then previously stored ones, with repeats removed.
    pub fn union_day(&mut self, day: DayKey, times: impl IntoIterator<Item = Timestamp>) {
        let existing = self.0.remove(&day).unwrap_or_default();
        self.0.insert(day, dedup(times.into_iter().chain(existing)));
    }
}

fn dedup(times: impl IntoIterator<Item = Timestamp>) -> Vec<Timestamp> {
    let mut seen = HashSet::new();
    times.into_iter().filter(|ts| seen.insert(*ts)).collect()
}
