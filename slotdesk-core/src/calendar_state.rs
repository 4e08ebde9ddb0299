//! The available / non-available partition pair and its edit operations.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::bucket::AvailabilityBucket;
use crate::error::{SlotDeskError, SlotDeskResult};
use crate::schedule::{ScheduleEntry, SchedulePayload};
use crate::time::{DayKey, DayOrder, Timestamp};

/// Scheduling intent: free slots and booked slots, each grouped by day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarState {
    pub available_dates: AvailabilityBucket,
    pub non_available_dates: AvailabilityBucket,
}

/// One listed day with both partitions' times, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRow {
    pub day: DayKey,
    pub available: Vec<Timestamp>,
    pub non_available: Vec<Timestamp>,
}

impl DayRow {
    /// The "no time selected for this date" case.
    pub fn has_no_times(&self) -> bool {
        self.available.is_empty() && self.non_available.is_empty()
    }
}

impl CalendarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group both partitions from flat timestamp lists.
    pub fn from_partitions<A, N>(available: A, non_available: N) -> Self
    where
        A: IntoIterator<Item = Timestamp>,
        N: IntoIterator<Item = Timestamp>,
    {
        CalendarState {
            available_dates: AvailabilityBucket::group_by_day(available),
            non_available_dates: AvailabilityBucket::group_by_day(non_available),
        }
    }

    /// Classify the stored schedule. `is_booked` is the only discriminant.
    pub fn from_schedule(entries: &[ScheduleEntry]) -> Self {
        let (booked, free): (Vec<_>, Vec<_>) = entries.iter().partition(|e| e.is_booked);
        Self::from_partitions(
            free.into_iter().map(|e| e.timestamp),
            booked.into_iter().map(|e| e.timestamp),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.available_dates.is_empty() && self.non_available_dates.is_empty()
    }

    /// Everything currently picked on the calendar: booked slots first, then free ones.
    pub fn calendar_value(&self) -> Vec<Timestamp> {
        let mut value = self.non_available_dates.flatten();
        value.extend(self.available_dates.flatten());
        value
    }

    /// Days present in either partition, in calendar order.
    pub fn days(&self) -> Vec<DayKey> {
        let days: BTreeSet<DayKey> = self
            .available_dates
            .days()
            .chain(self.non_available_dates.days())
            .copied()
            .collect();
        days.into_iter().collect()
    }

    /// The part of `selection` that does not collide with a booked instant.
    ///
    /// Collisions are by exact instant. A free time on a day that also has
    /// bookings passes.
    pub fn conflict_free(&self, selection: &[Timestamp]) -> Vec<Timestamp> {
        let booked: HashSet<Timestamp> = self.non_available_dates.flatten().into_iter().collect();
        selection
            .iter()
            .filter(|ts| !booked.contains(ts))
            .copied()
            .collect()
    }

    /// Recompute the partitions from what the calendar now has selected.
    ///
    /// Booked instants never become available: they are filtered out of the
    /// selection before it is regrouped as the available partition.
    pub fn select_dates(&mut self, selection: &[Timestamp]) {
        let available = self.conflict_free(selection);
        let non_available = self.non_available_dates.flatten();
        *self = Self::from_partitions(available, non_available);
    }

    /// Replace the free times of a single day. Other days and the booked
    /// partition are untouched; the day is created if absent.
    pub fn set_day_times(&mut self, day: DayKey, times: impl IntoIterator<Item = Timestamp>) {
        self.available_dates.set_day(day, times);
    }

    /// Union another state into this one, day by day, for both partitions.
    /// Existing times are kept; repeats of the same instant collapse.
    pub fn merge_union(&mut self, other: &CalendarState) {
        for (day, times) in other.available_dates.iter() {
            self.available_dates.union_day(*day, times.iter().copied());
        }
        for (day, times) in other.non_available_dates.iter() {
            self.non_available_dates.union_day(*day, times.iter().copied());
        }
    }

    /// Whether the day holds a booked slot. Such days cannot be toggled on the
    /// primary calendar.
    pub fn is_day_locked(&self, day: &DayKey) -> bool {
        self.non_available_dates.has_times_on(day)
    }

    /// The save guard: refuse only when neither partition has a single time.
    ///
    /// A day without times passes as long as some other day has one.
    pub fn check_save(&self) -> SlotDeskResult<()> {
        if self.available_dates.every_day_empty() && self.non_available_dates.every_day_empty() {
            return Err(SlotDeskError::MissingTimes);
        }
        Ok(())
    }

    /// Flatten both partitions into the save request.
    pub fn to_payload(&self) -> SchedulePayload {
        let dates = self
            .available_dates
            .flatten()
            .into_iter()
            .chain(self.non_available_dates.flatten())
            .map(|ts| ts.to_payload_string())
            .collect();
        SchedulePayload { dates }
    }

    pub fn day_rows(&self, order: DayOrder) -> Vec<DayRow> {
        let mut days = self.days();
        order.sort(&mut days);

        days.into_iter().map(|day| self.day_row(day)).collect()
    }

    pub fn day_row(&self, day: DayKey) -> DayRow {
        DayRow {
            day,
            available: sorted(self.available_dates.get(&day)),
            non_available: sorted(self.non_available_dates.get(&day)),
        }
    }
}

fn sorted(times: Option<&[Timestamp]>) -> Vec<Timestamp> {
    let mut times = times.map(<[Timestamp]>::to_vec).unwrap_or_default();
    times.sort();
    times
}
