//! Batch mode: pick many days once, give them all the same times.
//!
//! A [`BatchSession`] is scratch space next to the primary [`CalendarState`].
//! Days are selected into it, a list of candidate wall-clock times is edited,
//! `apply` stamps those times onto every selected day, and `commit` unions the
//! result into the primary state.

use serde::{Deserialize, Serialize};

use crate::calendar_state::CalendarState;
use crate::error::{SlotDeskError, SlotDeskResult};
use crate::time::{DayKey, TimeOfDay, Timestamp};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPhase {
    /// Days are being picked on the calendar.
    #[default]
    Selecting,
    /// The time editor is open.
    TimeEditing,
    /// Candidate times were stamped onto the selected days; ready to commit.
    Applied,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSession {
    state: CalendarState,
    phase: BatchPhase,
    candidate_times: Vec<TimeOfDay>,
}

impl BatchSession {
    /// A fresh session always starts with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn candidate_times(&self) -> &[TimeOfDay] {
        &self.candidate_times
    }

    pub fn has_selection(&self) -> bool {
        !self.state.calendar_value().is_empty()
    }

    /// Recompute the batch selection. A selection change invalidates an
    /// earlier `apply`.
    pub fn select_dates(&mut self, selection: &[Timestamp]) {
        self.state.select_dates(selection);
        if self.phase == BatchPhase::Applied {
            self.phase = BatchPhase::Selecting;
        }
    }

    pub fn open_time_editor(&mut self) -> SlotDeskResult<()> {
        if !self.has_selection() {
            return Err(SlotDeskError::EmptyBatchSelection);
        }
        self.phase = BatchPhase::TimeEditing;
        Ok(())
    }

    /// Closes the editor and forgets the candidate times.
    pub fn cancel_time_editor(&mut self) {
        self.candidate_times.clear();
        if self.phase == BatchPhase::TimeEditing {
            self.phase = BatchPhase::Selecting;
        }
    }

    /// Add a candidate time. Returns `false` without changing anything when a
    /// candidate with the same hour and minute is already listed.
    pub fn add_time(&mut self, time: TimeOfDay) -> SlotDeskResult<bool> {
        self.require_editor()?;
        if self
            .candidate_times
            .iter()
            .any(|t| t.hour() == time.hour() && t.minute() == time.minute())
        {
            return Ok(false);
        }
        self.candidate_times.push(time);
        Ok(true)
    }

    pub fn edit_time(&mut self, index: usize, time: TimeOfDay) -> SlotDeskResult<()> {
        self.require_editor()?;
        let slot = self
            .candidate_times
            .get_mut(index)
            .ok_or(SlotDeskError::NoSuchBatchTime(index))?;
        *slot = time;
        Ok(())
    }

    pub fn remove_time(&mut self, index: usize) -> SlotDeskResult<TimeOfDay> {
        self.require_editor()?;
        if index >= self.candidate_times.len() {
            return Err(SlotDeskError::NoSuchBatchTime(index));
        }
        Ok(self.candidate_times.remove(index))
    }

    /// Give every selected day, in both partitions, exactly the candidate times.
    ///
    /// Each day's list is replaced, not extended. With no candidates every
    /// selected day ends up with an empty list.
    pub fn apply(&mut self) -> SlotDeskResult<()> {
        self.require_editor()?;

        let mut computed = CalendarState::new();
        for (day, _) in self.state.available_dates.iter() {
            let times = self.stamp(day)?;
            computed.available_dates.set_day(*day, times);
        }
        for (day, _) in self.state.non_available_dates.iter() {
            let times = self.stamp(day)?;
            computed.non_available_dates.set_day(*day, times);
        }

        self.state = computed;
        self.phase = BatchPhase::Applied;
        Ok(())
    }

    /// Union the applied times into `primary`, ending the session.
    ///
    /// Returns how many day lists were merged. A session that was never
    /// applied merges nothing.
    pub fn commit(self, primary: &mut CalendarState) -> usize {
        if self.phase != BatchPhase::Applied {
            tracing::warn!(
                phase = ?self.phase,
                "batch committed before applying times, nothing merged"
            );
            return 0;
        }
        primary.merge_union(&self.state);
        self.state.available_dates.len() + self.state.non_available_dates.len()
    }

    fn stamp(&self, day: &DayKey) -> SlotDeskResult<Vec<Timestamp>> {
        self.candidate_times.iter().map(|t| day.at(*t)).collect()
    }

    fn require_editor(&self) -> SlotDeskResult<()> {
        match self.phase {
            BatchPhase::TimeEditing => Ok(()),
            _ => Err(SlotDeskError::BatchTimeEditorClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::BOOKING_TZ;
    use chrono::{TimeZone, Utc};

    fn local(m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        let t = BOOKING_TZ.with_ymd_and_hms(2025, m, d, h, min, 0).unwrap();
        Timestamp::from(t.with_timezone(&Utc))
    }

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    fn time(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn selected(days: &[&str]) -> BatchSession {
        let mut session = BatchSession::new();
        let selection: Vec<_> = days.iter().map(|d| day(d).start().unwrap()).collect();
        session.select_dates(&selection);
        session
    }

    #[test]
    fn test_editor_refuses_empty_selection() {
        let mut session = BatchSession::new();
        assert!(matches!(
            session.open_time_editor(),
            Err(SlotDeskError::EmptyBatchSelection)
        ));
        assert_eq!(session.phase(), BatchPhase::Selecting);
    }

    #[test]
    fn test_apply_stamps_times_on_every_day() {
        let mut session = selected(&["01/01/2025", "01/02/2025"]);
        session.open_time_editor().unwrap();
        session.add_time(time("09:00")).unwrap();
        session.add_time(time("13:00")).unwrap();
        session.apply().unwrap();

        let state = session.state();
        assert_eq!(
            state.available_dates.get(&day("01/01/2025")).unwrap(),
            &[local(1, 1, 9, 0), local(1, 1, 13, 0)]
        );
        assert_eq!(
            state.available_dates.get(&day("01/02/2025")).unwrap(),
            &[local(1, 2, 9, 0), local(1, 2, 13, 0)]
        );
        assert!(state.calendar_value().iter().all(|ts| ts.millis() % 60_000 == 0));
        assert_eq!(session.phase(), BatchPhase::Applied);
    }

    #[test]
    fn test_apply_ignores_prior_day_content() {
        let mut session = BatchSession::new();
        session.select_dates(&[local(1, 1, 7, 45), local(1, 1, 18, 0)]);
        session.open_time_editor().unwrap();
        session.add_time(time("10:00")).unwrap();
        session.apply().unwrap();

        assert_eq!(session.state().available_dates.flatten(), vec![local(1, 1, 10, 0)]);
    }

    #[test]
    fn test_apply_stamps_booked_days_too() {
        let mut session = BatchSession {
            state: CalendarState::from_partitions([local(1, 1, 7, 0)], [local(1, 2, 15, 0)]),
            ..BatchSession::new()
        };
        session.open_time_editor().unwrap();
        session.add_time(time("09:00")).unwrap();
        session.add_time(time("11:30")).unwrap();
        session.apply().unwrap();

        let state = session.state();
        assert_eq!(
            state.available_dates.get(&day("01/01/2025")).unwrap(),
            &[local(1, 1, 9, 0), local(1, 1, 11, 30)]
        );
        assert_eq!(
            state.non_available_dates.get(&day("01/02/2025")).unwrap(),
            &[local(1, 2, 9, 0), local(1, 2, 11, 30)]
        );
        assert!(state.available_dates.get(&day("01/02/2025")).is_none());
    }

    #[test]
    fn test_add_time_skips_same_hour_and_minute() {
        let mut session = selected(&["01/01/2025"]);
        session.open_time_editor().unwrap();

        assert!(session.add_time(time("09:00")).unwrap());
        assert!(!session.add_time(time("09:00")).unwrap());
        assert_eq!(session.candidate_times(), &[time("09:00")]);
    }

    #[test]
    fn test_edit_and_remove_times() {
        let mut session = selected(&["01/01/2025"]);
        session.open_time_editor().unwrap();
        session.add_time(time("09:00")).unwrap();
        session.add_time(time("10:00")).unwrap();

        session.edit_time(0, time("08:30")).unwrap();
        assert_eq!(session.remove_time(1).unwrap(), time("10:00"));
        assert_eq!(session.candidate_times(), &[time("08:30")]);
        assert!(matches!(
            session.remove_time(3),
            Err(SlotDeskError::NoSuchBatchTime(3))
        ));
    }

    #[test]
    fn test_time_edits_need_open_editor() {
        let mut session = selected(&["01/01/2025"]);
        assert!(matches!(
            session.add_time(time("09:00")),
            Err(SlotDeskError::BatchTimeEditorClosed)
        ));
        assert!(matches!(session.apply(), Err(SlotDeskError::BatchTimeEditorClosed)));
    }

    #[test]
    fn test_cancel_clears_candidates() {
        let mut session = selected(&["01/01/2025"]);
        session.open_time_editor().unwrap();
        session.add_time(time("09:00")).unwrap();
        session.cancel_time_editor();

        assert!(session.candidate_times().is_empty());
        assert_eq!(session.phase(), BatchPhase::Selecting);
    }

    #[test]
    fn test_commit_unions_into_primary() {
        let mut primary = CalendarState::from_partitions([local(1, 1, 8, 0)], []);

        let mut session = selected(&["01/01/2025"]);
        session.open_time_editor().unwrap();
        session.add_time(time("12:00")).unwrap();
        session.add_time(time("08:00")).unwrap();
        session.apply().unwrap();

        assert_eq!(session.commit(&mut primary), 1);

        let mut times = primary.available_dates.get(&day("01/01/2025")).unwrap().to_vec();
        times.sort();
        assert_eq!(times, vec![local(1, 1, 8, 0), local(1, 1, 12, 0)]);
    }

    #[test]
    fn test_commit_without_apply_merges_nothing() {
        let mut primary = CalendarState::from_partitions([local(1, 1, 8, 0)], []);
        let session = selected(&["01/05/2025"]);

        assert_eq!(session.commit(&mut primary), 0);
        assert!(!primary.available_dates.has_times_on(&day("01/05/2025")));
    }

    #[test]
    fn test_reselecting_after_apply_needs_new_apply() {
        let mut session = selected(&["01/01/2025"]);
        session.open_time_editor().unwrap();
        session.add_time(time("09:00")).unwrap();
        session.apply().unwrap();

        let mut selection = session.state().calendar_value();
        selection.push(day("01/03/2025").start().unwrap());
        session.select_dates(&selection);

        assert_eq!(session.phase(), BatchPhase::Selecting);
    }
}
