//! Single owner of the calendar state.
//!
//! The operator surface never mutates state directly; it sends a [`Command`]
//! and carries out the returned [`Effect`] (refetch, persist). A command that
//! fails leaves the editor exactly as it was.

use serde::{Deserialize, Serialize};

use crate::batch::BatchSession;
use crate::calendar_state::CalendarState;
use crate::error::{SlotDeskError, SlotDeskResult};
use crate::schedule::{ScheduleEntry, SchedulePayload};
use crate::time::{DayKey, TimeOfDay, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the primary state with a freshly fetched schedule.
    Load(Vec<ScheduleEntry>),
    /// The full set of instants now picked on the calendar.
    SelectDates(Vec<Timestamp>),
    /// Toggle days on; a new day is picked at its first instant.
    AddDays(Vec<DayKey>),
    /// Toggle days off, dropping all of their picked instants.
    RemoveDays(Vec<DayKey>),
    /// Replace the free times of one day.
    SetDayTimes { day: DayKey, times: Vec<Timestamp> },
    EnterBatchMode,
    /// Discard the batch session and reload from the backend.
    ExitBatchMode,
    OpenBatchTimeEditor,
    AddBatchTime(TimeOfDay),
    EditBatchTime { index: usize, time: TimeOfDay },
    RemoveBatchTime(usize),
    CancelBatchTimeEditor,
    ApplyBatchTimes,
    /// Union the applied batch into the primary state and leave batch mode.
    CommitBatch,
    /// Throw away local edits and reload from the backend.
    Reset,
    Save,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Load(_) => "load",
            Command::SelectDates(_) => "select_dates",
            Command::AddDays(_) => "add_days",
            Command::RemoveDays(_) => "remove_days",
            Command::SetDayTimes { .. } => "set_day_times",
            Command::EnterBatchMode => "enter_batch_mode",
            Command::ExitBatchMode => "exit_batch_mode",
            Command::OpenBatchTimeEditor => "open_batch_time_editor",
            Command::AddBatchTime(_) => "add_batch_time",
            Command::EditBatchTime { .. } => "edit_batch_time",
            Command::RemoveBatchTime(_) => "remove_batch_time",
            Command::CancelBatchTimeEditor => "cancel_batch_time_editor",
            Command::ApplyBatchTimes => "apply_batch_times",
            Command::CommitBatch => "commit_batch",
            Command::Reset => "reset",
            Command::Save => "save",
        }
    }
}

/// What the caller has to do after a command went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Accepted, but nothing changed (day already picked, time already listed).
    Unchanged,
    /// Fetch the schedule and dispatch [`Command::Load`] with it.
    Refetch,
    /// Send the payload to the backend, then refetch.
    Persist(SchedulePayload),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    state: CalendarState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    batch: Option<BatchSession>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: CalendarState) -> Self {
        Editor { state, batch: None }
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn batch(&self) -> Option<&BatchSession> {
        self.batch.as_ref()
    }

    pub fn is_batch_mode(&self) -> bool {
        self.batch.is_some()
    }

    /// The state calendar interactions currently land in.
    pub fn active_state(&self) -> &CalendarState {
        match &self.batch {
            Some(batch) => batch.state(),
            None => &self.state,
        }
    }

    pub fn dispatch(&mut self, command: Command) -> SlotDeskResult<Effect> {
        tracing::debug!(command = command.name(), batch = self.is_batch_mode(), "dispatch");

        match command {
            Command::Load(entries) => {
                self.state = CalendarState::from_schedule(&entries);
                tracing::info!(
                    entries = entries.len(),
                    days = self.state.days().len(),
                    "schedule loaded"
                );
                Ok(Effect::None)
            }
            Command::SelectDates(selection) => {
                self.select(&selection);
                Ok(Effect::None)
            }
            Command::AddDays(days) => match self.selection_with(&days)? {
                Some(selection) => {
                    self.select(&selection);
                    Ok(Effect::None)
                }
                None => Ok(Effect::Unchanged),
            },
            Command::RemoveDays(days) => match self.selection_without(&days)? {
                Some(selection) => {
                    self.select(&selection);
                    Ok(Effect::None)
                }
                None => Ok(Effect::Unchanged),
            },
            Command::SetDayTimes { day, times } => {
                self.require_primary()?;
                self.state.set_day_times(day, times);
                Ok(Effect::None)
            }
            Command::EnterBatchMode => {
                self.require_primary()?;
                self.batch = Some(BatchSession::new());
                Ok(Effect::None)
            }
            Command::ExitBatchMode => {
                if self.batch.take().is_none() {
                    return Err(SlotDeskError::BatchModeInactive);
                }
                Ok(Effect::Refetch)
            }
            Command::OpenBatchTimeEditor => {
                self.batch_mut()?.open_time_editor()?;
                Ok(Effect::None)
            }
            Command::AddBatchTime(time) => {
                if self.batch_mut()?.add_time(time)? {
                    Ok(Effect::None)
                } else {
                    tracing::warn!(%time, "batch time already listed");
                    Ok(Effect::Unchanged)
                }
            }
            Command::EditBatchTime { index, time } => {
                self.batch_mut()?.edit_time(index, time)?;
                Ok(Effect::None)
            }
            Command::RemoveBatchTime(index) => {
                self.batch_mut()?.remove_time(index)?;
                Ok(Effect::None)
            }
            Command::CancelBatchTimeEditor => {
                self.batch_mut()?.cancel_time_editor();
                Ok(Effect::None)
            }
            Command::ApplyBatchTimes => {
                self.batch_mut()?.apply()?;
                Ok(Effect::None)
            }
            Command::CommitBatch => {
                let batch = self.batch.take().ok_or(SlotDeskError::BatchModeInactive)?;
                let merged = batch.commit(&mut self.state);
                tracing::info!(merged_days = merged, "batch committed");
                Ok(Effect::None)
            }
            Command::Reset => {
                self.require_primary()?;
                Ok(Effect::Refetch)
            }
            Command::Save => {
                self.require_primary()?;
                self.state.check_save()?;
                Ok(Effect::Persist(self.state.to_payload()))
            }
        }
    }

    fn select(&mut self, selection: &[Timestamp]) {
        match &mut self.batch {
            Some(batch) => batch.select_dates(selection),
            None => self.state.select_dates(selection),
        }
    }

    /// Booked days are fixed on the primary calendar; in batch mode they can be picked.
    fn check_unlocked(&self, days: &[DayKey]) -> SlotDeskResult<()> {
        if self.is_batch_mode() {
            return Ok(());
        }
        match days.iter().find(|day| self.state.is_day_locked(day)) {
            Some(day) => Err(SlotDeskError::DayLocked(day.to_string())),
            None => Ok(()),
        }
    }

    fn selection_with(&self, days: &[DayKey]) -> SlotDeskResult<Option<Vec<Timestamp>>> {
        self.check_unlocked(days)?;

        let mut selection = self.active_state().calendar_value();
        let mut changed = false;
        for day in days {
            if selection.iter().any(|ts| ts.day_key() == *day) {
                continue;
            }
            selection.push(day.start()?);
            changed = true;
        }
        Ok(changed.then_some(selection))
    }

    fn selection_without(&self, days: &[DayKey]) -> SlotDeskResult<Option<Vec<Timestamp>>> {
        self.check_unlocked(days)?;

        let active = self.active_state();
        let known = active.days();
        if !days.iter().any(|day| known.contains(day)) {
            return Ok(None);
        }

        let mut selection = active.calendar_value();
        selection.retain(|ts| !days.contains(&ts.day_key()));
        Ok(Some(selection))
    }

    fn require_primary(&self) -> SlotDeskResult<()> {
        if self.is_batch_mode() {
            return Err(SlotDeskError::BatchModeActive);
        }
        Ok(())
    }

    fn batch_mut(&mut self) -> SlotDeskResult<&mut BatchSession> {
        self.batch.as_mut().ok_or(SlotDeskError::BatchModeInactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchPhase;
    use crate::time::BOOKING_TZ;
    use chrono::{TimeZone, Utc};

    fn jan(d: u32, h: u32, m: u32) -> Timestamp {
        let t = BOOKING_TZ.with_ymd_and_hms(2025, 1, d, h, m, 0).unwrap();
        Timestamp::from(t.with_timezone(&Utc))
    }

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    fn time(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn entry(ts: Timestamp, is_booked: bool) -> ScheduleEntry {
        ScheduleEntry {
            timestamp: ts,
            is_booked,
        }
    }

    fn loaded(entries: Vec<ScheduleEntry>) -> Editor {
        let mut editor = Editor::new();
        editor.dispatch(Command::Load(entries)).unwrap();
        editor
    }

    #[test]
    fn test_add_and_remove_days_on_primary() {
        let mut editor = loaded(vec![entry(jan(1, 10, 0), false)]);

        let effect = editor.dispatch(Command::AddDays(vec![day("01/02/2025")])).unwrap();
        assert_eq!(effect, Effect::None);
        assert_eq!(
            editor.state().available_dates.get(&day("01/02/2025")).unwrap(),
            &[jan(2, 0, 0)]
        );
        // existing days keep their times
        assert_eq!(
            editor.state().available_dates.get(&day("01/01/2025")).unwrap(),
            &[jan(1, 10, 0)]
        );

        let again = editor.dispatch(Command::AddDays(vec![day("01/02/2025")])).unwrap();
        assert_eq!(again, Effect::Unchanged);

        editor.dispatch(Command::RemoveDays(vec![day("01/01/2025")])).unwrap();
        assert!(editor.state().available_dates.get(&day("01/01/2025")).is_none());
    }

    #[test]
    fn test_booked_day_is_locked_on_primary() {
        let mut editor = loaded(vec![entry(jan(3, 15, 0), true)]);
        let before = editor.clone();

        let err = editor
            .dispatch(Command::RemoveDays(vec![day("01/03/2025")]))
            .unwrap_err();
        assert!(matches!(err, SlotDeskError::DayLocked(_)));
        assert!(err.is_validation());
        assert_eq!(editor, before);
    }

    #[test]
    fn test_select_dates_filters_booked_instants() {
        let mut editor = loaded(vec![entry(jan(3, 15, 0), true)]);
        editor
            .dispatch(Command::SelectDates(vec![jan(3, 15, 0), jan(4, 9, 0)]))
            .unwrap();

        assert_eq!(editor.state().available_dates.flatten(), vec![jan(4, 9, 0)]);
        assert_eq!(editor.state().non_available_dates.flatten(), vec![jan(3, 15, 0)]);
    }

    #[test]
    fn test_set_day_times_replaces() {
        let mut editor = loaded(vec![entry(jan(1, 10, 0), false), entry(jan(2, 9, 0), false)]);
        editor
            .dispatch(Command::SetDayTimes {
                day: day("01/01/2025"),
                times: vec![jan(1, 12, 0)],
            })
            .unwrap();

        assert_eq!(
            editor.state().available_dates.get(&day("01/01/2025")).unwrap(),
            &[jan(1, 12, 0)]
        );
        assert_eq!(
            editor.state().available_dates.get(&day("01/02/2025")).unwrap(),
            &[jan(2, 9, 0)]
        );
    }

    #[test]
    fn test_batch_round_trip_unions_into_primary() {
        let mut editor = loaded(vec![entry(jan(1, 8, 0), false)]);

        editor.dispatch(Command::EnterBatchMode).unwrap();
        assert!(editor.active_state().is_empty());

        editor
            .dispatch(Command::AddDays(vec![day("01/01/2025"), day("01/02/2025")]))
            .unwrap();
        // primary is untouched while selecting in batch mode
        assert_eq!(editor.state().available_dates.len(), 1);

        editor.dispatch(Command::OpenBatchTimeEditor).unwrap();
        editor.dispatch(Command::AddBatchTime(time("09:00"))).unwrap();
        editor.dispatch(Command::AddBatchTime(time("13:00"))).unwrap();
        editor.dispatch(Command::ApplyBatchTimes).unwrap();
        assert_eq!(editor.batch().unwrap().phase(), BatchPhase::Applied);

        let effect = editor.dispatch(Command::CommitBatch).unwrap();
        assert_eq!(effect, Effect::None);
        assert!(!editor.is_batch_mode());

        let mut day1 = editor.state().available_dates.get(&day("01/01/2025")).unwrap().to_vec();
        day1.sort();
        assert_eq!(day1, vec![jan(1, 8, 0), jan(1, 9, 0), jan(1, 13, 0)]);
        assert_eq!(
            editor.state().available_dates.get(&day("01/02/2025")).unwrap(),
            &[jan(2, 9, 0), jan(2, 13, 0)]
        );
    }

    #[test]
    fn test_batch_editor_refused_without_selection() {
        let mut editor = Editor::new();
        editor.dispatch(Command::EnterBatchMode).unwrap();

        let err = editor.dispatch(Command::OpenBatchTimeEditor).unwrap_err();
        assert!(matches!(err, SlotDeskError::EmptyBatchSelection));
        assert_eq!(editor.batch().unwrap().phase(), BatchPhase::Selecting);
    }

    #[test]
    fn test_duplicate_batch_time_is_unchanged() {
        let mut editor = Editor::new();
        editor.dispatch(Command::EnterBatchMode).unwrap();
        editor.dispatch(Command::AddDays(vec![day("01/01/2025")])).unwrap();
        editor.dispatch(Command::OpenBatchTimeEditor).unwrap();

        assert_eq!(
            editor.dispatch(Command::AddBatchTime(time("09:00"))).unwrap(),
            Effect::None
        );
        assert_eq!(
            editor.dispatch(Command::AddBatchTime(time("09:00"))).unwrap(),
            Effect::Unchanged
        );
    }

    #[test]
    fn test_exit_batch_mode_discards_and_refetches() {
        let mut editor = loaded(vec![entry(jan(1, 8, 0), false)]);
        editor.dispatch(Command::EnterBatchMode).unwrap();
        editor.dispatch(Command::AddDays(vec![day("01/09/2025")])).unwrap();

        assert_eq!(editor.dispatch(Command::ExitBatchMode).unwrap(), Effect::Refetch);
        assert!(editor.batch().is_none());
        assert!(editor.state().available_dates.get(&day("01/09/2025")).is_none());
    }

    #[test]
    fn test_primary_only_commands_rejected_in_batch_mode() {
        let mut editor = loaded(vec![entry(jan(1, 8, 0), false)]);
        editor.dispatch(Command::EnterBatchMode).unwrap();

        for command in [
            Command::Save,
            Command::Reset,
            Command::EnterBatchMode,
            Command::SetDayTimes {
                day: day("01/01/2025"),
                times: vec![],
            },
        ] {
            assert!(matches!(
                editor.dispatch(command),
                Err(SlotDeskError::BatchModeActive)
            ));
        }
    }

    #[test]
    fn test_batch_commands_need_batch_mode() {
        let mut editor = Editor::new();
        assert!(matches!(
            editor.dispatch(Command::CommitBatch),
            Err(SlotDeskError::BatchModeInactive)
        ));
        assert!(matches!(
            editor.dispatch(Command::ExitBatchMode),
            Err(SlotDeskError::BatchModeInactive)
        ));
    }

    #[test]
    fn test_save_guard_and_payload() {
        let mut editor = Editor::new();
        editor.dispatch(Command::AddDays(vec![day("01/01/2025")])).unwrap();
        editor
            .dispatch(Command::SetDayTimes {
                day: day("01/01/2025"),
                times: vec![],
            })
            .unwrap();

        let before = editor.clone();
        assert!(matches!(
            editor.dispatch(Command::Save),
            Err(SlotDeskError::MissingTimes)
        ));
        assert_eq!(editor, before);

        editor
            .dispatch(Command::SetDayTimes {
                day: day("01/01/2025"),
                times: vec![jan(1, 10, 0)],
            })
            .unwrap();
        assert_eq!(
            editor.dispatch(Command::Save).unwrap(),
            Effect::Persist(SchedulePayload {
                dates: vec!["2025-01-01 10:00".to_string()]
            })
        );
    }

    #[test]
    fn test_editor_survives_json_round_trip_in_batch_mode() {
        let mut editor = loaded(vec![entry(jan(1, 8, 0), true)]);
        editor.dispatch(Command::EnterBatchMode).unwrap();
        editor.dispatch(Command::AddDays(vec![day("01/02/2025")])).unwrap();
        editor.dispatch(Command::OpenBatchTimeEditor).unwrap();
        editor.dispatch(Command::AddBatchTime(time("11:15"))).unwrap();

        let json = serde_json::to_string(&editor).unwrap();
        let back: Editor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, editor);
    }
}
