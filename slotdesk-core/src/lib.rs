//! Availability engine for the slotdesk booking admin.
//!
//! This crate turns the backend's flat schedule into day-keyed buckets,
//! applies the operator's edits (per day, or in batch across many days) and
//! produces the payload that is saved back:
//! - `time`: timestamps, day keys and times in the booking time zone
//! - `bucket` / `calendar_state`: grouping, merging, conflict filtering, the save guard
//! - `batch`: one set of times for many days
//! - `editor`: the command-driven state owner the CLI talks to

pub mod batch;
pub mod bucket;
pub mod calendar_state;
pub mod config;
pub mod draft;
pub mod editor;
pub mod error;
pub mod schedule;
pub mod time;

pub use batch::{BatchPhase, BatchSession};
pub use bucket::AvailabilityBucket;
pub use calendar_state::{CalendarState, DayRow};
pub use editor::{Command, Editor, Effect};
pub use error::{SlotDeskError, SlotDeskResult};
pub use schedule::{LogMessage, Request, ScheduleEntry, SchedulePayload};
pub use time::{BOOKING_TZ, DayKey, DayOrder, TimeOfDay, Timestamp};
