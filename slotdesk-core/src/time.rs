//! Timestamps, day keys and wall-clock times in the booking time zone.
//!
//! Every instant the admin works with is an absolute point in time, but all
//! grouping and display happens on the civil calendar of [`BOOKING_TZ`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{SlotDeskError, SlotDeskResult};

/// The fixed civil time zone of the booking calendar.
pub const BOOKING_TZ: Tz = chrono_tz::Europe::Berlin;

const DAY_KEY_FORMAT: &str = "%m/%d/%Y";
const ISO_DAY_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const PAYLOAD_FORMAT: &str = "%Y-%m-%d %H:%M";
const DISPLAY_FORMAT: &str = "%a %d.%m.%Y %H:%M";

/// An absolute instant, exchanged with the backend as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>);

impl Timestamp {
    pub fn from_millis(millis: i64) -> SlotDeskResult<Self> {
        DateTime::from_timestamp_millis(millis)
            .map(Timestamp)
            .ok_or(SlotDeskError::InvalidTimestamp(millis))
    }

    /// Epoch milliseconds, or a booking-zone wall-clock time written
    /// `YYYY-MM-DD HH:MM` / `MM/DD/YYYY HH:MM`.
    pub fn parse(s: &str) -> SlotDeskResult<Self> {
        let s = s.trim();
        if let Ok(millis) = s.parse::<i64>() {
            return Self::from_millis(millis);
        }
        let (day, time) = s
            .split_once(' ')
            .ok_or_else(|| SlotDeskError::InvalidTime(s.to_string()))?;
        DayKey::parse(day)?.at(TimeOfDay::parse(time)?)
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The instant on the booking calendar's wall clock.
    pub fn zoned(&self) -> DateTime<Tz> {
        self.0.with_timezone(&BOOKING_TZ)
    }

    pub fn day_key(&self) -> DayKey {
        DayKey::from_date(self.zoned().date_naive())
    }

    /// `yyyy-LL-dd HH:mm`, the format the backend expects when saving.
    pub fn to_payload_string(&self) -> String {
        self.zoned().format(PAYLOAD_FORMAT).to_string()
    }

    /// `ccc dd.LL.yyyy HH:mm`, e.g. `Wed 01.01.2025 10:00`.
    pub fn to_display_string(&self) -> String {
        self.zoned().format(DISPLAY_FORMAT).to_string()
    }

    pub fn to_short_time(&self) -> String {
        self.zoned().format(TIME_FORMAT).to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl FromStr for Timestamp {
    type Err = SlotDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

/// A civil day in [`BOOKING_TZ`], written `MM/DD/YYYY`.
///
/// Ordering follows the calendar. The string form does not sort
/// chronologically across years; see [`DayOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey {
    date: NaiveDate,
}

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        DayKey { date }
    }

    /// Accepts `MM/DD/YYYY` (the key format) and `YYYY-MM-DD`.
    pub fn parse(s: &str) -> SlotDeskResult<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(s, ISO_DAY_FORMAT))
            .map(DayKey::from_date)
            .map_err(|_| SlotDeskError::InvalidDayKey(s.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The instant this day reads `time` on the booking calendar's wall clock,
    /// seconds and milliseconds zeroed.
    ///
    /// Times skipped by a DST jump move forward one hour; times repeated by a
    /// DST fall-back resolve to the earlier instant.
    pub fn at(&self, time: TimeOfDay) -> SlotDeskResult<Timestamp> {
        let naive = self.date.and_time(time.naive());
        let zoned = match BOOKING_TZ.from_local_datetime(&naive) {
            LocalResult::Single(t) => t,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => BOOKING_TZ
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .ok_or_else(|| SlotDeskError::NonexistentLocalTime(format!("{self} {time}")))?,
        };
        Ok(Timestamp(zoned.with_timezone(&Utc)))
    }

    /// The first instant of the day, used when a day is picked without a time.
    pub fn start(&self) -> SlotDeskResult<Timestamp> {
        self.at(TimeOfDay::MIDNIGHT)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = SlotDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayKey::parse(s)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DayKey::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Order in which days are listed to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOrder {
    /// By decoded calendar date.
    #[default]
    Chronological,
    /// By the `MM/DD/YYYY` string. This is how the legacy admin listed days:
    /// `12/01/2025` comes before `02/01/2026` only by accident of the month digits,
    /// and January of a later year sorts ahead of December of an earlier one.
    Lexicographic,
}

impl DayOrder {
    pub fn sort(&self, days: &mut [DayKey]) {
        match self {
            DayOrder::Chronological => days.sort(),
            DayOrder::Lexicographic => days.sort_by_cached_key(|d| d.to_string()),
        }
    }
}

/// A wall-clock time of day with minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(NaiveTime::MIN);

    pub fn from_hm(hour: u32, minute: u32) -> SlotDeskResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeOfDay)
            .ok_or_else(|| SlotDeskError::InvalidTime(format!("{hour:02}:{minute:02}")))
    }

    pub fn parse(s: &str) -> SlotDeskResult<Self> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, TIME_FORMAT)
            .map(TimeOfDay)
            .map_err(|_| SlotDeskError::InvalidTime(s.to_string()))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    fn naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TimeOfDay::parse(&s).map_err(serde::de::Error::custom)
    }
}
