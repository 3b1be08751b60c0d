// ── DayTime domain type ──

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A time of day in local form.
///
/// Held as a wall-clock date-time anchored on some day (normally the day
/// it was decoded) so that time-picker style consumers can work with a
/// full date-time. Only hour and minute carry meaning: equality,
/// ordering, hashing and re-encoding all ignore the anchor date.
#[derive(Debug, Clone, Copy)]
pub struct DayTime(NaiveDateTime);

impl DayTime {
    /// Build a day time anchored on today's local date.
    pub fn new(hour: u32, minute: u32) -> Result<Self, CoreError> {
        Self::anchored(Local::now().date_naive(), hour, minute)
    }

    /// Build a day time anchored on `date`.
    pub fn anchored(date: NaiveDate, hour: u32, minute: u32) -> Result<Self, CoreError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            CoreError::validation(format!("invalid time of day {hour:02}:{minute:02}"))
        })?;
        Ok(Self(date.and_time(time)))
    }

    /// Wrap an existing local date-time. Seconds and below are dropped.
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        let time = datetime.time();
        let truncated = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        Self(datetime.date().and_time(truncated))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// The anchored date-time, for widgets that need a full timestamp.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// The day this value is anchored on. Meaningless for comparisons.
    pub fn anchor(&self) -> NaiveDate {
        self.0.date()
    }

    fn key(self) -> (u32, u32) {
        (self.hour(), self.minute())
    }
}

impl PartialEq for DayTime {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for DayTime {}

impl PartialOrd for DayTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DayTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for DayTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for DayTime {
    type Err = CoreError;

    /// Parse `HH:MM`, anchored on today.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|_| CoreError::validation(format!("expected HH:MM, got '{s}'")))?;
        Self::new(time.hour(), time.minute())
    }
}

impl Serialize for DayTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
