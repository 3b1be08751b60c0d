// ── Schedule interval ──

use serde::{Deserialize, Serialize};

use super::day_time::DayTime;
use super::weekday::{Weekday, Weekdays};

/// One time window in an outlet's schedule.
///
/// An interval without an `id` is a draft that has not been created on
/// the server yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub id: Option<String>,
    pub enabled: bool,
    pub weekdays: Weekdays,
    pub from: Option<DayTime>,
    pub to: Option<DayTime>,
}

impl Interval {
    /// A fresh draft: no id, disabled, no days, no times.
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Ready to be sent as a create or update: at least one weekday and
    /// both bounds set.
    pub fn is_complete(&self) -> bool {
        !self.weekdays.is_empty() && self.from.is_some() && self.to.is_some()
    }

    /// Copy with `enabled` flipped.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            enabled: !self.enabled,
            ..self.clone()
        }
    }

    /// Copy with `day` added to or removed from the weekday set.
    #[must_use]
    pub fn with_weekday_toggled(&self, day: Weekday) -> Self {
        Self {
            weekdays: self.weekdays.toggled(day),
            ..self.clone()
        }
    }
}
