// ── Display helpers ──
//
// Human-readable renderings of schedule data, shared by every front end.

use crate::model::{DayTime, Interval, Weekday, Weekdays};

/// Placeholder shown for a missing day time.
pub const UNSET: &str = "unset";

/// `HH:MM` with zero-padded 24-hour fields, or [`UNSET`].
pub fn format_day_time(t: Option<&DayTime>) -> String {
    t.map_or_else(|| UNSET.to_owned(), DayTime::to_string)
}

/// `"<from> - <to>"`, each side formatted by [`format_day_time`].
pub fn format_day_time_range(from: Option<&DayTime>, to: Option<&DayTime>) -> String {
    format!("{} - {}", format_day_time(from), format_day_time(to))
}

pub fn format_interval_times(interval: &Interval) -> String {
    format_day_time_range(interval.from.as_ref(), interval.to.as_ref())
}

/// Comma-separated short names (`Sun, Mon`) in ascending order, or
/// [`UNSET`] for an empty set.
pub fn format_weekdays(days: &Weekdays) -> String {
    if days.is_empty() {
        return UNSET.to_owned();
    }
    days.iter()
        .map(Weekday::short_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated full names (`Sunday, Monday`) in ascending order.
pub fn format_weekdays_long(days: &Weekdays) -> String {
    if days.is_empty() {
        return UNSET.to_owned();
    }
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Count of enabled intervals with pluralization; empty when none are
/// enabled.
pub fn summarize_schedule(schedule: &[Interval]) -> String {
    match schedule.iter().filter(|i| i.enabled).count() {
        0 => String::new(),
        1 => "1 interval scheduled".to_owned(),
        n => format!("{n} intervals scheduled"),
    }
}
