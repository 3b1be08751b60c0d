// ── Weekday domain types ──

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::iter::Copied;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoEnumIterator};

/// Day of the week, numbered the way the wire protocol numbers them:
/// Sunday is 0, Saturday is 6.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
)]
#[repr(u8)]
#[strum(ascii_case_insensitive)]
pub enum Weekday {
    #[strum(to_string = "Sunday", serialize = "sun")]
    Sunday = 0,
    #[strum(to_string = "Monday", serialize = "mon")]
    Monday = 1,
    #[strum(to_string = "Tuesday", serialize = "tue")]
    Tuesday = 2,
    #[strum(to_string = "Wednesday", serialize = "wed")]
    Wednesday = 3,
    #[strum(to_string = "Thursday", serialize = "thu")]
    Thursday = 4,
    #[strum(to_string = "Friday", serialize = "fri")]
    Friday = 5,
    #[strum(to_string = "Saturday", serialize = "sat")]
    Saturday = 6,
}

impl Weekday {
    /// Wire index, 0..=6.
    #[allow(clippy::as_conversions)]
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// Three-letter label, e.g. `Sun`.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Sunday => "Sun",
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
        }
    }
}

/// A set of weekdays, always iterated in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weekdays(BTreeSet<Weekday>);

impl Weekdays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every day of the week.
    pub fn all() -> Self {
        Weekday::iter().collect()
    }

    /// Build from wire indices. Duplicates collapse; the first
    /// out-of-range index is returned as the error.
    pub fn from_indices(indices: &[u8]) -> Result<Self, u8> {
        indices
            .iter()
            .map(|&i| Weekday::from_index(i).ok_or(i))
            .collect()
    }

    /// Ascending wire indices.
    pub fn indices(&self) -> Vec<u8> {
        self.iter().map(Weekday::index).collect()
    }

    /// Symmetric difference with `{day}`: adds it if absent, removes it
    /// if present. Returns a new set and leaves `self` untouched.
    #[must_use]
    pub fn toggled(&self, day: Weekday) -> Self {
        let mut next = self.clone();
        next.toggle(day);
        next
    }

    /// In-place form of [`toggled`](Self::toggled).
    pub fn toggle(&mut self, day: Weekday) {
        if !self.0.remove(&day) {
            self.0.insert(day);
        }
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Days in ascending index order.
    pub fn iter(&self) -> Copied<btree_set::Iter<'_, Weekday>> {
        self.0.iter().copied()
    }
}

impl<'a> IntoIterator for &'a Weekdays {
    type Item = Weekday;
    type IntoIter = Copied<btree_set::Iter<'a, Weekday>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Weekday> for Weekdays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Weekday; N]> for Weekdays {
    fn from(days: [Weekday; N]) -> Self {
        days.into_iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indices_follow_sunday_first_numbering() {
        assert_eq!(Weekday::Sunday.index(), 0);
        assert_eq!(Weekday::Saturday.index(), 6);
        assert_eq!(Weekday::from_index(3), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_index(7), None);
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("sun".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert_eq!("MON".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert!("funday".parse::<Weekday>().is_err());
        assert_eq!(Weekday::Thursday.to_string(), "Thursday");
    }

    #[test]
    fn toggle_adds_then_removes() {
        let start = Weekdays::from([Weekday::Monday, Weekday::Friday]);

        let added = start.toggled(Weekday::Wednesday);
        assert_eq!(added.indices(), vec![1, 3, 5]);

        let removed = added.toggled(Weekday::Wednesday);
        assert_eq!(removed, start);
    }

    #[test]
    fn toggle_over_every_subset_and_day() {
        let week: Vec<Weekday> = Weekday::iter().collect();
        for mask in 0u8..128 {
            let set: Weekdays = week
                .iter()
                .copied()
                .filter(|d| mask & (1 << d.index()) != 0)
                .collect();

            for &day in &week {
                let next = set.toggled(day);
                let indices = next.indices();
                assert!(indices.windows(2).all(|w| w[0] < w[1]), "{indices:?}");
                assert_ne!(next.contains(day), set.contains(day));
                for other in week.iter().copied().filter(|&d| d != day) {
                    assert_eq!(next.contains(other), set.contains(other));
                }
                assert_eq!(next.toggled(day), set, "mask {mask:#09b}, {day}");
            }
        }
    }

    #[test]
    fn toggle_removes_the_only_member() {
        let only = Weekdays::from([Weekday::Saturday]);
        assert!(only.toggled(Weekday::Saturday).is_empty());
    }

    #[test]
    fn toggle_keeps_ascending_order_regardless_of_insertion() {
        let mut days = Weekdays::new();
        for day in [Weekday::Saturday, Weekday::Sunday, Weekday::Tuesday] {
            days.toggle(day);
        }
        assert_eq!(days.indices(), vec![0, 2, 6]);
    }

    #[test]
    fn from_indices_rejects_out_of_range() {
        assert_eq!(Weekdays::from_indices(&[1, 9, 2]), Err(9));
        assert_eq!(Weekdays::from_indices(&[2, 2, 0]).unwrap().indices(), vec![0, 2]);
    }

    #[test]
    fn all_contains_seven_days() {
        assert_eq!(Weekdays::all().len(), 7);
    }
}
