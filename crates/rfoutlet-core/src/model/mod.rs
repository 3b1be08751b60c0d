// ── Domain model ──
//
// Normalized, client-side view of the server's state. Wire quirks
// (nullable collections, numeric states, bare hour/minute pairs) never
// leak past `crate::convert`.

pub mod day_time;
pub mod group;
pub mod interval;
pub mod outlet;
pub mod weekday;

pub use day_time::DayTime;
pub use group::Group;
pub use interval::Interval;
pub use outlet::{Outlet, OutletState, ScheduleState};
pub use weekday::{Weekday, Weekdays};
