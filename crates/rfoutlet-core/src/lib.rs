// rfoutlet-core: Reactive client layer between rfoutlet-api and consumers (CLI).

pub mod command;
pub mod config;
pub mod convert;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{
    Command, GroupAction, GroupRequest, IntervalAction, IntervalRequest, OutletAction,
    OutletRequest, StatusRequest,
};
pub use config::ClientConfig;
pub use dispatcher::Dispatcher;
pub use error::CoreError;
pub use session::{ConnectionState, Session};
pub use store::SnapshotStore;
pub use stream::SnapshotStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DayTime, Group, Interval, Outlet, OutletState, ScheduleState, Weekday, Weekdays,
};
