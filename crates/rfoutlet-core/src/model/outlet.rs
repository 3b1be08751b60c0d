// ── Outlet domain type ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::interval::Interval;

/// Switch state as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutletState {
    Off,
    On,
}

impl OutletState {
    /// Wire encoding is `0` for off and `1` for on.
    pub fn from_wire(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

/// Whether an outlet is driven by its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScheduleState {
    /// No enabled intervals; manual control is available.
    Unscheduled,
    /// At least one enabled interval; manual toggling is refused.
    Scheduled,
}

/// A remotely switchable power outlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    pub id: String,
    pub name: String,
    pub state: OutletState,
    /// Intervals in server order. Empty when none are configured.
    pub schedule: Vec<Interval>,
}

impl Outlet {
    pub fn enabled_interval_count(&self) -> usize {
        self.schedule.iter().filter(|i| i.enabled).count()
    }

    pub fn schedule_state(&self) -> ScheduleState {
        if self.enabled_interval_count() > 0 {
            ScheduleState::Scheduled
        } else {
            ScheduleState::Unscheduled
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule_state() == ScheduleState::Scheduled
    }

    /// Manual on/off is only offered while no interval is enabled.
    pub fn manual_toggle_enabled(&self) -> bool {
        !self.is_scheduled()
    }

    pub fn interval(&self, id: &str) -> Option<&Interval> {
        self.schedule.iter().find(|i| i.id.as_deref() == Some(id))
    }
}
