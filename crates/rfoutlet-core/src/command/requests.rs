// ── Typed payloads for outbound envelopes ──
//
// The `data` half of every `{ "type", "data" }` envelope the client sends.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use rfoutlet_api::wire::WireInterval;

/// What to do with every outlet of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GroupAction {
    On,
    Off,
    Toggle,
}

/// What to do with a single outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutletAction {
    Toggle,
}

/// Schedule mutation carried by an interval envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IntervalAction {
    Create,
    Update,
    Delete,
}

/// `status` payload: always an empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRequest {
    pub id: String,
    pub action: GroupAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutletRequest {
    pub id: String,
    pub action: OutletAction,
}

/// `id` is the owning outlet; the interval carries its own id for
/// update and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRequest {
    pub id: String,
    pub action: IntervalAction,
    pub interval: WireInterval,
}
