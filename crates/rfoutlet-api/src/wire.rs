// ── Wire types ──
//
// Serde mirrors of the JSON the outlet server speaks. Field names match
// the protocol exactly; normalization into domain types happens in
// `rfoutlet-core::convert`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Envelope ────────────────────────────────────────────────────────

/// Discriminator of an outbound envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Status,
    Group,
    Outlet,
    Interval,
}

/// The `{ "type": ..., "data": ... }` wrapper around every outbound command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub data: Value,
}

impl Envelope {
    pub fn new(kind: MessageType, data: Value) -> Self {
        Self { kind, data }
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// A group as broadcast by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireGroup {
    pub id: String,
    pub name: String,
    /// `null` or absent when the group has no outlets.
    #[serde(default)]
    pub outlets: Option<Vec<WireOutlet>>,
}

/// An outlet as broadcast by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOutlet {
    pub id: String,
    pub name: String,
    /// `0` = off, `1` = on.
    pub state: u8,
    /// `null` or absent when no intervals are configured.
    #[serde(default)]
    pub schedule: Option<Vec<WireInterval>>,
}

/// A schedule interval in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireInterval {
    /// `null` for an interval that does not exist on the server yet.
    pub id: Option<String>,
    pub enabled: bool,
    #[serde(default)]
    pub weekdays: Vec<u8>,
    pub from: Option<WireDayTime>,
    pub to: Option<WireDayTime>,
}

/// Time of day without a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDayTime {
    pub hour: u32,
    pub minute: u32,
}

/// Parse a full snapshot from an already-unpacked JSON value.
pub fn parse_snapshot(value: Value) -> Result<Vec<WireGroup>, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn envelope_serializes_type_field() {
        let env = Envelope::new(MessageType::Status, json!({}));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({ "type": "status", "data": {} })
        );
    }

    #[test]
    fn snapshot_accepts_null_collections() {
        let raw = json!([
            { "id": "g1", "name": "Living room", "outlets": null },
            { "id": "g2", "name": "Garden", "outlets": [
                { "id": "o1", "name": "Pump", "state": 1, "schedule": null }
            ]}
        ]);

        let groups = parse_snapshot(raw).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[0].outlets.is_none());
        let outlets = groups[1].outlets.as_ref().unwrap();
        assert_eq!(outlets[0].state, 1);
        assert!(outlets[0].schedule.is_none());
    }

    #[test]
    fn interval_with_null_times() {
        let raw = json!({
            "id": null,
            "enabled": false,
            "weekdays": [],
            "from": null,
            "to": { "hour": 22, "minute": 30 }
        });

        let interval: WireInterval = serde_json::from_value(raw).unwrap();
        assert!(interval.id.is_none());
        assert!(interval.from.is_none());
        assert_eq!(interval.to, Some(WireDayTime { hour: 22, minute: 30 }));
    }

    #[test]
    fn snapshot_rejects_non_array() {
        assert!(parse_snapshot(json!({ "groups": [] })).is_err());
    }
}
