// ── Wire-to-domain conversions ──
//
// Bridges `rfoutlet_api::wire` types and `crate::model` domain types.
// Encoding is infallible and exposed as `From` impls; decoding validates
// ranges and needs an anchor date for local day times, so it goes through
// plain functions.

use chrono::{Local, NaiveDate};
use serde_json::Value;

use rfoutlet_api::wire::{self, WireDayTime, WireGroup, WireInterval, WireOutlet};

use crate::error::CoreError;
use crate::model::{DayTime, Group, Interval, Outlet, OutletState, Weekdays};

// ── DayTime ────────────────────────────────────────────────────────

impl From<&DayTime> for WireDayTime {
    fn from(t: &DayTime) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
        }
    }
}

pub fn encode_day_time(t: &DayTime) -> WireDayTime {
    WireDayTime::from(t)
}

/// Anchor a wire time of day on `anchor`, rejecting hour > 23 or minute > 59.
pub fn decode_day_time(raw: WireDayTime, anchor: NaiveDate) -> Result<DayTime, CoreError> {
    DayTime::anchored(anchor, raw.hour, raw.minute).map_err(|_| {
        CoreError::malformed(format!(
            "day time out of range: {}:{}",
            raw.hour, raw.minute
        ))
    })
}

// ── Interval ───────────────────────────────────────────────────────

impl From<&Interval> for WireInterval {
    fn from(interval: &Interval) -> Self {
        Self {
            id: interval.id.clone(),
            enabled: interval.enabled,
            weekdays: interval.weekdays.indices(),
            from: interval.from.as_ref().map(WireDayTime::from),
            to: interval.to.as_ref().map(WireDayTime::from),
        }
    }
}

pub fn encode_interval(interval: &Interval) -> WireInterval {
    WireInterval::from(interval)
}

pub fn decode_interval(raw: WireInterval, anchor: NaiveDate) -> Result<Interval, CoreError> {
    let weekdays = Weekdays::from_indices(&raw.weekdays)
        .map_err(|day| CoreError::malformed(format!("weekday out of range: {day}")))?;

    Ok(Interval {
        id: raw.id,
        enabled: raw.enabled,
        weekdays,
        from: raw.from.map(|t| decode_day_time(t, anchor)).transpose()?,
        to: raw.to.map(|t| decode_day_time(t, anchor)).transpose()?,
    })
}

// ── Outlet / Group ─────────────────────────────────────────────────

fn decode_outlet(raw: WireOutlet, anchor: NaiveDate) -> Result<Outlet, CoreError> {
    let state = OutletState::from_wire(raw.state).ok_or_else(|| {
        CoreError::malformed(format!("outlet {} has unknown state {}", raw.id, raw.state))
    })?;

    let schedule = raw
        .schedule
        .unwrap_or_default()
        .into_iter()
        .map(|i| decode_interval(i, anchor))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Outlet {
        id: raw.id,
        name: raw.name,
        state,
        schedule,
    })
}

fn decode_group(raw: WireGroup, anchor: NaiveDate) -> Result<Group, CoreError> {
    let outlets = raw
        .outlets
        .unwrap_or_default()
        .into_iter()
        .map(|o| decode_outlet(o, anchor))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Group {
        id: raw.id,
        name: raw.name,
        outlets,
    })
}

impl From<&Outlet> for WireOutlet {
    fn from(outlet: &Outlet) -> Self {
        Self {
            id: outlet.id.clone(),
            name: outlet.name.clone(),
            state: outlet.state.to_wire(),
            schedule: Some(outlet.schedule.iter().map(WireInterval::from).collect()),
        }
    }
}

impl From<&Group> for WireGroup {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            outlets: Some(group.outlets.iter().map(WireOutlet::from).collect()),
        }
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

/// Decode a snapshot with day times anchored on today's local date.
pub fn decode_snapshot(groups: Vec<WireGroup>) -> Result<Vec<Group>, CoreError> {
    decode_snapshot_on(groups, Local::now().date_naive())
}

/// Decode a snapshot with day times anchored on `anchor`.
///
/// `null` outlet lists and schedules become empty; order is preserved.
/// Any out-of-range value rejects the whole snapshot.
pub fn decode_snapshot_on(
    groups: Vec<WireGroup>,
    anchor: NaiveDate,
) -> Result<Vec<Group>, CoreError> {
    groups
        .into_iter()
        .map(|g| decode_group(g, anchor))
        .collect()
}

/// Decode an inbound JSON payload straight into domain groups.
pub fn decode_payload(payload: Value) -> Result<Vec<Group>, CoreError> {
    let groups = wire::parse_snapshot(payload).map_err(|e| CoreError::malformed(e.to_string()))?;
    decode_snapshot(groups)
}

pub fn encode_snapshot(groups: &[Group]) -> Vec<WireGroup> {
    groups.iter().map(WireGroup::from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Weekday;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn day_time_round_trip_keeps_hour_and_minute() {
        let wire = WireDayTime {
            hour: 23,
            minute: 59,
        };
        let local = decode_day_time(wire, anchor()).unwrap();
        assert_eq!(local.anchor(), anchor());
        assert_eq!(encode_day_time(&local), wire);
    }

    #[test]
    fn every_minute_of_the_day_round_trips() {
        for hour in 0..24 {
            for minute in 0..60 {
                let wire = WireDayTime { hour, minute };
                let local = decode_day_time(wire, anchor()).unwrap();
                assert_eq!(encode_day_time(&local), wire, "{hour:02}:{minute:02}");
            }
        }
    }

    #[test]
    fn day_time_out_of_range_is_rejected() {
        let err = decode_day_time(WireDayTime { hour: 24, minute: 0 }, anchor()).unwrap_err();
        assert!(matches!(err, CoreError::MalformedSnapshot { .. }));
        assert!(decode_day_time(WireDayTime { hour: 0, minute: 60 }, anchor()).is_err());
    }

    #[test]
    fn interval_round_trip() {
        let interval = Interval {
            id: Some("i1".into()),
            enabled: true,
            weekdays: Weekdays::from([Weekday::Tuesday, Weekday::Sunday]),
            from: Some(DayTime::anchored(anchor(), 6, 15).unwrap()),
            to: None,
        };

        let wire = encode_interval(&interval);
        assert_eq!(wire.weekdays, vec![0, 2]);
        assert_eq!(wire.to, None);

        assert_eq!(decode_interval(wire, anchor()).unwrap(), interval);
    }

    #[test]
    fn snapshot_normalizes_null_collections() {
        let raw = wire::parse_snapshot(json!([
            { "id": "g1", "name": "Empty", "outlets": null },
            { "id": "g2", "name": "Garden", "outlets": [
                { "id": "o1", "name": "Pump", "state": 1, "schedule": null },
                { "id": "o2", "name": "Lights", "state": 0, "schedule": [
                    { "id": "i1", "enabled": true, "weekdays": [5, 1],
                      "from": { "hour": 18, "minute": 0 },
                      "to": { "hour": 23, "minute": 30 } }
                ]}
            ]}
        ]))
        .unwrap();

        let groups = decode_snapshot_on(raw, anchor()).unwrap();

        assert_eq!(groups.len(), 2);
        assert!(groups[0].outlets.is_empty());
        let pump = &groups[1].outlets[0];
        assert_eq!(pump.state, OutletState::On);
        assert!(pump.schedule.is_empty());

        let lights = &groups[1].outlets[1];
        assert_eq!(lights.state, OutletState::Off);
        assert_eq!(lights.schedule[0].weekdays.indices(), vec![1, 5]);
        assert_eq!(lights.schedule[0].to.unwrap().to_string(), "23:30");
    }

    #[test]
    fn snapshot_rejects_unknown_state_and_weekday() {
        let bad_state = wire::parse_snapshot(json!([
            { "id": "g", "name": "g", "outlets": [
                { "id": "o", "name": "o", "state": 2, "schedule": [] }
            ]}
        ]))
        .unwrap();
        assert!(decode_snapshot_on(bad_state, anchor()).is_err());

        let bad_day = wire::parse_snapshot(json!([
            { "id": "g", "name": "g", "outlets": [
                { "id": "o", "name": "o", "state": 0, "schedule": [
                    { "id": "i", "enabled": false, "weekdays": [7], "from": null, "to": null }
                ]}
            ]}
        ]))
        .unwrap();
        assert!(decode_snapshot_on(bad_day, anchor()).is_err());
    }

    #[test]
    fn encode_snapshot_mirrors_decode() {
        let raw = json!([
            { "id": "g1", "name": "Desk", "outlets": [
                { "id": "o1", "name": "Fan", "state": 0, "schedule": [] }
            ]}
        ]);
        let groups = decode_payload(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(encode_snapshot(&groups)).unwrap(), raw);
    }

    #[test]
    fn payload_that_is_not_a_group_list_is_malformed() {
        let err = decode_payload(json!({ "hello": "world" })).unwrap_err();
        assert!(matches!(err, CoreError::MalformedSnapshot { .. }));
    }
}
