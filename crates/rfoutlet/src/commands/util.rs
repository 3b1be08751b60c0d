//! Shared helpers for command handlers.

use std::sync::Arc;
use std::time::Duration;

use rfoutlet_core::{Group, Interval, Outlet, Session};

use crate::error::CliError;

/// Open the link and wait for the first full snapshot.
///
/// With `request_status_on_connect` the server is already asked on open,
/// so a second request would leave a stray snapshot in flight.
pub async fn initial_snapshot(session: &Session) -> Result<Arc<Vec<Group>>, CliError> {
    let timeout = session.config().connect_timeout;
    if !session.config().request_status_on_connect {
        session.connect().await?;
        return Ok(session.refresh(timeout).await?);
    }

    let mut stream = session.subscribe();
    session.connect().await?;
    wait_for_snapshot(stream.changed(), timeout).await
}

async fn wait_for_snapshot(
    changed: impl Future<Output = Option<Arc<Vec<Group>>>>,
    timeout: Duration,
) -> Result<Arc<Vec<Group>>, CliError> {
    match tokio::time::timeout(timeout, changed).await {
        Ok(Some(snapshot)) => Ok(snapshot),
        Ok(None) => Err(CliError::Disconnected),
        Err(_) => Err(CliError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}

pub fn find_group<'a>(groups: &'a [Group], id: &str) -> Result<&'a Group, CliError> {
    groups.iter().find(|g| g.id == id).ok_or_else(|| CliError::NotFound {
        resource_type: "group".into(),
        identifier: id.into(),
        list_command: "status".into(),
    })
}

pub fn find_outlet<'a>(groups: &'a [Group], id: &str) -> Result<&'a Outlet, CliError> {
    groups
        .iter()
        .find_map(|g| g.outlet(id))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "outlet".into(),
            identifier: id.into(),
            list_command: "status".into(),
        })
}

/// Find an interval by id, returning its owning outlet alongside.
pub fn find_interval<'a>(
    groups: &'a [Group],
    id: &str,
) -> Result<(&'a Outlet, &'a Interval), CliError> {
    groups
        .iter()
        .flat_map(|g| &g.outlets)
        .find_map(|o| o.interval(id).map(|i| (o, i)))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "interval".into(),
            identifier: id.into(),
            list_command: "interval list".into(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rfoutlet_core::{OutletState, Weekday, Weekdays};

    fn groups() -> Vec<Group> {
        vec![Group {
            id: "garden".into(),
            name: "Garden".into(),
            outlets: vec![Outlet {
                id: "pump".into(),
                name: "Pump".into(),
                state: OutletState::Off,
                schedule: vec![Interval {
                    id: Some("morning".into()),
                    enabled: true,
                    weekdays: Weekdays::from([Weekday::Monday]),
                    from: None,
                    to: None,
                }],
            }],
        }]
    }

    #[test]
    fn lookups_resolve_and_report_missing() {
        let groups = groups();
        assert_eq!(find_group(&groups, "garden").unwrap().name, "Garden");
        assert_eq!(find_outlet(&groups, "pump").unwrap().name, "Pump");

        let (owner, interval) = find_interval(&groups, "morning").unwrap();
        assert_eq!(owner.id, "pump");
        assert!(interval.enabled);

        assert!(matches!(
            find_outlet(&groups, "lamp"),
            Err(CliError::NotFound { resource_type, .. }) if resource_type == "outlet"
        ));
        assert!(find_interval(&groups, "evening").is_err());
    }
}
