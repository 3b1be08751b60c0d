//! Schedule interval command handlers.

use serde::Serialize;
use tabled::Tabled;

use rfoutlet_core::format::{format_interval_times, format_weekdays};
use rfoutlet_core::{Command, Group, Interval, IntervalAction, Session, Weekdays};

use crate::cli::{GlobalOpts, IntervalArgs, IntervalCommand, IntervalTimes};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

/// An interval with the outlet it belongs to.
#[derive(Serialize)]
struct IntervalEntry<'a> {
    outlet: &'a str,
    #[serde(flatten)]
    interval: &'a Interval,
}

#[derive(Tabled)]
struct IntervalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Outlet")]
    outlet: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Time")]
    time: String,
}

impl IntervalRow {
    fn new(entry: &IntervalEntry<'_>, color: bool) -> Self {
        Self {
            id: entry.interval.id.clone().unwrap_or_default(),
            outlet: entry.outlet.to_owned(),
            status: output::paint_enabled(entry.interval.enabled, color),
            days: format_weekdays(&entry.interval.weekdays),
            time: format_interval_times(entry.interval),
        }
    }
}

fn entries<'a>(groups: &'a [Group], outlet: Option<&str>) -> Vec<IntervalEntry<'a>> {
    groups
        .iter()
        .flat_map(|g| &g.outlets)
        .filter(|o| outlet.is_none_or(|id| o.id == id))
        .flat_map(|o| {
            o.schedule.iter().map(|interval| IntervalEntry {
                outlet: &o.id,
                interval,
            })
        })
        .collect()
}

fn render_intervals(
    groups: &[Group],
    outlet: Option<&str>,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    let color = output::should_color(&global.color);
    output::render_list(
        &global.output,
        &entries(groups, outlet),
        |e| IntervalRow::new(e, color),
        |e| e.interval.id.clone().unwrap_or_default(),
    )
}

// ── Editing ─────────────────────────────────────────────────────────

/// Overlay the given flags onto `interval`; unset flags keep the old value.
fn apply_times(interval: &mut Interval, times: IntervalTimes) {
    if let Some(from) = times.from {
        interval.from = Some(from);
    }
    if let Some(to) = times.to {
        interval.to = Some(to);
    }
    if let Some(days) = times.days {
        interval.weekdays = days.into_iter().collect::<Weekdays>();
    }
}

/// Send one schedule change and print the owning outlet's intervals.
async fn submit(
    session: &Session,
    outlet_id: &str,
    action: IntervalAction,
    interval: Interval,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    tracing::info!(outlet = %outlet_id, %action, "changing schedule");
    let updated = session
        .execute(
            Command::Interval {
                outlet_id: outlet_id.to_owned(),
                action,
                interval,
            },
            session.config().connect_timeout,
        )
        .await?;

    let out = render_intervals(&updated, Some(outlet_id), global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Look up an existing interval and hand back an owned copy with its owner.
fn existing(groups: &[Group], id: &str) -> Result<(String, Interval), CliError> {
    let (outlet, interval) = util::find_interval(groups, id)?;
    Ok((outlet.id.clone(), interval.clone()))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: IntervalArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snapshot = util::initial_snapshot(session).await?;

    match args.command {
        IntervalCommand::List { outlet } => {
            if let Some(id) = &outlet {
                util::find_outlet(&snapshot, id)?;
            }
            let out = render_intervals(&snapshot, outlet.as_deref(), global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        IntervalCommand::Add {
            outlet,
            times,
            enabled,
        } => {
            util::find_outlet(&snapshot, &outlet)?;
            let mut interval = Interval {
                enabled,
                ..Interval::draft()
            };
            apply_times(&mut interval, times);
            submit(session, &outlet, IntervalAction::Create, interval, global).await
        }

        IntervalCommand::Update { id, times, enabled } => {
            let (outlet, mut interval) = existing(&snapshot, &id)?;
            apply_times(&mut interval, times);
            if let Some(enabled) = enabled {
                interval.enabled = enabled;
            }
            submit(session, &outlet, IntervalAction::Update, interval, global).await
        }

        IntervalCommand::Enable { id } => {
            let (outlet, interval) = existing(&snapshot, &id)?;
            let interval = Interval {
                enabled: true,
                ..interval
            };
            submit(session, &outlet, IntervalAction::Update, interval, global).await
        }

        IntervalCommand::Disable { id } => {
            let (outlet, interval) = existing(&snapshot, &id)?;
            let interval = Interval {
                enabled: false,
                ..interval
            };
            submit(session, &outlet, IntervalAction::Update, interval, global).await
        }

        IntervalCommand::Toggle { id } => {
            let (outlet, interval) = existing(&snapshot, &id)?;
            submit(session, &outlet, IntervalAction::Update, interval.toggled(), global).await
        }

        IntervalCommand::Delete { id } => {
            let (outlet, interval) = existing(&snapshot, &id)?;
            submit(session, &outlet, IntervalAction::Delete, interval, global).await
        }
    }
}
