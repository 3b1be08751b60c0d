//! Snapshot listing: every group and outlet with state and schedule summary.

use tabled::Tabled;

use rfoutlet_core::format::summarize_schedule;
use rfoutlet_core::{Group, Outlet, Session};

use crate::cli::{GlobalOpts, OutputFormat, StatusArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutletRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
}

impl OutletRow {
    fn new(group: &Group, outlet: &Outlet, color: bool) -> Self {
        Self {
            group: group.name.clone(),
            id: outlet.id.clone(),
            name: outlet.name.clone(),
            state: output::paint_state(outlet.state, color),
            mode: output::paint_schedule(outlet.schedule_state(), color),
            schedule: summarize_schedule(&outlet.schedule),
        }
    }
}

/// Render a snapshot the way `status` prints it.
///
/// Table and plain views list one outlet per line; structured formats
/// emit the groups as received.
pub fn render_snapshot(groups: &[Group], global: &GlobalOpts) -> Result<String, CliError> {
    match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            let color = output::should_color(&global.color);
            let entries: Vec<(&Group, &Outlet)> = groups
                .iter()
                .flat_map(|g| g.outlets.iter().map(move |o| (g, o)))
                .collect();
            output::render_list(
                &global.output,
                &entries,
                |&(g, o)| OutletRow::new(g, o, color),
                |&(_, o)| format!("{}\t{}", o.id, o.state),
            )
        }
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_single(&global.output, groups, |_| String::new(), |_| String::new())
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: &StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snapshot = util::initial_snapshot(session).await?;

    let out = match &args.group {
        Some(id) => {
            let group = util::find_group(&snapshot, id)?;
            render_snapshot(std::slice::from_ref(group), global)?
        }
        None => render_snapshot(&snapshot, global)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
