//! Manual outlet switching.

use rfoutlet_core::{Command, CoreError, OutletAction, Session};

use crate::cli::{GlobalOpts, OutletArgs, OutletCommand};
use crate::error::CliError;
use crate::output;

use super::{status, util};

pub async fn handle(
    session: &Session,
    args: OutletArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let OutletArgs { id, command } = args;
    let snapshot = util::initial_snapshot(session).await?;
    let outlet = util::find_outlet(&snapshot, &id)?;

    let action = match command {
        OutletCommand::Toggle => OutletAction::Toggle,
    };

    // Schedule owns the outlet while any interval is enabled
    if !outlet.manual_toggle_enabled() {
        return Err(CoreError::ScheduleControlled {
            outlet_id: outlet.id.clone(),
        }
        .into());
    }

    let updated = session
        .execute(
            Command::Outlet {
                id: id.clone(),
                action,
            },
            session.config().connect_timeout,
        )
        .await?;

    let group = updated
        .iter()
        .find(|g| g.outlet(&id).is_some())
        .ok_or_else(|| CliError::NotFound {
            resource_type: "outlet".into(),
            identifier: id.clone(),
            list_command: "status".into(),
        })?;
    let out = status::render_snapshot(std::slice::from_ref(group), global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
