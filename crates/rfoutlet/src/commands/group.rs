//! Group switching.

use rfoutlet_core::{Command, Session};

use crate::cli::{GlobalOpts, GroupArgs};
use crate::error::CliError;
use crate::output;

use super::{status, util};

pub async fn handle(session: &Session, args: GroupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let GroupArgs { id, action } = args;
    let snapshot = util::initial_snapshot(session).await?;
    util::find_group(&snapshot, &id)?;

    tracing::info!(group = %id, %action, "switching group");
    let updated = session
        .execute(
            Command::Group {
                id: id.clone(),
                action,
            },
            session.config().connect_timeout,
        )
        .await?;

    let group = util::find_group(&updated, &id)?;
    let out = status::render_snapshot(std::slice::from_ref(group), global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
