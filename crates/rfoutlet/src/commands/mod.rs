//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod group;
pub mod interval;
pub mod outlet;
pub mod status;
pub mod util;
pub mod watch;

use rfoutlet_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => status::handle(session, &args, global).await,
        Command::Watch => watch::handle(session, global).await,
        Command::Group(args) => group::handle(session, args, global).await,
        Command::Outlet(args) => outlet::handle(session, args, global).await,
        Command::Interval(args) => interval::handle(session, args, global).await,
        // Handled in main before a session exists
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not talk to the server".into(),
        )),
    }
}
