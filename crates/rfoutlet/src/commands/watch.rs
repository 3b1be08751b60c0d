//! Live snapshot feed: prints every snapshot the server broadcasts.

use std::sync::Arc;

use rfoutlet_core::{ConnectionState, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{status, util};

pub async fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let first = util::initial_snapshot(session).await?;
    print_snapshot(&first, global)?;

    let mut stream = session.subscribe();
    let mut state = session.connection_state();

    // A broadcast may have landed between the first snapshot and subscribing
    if !Arc::ptr_eq(stream.current(), &first) {
        print_snapshot(stream.current(), global)?;
    }

    loop {
        tokio::select! {
            biased;

            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted, leaving watch");
                return Ok(());
            }

            changed = state.changed() => {
                if changed.is_err() || *state.borrow_and_update() == ConnectionState::Disconnected {
                    return Err(CliError::Disconnected);
                }
            }

            snapshot = stream.changed() => {
                let Some(snapshot) = snapshot else {
                    return Err(CliError::Disconnected);
                };
                print_snapshot(&snapshot, global)?;
            }
        }
    }
}

fn print_snapshot(groups: &[rfoutlet_core::Group], global: &GlobalOpts) -> Result<(), CliError> {
    let out = status::render_snapshot(groups, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
