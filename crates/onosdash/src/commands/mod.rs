//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod apps;
pub mod config_cmd;
pub mod devices;
pub mod flows;
pub mod hosts;
pub mod links;
pub mod status;
pub mod test_cmd;
pub mod topology;
pub mod util;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    resolved: Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(&resolved, global).await,
        Command::Watch(args) => watch::handle(resolved, &args, global).await,
        Command::Test => test_cmd::handle(&resolved, global).await,
        Command::Devices(args) => {
            devices::handle(&util::client(&resolved.controller)?, args, global).await
        }
        Command::Hosts(args) => {
            hosts::handle(&util::client(&resolved.controller)?, args, global).await
        }
        Command::Flows(args) => flows::handle(&resolved, args, global).await,
        Command::Links(args) => {
            links::handle(&util::client(&resolved.controller)?, args, global).await
        }
        Command::Topology(args) => {
            topology::handle(&util::client(&resolved.controller)?, args, global).await
        }
        Command::Apps(args) => apps::handle(&util::client(&resolved.controller)?, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
