//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod configs;
pub mod dashboards;
pub mod frameworks;
pub mod hub;
pub mod profiles;
pub mod servers;
pub mod users;
pub mod util;

use xhub_api::XnatClient;
use xhub_api::types::{
    ComputeEnvironmentConfig, ComputeSpecConfig, ConstraintConfig, HardwareConfig,
};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &XnatClient, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Envs(args) => {
            configs::handle::<ComputeEnvironmentConfig>(client, args, global).await
        }
        Command::Specs(args) => configs::handle::<ComputeSpecConfig>(client, args, global).await,
        Command::Hardware(args) => configs::handle::<HardwareConfig>(client, args, global).await,
        Command::Constraints(args) => configs::handle::<ConstraintConfig>(client, args, global).await,
        Command::Dashboards(args) => dashboards::handle(client, args, global).await,
        Command::Frameworks(args) => frameworks::handle(client, args, global).await,
        Command::Profiles(args) => profiles::handle(client, args, global).await,
        Command::Hub(args) => hub::handle(client, args, global).await,
        Command::Users(args) => users::handle(client, args, global).await,
        Command::Servers(args) => servers::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
