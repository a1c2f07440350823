//! Dashboard framework command handlers.

use tabled::Tabled;
use xhub_api::XnatClient;
use xhub_api::types::DashboardFramework;
use xhub_core::validate::validate_dashboard_framework;

use crate::cli::{FrameworksArgs, FrameworksCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct FrameworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Command Template")]
    command_template: String,
}

impl From<&DashboardFramework> for FrameworkRow {
    fn from(framework: &DashboardFramework) -> Self {
        Self {
            name: framework.name.clone(),
            command_template: framework.command_template.clone(),
        }
    }
}

fn detail(framework: &DashboardFramework) -> String {
    format!(
        "Name:             {}\nCommand Template: {}",
        framework.name, framework.command_template
    )
}

pub async fn handle(
    client: &XnatClient,
    args: FrameworksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = client.dashboards();

    match args.command {
        FrameworksCommand::List => {
            let frameworks = endpoint.frameworks().await?;
            let out = output::render_list(&global.output, &frameworks, |f| FrameworkRow::from(f), |f| {
                f.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FrameworksCommand::Get { name } => {
            let framework = endpoint.framework(&name).await?;
            let out = output::render_single(&global.output, &framework, detail, |f| f.name.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FrameworksCommand::Save {
            name,
            command_template,
        } => {
            let existing = endpoint.frameworks().await?;
            let framework = DashboardFramework {
                id: existing
                    .iter()
                    .find(|f| f.name == name)
                    .and_then(|f| f.id),
                name,
                command_template,
            };
            validate_dashboard_framework(&framework)?;

            let saved = if framework.id.is_some() {
                endpoint.update_framework(&framework).await?
            } else {
                endpoint.create_framework(&framework).await?
            };
            util::note(&format!("Saved framework '{}'", saved.name), global.quiet);
            Ok(())
        }

        FrameworksCommand::Delete { name } => {
            if !util::confirm(&format!("Delete framework '{name}'?"), global.yes)? {
                return Ok(());
            }
            endpoint.delete_framework(&name).await?;
            util::note(&format!("Deleted framework '{name}'"), global.quiet);
            Ok(())
        }
    }
}
