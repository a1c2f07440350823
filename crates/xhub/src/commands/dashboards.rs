//! Dashboard config command handlers.

use std::collections::BTreeMap;

use tabled::Tabled;
use xhub_api::XnatClient;
use xhub_api::types::{DashboardConfig, Scope};
use xhub_core::scope::{site_enabled, summarize};
use xhub_core::Editable;

use crate::cli::{DashboardsArgs, DashboardsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DashboardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Framework")]
    framework: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Projects")]
    projects: String,
    #[tabled(rename = "Environment")]
    environment: String,
}

impl From<&DashboardConfig> for DashboardRow {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            id: config.id.map(|id| id.to_string()).unwrap_or_default(),
            name: config.dashboard.name.clone(),
            framework: config.dashboard.framework.clone().unwrap_or_default(),
            site: if site_enabled(&config.scopes) {
                "enabled"
            } else {
                "disabled"
            }
            .into(),
            projects: config.scopes.get(&Scope::Project).map_or_else(
                || "No Projects Enabled".into(),
                |rule| summarize(rule, "Projects"),
            ),
            environment: config
                .compute_environment_config
                .as_ref()
                .map(|env| env.compute_environment.name.clone())
                .unwrap_or_default(),
        }
    }
}

fn id_of(config: &DashboardConfig) -> String {
    config.id.map(|id| id.to_string()).unwrap_or_default()
}

fn detail(config: &DashboardConfig) -> String {
    let dash = &config.dashboard;
    let mut lines = vec![
        format!("ID:          {}", id_of(config)),
        format!("Name:        {}", dash.name),
        format!("Description: {}", dash.description.as_deref().unwrap_or("-")),
        format!("Framework:   {}", dash.framework.as_deref().unwrap_or("-")),
        format!("Command:     {}", dash.command.as_deref().unwrap_or("-")),
        format!("Repo:        {}", dash.git_repo_url.as_deref().unwrap_or("-")),
        format!("Branch:      {}", dash.git_repo_branch.as_deref().unwrap_or("-")),
        format!("Main File:   {}", dash.main_file_path.as_deref().unwrap_or("-")),
    ];
    if let Some(ref env) = config.compute_environment_config {
        lines.push(format!("Environment: {}", env.compute_environment.name));
    }
    if let Some(ref hw) = config.hardware_config {
        lines.push(format!("Hardware:    {}", hw.hardware.name));
    }
    for (dimension, noun) in [
        (Scope::Site, "Sites"),
        (Scope::Project, "Projects"),
        (Scope::User, "Users"),
        (Scope::DataType, "Data Types"),
    ] {
        if let Some(rule) = config.scopes.get(&dimension) {
            lines.push(format!("{dimension}: {}", summarize(rule, noun)));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &XnatClient,
    args: DashboardsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = client.dashboards();

    match args.command {
        DashboardsCommand::List => {
            let configs = endpoint.get_all().await?;
            let out = output::render_list(&global.output, &configs, |c| DashboardRow::from(c), id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DashboardsCommand::Get { id } => {
            let config = endpoint.get(id).await?;
            let out = output::render_single(&global.output, &config, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DashboardsCommand::Save { file } => {
            let config: DashboardConfig = util::read_record(&file)?;
            config.validate()?;
            let saved = endpoint.save(&config).await?;
            util::note(
                &format!(
                    "Saved dashboard config '{}' (id {})",
                    saved.dashboard.name,
                    id_of(&saved)
                ),
                global.quiet,
            );
            Ok(())
        }

        DashboardsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete dashboard config {id}?"), global.yes)? {
                return Ok(());
            }
            endpoint.delete(id).await?;
            util::note(&format!("Deleted dashboard config {id}"), global.quiet);
            Ok(())
        }

        DashboardsCommand::Enable { id, project } => {
            match project {
                Some(ref project_id) => {
                    endpoint.enable_for_project(id, project_id).await?;
                    util::note(
                        &format!("Dashboard {id} enabled for project {project_id}"),
                        global.quiet,
                    );
                }
                None => {
                    endpoint.enable_for_site(id).await?;
                    util::note(&format!("Dashboard {id} enabled for the site"), global.quiet);
                }
            }
            Ok(())
        }

        DashboardsCommand::Disable { id, project } => {
            match project {
                Some(ref project_id) => {
                    endpoint.disable_for_project(id, project_id).await?;
                    util::note(
                        &format!("Dashboard {id} disabled for project {project_id}"),
                        global.quiet,
                    );
                }
                None => {
                    endpoint.disable_for_site(id).await?;
                    util::note(&format!("Dashboard {id} disabled for the site"), global.quiet);
                }
            }
            Ok(())
        }

        DashboardsCommand::Available {
            project,
            user,
            data_type,
        } => {
            let mut execution = BTreeMap::new();
            if let Some(project) = project {
                execution.insert(Scope::Project, project);
            }
            if let Some(user) = user {
                execution.insert(Scope::User, user);
            }
            if let Some(data_type) = data_type {
                execution.insert(Scope::DataType, data_type);
            }

            let configs = endpoint.available(&execution).await?;
            let out = output::render_list(&global.output, &configs, |c| DashboardRow::from(c), id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
