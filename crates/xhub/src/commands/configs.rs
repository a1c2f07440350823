//! Handlers shared by the four scoped config families (envs, specs,
//! hardware, constraints).
//!
//! One generic handler serves them all; the record type carries the REST
//! path, the validation rules, and the display name.

use tabled::Tabled;
use xhub_api::types::{ConfigType, Scope, ScopeMap};
use xhub_api::{ConfigRecord, XnatClient};
use xhub_core::scope::{site_enabled, summarize, summarize_names};
use xhub_core::{Editable, Manager};

use crate::cli::{ConfigTypeArg, GlobalOpts, ScopedArgs, ScopedCommand};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<ConfigTypeArg> for ConfigType {
    fn from(arg: ConfigTypeArg) -> Self {
        match arg {
            ConfigTypeArg::Jupyterhub => ConfigType::Jupyterhub,
            ConfigTypeArg::ContainerService => ConfigType::ContainerService,
            ConfigTypeArg::General => ConfigType::General,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Projects")]
    projects: String,
    #[tabled(rename = "Users")]
    users: String,
    #[tabled(rename = "Hardware")]
    hardware: String,
}

fn scope_cell(scopes: &ScopeMap, dimension: Scope, noun: &str) -> String {
    scopes.get(&dimension).map_or_else(
        || format!("No {noun} Enabled"),
        |rule| summarize(rule, noun),
    )
}

fn row<T: ConfigRecord>(record: &T) -> ConfigRow {
    ConfigRow {
        id: record.id().map(|id| id.to_string()).unwrap_or_default(),
        name: record.name().to_owned(),
        site: if site_enabled(record.scopes()) {
            "enabled"
        } else {
            "disabled"
        }
        .into(),
        projects: scope_cell(record.scopes(), Scope::Project, "Projects"),
        users: scope_cell(record.scopes(), Scope::User, "Users"),
        hardware: record.hardware_pairing().map_or_else(
            || "-".to_owned(),
            |(all, names)| summarize_names(all, &names, "Hardware"),
        ),
    }
}

fn id_of<T: ConfigRecord>(record: &T) -> String {
    record.id().map(|id| id.to_string()).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<T>(
    client: &XnatClient,
    args: ScopedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    T: ConfigRecord + Editable,
{
    let endpoint = client.configs::<T>();

    match args.command {
        ScopedCommand::List { config_type } => {
            let records = match config_type {
                Some(config_type) => endpoint.get_all_of_type(config_type.into()).await?,
                None => endpoint.get_all().await?,
            };
            let out = output::render_list(&global.output, &records, row, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScopedCommand::Get { id } => {
            let record = endpoint.get(id).await?;
            let out = output::render_single(
                &global.output,
                &record,
                output::render_json_pretty,
                id_of,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScopedCommand::Save { file } => {
            let record: T = util::read_record(&file)?;
            let mut manager = Manager::new(client.configs::<T>());
            manager.open_new(record);
            let saved = manager.save_draft().await?;
            util::note(
                &format!("Saved {} '{}' (id {})", T::KIND, saved.name(), id_of(&saved)),
                global.quiet,
            );
            Ok(())
        }

        ScopedCommand::Copy { id } => {
            let mut manager = Manager::new(client.configs::<T>());
            manager.refresh().await?;
            manager.open_copy(id, T::KIND)?;
            // Print the stripped duplicate so it can be edited and saved back.
            if let Some(draft) = manager.draft() {
                let out = output::render_single(
                    &global.output,
                    &draft.record,
                    output::render_json_pretty,
                    id_of,
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        ScopedCommand::Delete { id } => {
            if !util::confirm(&format!("Delete {} {id}?", T::KIND), global.yes)? {
                return Ok(());
            }
            endpoint.delete(id).await?;
            util::note(&format!("Deleted {} {id}", T::KIND), global.quiet);
            Ok(())
        }

        ScopedCommand::Enable { id } => set_site_enabled::<T>(client, id, true, global).await,

        ScopedCommand::Disable { id } => set_site_enabled::<T>(client, id, false, global).await,

        ScopedCommand::Available {
            user,
            project,
            config_type,
        } => {
            let records = endpoint
                .available(config_type.into(), &user, &project)
                .await?;
            let out = output::render_list(&global.output, &records, row, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Drive the optimistic site toggle toward the requested state.
async fn set_site_enabled<T>(
    client: &XnatClient,
    id: i64,
    desired: bool,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    T: ConfigRecord + Editable,
{
    let mut manager = Manager::new(client.configs::<T>());
    manager.refresh().await?;

    let current = manager
        .find(id)
        .map(|record| site_enabled(record.scopes()))
        .ok_or_else(|| CliError::NotFound {
            resource_type: T::KIND.into(),
            identifier: id.to_string(),
            list_command: "list".into(),
        })?;

    if current == desired {
        util::note(
            &format!(
                "{} {id} already {} for the site",
                T::KIND,
                if desired { "enabled" } else { "disabled" }
            ),
            global.quiet,
        );
        return Ok(());
    }

    let enabled = manager.toggle_site_enabled(id).await?;
    util::note(
        &format!(
            "{} {id} is now {} for the site",
            T::KIND,
            if enabled { "enabled" } else { "disabled" }
        ),
        global.quiet,
    );
    Ok(())
}
