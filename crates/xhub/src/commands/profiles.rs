//! Spawner profile command handlers.

use tabled::Tabled;
use xhub_api::XnatClient;
use xhub_api::types::Profile;
use xhub_core::validate::validate_profile;

use crate::cli::{GlobalOpts, ProfilesArgs, ProfilesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Memory")]
    memory: String,
}

impl From<&Profile> for ProfileRow {
    fn from(profile: &Profile) -> Self {
        let container = &profile.task_template.container_spec;
        Self {
            id: profile.id.map(|id| id.to_string()).unwrap_or_default(),
            name: profile.name.clone(),
            enabled: if profile.enabled.unwrap_or_default() { "yes" } else { "no" }.into(),
            image: container.image.clone(),
            memory: profile
                .task_template
                .resources
                .mem_limit
                .clone()
                .unwrap_or_default(),
        }
    }
}

fn id_of(profile: &Profile) -> String {
    profile.id.map(|id| id.to_string()).unwrap_or_default()
}

pub async fn handle(
    client: &XnatClient,
    args: ProfilesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = client.profiles();

    match args.command {
        ProfilesCommand::List => {
            let profiles = endpoint.get_all().await?;
            let out = output::render_list(&global.output, &profiles, |p| ProfileRow::from(p), id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfilesCommand::Get { id } => {
            let profile = endpoint.get(id).await?;
            let out = output::render_single(
                &global.output,
                &profile,
                output::render_json_pretty,
                id_of,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfilesCommand::Save { file } => {
            let profile: Profile = util::read_record(&file)?;
            validate_profile(&profile)?;

            if profile.id.is_some() {
                endpoint.update(&profile).await?;
                util::note(
                    &format!("Updated profile '{}' (id {})", profile.name, id_of(&profile)),
                    global.quiet,
                );
            } else {
                let id = endpoint.create(&profile).await?;
                util::note(
                    &format!("Created profile '{}' (id {id})", profile.name),
                    global.quiet,
                );
            }
            Ok(())
        }

        ProfilesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete profile {id}?"), global.yes)? {
                return Ok(());
            }
            endpoint.delete(id).await?;
            util::note(&format!("Deleted profile {id}"), global.quiet);
            Ok(())
        }

        ProfilesCommand::ForProject { project } => {
            let profiles = endpoint.for_project(&project).await?;
            let out = output::render_list(&global.output, &profiles, |p| ProfileRow::from(p), id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
