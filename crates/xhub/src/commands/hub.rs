//! Hub status, preference, docker image, and token command handlers.

use tabled::Tabled;
use xhub_api::XnatClient;
use xhub_api::types::{DockerImage, Token};
use xhub_core::images;

use crate::cli::{GlobalOpts, HubArgs, HubCommand, ImagesArgs, ImagesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PreferenceRow {
    #[tabled(rename = "Preference")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

pub async fn handle(client: &XnatClient, args: HubArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let endpoint = client.hub();

    match args.command {
        HubCommand::Status => {
            let info = match endpoint.info().await {
                Ok(info) => info,
                Err(err) if err.is_auth() => return Err(err.into()),
                Err(err) => {
                    util::note(&format!("Hub: down ({err})"), global.quiet);
                    return Ok(());
                }
            };
            let mut pairs = vec![
                ("Hub", "up".to_owned()),
                (
                    "Version",
                    info.version.clone().unwrap_or_else(|| "unknown".into()),
                ),
                ("Python", info.python.clone().unwrap_or_else(|| "-".into())),
            ];
            if let Some(ref authenticator) = info.authenticator {
                pairs.push((
                    "Authenticator",
                    format!(
                        "{} {}",
                        authenticator.class_name.as_deref().unwrap_or("-"),
                        authenticator.version.as_deref().unwrap_or("")
                    ),
                ));
            }
            if let Some(ref spawner) = info.spawner {
                pairs.push((
                    "Spawner",
                    format!(
                        "{} {}",
                        spawner.class_name.as_deref().unwrap_or("-"),
                        spawner.version.as_deref().unwrap_or("")
                    ),
                ));
            }

            let out = output::render_single(
                &global.output,
                &info,
                |_| output::detail(&pairs),
                |info| info.version.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HubCommand::Prefs { name } => {
            let preferences = match name {
                Some(ref name) => endpoint.preference(name).await?,
                None => endpoint.preferences().await?,
            };

            let entries: Vec<(String, serde_json::Value)> = preferences.into_iter().collect();
            let out = output::render_list(
                &global.output,
                &entries,
                |(name, value)| PreferenceRow {
                    name: name.clone(),
                    value: value.to_string(),
                },
                |(name, _)| name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HubCommand::SetPref { name, value } => {
            // Bare strings are common enough to not demand JSON quoting.
            let value: serde_json::Value = serde_json::from_str(&value)
                .unwrap_or(serde_json::Value::String(value));
            endpoint.set_preference(&name, &value).await?;
            util::note(&format!("Preference '{name}' set"), global.quiet);
            Ok(())
        }

        HubCommand::Images(args) => handle_images(client, args, global).await,

        HubCommand::Token {
            username,
            expires_in,
            note,
        } => {
            let request = Token {
                expires_in: Some(expires_in),
                note,
                ..Token::default()
            };
            let token = endpoint.create_token(&username, &request).await?;

            let out = output::render_single(
                &global.output,
                &token,
                |token| token.token.clone().unwrap_or_default(),
                |token| token.token.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

async fn handle_images(
    client: &XnatClient,
    args: ImagesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = client.hub();

    match args.command {
        ImagesCommand::List => {
            let list = images::sorted(endpoint.docker_images().await?);
            let out = output::render_list(
                &global.output,
                &list,
                |img| ImageRow {
                    image: img.image.clone(),
                    enabled: if img.enabled { "yes" } else { "no" }.into(),
                },
                |img| img.image.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ImagesCommand::Add { image, disabled } => {
            let list = images::add(
                endpoint.docker_images().await?,
                DockerImage {
                    image: image.clone(),
                    enabled: !disabled,
                },
            )?;
            endpoint.set_docker_images(&list).await?;
            util::note(&format!("Added image '{image}'"), global.quiet);
            Ok(())
        }

        ImagesCommand::Remove { image } => {
            if !util::confirm(&format!("Remove image '{image}'?"), global.yes)? {
                return Ok(());
            }
            let list = images::remove(endpoint.docker_images().await?, &image)?;
            endpoint.set_docker_images(&list).await?;
            util::note(&format!("Removed image '{image}'"), global.quiet);
            Ok(())
        }

        ImagesCommand::Enable { image } => set_image_enabled(client, &image, true, global).await,

        ImagesCommand::Disable { image } => set_image_enabled(client, &image, false, global).await,
    }
}

async fn set_image_enabled(
    client: &XnatClient,
    image: &str,
    enabled: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = client.hub();
    let list = images::set_enabled(endpoint.docker_images().await?, image, enabled)?;
    endpoint.set_docker_images(&list).await?;
    util::note(
        &format!(
            "Image '{image}' {}",
            if enabled { "enabled" } else { "disabled" }
        ),
        global.quiet,
    );
    Ok(())
}
