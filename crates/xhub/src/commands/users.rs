//! XNAT user and Jupyter role command handlers.

use tabled::Tabled;
use xhub_api::types::HubUser;
use xhub_api::{JUPYTER_ROLE, XnatClient};
use xhub_core::{Launcher, eligible_users};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Username")]
    username: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Project")]
    id: String,
}

#[derive(Tabled)]
struct HubUserRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "Active Server")]
    active: String,
    #[tabled(rename = "Last Activity")]
    last_activity: String,
}

impl From<&HubUser> for HubUserRow {
    fn from(user: &HubUser) -> Self {
        Self {
            name: user.name.clone(),
            admin: if user.admin { "yes" } else { "no" }.into(),
            active: if user.has_active_server() { "yes" } else { "no" }.into(),
            last_activity: user
                .last_activity
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

fn hub_user_detail(user: &HubUser) -> String {
    let mut pairs = vec![
        ("Name", user.name.clone()),
        ("Admin", user.admin.to_string()),
        ("Roles", user.roles.join(", ")),
        ("Pending", user.pending.clone().unwrap_or_else(|| "-".into())),
    ];
    for (name, server) in &user.servers {
        let label = if name.is_empty() { "Server" } else { name };
        pairs.push((
            label,
            format!(
                "ready={} url={}",
                server.ready.unwrap_or(false),
                server.url.as_deref().unwrap_or("-")
            ),
        ));
    }
    output::detail(&pairs)
}

pub async fn handle(
    client: &XnatClient,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = client.users();

    match args.command {
        UsersCommand::List => {
            let usernames = eligible_users(endpoint.usernames().await?);
            let out = output::render_list(
                &global.output,
                &usernames,
                |name| UserRow {
                    username: name.clone(),
                },
                Clone::clone,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Authorized => {
            let mut usernames = endpoint.users_with_role(JUPYTER_ROLE).await?;
            usernames.sort();
            let out = output::render_list(
                &global.output,
                &usernames,
                |name| UserRow {
                    username: name.clone(),
                },
                Clone::clone,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Check { username } => {
            let authorized = endpoint.has_jupyter_role(&username).await?;
            util::note(
                &format!(
                    "{username} {} the {JUPYTER_ROLE} role",
                    if authorized { "holds" } else { "does not hold" }
                ),
                global.quiet,
            );
            if !authorized {
                // Absence maps to the not-found exit code.
                return Err(CliError::NotFound {
                    resource_type: "role grant".into(),
                    identifier: username,
                    list_command: "users authorized".into(),
                });
            }
            Ok(())
        }

        UsersCommand::Grant { username } => {
            endpoint.grant_jupyter_role(&username).await?;
            util::note(
                &format!("Granted {JUPYTER_ROLE} role to {username}"),
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Revoke { username } => {
            if !util::confirm(
                &format!("Revoke the {JUPYTER_ROLE} role from {username}?"),
                global.yes,
            )? {
                return Ok(());
            }
            endpoint.revoke_jupyter_role(&username).await?;
            util::note(
                &format!("Revoked {JUPYTER_ROLE} role from {username}"),
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Hub { username } => {
            let user = client.hub().user(&username).await?;
            let out =
                output::render_single(&global.output, &user, hub_user_detail, |u| u.name.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Projects => {
            let ids = endpoint.project_ids().await?;
            let out = output::render_list(
                &global.output,
                &ids,
                |id| ProjectRow { id: id.clone() },
                Clone::clone,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Ensure { username } => {
            let launcher = Launcher::new(client);
            let user = launcher.ensure_user(&username).await?;
            let out = output::render_single(&global.output, &user, hub_user_detail, |u| {
                u.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
