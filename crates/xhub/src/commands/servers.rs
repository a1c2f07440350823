//! Jupyter server lifecycle command handlers.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use xhub_api::XnatClient;
use xhub_core::{LaunchContext, Launcher, ProgressState, Severity};

use crate::cli::{GlobalOpts, ServersArgs, ServersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// Delay between tracking polls while following a launch.
const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Give up following a launch after this many polls.
const MAX_POLLS: u32 = 150;

pub async fn handle(
    client: &XnatClient,
    args: ServersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let launcher = Launcher::new(client);

    match args.command {
        ServersCommand::Start {
            user,
            xsi_type,
            item,
            label,
            project,
            no_wait,
        } => {
            let context = LaunchContext {
                username: user,
                xsi_type,
                item_label: label.unwrap_or_else(|| item.clone()),
                item_id: item,
                project_id: project,
            };

            let tracking_id = launcher.start(&context).await?;
            util::note(&format!("Launch requested (tracking {tracking_id})"), global.quiet);

            if no_wait {
                return Ok(());
            }
            follow(&launcher, &tracking_id, global).await
        }

        ServersCommand::Stop {
            user,
            name,
            no_wait,
        } => {
            if !util::confirm(&format!("Stop server for {user}?"), global.yes)? {
                return Ok(());
            }

            let tracking_id = launcher.stop(&user, name.as_deref()).await?;
            util::note(&format!("Stop requested (tracking {tracking_id})"), global.quiet);

            if no_wait {
                return Ok(());
            }
            follow(&launcher, &tracking_id, global).await
        }

        ServersCommand::Watch { tracking_id } => follow(&launcher, &tracking_id, global).await,

        ServersCommand::Options { user } => {
            let server = client.hub().server(&user).await?;
            let options = server.xnat_user_options()?;
            let out = output::render_single(
                &global.output,
                &options,
                output::render_json_pretty,
                |options| options.event_tracking_id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Poll the tracking record until the workflow finishes, echoing each new
/// progress line as it appears.
async fn follow(
    launcher: &Launcher<'_>,
    tracking_id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let spinner = make_spinner(global.quiet);
    let mut state = ProgressState::new();
    let mut last_error: Option<String> = None;

    for _ in 0..MAX_POLLS {
        let lines = launcher.poll(tracking_id, &mut state).await?;
        for line in &lines {
            if line.severity == Severity::Error {
                last_error = Some(line.text.clone());
            }
            if !global.quiet {
                spinner.println(output::progress_line(line, color));
            }
        }

        if state.finished() {
            spinner.finish_and_clear();
            if state.succeeded() == Some(false) {
                return Err(CliError::LaunchFailed {
                    tracking_id: tracking_id.to_owned(),
                    message: last_error.unwrap_or_else(|| "workflow reported failure".into()),
                });
            }
            return Ok(());
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }

    spinner.finish_and_clear();
    Err(CliError::Timeout {
        seconds: POLL_INTERVAL.as_secs() * u64::from(MAX_POLLS),
    })
}

fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("waiting for the hub");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
