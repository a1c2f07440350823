//! Server launch workflow: make sure the hub knows the user, start or
//! stop the server, and feed tracking snapshots through the progress
//! reducer.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};
use xhub_api::types::HubUser;
use xhub_api::{StartServerRequest, XnatClient};

use crate::error::CoreError;
use crate::progress::{ProgressLine, ProgressState};

/// The XNAT item a server is launched against.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub username: String,
    pub xsi_type: String,
    pub item_id: String,
    pub item_label: String,
    pub project_id: String,
}

/// Tracking ids are the launch timestamp with the ISO-8601 separators
/// stripped (`20240101T120000000Z`), matching the ids already in the
/// event tracking table.
pub fn tracking_id_at(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(['-', ':', '.'], "")
}

pub fn new_tracking_id() -> String {
    tracking_id_at(Utc::now())
}

pub struct Launcher<'a> {
    client: &'a XnatClient,
}

impl<'a> Launcher<'a> {
    pub fn new(client: &'a XnatClient) -> Self {
        Self { client }
    }

    /// Fetch the hub account for an XNAT user, creating it on first
    /// contact: a 404 triggers a create and a single retry.
    pub async fn ensure_user(&self, username: &str) -> Result<HubUser, CoreError> {
        match self.client.hub().user(username).await {
            Ok(user) => Ok(user),
            Err(err) if err.is_not_found() => {
                info!("user {username} unknown to hub, creating");
                self.client.hub().create_user(username).await?;
                Ok(self.client.hub().user(username).await?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Start a server for the given context. Returns the tracking id to
    /// poll progress with.
    pub async fn start(&self, context: &LaunchContext) -> Result<String, CoreError> {
        self.ensure_user(&context.username).await?;

        let event_tracking_id = new_tracking_id();
        debug!(
            "starting server for {} ({} {}) tracking {event_tracking_id}",
            context.username, context.xsi_type, context.item_id
        );

        self.client
            .hub()
            .start_server(&StartServerRequest {
                username: context.username.clone(),
                xsi_type: context.xsi_type.clone(),
                item_id: context.item_id.clone(),
                item_label: context.item_label.clone(),
                project_id: context.project_id.clone(),
                event_tracking_id: event_tracking_id.clone(),
            })
            .await?;

        Ok(event_tracking_id)
    }

    /// Stop the default server, or a named one. Returns the tracking id.
    pub async fn stop(
        &self,
        username: &str,
        server_name: Option<&str>,
    ) -> Result<String, CoreError> {
        let event_tracking_id = new_tracking_id();
        self.client
            .hub()
            .stop_server(username, server_name, &event_tracking_id)
            .await?;
        Ok(event_tracking_id)
    }

    /// Fetch one tracking snapshot and fold it into `state`, returning
    /// the lines new since the last poll.
    pub async fn poll(
        &self,
        event_tracking_id: &str,
        state: &mut ProgressState,
    ) -> Result<Vec<ProgressLine>, CoreError> {
        let data = self.client.hub().tracking_data(event_tracking_id).await?;
        Ok(state.apply(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn tracking_id_strips_separators() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(tracking_id_at(at), "20240102T030405000Z");
    }

    #[test]
    fn tracking_ids_are_sortable_by_time() {
        let earlier = tracking_id_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let later = tracking_id_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap());
        assert!(earlier < later);
    }
}
