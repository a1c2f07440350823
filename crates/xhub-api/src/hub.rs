//! JupyterHub passthrough endpoints (`xapi/jupyterhub/…`) and the event
//! tracking records server launches report progress through.

use std::collections::BTreeMap;

use crate::client::XnatClient;
use crate::error::Error;
use crate::types::{DockerImage, HubInfo, HubServer, HubUser, Token, TrackingData};

const HUB: &str = "xapi/jupyterhub";

/// XNAT context a server is launched against.
#[derive(Debug, Clone, Default)]
pub struct StartServerRequest {
    pub username: String,
    pub xsi_type: String,
    pub item_id: String,
    pub item_label: String,
    pub project_id: String,
    pub event_tracking_id: String,
}

pub struct HubEndpoint<'a> {
    client: &'a XnatClient,
}

impl<'a> HubEndpoint<'a> {
    pub(crate) fn new(client: &'a XnatClient) -> Self {
        Self { client }
    }

    // ── Hub status ───────────────────────────────────────────────────

    pub async fn info(&self) -> Result<HubInfo, Error> {
        self.client.get(&format!("{HUB}/info")).await
    }

    pub async fn version(&self) -> Result<HubInfo, Error> {
        self.client.get(&format!("{HUB}/version")).await
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub async fn preferences(&self) -> Result<BTreeMap<String, serde_json::Value>, Error> {
        self.client.get(&format!("{HUB}/preferences")).await
    }

    /// The server wraps a single preference in a one-entry map.
    pub async fn preference(
        &self,
        name: &str,
    ) -> Result<BTreeMap<String, serde_json::Value>, Error> {
        self.client.get(&format!("{HUB}/preferences/{name}")).await
    }

    pub async fn set_preferences(
        &self,
        preferences: &BTreeMap<String, serde_json::Value>,
    ) -> Result<(), Error> {
        self.client
            .post_body_empty(&format!("{HUB}/preferences"), preferences)
            .await
    }

    pub async fn set_preference(&self, name: &str, value: &serde_json::Value) -> Result<(), Error> {
        let body = BTreeMap::from([(name.to_owned(), value.clone())]);
        self.client
            .post_body_empty(&format!("{HUB}/preferences"), &body)
            .await
    }

    // ── Docker images ────────────────────────────────────────────────

    /// The Jupyter docker image list, stored as the `dockerImages`
    /// preference.
    pub async fn docker_images(&self) -> Result<Vec<DockerImage>, Error> {
        let wrapped = self.preference("dockerImages").await?;
        match wrapped.get("dockerImages") {
            Some(value) => DockerImage::from_preference(value).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: value.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the docker image list. The preference only supports full
    /// replacement, so add/remove/toggle resubmit every entry.
    pub async fn set_docker_images(&self, images: &[DockerImage]) -> Result<(), Error> {
        self.client
            .post_body_empty(&format!("{HUB}/preferences/dockerImages"), &images)
            .await
    }

    // ── Users ────────────────────────────────────────────────────────

    pub async fn user(&self, username: &str) -> Result<HubUser, Error> {
        self.client.get(&format!("{HUB}/users/{username}")).await
    }

    /// Register the XNAT account with the hub. 404s from [`Self::user`]
    /// are resolved by calling this and retrying.
    pub async fn create_user(&self, username: &str) -> Result<(), Error> {
        self.client.post_empty(&format!("{HUB}/users/{username}")).await
    }

    pub async fn users(&self) -> Result<Vec<HubUser>, Error> {
        self.client.get(&format!("{HUB}/users")).await
    }

    // ── Servers ──────────────────────────────────────────────────────

    /// The default server for a user, with its resolved user options.
    pub async fn server(&self, username: &str) -> Result<HubServer, Error> {
        self.client
            .post_no_body(&format!("{HUB}/users/{username}/server"))
            .await
    }

    /// Ask XNAT to spawn a server for the given context. Progress is
    /// reported asynchronously under the request's tracking id.
    pub async fn start_server(&self, request: &StartServerRequest) -> Result<(), Error> {
        self.client
            .post_empty_with_params(
                &format!("{HUB}/users/{}/server", request.username),
                &[
                    ("xsiType", request.xsi_type.clone()),
                    ("itemId", request.item_id.clone()),
                    ("itemLabel", request.item_label.clone()),
                    ("projectId", request.project_id.clone()),
                    ("eventTrackingId", request.event_tracking_id.clone()),
                ],
            )
            .await
    }

    /// Stop the default server, or a named one.
    pub async fn stop_server(
        &self,
        username: &str,
        server_name: Option<&str>,
        event_tracking_id: &str,
    ) -> Result<(), Error> {
        let path = match server_name {
            Some(name) => format!("{HUB}/users/{username}/server/{name}"),
            None => format!("{HUB}/users/{username}/server"),
        };
        self.client
            .delete_with_params(&path, &[("eventTrackingId", event_tracking_id.to_owned())])
            .await
    }

    // ── Tokens ───────────────────────────────────────────────────────

    /// Issue an API token for the user.
    pub async fn create_token(&self, username: &str, request: &Token) -> Result<Token, Error> {
        self.client
            .post(&format!("{HUB}/users/{username}/tokens"), request)
            .await
    }

    // ── Event tracking ───────────────────────────────────────────────

    /// One snapshot of a launch workflow's progress.
    pub async fn tracking_data(&self, event_tracking_id: &str) -> Result<TrackingData, Error> {
        self.client
            .get(&format!("xapi/eventTracking/{event_tracking_id}"))
            .await
    }
}

impl XnatClient {
    pub fn hub(&self) -> HubEndpoint<'_> {
        HubEndpoint::new(self)
    }
}
