//! Spawner profiles (`xapi/jupyterhub/profiles`).

use crate::client::XnatClient;
use crate::error::Error;
use crate::types::Profile;

const PROFILES: &str = "xapi/jupyterhub/profiles";

pub struct ProfileEndpoint<'a> {
    client: &'a XnatClient,
}

impl<'a> ProfileEndpoint<'a> {
    pub(crate) fn new(client: &'a XnatClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<Profile, Error> {
        self.client.get(&format!("{PROFILES}/{id}")).await
    }

    pub async fn get_all(&self) -> Result<Vec<Profile>, Error> {
        self.client.get(PROFILES).await
    }

    /// The server returns the id of the created profile.
    pub async fn create(&self, profile: &Profile) -> Result<i64, Error> {
        self.client.post(PROFILES, profile).await
    }

    /// Fails with [`Error::MissingId`] before any network call when the
    /// profile has never been persisted.
    pub async fn update(&self, profile: &Profile) -> Result<(), Error> {
        let id = profile.id.ok_or(Error::MissingId { entity: "profile" })?;
        self.client
            .put_body_empty(&format!("{PROFILES}/{id}"), profile)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.client.delete(&format!("{PROFILES}/{id}")).await
    }

    /// Profiles applicable to one project.
    pub async fn for_project(&self, project_id: &str) -> Result<Vec<Profile>, Error> {
        self.client
            .get(&format!("{PROFILES}/projects/{project_id}"))
            .await
    }
}

impl XnatClient {
    pub fn profiles(&self) -> ProfileEndpoint<'_> {
        ProfileEndpoint::new(self)
    }
}
