//! XNAT-side account endpoints: the site user list, project list, and the
//! Jupyter role grants that gate hub access.

use serde::Deserialize;

use crate::client::XnatClient;
use crate::error::Error;

/// The role XNAT checks before letting a user talk to the hub.
pub const JUPYTER_ROLE: &str = "Jupyter";

#[derive(Debug, Deserialize)]
struct ProjectRow {
    #[serde(rename = "ID")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProjectResultSet {
    #[serde(rename = "Result")]
    result: Vec<ProjectRow>,
}

#[derive(Debug, Deserialize)]
struct ProjectListing {
    #[serde(rename = "ResultSet")]
    result_set: ProjectResultSet,
}

pub struct UserEndpoint<'a> {
    client: &'a XnatClient,
}

impl<'a> UserEndpoint<'a> {
    pub(crate) fn new(client: &'a XnatClient) -> Self {
        Self { client }
    }

    /// Every username on the site, service accounts included.
    pub async fn usernames(&self) -> Result<Vec<String>, Error> {
        self.client.get("xapi/users").await
    }

    /// Project ids, from the legacy `/data` listing.
    pub async fn project_ids(&self) -> Result<Vec<String>, Error> {
        let listing: ProjectListing = self
            .client
            .get_with_params("data/projects", &[("format", "json".to_owned())])
            .await?;
        Ok(listing.result_set.result.into_iter().map(|row| row.id).collect())
    }

    // ── Jupyter role ─────────────────────────────────────────────────

    pub async fn roles(&self, username: &str) -> Result<Vec<String>, Error> {
        self.client.get(&format!("xapi/users/{username}/roles")).await
    }

    pub async fn has_jupyter_role(&self, username: &str) -> Result<bool, Error> {
        Ok(self.roles(username).await?.iter().any(|r| r == JUPYTER_ROLE))
    }

    /// Usernames holding the given role.
    pub async fn users_with_role(&self, role: &str) -> Result<Vec<String>, Error> {
        self.client.get(&format!("xapi/users/roles/{role}")).await
    }

    pub async fn grant_jupyter_role(&self, username: &str) -> Result<(), Error> {
        self.client
            .put_body_empty(&format!("xapi/users/{username}/roles"), &[JUPYTER_ROLE])
            .await
    }

    pub async fn revoke_jupyter_role(&self, username: &str) -> Result<(), Error> {
        self.client
            .delete_with_body(&format!("xapi/users/{username}/roles"), &[JUPYTER_ROLE])
            .await
    }
}

impl XnatClient {
    pub fn users(&self) -> UserEndpoint<'_> {
        UserEndpoint::new(self)
    }
}
