//! Dashboard configs and frameworks (`xapi/jupyterhub/dashboards/…`).
//!
//! Dashboards add two things on top of the shared config contract:
//! scope toggles are dedicated POST/DELETE endpoints rather than record
//! updates, and frameworks are keyed by name instead of id.

use std::collections::BTreeMap;

use crate::client::XnatClient;
use crate::error::Error;
use crate::types::{DashboardConfig, DashboardFramework, Scope};

const CONFIGS: &str = "xapi/jupyterhub/dashboards/configs";
const FRAMEWORKS: &str = "xapi/jupyterhub/dashboards/frameworks";

pub struct DashboardEndpoint<'a> {
    client: &'a XnatClient,
}

impl<'a> DashboardEndpoint<'a> {
    pub(crate) fn new(client: &'a XnatClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<DashboardConfig, Error> {
        self.client.get(&format!("{CONFIGS}/{id}")).await
    }

    pub async fn get_all(&self) -> Result<Vec<DashboardConfig>, Error> {
        self.client.get(CONFIGS).await
    }

    pub async fn create(&self, config: &DashboardConfig) -> Result<DashboardConfig, Error> {
        self.client.post(CONFIGS, config).await
    }

    /// Fails with [`Error::MissingId`] before any network call when the
    /// config has never been persisted.
    pub async fn update(&self, config: &DashboardConfig) -> Result<DashboardConfig, Error> {
        let id = config.id.ok_or(Error::MissingId {
            entity: "dashboard config",
        })?;
        self.client.put(&format!("{CONFIGS}/{id}"), config).await
    }

    pub async fn save(&self, config: &DashboardConfig) -> Result<DashboardConfig, Error> {
        match config.id {
            Some(_) => self.update(config).await,
            None => self.create(config).await,
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.client.delete(&format!("{CONFIGS}/{id}")).await
    }

    /// Configs admitting the given execution context. Dimensions with an
    /// empty id are left out of the query.
    pub async fn available(
        &self,
        execution: &BTreeMap<Scope, String>,
    ) -> Result<Vec<DashboardConfig>, Error> {
        let params: Vec<(&str, String)> = execution
            .iter()
            .filter(|(_, id)| !id.is_empty())
            .map(|(scope, id)| {
                let key = match scope {
                    Scope::Site => "Site",
                    Scope::Project => "Project",
                    Scope::User => "User",
                    Scope::DataType => "DataType",
                };
                (key, id.clone())
            })
            .collect();

        self.client
            .get_with_params(&format!("{CONFIGS}/available"), &params)
            .await
    }

    // Scope toggles are their own endpoints; the record is not updated
    // through PUT for these.

    pub async fn enable_for_site(&self, id: i64) -> Result<(), Error> {
        self.client.post_empty(&format!("{CONFIGS}/{id}/scope/site")).await
    }

    pub async fn disable_for_site(&self, id: i64) -> Result<(), Error> {
        self.client.delete(&format!("{CONFIGS}/{id}/scope/site")).await
    }

    pub async fn enable_for_project(&self, id: i64, project_id: &str) -> Result<(), Error> {
        self.client
            .post_empty(&format!("{CONFIGS}/{id}/scope/project/{project_id}"))
            .await
    }

    pub async fn disable_for_project(&self, id: i64, project_id: &str) -> Result<(), Error> {
        self.client
            .delete(&format!("{CONFIGS}/{id}/scope/project/{project_id}"))
            .await
    }

    // ── Frameworks ───────────────────────────────────────────────────

    pub async fn frameworks(&self) -> Result<Vec<DashboardFramework>, Error> {
        self.client.get(FRAMEWORKS).await
    }

    pub async fn framework(&self, name: &str) -> Result<DashboardFramework, Error> {
        self.client.get(&format!("{FRAMEWORKS}/{name}")).await
    }

    pub async fn create_framework(
        &self,
        framework: &DashboardFramework,
    ) -> Result<DashboardFramework, Error> {
        self.client.post(FRAMEWORKS, framework).await
    }

    pub async fn update_framework(
        &self,
        framework: &DashboardFramework,
    ) -> Result<DashboardFramework, Error> {
        self.client
            .put(&format!("{FRAMEWORKS}/{}", framework.name), framework)
            .await
    }

    /// Frameworks are deleted by name, not id.
    pub async fn delete_framework(&self, name: &str) -> Result<(), Error> {
        self.client.delete(&format!("{FRAMEWORKS}/{name}")).await
    }
}

impl XnatClient {
    pub fn dashboards(&self) -> DashboardEndpoint<'_> {
        DashboardEndpoint::new(self)
    }
}
