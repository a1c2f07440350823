//! Generic CRUD endpoint for the scoped configuration families
//! (compute environments, compute specs, hardware, constraints).
//!
//! The four families share one REST contract; each record type carries
//! its base path and id accessor so a single endpoint serves them all.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::XnatClient;
use crate::error::Error;
use crate::types::{
    ComputeEnvironmentConfig, ComputeSpecConfig, ConfigType, ConstraintConfig, HardwareConfig,
    ScopeMap,
};

/// A configuration record served by one of the `xapi/*-configs` families.
pub trait ConfigRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Human name used in errors ("compute environment config").
    const KIND: &'static str;
    /// Collection path relative to the server root, no trailing slash.
    const BASE_PATH: &'static str;

    /// Database id, unset until the record has been persisted.
    fn id(&self) -> Option<i64>;

    /// Display name for listings.
    fn name(&self) -> &str;

    /// Per-dimension access rules.
    fn scopes(&self) -> &ScopeMap;

    /// Hardware pairing, for the families that pair with hardware
    /// configs: the allow-all flag and the paired config names.
    fn hardware_pairing(&self) -> Option<(bool, Vec<String>)> {
        None
    }
}

impl ConfigRecord for ComputeEnvironmentConfig {
    const KIND: &'static str = "compute environment config";
    const BASE_PATH: &'static str = "xapi/compute-environment-configs";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.compute_environment.name
    }

    fn scopes(&self) -> &ScopeMap {
        &self.scopes
    }

    fn hardware_pairing(&self) -> Option<(bool, Vec<String>)> {
        Some((
            self.hardware_options.allow_all_hardware,
            self.hardware_options
                .hardware_configs
                .iter()
                .map(|hw| hw.hardware.name.clone())
                .collect(),
        ))
    }
}

impl ConfigRecord for ComputeSpecConfig {
    const KIND: &'static str = "compute spec config";
    const BASE_PATH: &'static str = "xapi/compute-spec-configs";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.compute_spec.name
    }

    fn scopes(&self) -> &ScopeMap {
        &self.scopes
    }

    fn hardware_pairing(&self) -> Option<(bool, Vec<String>)> {
        Some((
            self.hardware_options.allow_all_hardware,
            self.hardware_options
                .hardware_configs
                .iter()
                .map(|hw| hw.hardware.name.clone())
                .collect(),
        ))
    }
}

impl ConfigRecord for HardwareConfig {
    const KIND: &'static str = "hardware config";
    const BASE_PATH: &'static str = "xapi/hardware-configs";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.hardware.name
    }

    fn scopes(&self) -> &ScopeMap {
        &self.scopes
    }
}

impl ConfigRecord for ConstraintConfig {
    const KIND: &'static str = "constraint config";
    const BASE_PATH: &'static str = "xapi/constraint-configs";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.constraint.key
    }

    fn scopes(&self) -> &ScopeMap {
        &self.scopes
    }
}

/// CRUD operations for one configuration family.
pub struct ConfigEndpoint<'a, T: ConfigRecord> {
    client: &'a XnatClient,
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: ConfigRecord> ConfigEndpoint<'a, T> {
    pub(crate) fn new(client: &'a XnatClient) -> Self {
        Self {
            client,
            _marker: std::marker::PhantomData,
        }
    }

    /// Fetch one record by id.
    pub async fn get(&self, id: i64) -> Result<T, Error> {
        self.client.get(&format!("{}/{id}", T::BASE_PATH)).await
    }

    /// Fetch every record in the family.
    pub async fn get_all(&self) -> Result<Vec<T>, Error> {
        self.client.get(T::BASE_PATH).await
    }

    /// Fetch records offered to one subsystem.
    pub async fn get_all_of_type(&self, config_type: ConfigType) -> Result<Vec<T>, Error> {
        self.client
            .get_with_params(T::BASE_PATH, &[("type", config_type.to_string())])
            .await
    }

    /// Persist a new record; the server assigns the id.
    pub async fn create(&self, record: &T) -> Result<T, Error> {
        self.client.post(T::BASE_PATH, record).await
    }

    /// Update an existing record. Fails with [`Error::MissingId`] before
    /// any network call when the record has never been persisted.
    pub async fn update(&self, record: &T) -> Result<T, Error> {
        let id = record.id().ok_or(Error::MissingId { entity: T::KIND })?;
        self.client.put(&format!("{}/{id}", T::BASE_PATH), record).await
    }

    /// Create or update depending on whether the record has an id.
    pub async fn save(&self, record: &T) -> Result<T, Error> {
        match record.id() {
            Some(_) => self.update(record).await,
            None => self.create(record).await,
        }
    }

    /// Delete one record by id.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.client.delete(&format!("{}/{id}", T::BASE_PATH)).await
    }

    /// Records admitting the given user/project execution context,
    /// restricted to one subsystem.
    pub async fn available(
        &self,
        config_type: ConfigType,
        user: &str,
        project: &str,
    ) -> Result<Vec<T>, Error> {
        self.client
            .get_with_params(
                &format!("{}/available", T::BASE_PATH),
                &[
                    ("type", config_type.to_string()),
                    ("user", user.to_owned()),
                    ("project", project.to_owned()),
                ],
            )
            .await
    }
}

impl XnatClient {
    /// Endpoint for an arbitrary config family, chosen by type.
    pub fn configs<T: ConfigRecord>(&self) -> ConfigEndpoint<'_, T> {
        ConfigEndpoint::new(self)
    }

    pub fn compute_environment_configs(&self) -> ConfigEndpoint<'_, ComputeEnvironmentConfig> {
        ConfigEndpoint::new(self)
    }

    pub fn compute_spec_configs(&self) -> ConfigEndpoint<'_, ComputeSpecConfig> {
        ConfigEndpoint::new(self)
    }

    pub fn hardware_configs(&self) -> ConfigEndpoint<'_, HardwareConfig> {
        ConfigEndpoint::new(self)
    }

    pub fn constraint_configs(&self) -> ConfigEndpoint<'_, ConstraintConfig> {
        ConfigEndpoint::new(self)
    }
}
