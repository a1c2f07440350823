//! Entity list management and editor sessions, decoupled from both the
//! transport and any rendering.
//!
//! `Manager` owns the in-memory list for one entity family and a single
//! editor draft. Saves run the family's validation first and abort with
//! the collected messages before touching the network.

use xhub_api::types::{
    AccessScope, ComputeEnvironmentConfig, ComputeSpecConfig, ConstraintConfig, DashboardConfig,
    HardwareConfig, Scope,
};
use xhub_api::{ConfigEndpoint, ConfigRecord};

use crate::error::CoreError;
use crate::validate;

/// Accounts never offered in user scope pickers.
const SERVICE_ACCOUNTS: [&str; 2] = ["jupyterhub", "guest"];

/// Drop service accounts and sort, for user option lists.
pub fn eligible_users(mut usernames: Vec<String>) -> Vec<String> {
    usernames.retain(|name| !SERVICE_ACCOUNTS.contains(&name.as_str()));
    usernames.sort();
    usernames
}

// ── Transport abstraction ────────────────────────────────────────────

/// REST access for one entity family. Implemented by the live endpoint
/// and by fakes in tests.
#[allow(async_fn_in_trait)]
pub trait ConfigResource<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, xhub_api::Error>;
    async fn persist(&self, record: &T) -> Result<T, xhub_api::Error>;
    async fn remove(&self, id: i64) -> Result<(), xhub_api::Error>;
}

impl<T: ConfigRecord> ConfigResource<T> for ConfigEndpoint<'_, T> {
    async fn fetch_all(&self) -> Result<Vec<T>, xhub_api::Error> {
        self.get_all().await
    }

    async fn persist(&self, record: &T) -> Result<T, xhub_api::Error> {
        self.save(record).await
    }

    async fn remove(&self, id: i64) -> Result<(), xhub_api::Error> {
        self.delete(id).await
    }
}

// ── Editable records ─────────────────────────────────────────────────

/// What the manager needs to know about a record beyond transport.
pub trait Editable: Clone {
    fn id(&self) -> Option<i64>;
    fn display_name(&self) -> &str;
    /// Strip id and name so a copy saves as a new record.
    fn clear_identity(&mut self);
    fn validate(&self) -> Result<(), CoreError>;
    /// The site enablement rule, if the record carries scopes.
    fn site_rule_mut(&mut self) -> Option<&mut AccessScope>;
}

impl Editable for ComputeEnvironmentConfig {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.compute_environment.name
    }

    fn clear_identity(&mut self) {
        self.id = None;
        self.compute_environment.name.clear();
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate::validate_compute_environment_config(self)
    }

    fn site_rule_mut(&mut self) -> Option<&mut AccessScope> {
        self.scopes.get_mut(&Scope::Site)
    }
}

impl Editable for ComputeSpecConfig {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.compute_spec.name
    }

    fn clear_identity(&mut self) {
        self.id = None;
        self.compute_spec.name.clear();
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate::validate_compute_spec_config(self)
    }

    fn site_rule_mut(&mut self) -> Option<&mut AccessScope> {
        self.scopes.get_mut(&Scope::Site)
    }
}

impl Editable for HardwareConfig {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.hardware.name
    }

    fn clear_identity(&mut self) {
        self.id = None;
        self.hardware.name.clear();
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate::validate_hardware_config(self)
    }

    fn site_rule_mut(&mut self) -> Option<&mut AccessScope> {
        self.scopes.get_mut(&Scope::Site)
    }
}

impl Editable for ConstraintConfig {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.constraint.key
    }

    fn clear_identity(&mut self) {
        self.id = None;
        self.constraint.key.clear();
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate::validate_constraint_config(self)
    }

    fn site_rule_mut(&mut self) -> Option<&mut AccessScope> {
        self.scopes.get_mut(&Scope::Site)
    }
}

impl Editable for DashboardConfig {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.dashboard.name
    }

    fn clear_identity(&mut self) {
        self.id = None;
        self.dashboard.name.clear();
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate::validate_dashboard_config(self)
    }

    fn site_rule_mut(&mut self) -> Option<&mut AccessScope> {
        self.scopes.get_mut(&Scope::Site)
    }
}

// ── Manager ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Edit,
    Copy,
}

/// An open editor session.
#[derive(Debug, Clone)]
pub struct Draft<T> {
    pub mode: EditorMode,
    pub record: T,
}

/// In-memory controller for one entity family.
pub struct Manager<T, R> {
    resource: R,
    entities: Vec<T>,
    draft: Option<Draft<T>>,
}

impl<T, R> Manager<T, R>
where
    T: Editable,
    R: ConfigResource<T>,
{
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            entities: Vec::new(),
            draft: None,
        }
    }

    /// Re-fetch the list, sorted by display name.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let mut entities = self.resource.fetch_all().await?;
        entities.sort_by(|a, b| a.display_name().cmp(b.display_name()));
        self.entities = entities;
        Ok(())
    }

    pub fn entities(&self) -> &[T] {
        &self.entities
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == Some(id))
    }

    pub fn draft(&self) -> Option<&Draft<T>> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft<T>> {
        self.draft.as_mut()
    }

    /// Open an editor on a fresh record.
    pub fn open_new(&mut self, template: T) {
        self.draft = Some(Draft {
            mode: EditorMode::New,
            record: template,
        });
    }

    /// Open an editor on an existing record.
    pub fn open_edit(&mut self, id: i64, entity_kind: &'static str) -> Result<(), CoreError> {
        let record = self.find(id).cloned().ok_or(CoreError::NotFound {
            entity: entity_kind,
            id: id.to_string(),
        })?;
        self.draft = Some(Draft {
            mode: EditorMode::Edit,
            record,
        });
        Ok(())
    }

    /// Open an editor on a duplicate; the copy keeps every field except
    /// id and name.
    pub fn open_copy(&mut self, id: i64, entity_kind: &'static str) -> Result<(), CoreError> {
        let mut record = self.find(id).cloned().ok_or(CoreError::NotFound {
            entity: entity_kind,
            id: id.to_string(),
        })?;
        record.clear_identity();
        self.draft = Some(Draft {
            mode: EditorMode::Copy,
            record,
        });
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Validate and persist the open draft. On validation failure the
    /// draft stays open and nothing is sent. On success the draft closes
    /// and the list is refreshed.
    pub async fn save_draft(&mut self) -> Result<T, CoreError> {
        let draft = self.draft.as_ref().ok_or(CoreError::NotFound {
            entity: "editor draft",
            id: String::new(),
        })?;

        draft.record.validate()?;
        let saved = self.resource.persist(&draft.record).await?;

        self.draft = None;
        self.refresh().await?;
        Ok(saved)
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), CoreError> {
        self.resource.remove(id).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Flip the site enablement flag optimistically: the in-memory flag
    /// changes first, the record is persisted, and a failed persist
    /// reverts the flag. Returns the flag's final state.
    pub async fn toggle_site_enabled(&mut self, id: i64) -> Result<bool, CoreError> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id() == Some(id))
            .ok_or(CoreError::NotFound {
                entity: "config",
                id: id.to_string(),
            })?;

        let Some(rule) = entity.site_rule_mut() else {
            return Err(CoreError::NotFound {
                entity: "site scope",
                id: id.to_string(),
            });
        };
        rule.enabled = !rule.enabled;
        let enabled = rule.enabled;
        let snapshot = entity.clone();

        match self.resource.persist(&snapshot).await {
            Ok(saved) => {
                *entity = saved;
                Ok(enabled)
            }
            Err(err) => {
                if let Some(rule) = entity.site_rule_mut() {
                    rule.enabled = !rule.enabled;
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use xhub_api::types::{ComputeEnvironment, EnvironmentVariable, Hardware, Mount};

    use super::*;

    struct FakeResource {
        records: Mutex<Vec<HardwareConfig>>,
        fail_persist: bool,
        fail_remove: bool,
    }

    impl FakeResource {
        fn with(records: Vec<HardwareConfig>) -> Self {
            Self {
                records: Mutex::new(records),
                fail_persist: false,
                fail_remove: false,
            }
        }

        fn failing(records: Vec<HardwareConfig>) -> Self {
            Self {
                fail_persist: true,
                ..Self::with(records)
            }
        }

        fn failing_remove(records: Vec<HardwareConfig>) -> Self {
            Self {
                fail_remove: true,
                ..Self::with(records)
            }
        }
    }

    impl ConfigResource<HardwareConfig> for &FakeResource {
        async fn fetch_all(&self) -> Result<Vec<HardwareConfig>, xhub_api::Error> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn persist(&self, record: &HardwareConfig) -> Result<HardwareConfig, xhub_api::Error> {
            if self.fail_persist {
                return Err(xhub_api::Error::Api {
                    status: 500,
                    message: "persist failed".to_owned(),
                });
            }
            let mut records = self.records.lock().unwrap();
            let mut saved = record.clone();
            match record.id {
                Some(id) => {
                    if let Some(existing) = records.iter_mut().find(|r| r.id == Some(id)) {
                        *existing = saved.clone();
                    }
                }
                None => {
                    saved.id = Some(records.len() as i64 + 1);
                    records.push(saved.clone());
                }
            }
            Ok(saved)
        }

        async fn remove(&self, id: i64) -> Result<(), xhub_api::Error> {
            if self.fail_remove {
                return Err(xhub_api::Error::Api {
                    status: 500,
                    message: "remove failed".to_owned(),
                });
            }
            self.records.lock().unwrap().retain(|r| r.id != Some(id));
            Ok(())
        }
    }

    fn config(id: i64, name: &str, site_enabled: bool) -> HardwareConfig {
        let mut config = HardwareConfig {
            id: Some(id),
            hardware: Hardware {
                name: name.to_owned(),
                ..Hardware::default()
            },
            ..HardwareConfig::default()
        };
        config.scopes.insert(
            Scope::Site,
            AccessScope {
                scope: Scope::Site,
                enabled: site_enabled,
                ids: std::collections::BTreeSet::new(),
            },
        );
        config
    }

    #[tokio::test]
    async fn refresh_sorts_by_name() {
        let resource = FakeResource::with(vec![config(1, "Zeta", true), config(2, "Alpha", true)]);
        let mut manager = Manager::new(&resource);

        manager.refresh().await.unwrap();
        let names: Vec<&str> = manager.entities().iter().map(|e| e.display_name()).collect();
        assert_eq!(names, ["Alpha", "Zeta"]);
    }

    #[tokio::test]
    async fn copy_clears_id_and_name_only() {
        let mut original = config(1, "Large", true);
        original.hardware.memory_limit = Some("16G".to_owned());
        let resource = FakeResource::with(vec![original]);
        let mut manager = Manager::new(&resource);
        manager.refresh().await.unwrap();

        manager.open_copy(1, "hardware config").unwrap();
        let draft = manager.draft().unwrap();
        assert_eq!(draft.mode, EditorMode::Copy);
        assert_eq!(draft.record.id, None);
        assert_eq!(draft.record.hardware.name, "");
        assert_eq!(draft.record.hardware.memory_limit.as_deref(), Some("16G"));
    }

    #[tokio::test]
    async fn invalid_draft_aborts_save_and_stays_open() {
        let resource = FakeResource::with(vec![]);
        let mut manager = Manager::new(&resource);
        manager.open_new(config(0, "", true));

        let draft = manager.draft_mut().unwrap();
        draft.record.id = None;
        draft.record.hardware.memory_limit = Some("2".to_owned());

        let err = manager.save_draft().await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.validation_messages().len(), 2);
        assert!(manager.draft().is_some());
        assert!(resource.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_draft_saves_closes_and_refreshes() {
        let resource = FakeResource::with(vec![]);
        let mut manager = Manager::new(&resource);
        let mut template = config(0, "Medium", true);
        template.id = None;
        manager.open_new(template);

        let saved = manager.save_draft().await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert!(manager.draft().is_none());
        assert_eq!(manager.entities().len(), 1);
    }

    #[tokio::test]
    async fn toggle_flips_and_persists() {
        let resource = FakeResource::with(vec![config(1, "Large", false)]);
        let mut manager = Manager::new(&resource);
        manager.refresh().await.unwrap();

        let enabled = manager.toggle_site_enabled(1).await.unwrap();
        assert!(enabled);
        let stored = &resource.records.lock().unwrap()[0];
        assert!(stored.scopes[&Scope::Site].enabled);
    }

    #[tokio::test]
    async fn failed_toggle_reverts_in_memory_flag() {
        let resource = FakeResource::failing(vec![config(1, "Large", false)]);
        let mut manager = Manager::new(&resource);
        manager.refresh().await.unwrap();

        let err = manager.toggle_site_enabled(1).await.unwrap_err();
        assert!(matches!(err, CoreError::Api(_)));
        assert!(!manager.find(1).unwrap().scopes[&Scope::Site].enabled);
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_list_unchanged() {
        let resource = FakeResource::failing_remove(vec![config(1, "Large", true)]);
        let mut manager = Manager::new(&resource);
        manager.refresh().await.unwrap();

        let err = manager.delete(1).await.unwrap_err();
        assert!(matches!(err, CoreError::Api(_)));
        assert_eq!(manager.entities().len(), 1);
        assert_eq!(resource.records.lock().unwrap().len(), 1);
    }

    #[test]
    fn service_accounts_are_filtered_and_sorted() {
        let users = eligible_users(vec![
            "carol".to_owned(),
            "jupyterhub".to_owned(),
            "alice".to_owned(),
            "guest".to_owned(),
        ]);
        assert_eq!(users, ["alice", "carol"]);
    }

    #[test]
    fn validation_covers_environment_records() {
        let config = ComputeEnvironmentConfig {
            compute_environment: ComputeEnvironment {
                name: "Env".to_owned(),
                image: "img:latest".to_owned(),
                environment_variables: vec![EnvironmentVariable {
                    key: "OK_KEY".to_owned(),
                    value: "v".to_owned(),
                }],
                mounts: vec![Mount {
                    volume_name: None,
                    local_path: "/data/archive".to_owned(),
                    container_path: "/data".to_owned(),
                    read_only: true,
                }],
                ..ComputeEnvironment::default()
            },
            ..ComputeEnvironmentConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
