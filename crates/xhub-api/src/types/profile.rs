//! Spawner profiles: a Docker Swarm task template offered to JupyterHub.
//!
//! Unlike the other plugin models, the docker task fields serialize in
//! snake_case because JupyterHub passes them to dockerspawner untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::compute::Mount;

/// Resource bounds for the single-user server task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_reservation: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub generic_resources: BTreeMap<String, String>,
}

/// Node placement constraints in swarm expression form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// The container run by the task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub image: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub mounts: Vec<Mount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    #[serde(default)]
    pub container_spec: ContainerSpec,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub placement: Placement,
}

/// A complete spawner profile as stored by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub task_template: TaskTemplate,
}

impl Profile {
    /// The only spawner current deployments support.
    pub const SWARM_SPAWNER: &'static str = "dockerspawner.SwarmSpawner";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parses_server_shape() {
        let json = r#"{
            "id": 1,
            "name": "Default JupyterHub Profile",
            "description": "Default profile",
            "spawner": "dockerspawner.SwarmSpawner",
            "enabled": true,
            "task_template": {
                "container_spec": {
                    "image": "jupyter/datascience-notebook:hub-3.0.0",
                    "env": {"JUPYTER_ENABLE_LAB": "yes"},
                    "mounts": []
                },
                "resources": {
                    "cpu_limit": 2.0,
                    "mem_limit": "4G",
                    "generic_resources": {}
                },
                "placement": {"constraints": []}
            }
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.spawner.as_deref(), Some(Profile::SWARM_SPAWNER));
        assert_eq!(profile.task_template.resources.mem_limit.as_deref(), Some("4G"));
        assert_eq!(
            profile.task_template.container_spec.env["JUPYTER_ENABLE_LAB"],
            "yes"
        );
    }
}
