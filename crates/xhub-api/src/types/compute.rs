use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::hardware::HardwareConfig;
use super::scope::ScopeMap;

/// Which XNAT subsystems a compute config is offered to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigType {
    Jupyterhub,
    ContainerService,
    General,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVariable {
    pub key: String,
    pub value: String,
}

/// A bind mount offered to the spawned container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_name: Option<String>,
    pub local_path: String,
    pub container_path: String,
    pub read_only: bool,
}

/// The container image and launch context of a compute environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnvironment {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default)]
    pub mounts: Vec<Mount>,
}

/// Which hardware configs may be paired with a compute config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareOptions {
    pub allow_all_hardware: bool,
    #[serde(default)]
    pub hardware_configs: Vec<HardwareConfig>,
}

/// A compute environment definition plus its scoping and hardware pairing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub config_types: BTreeSet<ConfigType>,
    pub compute_environment: ComputeEnvironment,
    #[serde(default)]
    pub scopes: ScopeMap,
    #[serde(default)]
    pub hardware_options: HardwareOptions,
}

/// Pre-rename spelling of [`ComputeEnvironment`]; identical shape.
pub type ComputeSpec = ComputeEnvironment;

/// Legacy counterpart of [`ComputeEnvironmentConfig`] served by older
/// deployments under `xapi/compute-spec-configs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeSpecConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub config_types: BTreeSet<ConfigType>,
    pub compute_spec: ComputeSpec,
    #[serde(default)]
    pub scopes: ScopeMap,
    #[serde(default)]
    pub hardware_options: HardwareOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_type_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ConfigType::ContainerService).unwrap();
        assert_eq!(json, "\"CONTAINER_SERVICE\"");
        let back: ConfigType = serde_json::from_str("\"JUPYTERHUB\"").unwrap();
        assert_eq!(back, ConfigType::Jupyterhub);
    }

    #[test]
    fn environment_config_parses_server_shape() {
        let json = r#"{
            "id": 7,
            "configTypes": ["JUPYTERHUB"],
            "computeEnvironment": {
                "name": "Datascience Notebook",
                "image": "jupyter/datascience-notebook:hub-3.0.0",
                "environmentVariables": [{"key": "JUPYTER_ENABLE_LAB", "value": "yes"}],
                "mounts": [{
                    "localPath": "/data/xnat/archive",
                    "containerPath": "/data",
                    "readOnly": true
                }]
            },
            "scopes": {"Site": {"scope": "Site", "enabled": true, "ids": []}},
            "hardwareOptions": {"allowAllHardware": true, "hardwareConfigs": []}
        }"#;

        let config: ComputeEnvironmentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.id, Some(7));
        assert_eq!(config.compute_environment.name, "Datascience Notebook");
        assert_eq!(config.compute_environment.mounts[0].container_path, "/data");
        assert!(config.hardware_options.allow_all_hardware);
    }

    #[test]
    fn spec_config_wraps_compute_spec_key() {
        let config = ComputeSpecConfig {
            compute_spec: ComputeSpec {
                name: "legacy".to_owned(),
                ..ComputeSpec::default()
            },
            ..ComputeSpecConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"computeSpec\""));
        assert!(!json.contains("\"computeEnvironment\""));
    }
}
