use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::scope::ScopeMap;

/// Whether a placement constraint admits or excludes its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    In,
    NotIn,
}

/// A Docker Swarm node placement constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub key: String,
    pub operator: Operator,
    #[serde(default)]
    pub values: BTreeSet<String>,
}

impl Constraint {
    /// Render as swarm constraint expressions, one per value
    /// (`node.role==worker`, `node.labels.gpu!=false`).
    pub fn expressions(&self) -> Vec<String> {
        let op = match self.operator {
            Operator::In => "==",
            Operator::NotIn => "!=",
        };
        self.values
            .iter()
            .map(|value| format!("{}{op}{value}", self.key))
            .collect()
    }
}

/// A named generic resource request (GPUs and the like).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericResource {
    pub name: String,
    pub value: String,
}

/// CPU, memory, constraint, and resource settings for a launched server.
///
/// Memory fields are strings with a K/M/G/T suffix (`"4G"`), matching
/// what Docker accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub environment_variables: Vec<super::compute::EnvironmentVariable>,
    #[serde(default)]
    pub generic_resources: Vec<GenericResource>,
}

/// A hardware definition plus its scoping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub hardware: Hardware,
    #[serde(default)]
    pub scopes: ScopeMap,
}

/// A site-wide placement constraint applied to every launched server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub constraint: Constraint,
    #[serde(default)]
    pub scopes: ScopeMap,
}

impl Default for Constraint {
    fn default() -> Self {
        Self {
            key: String::new(),
            operator: Operator::In,
            values: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_renders_swarm_expressions() {
        let constraint = Constraint {
            key: "node.role".to_owned(),
            operator: Operator::In,
            values: ["worker".to_owned()].into(),
        };
        assert_eq!(constraint.expressions(), vec!["node.role==worker"]);

        let excluded = Constraint {
            key: "node.labels.type".to_owned(),
            operator: Operator::NotIn,
            values: ["gpu".to_owned()].into(),
        };
        assert_eq!(excluded.expressions(), vec!["node.labels.type!=gpu"]);
    }

    #[test]
    fn hardware_config_parses_server_shape() {
        let json = r#"{
            "id": 3,
            "hardware": {
                "name": "Large",
                "cpuLimit": 4.0,
                "memoryLimit": "16G",
                "constraints": [],
                "environmentVariables": [],
                "genericResources": [{"name": "gpu", "value": "1"}]
            },
            "scopes": {"Site": {"scope": "Site", "enabled": true, "ids": []}}
        }"#;

        let config: HardwareConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hardware.name, "Large");
        assert_eq!(config.hardware.memory_limit.as_deref(), Some("16G"));
        assert_eq!(config.hardware.generic_resources[0].name, "gpu");
    }

    #[test]
    fn operator_uses_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&Operator::NotIn).unwrap(), "\"NOT_IN\"");
    }
}
