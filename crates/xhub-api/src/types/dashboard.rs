use serde::{Deserialize, Serialize};

use super::compute::ComputeEnvironmentConfig;
use super::hardware::HardwareConfig;
use super::scope::ScopeMap;

/// The dashboard application itself: where its code lives and how to run it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// `"git"` or `"website"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repo_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_file_path: Option<String>,
}

/// A dashboard plus its scoping and the compute/hardware pairing it runs on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub dashboard: Dashboard,
    #[serde(default)]
    pub scopes: ScopeMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_environment_config: Option<ComputeEnvironmentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_config: Option<HardwareConfig>,
}

/// A named command template dashboards can be launched with
/// (Panel, Streamlit, Dash, Voila, or a custom one).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFramework {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub command_template: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_config_parses_server_shape() {
        let json = r#"{
            "id": 11,
            "dashboard": {
                "name": "QC Dashboard",
                "framework": "Panel",
                "fileSource": "git",
                "gitRepoUrl": "https://example.org/qc.git",
                "gitRepoBranch": "main",
                "mainFilePath": "app.py"
            },
            "scopes": {"Site": {"scope": "Site", "enabled": false, "ids": []}}
        }"#;

        let config: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.dashboard.name, "QC Dashboard");
        assert_eq!(config.dashboard.git_repo_branch.as_deref(), Some("main"));
        assert!(config.compute_environment_config.is_none());
    }
}
