//! Models for the JupyterHub passthrough API (`xapi/jupyterhub/…`) and
//! the event tracking log that server launches report progress through.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Hub ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubComponent {
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// The hub's `/hub/api/info` payload, proxied by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_executable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator: Option<HubComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawner: Option<HubComponent>,
}

// ── Users and servers ────────────────────────────────────────────────

/// A single-user Jupyter server as the hub reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HubServer {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_options: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl HubServer {
    /// Decode the spawner options XNAT attached to this server.
    pub fn xnat_user_options(&self) -> Result<UserOptions, serde_json::Error> {
        let map: serde_json::Map<String, serde_json::Value> =
            self.user_options.clone().into_iter().collect();
        serde_json::from_value(serde_json::Value::Object(map))
    }
}

/// A JupyterHub user account (distinct from the XNAT account it mirrors).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HubUser {
    pub name: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// URL of the default unnamed server, when one is running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    /// Named servers, keyed by server name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, HubServer>,
}

impl HubUser {
    /// Whether any server (default or named) is up or starting.
    pub fn has_active_server(&self) -> bool {
        self.server.is_some() || self.pending.is_some() || !self.servers.is_empty()
    }
}

// ── Tokens ───────────────────────────────────────────────────────────

/// An API token minted through the hub.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Requested lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

// ── Docker images ────────────────────────────────────────────────────

/// One entry of the `dockerImages` hub preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImage {
    pub image: String,
    /// The admin console historically wrote `"true"` as a string here,
    /// so stored entries carry either form.
    #[serde(deserialize_with = "bool_or_string")]
    pub enabled: bool,
}

fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => Ok(s == "true"),
    }
}

impl DockerImage {
    /// Decode the preference value, which arrives either as a JSON array
    /// or as that array re-encoded into a string.
    pub fn from_preference(value: &serde_json::Value) -> Result<Vec<Self>, serde_json::Error> {
        match value {
            serde_json::Value::String(raw) => serde_json::from_str(raw),
            other => serde_json::from_value(other.clone()),
        }
    }
}

// ── User options ─────────────────────────────────────────────────────

/// A bind mount resolved for a single-user server, with the path as seen
/// from the XNAT archive, the docker host, and the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindMount {
    pub name: String,
    pub writable: bool,
    pub container_host_path: String,
    pub xnat_host_path: String,
    pub jupyter_host_path: String,
}

/// The options XNAT hands the spawner for one server launch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servername: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xsi_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_tracking_id: Option<String>,
    #[serde(rename = "docker-image", default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(
        rename = "environment-variables",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(rename = "mounts", default, skip_serializing_if = "Vec::is_empty")]
    pub bind_mounts: Vec<BindMount>,
}

// ── Event tracking ───────────────────────────────────────────────────

/// Lifecycle states a launch step moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum ProgressStatus {
    Waiting,
    InProgress,
    Warning,
    Failed,
    Completed,
}

/// One timestamped progress message from the launch workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub status: ProgressStatus,
    /// Milliseconds since the epoch.
    pub event_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The log embedded in a tracking record's `payload` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTrackingLog {
    #[serde(default)]
    pub entry_list: Vec<ProgressEntry>,
}

impl ServerTrackingLog {
    /// Entries ordered by event time, as consumers expect them.
    pub fn sorted_entries(&self) -> Vec<ProgressEntry> {
        let mut entries = self.entry_list.clone();
        entries.sort_by_key(|e| e.event_time);
        entries
    }
}

/// One record from `xapi/eventTracking/{key}`.
///
/// `payload` is the JSON-encoded [`ServerTrackingLog`]; `succeeded` stays
/// unset until the workflow finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succeeded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_message: Option<String>,
}

impl TrackingData {
    /// Decode the embedded progress log, if a payload is present.
    pub fn log(&self) -> Result<ServerTrackingLog, serde_json::Error> {
        match self.payload.as_deref() {
            Some(raw) => serde_json::from_str(raw),
            None => Ok(ServerTrackingLog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_parses_hub_shape() {
        let json = r#"{
            "name": "alice",
            "admin": false,
            "groups": [],
            "server": "/user/alice/",
            "servers": {
                "": {"name": "", "ready": true, "url": "/user/alice/"}
            }
        }"#;

        let user: HubUser = serde_json::from_str(json).unwrap();
        assert!(user.has_active_server());
        assert_eq!(user.servers[""].ready, Some(true));
    }

    #[test]
    fn tracking_payload_decodes_to_sorted_log() {
        let data = TrackingData {
            payload: Some(
                r#"{"entryList": [
                    {"status": "Completed", "eventTime": 200, "message": "done"},
                    {"status": "InProgress", "eventTime": 100, "message": "starting"}
                ]}"#
                .to_owned(),
            ),
            succeeded: Some(true),
            ..TrackingData::default()
        };

        let entries = data.log().unwrap().sorted_entries();
        assert_eq!(entries[0].status, ProgressStatus::InProgress);
        assert_eq!(entries[1].status, ProgressStatus::Completed);
    }

    #[test]
    fn missing_payload_is_an_empty_log() {
        let data = TrackingData::default();
        assert!(data.log().unwrap().entry_list.is_empty());
    }

    #[test]
    fn docker_image_enabled_accepts_stringly_booleans() {
        let json = r#"[
            {"image": "jupyter/scipy-notebook:latest", "enabled": "true"},
            {"image": "jupyter/datascience-notebook:latest", "enabled": false}
        ]"#;

        let images: Vec<DockerImage> = serde_json::from_str(json).unwrap();
        assert!(images[0].enabled);
        assert!(!images[1].enabled);
    }

    #[test]
    fn docker_images_decode_from_plain_or_reencoded_preference() {
        let plain = serde_json::json!([{"image": "a:1", "enabled": true}]);
        let reencoded = serde_json::Value::String(plain.to_string());

        assert_eq!(
            DockerImage::from_preference(&plain).unwrap(),
            DockerImage::from_preference(&reencoded).unwrap()
        );
    }

    #[test]
    fn user_options_uses_dashed_keys() {
        let options = UserOptions {
            docker_image: Some("jupyter/scipy-notebook".to_owned()),
            ..UserOptions::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"docker-image\""));
    }
}
