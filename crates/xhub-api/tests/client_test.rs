#![allow(clippy::unwrap_used)]
// Integration tests for `XnatClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xhub_api::types::{
    AccessScope, ComputeEnvironment, ComputeEnvironmentConfig, HardwareConfig, ProgressStatus,
    Scope,
};
use xhub_api::{Auth, Error, StartServerRequest, TransportConfig, XnatClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, XnatClient) {
    let server = MockServer::start().await;
    let client = XnatClient::new(&server.uri(), Auth::None, &TransportConfig::default()).unwrap();
    (server, client)
}

fn env_config(id: Option<i64>, name: &str) -> ComputeEnvironmentConfig {
    ComputeEnvironmentConfig {
        id,
        compute_environment: ComputeEnvironment {
            name: name.to_owned(),
            image: "jupyter/datascience-notebook:hub-3.0.0".to_owned(),
            ..ComputeEnvironment::default()
        },
        ..ComputeEnvironmentConfig::default()
    }
}

// ── Config CRUD ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_all_compute_environment_configs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/xapi/compute-environment-configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "configTypes": ["JUPYTERHUB"],
            "computeEnvironment": {
                "name": "Datascience Notebook",
                "image": "jupyter/datascience-notebook:hub-3.0.0"
            },
            "scopes": {},
            "hardwareOptions": {"allowAllHardware": true, "hardwareConfigs": []}
        }])))
        .mount(&server)
        .await;

    let configs = client.compute_environment_configs().get_all().await.unwrap();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].compute_environment.name, "Datascience Notebook");
}

#[tokio::test]
async fn test_save_without_id_creates() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/xapi/compute-environment-configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "computeEnvironment": {"name": "New Env", "image": "img"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = client
        .compute_environment_configs()
        .save(&env_config(None, "New Env"))
        .await
        .unwrap();
    assert_eq!(saved.id, Some(42));
}

#[tokio::test]
async fn test_save_with_id_updates() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/xapi/compute-environment-configs/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "computeEnvironment": {"name": "Existing", "image": "img"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = client
        .compute_environment_configs()
        .save(&env_config(Some(7), "Existing"))
        .await
        .unwrap();
    assert_eq!(saved.id, Some(7));
}

#[tokio::test]
async fn test_update_without_id_fails_before_network() {
    let (server, client) = setup().await;
    // No mocks mounted: any request would 404 and the error would differ.

    let result = client
        .compute_environment_configs()
        .update(&env_config(None, "Unsaved"))
        .await;

    assert!(
        matches!(result, Err(Error::MissingId { entity: "compute environment config" })),
        "expected MissingId, got: {result:?}"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_failure_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/xapi/hardware-configs/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.hardware_configs().delete(3).await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_available_sends_context_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/xapi/hardware-configs/available"))
        .and(query_param("type", "JUPYTERHUB"))
        .and(query_param("user", "alice"))
        .and(query_param("project", "ProjectA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let configs: Vec<HardwareConfig> = client
        .hardware_configs()
        .available(
            xhub_api::types::ConfigType::Jupyterhub,
            "alice",
            "ProjectA",
        )
        .await
        .unwrap();
    assert!(configs.is_empty());
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/xapi/constraint-configs"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Session expired"))
        .mount(&server)
        .await;

    let result = client.constraint_configs().get_all().await;
    assert!(
        matches!(result, Err(ref e) if e.is_auth()),
        "expected Authentication error, got: {result:?}"
    );
}

// ── CSRF token ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_csrf_token_rides_every_request() {
    let server = MockServer::start().await;
    let client = XnatClient::new(&server.uri(), Auth::None, &TransportConfig::default())
        .unwrap()
        .with_csrf_token("tok123");

    Mock::given(method("GET"))
        .and(path("/xapi/constraint-configs"))
        .and(query_param("XNAT_CSRF", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let configs = client.constraint_configs().get_all().await.unwrap();
    assert!(configs.is_empty());
}

// ── Dashboards ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_scope_toggles_hit_dedicated_endpoints() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/xapi/jupyterhub/dashboards/configs/5/scope/site"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/xapi/jupyterhub/dashboards/configs/5/scope/project/ProjectA"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.dashboards().enable_for_site(5).await.unwrap();
    client
        .dashboards()
        .disable_for_project(5, "ProjectA")
        .await
        .unwrap();
}

// ── Hub users and servers ───────────────────────────────────────────

#[tokio::test]
async fn test_missing_hub_user_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/xapi/jupyterhub/users/alice"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .mount(&server)
        .await;

    let result = client.hub().user("alice").await;
    assert!(
        matches!(result, Err(ref e) if e.is_not_found()),
        "expected not-found error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_start_server_sends_launch_context() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/xapi/jupyterhub/users/alice/server"))
        .and(query_param("xsiType", "xnat:projectData"))
        .and(query_param("itemId", "ProjectA"))
        .and(query_param("itemLabel", "ProjectA"))
        .and(query_param("projectId", "ProjectA"))
        .and(query_param("eventTrackingId", "20240101T000000000Z"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .hub()
        .start_server(&StartServerRequest {
            username: "alice".to_owned(),
            xsi_type: "xnat:projectData".to_owned(),
            item_id: "ProjectA".to_owned(),
            item_label: "ProjectA".to_owned(),
            project_id: "ProjectA".to_owned(),
            event_tracking_id: "20240101T000000000Z".to_owned(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_tracking_data_decodes_progress_log() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/xapi/eventTracking/key1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "key1",
            "succeeded": null,
            "payload": "{\"entryList\": [{\"status\": \"InProgress\", \"eventTime\": 10, \"message\": \"spawning\"}]}",
            "finalMessage": null
        })))
        .mount(&server)
        .await;

    let data = client.hub().tracking_data("key1").await.unwrap();
    let log = data.log().unwrap();
    assert_eq!(log.entry_list.len(), 1);
    assert_eq!(log.entry_list[0].status, ProgressStatus::InProgress);
    assert!(data.succeeded.is_none());
}

// ── Docker images ───────────────────────────────────────────────────

#[tokio::test]
async fn test_docker_images_unwrap_the_preference_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/xapi/jupyterhub/preferences/dockerImages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dockerImages": [
                {"image": "jupyter/scipy-notebook:latest", "enabled": "true"},
                {"image": "jupyter/datascience-notebook:latest", "enabled": false}
            ]
        })))
        .mount(&server)
        .await;

    let images = client.hub().docker_images().await.unwrap();
    assert_eq!(images.len(), 2);
    assert!(images[0].enabled);
    assert!(!images[1].enabled);
}

#[tokio::test]
async fn test_set_docker_images_posts_the_full_list() {
    let (server, client) = setup().await;

    let images = vec![xhub_api::types::DockerImage {
        image: "jupyter/scipy-notebook:latest".to_owned(),
        enabled: true,
    }];

    Mock::given(method("POST"))
        .and(path("/xapi/jupyterhub/preferences/dockerImages"))
        .and(body_json(
            json!([{"image": "jupyter/scipy-notebook:latest", "enabled": true}]),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.hub().set_docker_images(&images).await.unwrap();
}

// ── XNAT roles ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_grant_jupyter_role_puts_role_list() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/xapi/users/alice/roles"))
        .and(body_json(json!(["Jupyter"])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.users().grant_jupyter_role("alice").await.unwrap();
}

#[tokio::test]
async fn test_scope_map_round_trips_through_save() {
    let (server, client) = setup().await;

    let mut config = env_config(None, "Scoped");
    config
        .scopes
        .insert(Scope::Project, AccessScope::only(Scope::Project, ["ProjectA"]));

    Mock::given(method("POST"))
        .and(path("/xapi/compute-environment-configs"))
        .and(body_json(serde_json::to_value(&config).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::to_value(&config).unwrap()))
        .expect(1)
        .mount(&server)
        .await;

    let saved = client.compute_environment_configs().save(&config).await.unwrap();
    assert_eq!(saved.scopes[&Scope::Project].ids.len(), 1);
}
