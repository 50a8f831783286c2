use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use quickref::data::{Character, CharacterCatalog, DataRegistry, EffectCatalog, RegistryHandle};
use quickref::server::routes::router;
use quickref::server::AppState;
use tower::ServiceExt;

fn app() -> Router {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let registry = DataRegistry::load(data_dir).expect("bundled data should load");
    let state = AppState {
        registry: RegistryHandle::ready_with(registry),
    };
    router(state, None)
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("quickref-server-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

fn app_with_characters(characters: Vec<Character>) -> Router {
    let registry = DataRegistry::from_catalogs(
        "memory",
        EffectCatalog::default(),
        CharacterCatalog {
            data_version: None,
            characters,
        },
    );
    let state = AppState {
        registry: RegistryHandle::ready_with(Arc::new(registry)),
    };
    router(state, None)
}

async fn send_text(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let payload = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, payload)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ready_data() {
    let (status, payload) = send(app(), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["service"], "quickref-api");
    assert_eq!(payload["data"], "ready");
    assert!(payload["data_loaded_at"].is_string());
    assert_eq!(payload["effects_version"], "2026.10");
}

#[tokio::test]
async fn effects_and_characters_are_listed() {
    let (status, effects) = send(app(), get("/api/effects")).await;
    assert_eq!(status, StatusCode::OK);
    let effects = effects["effects"].as_array().expect("effects array");
    assert_eq!(effects.len(), 6);
    assert_eq!(effects[0]["category"], "base value");

    let (status, characters) = send(app(), get("/api/characters")).await;
    assert_eq!(status, StatusCode::OK);
    let first = &characters["characters"][0];
    assert_eq!(first["name"], "Iron Warden");
    assert_eq!(first["maxHealth"], 1000);
    assert_eq!(first["maxFocus"], 100);
}

#[tokio::test]
async fn calculate_endpoint_applies_effects_with_ally() {
    let body = r#"{"character":"iron warden","ally":"Lantern Monk","effects":[6,2,1]}"#;
    let (status, payload) = send(app(), post_json("/api/calculate", body)).await;

    assert_eq!(status, StatusCode::OK, "{payload}");
    assert_eq!(payload["selfHealthAmount"], 910);
    assert_eq!(payload["selfFocusAmount"], 30);
    assert_eq!(payload["allyHealthAmount"], 230);
    assert_eq!(payload["allyFocusAmount"], 7);
    assert_eq!(payload["allyHealthPercent"], "46%");
    assert_eq!(payload["appliedEffects"], serde_json::json!([1, 2, 6]));
    assert!(payload["steps"].as_array().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn calculate_endpoint_without_ally_zeroes_ally_amounts() {
    let body = r#"{"character":"Iron Warden","effects":[2,99]}"#;
    let (status, payload) = send(app(), post_json("/api/calculate", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["selfHealthAmount"], 500);
    assert_eq!(payload["allyHealthAmount"], 0);
    assert_eq!(payload["appliedEffects"], serde_json::json!([2]));
}

#[tokio::test]
async fn calculate_endpoint_rejects_unknown_character() {
    let body = r#"{"character":"Nobody","effects":[]}"#;
    let (status, payload) = send(app(), post_json("/api/calculate", body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["status"], "error");
    assert!(payload["message"].as_str().unwrap_or("").contains("Nobody"));
}

#[tokio::test]
async fn calculate_endpoint_rejects_malformed_body() {
    let (status, payload) = send(app(), post_json("/api/calculate", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["status"], "error");
    assert!(payload["message"]
        .as_str()
        .unwrap_or("")
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn recovery_table_for_one_character() {
    let (status, payload) = send(app(), get("/api/recovery/table?character=Ash%20Ranger")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["character"], "Ash Ranger");
    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 64);
    assert_eq!(rows[0]["self_health"], 510);
}

#[tokio::test]
async fn recovery_table_for_unknown_character_is_not_found() {
    let (status, _) = send(app(), get("/api/recovery/table?character=ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_api_route_is_json_not_found() {
    let (status, payload) = send(app(), get("/api/officers")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["message"], "route not found");
}

#[tokio::test]
async fn landing_page_is_served_without_frontend_build() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/api/calculate"));
}

#[tokio::test]
async fn failed_registry_load_is_service_unavailable() {
    let state = AppState {
        registry: RegistryHandle::spawn_load("no/such/quickref/data".into()),
    };
    let app = router(state, None);
    let (status, payload) = send(app.clone(), get("/api/effects")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(payload["status"], "error");

    let (status, health) = send(app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["data"], "failed");
}

#[tokio::test]
async fn registry_shared_across_clones() {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let registry = DataRegistry::load(data_dir).unwrap();
    let handle = RegistryHandle::ready_with(Arc::clone(&registry));
    let other = handle.clone();
    let resolved = other.ready().await.unwrap();
    assert!(Arc::ptr_eq(&registry, &resolved));
}

#[tokio::test]
async fn calculate_endpoint_rejects_zero_health_acting_character() {
    let app = app_with_characters(vec![Character {
        name: "Hollow".to_string(),
        max_health: 0,
        max_focus: 10,
    }]);
    let (status, payload) = send(app, post_json("/api/calculate", r#"{"character":"Hollow"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["status"], "error");
    let message = payload["message"].as_str().unwrap_or("");
    assert!(message.contains("invalid input"), "{message}");
    assert!(message.contains("acting character"), "{message}");
}

#[tokio::test]
async fn calculate_endpoint_rejects_zero_health_ally() {
    let app = app_with_characters(vec![
        Character {
            name: "Warden".to_string(),
            max_health: 800,
            max_focus: 40,
        },
        Character {
            name: "Hollow".to_string(),
            max_health: 0,
            max_focus: 0,
        },
    ]);
    let body = r#"{"character":"Warden","ally":"Hollow","effects":[]}"#;
    let (status, payload) = send(app, post_json("/api/calculate", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["status"], "error");
    let message = payload["message"].as_str().unwrap_or("");
    assert!(message.contains("invalid input"), "{message}");
    assert!(message.contains("ally character"), "{message}");
}

#[tokio::test]
async fn static_dir_serves_notebook_with_client_route_fallback() {
    let dir = unique_temp_dir("static");
    fs::write(dir.join("index.html"), "<html>notebook</html>").expect("index should be written");
    fs::write(dir.join("app.js"), "console.log('notebook');").expect("asset should be written");

    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let registry = DataRegistry::load(data_dir).expect("bundled data should load");
    let state = AppState {
        registry: RegistryHandle::ready_with(registry),
    };
    let app = router(state, Some(dir.as_path()));

    let (status, body) = send_text(app.clone(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<html>notebook</html>");

    let (status, body) = send_text(app.clone(), get("/app.js")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("notebook"));

    let (status, body) = send_text(app.clone(), get("/recovery/table/view")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<html>notebook</html>");

    let (status, payload) = send(app.clone(), get("/api/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["message"], "route not found");

    let (status, payload) = send(app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"], "ready");

    let _ = fs::remove_dir_all(dir);
}
