//! Integration tests for the document store HTTP API.
//!
//! The router runs against the in-memory backend, so no database is needed.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use locator_client::store::{MemoryStore, SharedStore};
use locator_client::{RemoteSync, Repository};
use locator_docstore::config::Config;
use locator_docstore::db::DocumentStore;
use locator_docstore::{build_router, AppState};
use locator_engine::ProductFields;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_state() -> AppState {
    AppState {
        store: DocumentStore::memory(),
        config: Arc::new(Config::default()),
    }
}

/// Serve the router on an ephemeral port and return the documents URL.
async fn start_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/jsonBlob", addr)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_memory_storage() {
    let response = build_router(test_state())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["storage"], "memory");
}

#[tokio::test]
async fn create_returns_location() {
    let response = build_router(test_state())
        .oneshot(post_json("/api/jsonBlob", "[]"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/api/jsonBlob/"));
    let id = response.headers()["x-jsonblob-id"].to_str().unwrap();
    assert_eq!(location, format!("/api/jsonBlob/{}", id));
}

#[tokio::test]
async fn create_rejects_invalid_json() {
    let app = build_router(test_state());

    let response = app
        .clone()
        .oneshot(post_json("/api/jsonBlob", "not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(post_json("/api/jsonBlob", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_document_is_rejected() {
    let state = AppState {
        store: DocumentStore::memory(),
        config: Arc::new(Config {
            max_document_bytes: 16,
            ..Config::default()
        }),
    };
    let body = serde_json::to_string(&json!([{"name": "a very long product name"}])).unwrap();

    let response = build_router(state)
        .oneshot(post_json("/api/jsonBlob", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn get_and_put_roundtrip() {
    let base = start_server(test_state()).await;
    let client = reqwest::Client::new();

    let created = client
        .post(&base)
        .json(&json!([{"id": "1", "name": "Saw"}]))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);
    let id = created.headers()["x-jsonblob-id"].to_str().unwrap().to_string();
    let url = format!("{}/{}", base, id);

    let doc: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(doc, json!([{"id": "1", "name": "Saw"}]));

    let replaced = client.put(&url).json(&json!([])).send().await.unwrap();
    assert_eq!(replaced.status(), reqwest::StatusCode::OK);

    let doc: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(doc, json!([]));
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let base = start_server(test_state()).await;
    let client = reqwest::Client::new();
    let url = format!("{}/nonexistent-id", base);

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let response = client.put(&url).json(&json!([])).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn two_devices_share_a_list() {
    let base = start_server(test_state()).await;

    let phone_store: SharedStore = Arc::new(MemoryStore::new());
    let phone_sync = RemoteSync::new(&base, phone_store.clone(), Duration::from_secs(5)).unwrap();
    let mut phone = Repository::load(phone_store, Some(phone_sync)).await.unwrap();
    phone
        .add(ProductFields::new("Faucet", "38").with_bay("5"))
        .await
        .unwrap();
    phone.add(ProductFields::new("Grout", "12")).await.unwrap();
    phone.flush_sync().await;
    let key = phone.sync_key().await.unwrap().unwrap();

    let tablet_store: SharedStore = Arc::new(MemoryStore::new());
    let tablet_sync = RemoteSync::new(&base, tablet_store.clone(), Duration::from_secs(5)).unwrap();
    let mut tablet = Repository::load(tablet_store, Some(tablet_sync)).await.unwrap();

    assert_eq!(tablet.link(&key).await.unwrap(), 2);
    let names: Vec<_> = tablet.list("").iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, ["Grout", "Faucet"]);
}
