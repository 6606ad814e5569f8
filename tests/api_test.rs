//! End-to-end tests for the memo API: router → handlers → storage, with the
//! completion backend replaced by a scripted client.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use memod::completion::CompletionClient;
use memod::config::Config;
use memod::error::ApiError;
use memod::rest::build_router;
use memod::storage::Storage;
use memod::AppContext;

const WELL_FORMED_MEMO: &str = "### 1. Background\n\
    The downtown branch has seen a sustained decline in foot traffic.\n\n\
    ### 2. Proposal\n\
    Consolidate operations into the uptown branch over two quarters.\n\n\
    ### 3. Recommendation\n\
    Approve the closure and notify affected staff by end of month.";

/// Returns a fixed completion for every request.
struct ScriptedClient {
    reply: String,
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ApiError> {
        Ok(self.reply.clone())
    }
}

/// Fails every request, simulating an unreachable completion API.
struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ApiError> {
        Err(ApiError::Completion("connection refused".into()))
    }
}

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config {
        port: 0,
        bind_address: "127.0.0.1".into(),
        database_path: dir.path().join("memo.db"),
        api_base_url: "http://unused.invalid".into(),
        model: "test-model".into(),
        request_timeout_secs: 5,
        log: "info".into(),
        log_format: "pretty".into(),
        api_key: None,
    }
}

async fn test_server(
    completion: Arc<dyn CompletionClient>,
) -> (tempfile::TempDir, Storage, TestServer) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);
    let storage = Storage::init(&config.database_path)
        .await
        .expect("init storage");
    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        storage: storage.clone(),
        completion,
        started_at: std::time::Instant::now(),
    });
    let server = TestServer::new(build_router(ctx)).expect("test server");
    (dir, storage, server)
}

#[tokio::test]
async fn generate_memo_persists_and_returns_three_sections() {
    let (_dir, storage, server) = test_server(Arc::new(ScriptedClient {
        reply: WELL_FORMED_MEMO.into(),
    }))
    .await;

    let response = server
        .post("/generate-memo/")
        .json(&json!({ "subject": "Branch Closure" }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    for field in ["background", "proposal", "recommendation"] {
        assert!(
            !body[field].as_str().unwrap().is_empty(),
            "{field} should be non-empty"
        );
    }

    let row = storage.fetch_memo(1).await.expect("row persisted");
    assert_eq!(row.subject, "Branch Closure");
    assert!(row.background.contains("decline in foot traffic"));
    assert!(row.proposal.contains("uptown branch"));
    assert!(row.recommendation.contains("Approve the closure"));
}

#[tokio::test]
async fn generate_memo_with_malformed_completion_stores_empty_sections() {
    let (_dir, storage, server) = test_server(Arc::new(ScriptedClient {
        reply: "Sorry, I cannot format that as requested.".into(),
    }))
    .await;

    let response = server
        .post("/generate-memo/")
        .json(&json!({ "subject": "Branch Closure" }))
        .await;
    response.assert_status(StatusCode::OK);

    // Missing headings degrade to empty strings, never an error.
    let row = storage.fetch_memo(1).await.expect("row persisted");
    assert_eq!(row.background, "");
    assert_eq!(row.proposal, "");
    assert_eq!(row.recommendation, "");
}

#[tokio::test]
async fn generate_memo_surfaces_completion_failure_as_500() {
    let (_dir, storage, server) = test_server(Arc::new(FailingClient)).await;

    let response = server
        .post("/generate-memo/")
        .json(&json!({ "subject": "Branch Closure" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["error"], "completion_error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("connection refused"));

    // Nothing was written.
    assert!(storage.fetch_memo(1).await.is_err());
}

#[tokio::test]
async fn update_memo_overwrites_only_the_named_field() {
    let (_dir, storage, server) = test_server(Arc::new(ScriptedClient {
        reply: "### 1. Background\nOld background.\n\n\
                ### 2. Proposal\nPhase the consolidation over three quarters instead.\n\n\
                ### 3. Recommendation\nOld recommendation."
            .into(),
    }))
    .await;
    let id = storage
        .insert_memo("Branch Closure", "bg", "prop", "rec")
        .await
        .unwrap();

    let response = server
        .put(&format!("/update-memo/{id}/"))
        .json(&json!({
            "instruction": "stretch the timeline to three quarters",
            "field_to_update": "proposal",
        }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("'proposal'"));
    assert!(body["proposal"]
        .as_str()
        .unwrap()
        .contains("three quarters"));

    let row = storage.fetch_memo(id).await.unwrap();
    assert!(row.proposal.contains("three quarters"));
    assert_eq!(row.background, "bg", "other fields untouched");
    assert_eq!(row.recommendation, "rec", "other fields untouched");
}

#[tokio::test]
async fn update_memo_with_invalid_field_is_400_and_writes_nothing() {
    let (_dir, storage, server) = test_server(Arc::new(ScriptedClient {
        reply: WELL_FORMED_MEMO.into(),
    }))
    .await;
    let id = storage
        .insert_memo("Branch Closure", "bg", "prop", "rec")
        .await
        .unwrap();

    let response = server
        .put(&format!("/update-memo/{id}/"))
        .json(&json!({
            "instruction": "summarize everything",
            "field_to_update": "summary",
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "bad_request");

    let row = storage.fetch_memo(id).await.unwrap();
    assert_eq!(row.background, "bg");
    assert_eq!(row.proposal, "prop");
    assert_eq!(row.recommendation, "rec");
}

#[tokio::test]
async fn update_missing_memo_is_404() {
    let (_dir, _storage, server) = test_server(Arc::new(ScriptedClient {
        reply: WELL_FORMED_MEMO.into(),
    }))
    .await;

    let response = server
        .put("/update-memo/999/")
        .json(&json!({
            "instruction": "tighten the wording",
            "field_to_update": "background",
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn health_reports_ok() {
    let (_dir, _storage, server) = test_server(Arc::new(FailingClient)).await;

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
