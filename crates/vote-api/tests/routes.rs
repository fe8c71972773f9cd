use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use vote_api::{AppState, router};
use vote_core::{CoreError, MemVoteStore, ProjectId, UserId, Vote, VoteStore};

fn app() -> Router {
    router(AppState {
        store: Arc::new(MemVoteStore::default()),
        ranking: None,
    })
}

/// Store whose every operation fails, standing in for an unreachable table.
struct FailingStore;

fn outage() -> CoreError {
    CoreError::DynamoSdk(Box::new(std::io::Error::other("table unavailable")))
}

#[async_trait::async_trait]
impl VoteStore for FailingStore {
    async fn try_insert_vote(&self, _vote: &Vote) -> Result<bool, CoreError> {
        Err(outage())
    }

    async fn try_remove_vote(
        &self,
        _user: &UserId,
        _project: &ProjectId,
    ) -> Result<bool, CoreError> {
        Err(outage())
    }

    async fn bump_tally(&self, _project: &ProjectId, _delta: i64) -> Result<u64, CoreError> {
        Err(outage())
    }

    async fn get_tally(&self, _project: &ProjectId) -> Result<u64, CoreError> {
        Err(outage())
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_vote(app: &Router, project: &str, user: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/vote",
        Some(json!({ "projectId": project, "userId": user })),
    )
    .await
}

#[tokio::test]
async fn toggle_alternates_for_one_pair() {
    let app = app();

    let (status, body) = post_vote(&app, "p1", "u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "voted": true, "count": 1 }));

    let (status, body) = post_vote(&app, "p1", "u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "voted": false, "count": 0 }));

    let (status, body) = post_vote(&app, "p1", "u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "voted": true, "count": 1 }));
}

#[tokio::test]
async fn tally_counts_distinct_users() {
    let app = app();

    for n in 1..=4 {
        let (status, body) = post_vote(&app, "p1", &format!("user-{n}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["voted"], json!(true));
        assert_eq!(body["count"], json!(n));
    }

    let (status, body) = send(&app, Method::GET, "/vote/p1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "projectId": "p1", "count": 4 }));
}

#[tokio::test]
async fn two_users_and_an_unvote() {
    let app = app();

    let (_, body) = post_vote(&app, "p1", "u1").await;
    assert_eq!(body, json!({ "voted": true, "count": 1 }));

    let (_, body) = post_vote(&app, "p1", "u2").await;
    assert_eq!(body, json!({ "voted": true, "count": 2 }));

    let (_, body) = post_vote(&app, "p1", "u1").await;
    assert_eq!(body, json!({ "voted": false, "count": 1 }));

    let (status, body) = send(&app, Method::GET, "/vote/p1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "projectId": "p1", "count": 1 }));
}

#[tokio::test]
async fn missing_project_id_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/vote",
        Some(json!({ "userId": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Nothing was written.
    let (_, body) = send(&app, Method::GET, "/vote/p1", None).await;
    assert_eq!(body["count"], json!(0));
}

#[tokio::test]
async fn missing_user_id_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/vote",
        Some(json!({ "projectId": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn empty_fields_are_rejected() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/vote",
        Some(json!({ "projectId": "", "userId": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/vote",
        Some(json!({ "projectId": "p1", "userId": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/vote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_without_project_id_is_rejected() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/vote", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_project_reads_zero() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/vote/unknown-id", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "projectId": "unknown-id", "count": 0 }));
}

#[tokio::test]
async fn preflight_always_succeeds() {
    let app = app();

    // Browser-style preflight with Origin headers.
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/vote")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Bare OPTIONS without Origin still answers 200.
    let (status, _) = send(&app, Method::OPTIONS, "/vote/p1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn storage_failure_maps_to_generic_500() {
    let app = router(AppState {
        store: Arc::new(FailingStore),
        ranking: None,
    });

    // The body is the fixed generic message on both routes; the underlying
    // storage detail stays server-side.
    let (status, body) = post_vote(&app, "p1", "u1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));

    let (status, body) = send(&app, Method::GET, "/vote/p1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn responses_carry_cors_headers() {
    let app = app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/vote/p1")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}
