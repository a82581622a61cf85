use axum::body::Body;
use axum::http::{Request, StatusCode};
use example_app::build_router;
use example_app::middleware::DEMO_TOKEN;
use example_app::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use trellis::{ConfigValue, ScanConfig, TrellisConfig};

async fn app() -> axum::Router {
    let mut config = TrellisConfig::empty();
    config.set(
        ScanConfig::ROOT_KEY,
        ConfigValue::String(concat!(env!("CARGO_MANIFEST_DIR"), "/src/controllers").to_string()),
    );
    build_router(&config, AppState::new()).await.unwrap()
}

async fn send(router: &axum::Router, method: &str, path: &str, token: bool, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if token {
        builder = builder.header("authorization", DEMO_TOKEN);
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_is_discovered() {
    let router = app().await;
    let resp = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn posts_resource_round_trip() {
    let router = app().await;

    let (status, _) = send(&router, "POST", "/posts", false, Some(json!({"title": "a", "body": "b"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = send(&router, "POST", "/posts", true, Some(json!({"title": "a", "body": "b"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);

    let (status, listed) = send(&router, "GET", "/posts", false, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&router, "DELETE", "/posts/1", true, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", "/posts/1", false, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_group_requires_token_and_numeric_ids() {
    let router = app().await;

    let (status, _) = send(&router, "GET", "/admin/users", false, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, user) = send(&router, "GET", "/admin/users/2", true, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["login"], "bob");

    let (status, _) = send(&router, "GET", "/admin/users/bob", true, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
