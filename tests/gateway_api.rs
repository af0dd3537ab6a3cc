//! Black-box tests for the gateway endpoints over an in-memory registry.

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use snapstudio::gateway::{routes, GatewayState, SubscriptionRegistry};

async fn test_registry() -> SubscriptionRegistry {
    let registry = SubscriptionRegistry::connect_in_memory()
        .await
        .expect("in-memory registry should open");
    registry
        .initialize()
        .await
        .expect("schema creation should succeed");
    registry
}

fn build_app(registry: Option<SubscriptionRegistry>, admin_key: Option<&str>) -> Router {
    routes::router().with_state(GatewayState::new(registry, admin_key.map(String::from)))
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    user_agent: Option<&str>,
) -> Response<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(user_agent) = user_agent {
        request = request.header(USER_AGENT, user_agent);
    }
    app.oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = build_app(None, None);
    let response = get(app, "/healthz").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_app(None, None);
    let response = get(app, "/api/notifications/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subscribe_without_a_token_is_rejected() {
    let registry = test_registry().await;
    let app = build_app(Some(registry), None);

    let response = post_json(
        app,
        "/api/notifications/subscribe",
        serde_json::json!({ "userId": "alice" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn subscribe_without_a_registry_is_unavailable() {
    let app = build_app(None, None);

    let response = post_json(
        app,
        "/api/notifications/subscribe",
        serde_json::json!({ "token": "tok-1" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn subscribe_registers_the_token_once() {
    let registry = test_registry().await;
    let app = build_app(Some(registry.clone()), None);

    let first = post_json(
        app.clone(),
        "/api/notifications/subscribe",
        serde_json::json!({ "token": "tok-1", "userId": "alice" }),
        None,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["success"], true);
    assert!(json["message"].is_string());

    let second = post_json(
        app,
        "/api/notifications/subscribe",
        serde_json::json!({ "token": "tok-1", "userId": "bob" }),
        None,
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(registry.count().await.unwrap(), 1);
    let row = registry.find("tok-1").await.unwrap().unwrap();
    assert_eq!(row.user_id.as_deref(), Some("bob"));
    assert!(row.updated_at >= row.created_at);
}

#[tokio::test]
async fn subscribe_infers_the_platform_from_the_user_agent() {
    let registry = test_registry().await;
    let app = build_app(Some(registry.clone()), None);

    let response = post_json(
        app,
        "/api/notifications/subscribe",
        serde_json::json!({ "token": "tok-droid" }),
        Some("Mozilla/5.0 (Linux; Android 14; Pixel 8)"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["platform"], "android");
    let row = registry.find("tok-droid").await.unwrap().unwrap();
    assert_eq!(row.platform, "android");
}

#[tokio::test]
async fn verify_accepts_the_configured_key() {
    let app = build_app(None, Some("s3cret"));

    let response = post_json(
        app,
        "/api/admin/verify",
        serde_json::json!({ "apiKey": "s3cret" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
}

#[tokio::test]
async fn verify_without_a_key_is_rejected() {
    let app = build_app(None, Some("s3cret"));

    let response = post_json(app, "/api/admin/verify", serde_json::json!({}), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn verify_with_a_wrong_key_is_unauthorized() {
    let app = build_app(None, Some("s3cret"));

    let response = post_json(
        app,
        "/api/admin/verify",
        serde_json::json!({ "apiKey": "guess" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn verify_never_succeeds_without_a_configured_secret() {
    for attempt in ["", "anything", "s3cret"] {
        let app = build_app(None, None);
        let response = post_json(
            app,
            "/api/admin/verify",
            serde_json::json!({ "apiKey": attempt }),
            None,
        )
        .await;
        assert_ne!(response.status(), StatusCode::OK);
    }
}
