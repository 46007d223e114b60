//! End-to-end flows through the assembled router over in-memory storage.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sketchvault::{app::build_app, auth::JwtKeys, config::AppConfig, state::AppState};
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-secret";

fn test_app() -> Router {
    let config = Arc::new(AppConfig::for_tests(SECRET));
    build_app(AppState::in_memory(config))
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Reply {
        status,
        location,
        body,
    }
}

async fn register(app: &Router, email: &str, password: &str) -> Reply {
    send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> Reply {
    send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn signup_and_login(app: &Router, email: &str) -> (String, String) {
    let reg = register(app, email, "longpassword1").await;
    assert_eq!(reg.status, StatusCode::CREATED);
    let user_id = reg.body["userId"].as_str().unwrap().to_string();
    let token = login(app, email, "longpassword1").await.body["token"]
        .as_str()
        .unwrap()
        .to_string();
    (user_id, token)
}

async fn create_drawing(app: &Router, token: &str, title: &str) -> Reply {
    send(
        app,
        Method::POST,
        "/api/v1/drawings",
        Some(token),
        Some(json!({ "title": title, "sceneData": "{\"elements\":[]}" })),
    )
    .await
}

#[tokio::test]
async fn register_login_and_use_drawings() {
    let app = test_app();

    let reg = register(&app, "a@x.com", "longpassword1").await;
    assert_eq!(reg.status, StatusCode::CREATED);
    let user_id = reg.body["userId"].as_str().unwrap().to_string();
    assert!(reg.body.get("password").is_none());

    let logged_in = login(&app, "a@x.com", "longpassword1").await;
    assert_eq!(logged_in.status, StatusCode::OK);
    let token = logged_in.body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let created = create_drawing(&app, &token, "First sketch").await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["userId"], user_id.as_str());
    let drawing_id = created.body["id"].as_str().unwrap().to_string();
    assert_eq!(
        created.location.as_deref(),
        Some(format!("/api/v1/drawings/{}", drawing_id).as_str())
    );

    let list = send(&app, Method::GET, "/api/v1/drawings", Some(&token), None).await;
    assert_eq!(list.status, StatusCode::OK);
    let items = list.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].get("sceneData").is_none());

    let wrong = format!("/api/v1/drawings/{}", Uuid::new_v4());
    let missing = send(&app, Method::GET, &wrong, Some(&token), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let anonymous = send(&app, Method::GET, "/api/v1/drawings", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn drawings_are_isolated_between_users() {
    let app = test_app();
    let (_, alice) = signup_and_login(&app, "alice@x.com").await;
    let (_, bob) = signup_and_login(&app, "bob@x.com").await;

    let alices = create_drawing(&app, &alice, "alice's").await;
    create_drawing(&app, &bob, "bob's").await;
    let uri = format!("/api/v1/drawings/{}", alices.body["id"].as_str().unwrap());

    let peek = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(peek.status, StatusCode::NOT_FOUND);
    let absent = send(
        &app,
        Method::GET,
        &format!("/api/v1/drawings/{}", Uuid::new_v4()),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(peek.body, absent.body);

    let overwrite = send(
        &app,
        Method::PUT,
        &uri,
        Some(&bob),
        Some(json!({ "title": "mine now" })),
    )
    .await;
    assert_eq!(overwrite.status, StatusCode::NOT_FOUND);

    let remove = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(remove.status, StatusCode::NOT_FOUND);

    let still_there = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["title"], "alice's");

    let bobs_list = send(&app, Method::GET, "/api/v1/drawings", Some(&bob), None).await;
    assert_eq!(bobs_list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_and_delete_own_drawing() {
    let app = test_app();
    let (_, token) = signup_and_login(&app, "owner@x.com").await;
    let created = create_drawing(&app, &token, "draft").await;
    let uri = format!("/api/v1/drawings/{}", created.body["id"].as_str().unwrap());

    let updated = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "title": "final" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["title"], "final");
    assert_eq!(updated.body["sceneData"], created.body["sceneData"]);

    let deleted = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let app = test_app();
    assert_eq!(
        register(&app, "dup@x.com", "longpassword1").await.status,
        StatusCode::CREATED
    );
    let again = register(&app, "DUP@x.com", "anotherpassword").await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["status"], 409);
}

#[tokio::test]
async fn registration_validates_input() {
    let app = test_app();
    assert_eq!(
        register(&app, "not-an-email", "longpassword1").await.status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        register(&app, "short@x.com", "1234567").await.status,
        StatusCode::BAD_REQUEST
    );

    let malformed = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"email\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app();
    register(&app, "real@x.com", "longpassword1").await;

    let wrong_password = login(&app, "real@x.com", "not-the-password").await;
    let unknown_email = login(&app, "ghost@x.com", "longpassword1").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn gate_rejects_bad_tokens() {
    let app = test_app();
    let (user_id, token) = signup_and_login(&app, "gate@x.com").await;

    let mut forged: Vec<char> = token.chars().collect();
    let last = forged.len() - 10;
    forged[last] = if forged[last] == 'A' { 'B' } else { 'A' };
    let forged: String = forged.into_iter().collect();
    let r = send(&app, Method::GET, "/api/v1/me", Some(&forged), None).await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);

    let keys = JwtKeys::new(&AppConfig::for_tests(SECRET).jwt);
    let stale = keys
        .issue_at(
            user_id.parse().unwrap(),
            OffsetDateTime::now_utc() - Duration::days(30),
        )
        .unwrap();
    let r = send(&app, Method::GET, "/api/v1/me", Some(&stale), None).await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);

    let basic = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/drawings")
                .header(header::AUTHORIZATION, format!("Token {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(basic.status(), StatusCode::UNAUTHORIZED);

    let me = send(&app, Method::GET, "/api/v1/me", Some(&token), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], user_id.as_str());
    assert_eq!(me.body["email"], "gate@x.com");
}

#[tokio::test]
async fn malformed_drawing_id_is_bad_request() {
    let app = test_app();
    let (_, token) = signup_and_login(&app, "ids@x.com").await;
    let r = send(
        &app,
        Method::GET,
        "/api/v1/drawings/not-a-uuid",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let r = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::OK);
}
