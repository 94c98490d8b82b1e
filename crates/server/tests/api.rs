use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use accounts::{Accounts, TokenConfig, TokenIssuer};
use migration::MigratorTrait;
use server::{ServerState, router};

const SECRET: &str = "api-test-secret";

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let accounts = Accounts::builder().database(db).build();
    let tokens = TokenIssuer::new(TokenConfig::new(SECRET)).unwrap();
    router(ServerState::new(accounts, tokens))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_raw(uri: &str, body: &str, content_type: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn signup_body(email: &str, username: &str, role: &str) -> Value {
    json!({
        "email": email,
        "username": username,
        "password": "correct horse battery",
        "role": role,
        "first_name": "Ada",
    })
}

#[tokio::test]
async fn signup_then_login_succeeds() {
    let app = app().await;

    let (status, body) = send(
        &app,
        post_json("/signup", signup_body("ada@example.com", "ada", "student"), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["first_name"], "Ada");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = send(
        &app,
        post_json(
            "/login",
            json!({"email": "ada@example.com", "password": "correct horse battery"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["expires_in"], 3600);
}

#[tokio::test]
async fn signup_token_carries_requested_role() {
    let app = app().await;

    let (_, body) = send(
        &app,
        post_json("/signup", signup_body("grace@example.com", "grace", "teacher"), None),
    )
    .await;
    let token = body["token"].as_str().unwrap();

    let tokens = TokenIssuer::new(TokenConfig::new(SECRET)).unwrap();
    let claims = tokens.verify(token).unwrap();
    assert_eq!(claims.role, accounts::Role::Teacher);
    assert_eq!(body["user"]["role"], "teacher");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = app().await;
    send(
        &app,
        post_json("/signup", signup_body("ada@example.com", "ada", "student"), None),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/login",
            json!({"email": "ada@example.com", "password": "not the password"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn failed_login_log_omits_the_email() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = app().await;
    let (status, _) = send(
        &app,
        post_json(
            "/login",
            json!({"email": "mallory@example.com", "password": "whatever-it-is"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("failed login"));
    assert!(!output.contains("mallory"));
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = app().await;
    send(
        &app,
        post_json("/signup", signup_body("ada@example.com", "ada", "student"), None),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json("/signup", signup_body("ada@example.com", "other", "student"), None),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_signup_payloads() {
    let app = app().await;

    let mut short = signup_body("ada@example.com", "ada", "student");
    short["password"] = json!("short");
    let (status, body) = send(&app, post_json("/signup", short, None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, post_json("/signup", json!({"email": 1}), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        post_json("/signup", signup_body("ada@example.com", "ada", "admin"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, post_raw("/signup", "{not json", "application/json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let body = signup_body("ada@example.com", "ada", "student").to_string();
    let (status, _) = send(&app, post_raw("/signup", &body, "text/plain")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = app().await;

    let (status, body) = send(&app, get("/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "missing bearer token");

    let (status, _) = send(&app, get("/me", Some("Basic YWRhOnB3"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, get("/me", Some("Bearer not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid or expired token");

    let foreign = TokenIssuer::new(TokenConfig::new("someone-elses-secret"))
        .unwrap()
        .issue(&accounts::User {
            id: uuid::Uuid::new_v4(),
            email: "eve@example.com".to_string(),
            username: "eve".to_string(),
            role: accounts::Role::Teacher,
            first_name: None,
            last_name: None,
            bio: None,
            created_at: chrono::Utc::now(),
        })
        .unwrap();
    let (status, _) = send(
        &app,
        post_json("/api/set-role", json!({"role": "teacher"}), Some(&foreign.token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_the_token_owner() {
    let app = app().await;
    let (_, body) = send(
        &app,
        post_json("/signup", signup_body("ada@example.com", "ada", "student"), None),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get("/me", Some(&format!("Bearer {token}")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "ada");
}

#[tokio::test]
async fn set_role_reissues_token_with_new_role() {
    let app = app().await;
    let (_, body) = send(
        &app,
        post_json("/signup", signup_body("ada@example.com", "ada", "student"), None),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json("/api/set-role", json!({"role": "teacher"}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "teacher");

    let tokens = TokenIssuer::new(TokenConfig::new(SECRET)).unwrap();
    let claims = tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.role, accounts::Role::Teacher);

    let (status, _) = send(
        &app,
        post_json("/api/set-role", json!({"role": "admin"}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
