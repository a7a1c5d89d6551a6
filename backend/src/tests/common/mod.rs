// Common test utilities and helpers

use crate::config::{LocaleConfig, StaticConfig};
use crate::{AppState, build_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header::SET_COOKIE},
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Router over a fresh database with the default locale settings
pub async fn create_test_app() -> (Router, SqlitePool) {
    create_test_app_with_locale(LocaleConfig::default()).await
}

pub async fn create_test_app_with_locale(locale: LocaleConfig) -> (Router, SqlitePool) {
    let pool = create_test_db().await;
    let state =
        Arc::new(AppState::new(pool.clone(), &locale).expect("Failed to build app state"));
    let static_config = StaticConfig { enabled: false, web_root: String::new() };
    (build_router(state, &static_config), pool)
}

/// Insert a student directly, bypassing the service
pub async fn insert_aluno(pool: &SqlitePool, nome: &str) -> i64 {
    sqlx::query("INSERT INTO alunos (nome) VALUES (?)")
        .bind(nome)
        .execute(pool)
        .await
        .expect("Failed to insert aluno")
        .last_insert_rowid()
}

/// Insert a goal directly, bypassing the service
pub async fn insert_meta(
    pool: &SqlitePool,
    valor: Option<i32>,
    area: Option<&str>,
    aluno_id: Option<i64>,
) -> i64 {
    sqlx::query("INSERT INTO metas (valor, area, aluno_id) VALUES (?, ?, ?)")
        .bind(valor)
        .bind(area)
        .bind(aluno_id)
        .execute(pool)
        .await
        .expect("Failed to insert meta")
        .last_insert_rowid()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl TestResponse {
    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().expect("non-ascii Set-Cookie").to_string())
            .collect()
    }
}

/// Send one request through the router and decode a JSON body if present
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed to respond");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    TestResponse { status, headers, body }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    json_request_with_type(method, uri, "application/json", body)
}

pub fn json_request_with_type(
    method: &str,
    uri: &str,
    content_type: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn request_with_cookie(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .expect("Failed to build request")
}
