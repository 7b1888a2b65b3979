#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use rentdesk_api::config::{LogFormat, ServerConfig};
use rentdesk_api::router::build_app_router;
use rentdesk_api::state::AppState;

const BOUNDARY: &str = "rentdesk-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 1 MB image limit and the standard base rate of 50.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 10,
        max_image_bytes: 1024 * 1024,
        default_daily_rate: 50.0,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

/// Build the application from an existing state, so several requests can
/// share its per-car locks.
pub fn build_test_app_with_state(state: AppState) -> Router {
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Body::from(json.to_string()),
        Some("application/json".to_string()),
    )
    .await
}

pub async fn post_raw_json(app: Router, uri: &str, raw: &'static str) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Body::from(raw),
        Some("application/json".to_string()),
    )
    .await
}

pub async fn post_multipart(app: Router, uri: &str, form: MultipartForm) -> Response {
    send_multipart(app, Method::POST, uri, form).await
}

pub async fn put_multipart(app: Router, uri: &str, form: MultipartForm) -> Response {
    send_multipart(app, Method::PUT, uri, form).await
}

async fn send_multipart(app: Router, method: Method, uri: &str, form: MultipartForm) -> Response {
    send(
        app,
        method,
        uri,
        Body::from(form.into_bytes()),
        Some(format!("multipart/form-data; boundary={BOUNDARY}")),
    )
    .await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<String>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn into_bytes(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn car_form(plate: &str) -> MultipartForm {
    MultipartForm::new()
        .text("make", "Toyota")
        .text("model", "Corolla")
        .text("year", "2020")
        .text("licensePlate", plate)
}

pub fn customer_form(email: &str) -> MultipartForm {
    MultipartForm::new()
        .text("name", "Jane Doe")
        .text("email", email)
        .text("phone", "555-0100")
        .text("licenseNumber", "D1234567")
}

/// Register a car and return its id.
pub async fn create_car(pool: &SqlitePool, plate: &str) -> i64 {
    let response = post_multipart(build_test_app(pool.clone()), "/api/cars", car_form(plate)).await;
    assert_eq!(response.status(), 201, "car fixture should be created");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Register a customer and return their id.
pub async fn create_customer(pool: &SqlitePool, email: &str) -> i64 {
    let response = post_multipart(
        build_test_app(pool.clone()),
        "/api/customers",
        customer_form(email),
    )
    .await;
    assert_eq!(response.status(), 201, "customer fixture should be created");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Book `car_id` for `customer_id` and return the raw response.
pub async fn create_rental(
    pool: &SqlitePool,
    car_id: i64,
    customer_id: i64,
    start: &str,
    end: &str,
) -> Response {
    post_json(
        build_test_app(pool.clone()),
        "/api/rentals",
        serde_json::json!({
            "carId": car_id,
            "customerId": customer_id,
            "startDate": start,
            "endDate": end,
        }),
    )
    .await
}
