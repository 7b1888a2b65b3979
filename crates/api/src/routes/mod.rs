pub mod car;
pub mod customer;
pub mod health;
pub mod rental;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                 service and store status
///
/// /cars                                   list, create (multipart)
/// /cars/{id}                              get, update (multipart), delete
/// /cars/{id}/image                        raw image bytes
/// /cars/{id}/availability                 ?startDate=&endDate= overlap check
///
/// /customers                              list, create (multipart)
/// /customers/{id}                         get, update (multipart), delete
/// /customers/{id}/image                   raw image bytes
/// /customers/{id}/rentals                 open rentals of the customer
///
/// /rentals                                list (expanded), create
/// /rentals/{id}                           get (expanded), cancel
/// /rentals/{id}/complete                  complete (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/cars", car::router())
        .nest("/customers", customer::router())
        .nest("/rentals", rental::router())
        .fallback(not_found)
}

/// JSON 404 for unknown API paths.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "code": "NOT_FOUND",
        })),
    )
}
