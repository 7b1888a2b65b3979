//! HTTP-level integration tests for the `/api/customers` endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_car, create_customer, create_rental, customer_form, delete, get,
    post_multipart, put_multipart, MultipartForm,
};
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_customer_returns_201(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let form = customer_form(" Jane.Doe@Example.COM ").file(
        "image",
        "jane.jpg",
        "image/jpeg",
        b"\xff\xd8\xff\xe0jpeg",
    );
    let response = post_multipart(app, "/api/customers", form).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Jane Doe");
    assert_eq!(json["email"], "jane.doe@example.com");
    assert_eq!(json["licenseNumber"], "D1234567");
    assert_eq!(json["isActive"], true);
    assert_eq!(json["hasRental"], false);
    assert_eq!(json["image"]["contentType"], "image/jpeg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_returns_409(pool: SqlitePool) {
    create_customer(&pool, "taken@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_multipart(app, "/api/customers", customer_form("TAKEN@example.com")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_customer_missing_phone_returns_400(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let form = MultipartForm::new()
        .text("name", "No Phone")
        .text("email", "nophone@example.com")
        .text("licenseNumber", "X1");
    let response = post_multipart(app, "/api/customers", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_customer_bad_email_returns_400(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_multipart(app, "/api/customers", customer_form("not-an-email")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_and_list_customers(pool: SqlitePool) {
    let id = create_customer(&pool, "one@example.com").await;
    create_customer(&pool, "two@example.com").await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/customers/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "one@example.com");

    let response = get(common::build_test_app(pool.clone()), "/api/customers").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = get(common::build_test_app(pool), "/api/customers/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_customer_deactivates(pool: SqlitePool) {
    let id = create_customer(&pool, "deact@example.com").await;

    let form = MultipartForm::new()
        .text("isActive", "false")
        .text("phone", "555-0200");
    let response = put_multipart(
        common::build_test_app(pool),
        &format!("/api/customers/{id}"),
        form,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["isActive"], false);
    assert_eq!(json["phone"], "555-0200");
    assert_eq!(json["name"], "Jane Doe");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_customer_to_taken_email_returns_409(pool: SqlitePool) {
    create_customer(&pool, "first@example.com").await;
    let id = create_customer(&pool, "second@example.com").await;

    let form = MultipartForm::new().text("email", "first@example.com");
    let response = put_multipart(
        common::build_test_app(pool),
        &format!("/api/customers/{id}"),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_has_rental_cannot_be_set_by_form(pool: SqlitePool) {
    let id = create_customer(&pool, "flag@example.com").await;

    let form = MultipartForm::new().text("hasRental", "true");
    let response = put_multipart(
        common::build_test_app(pool),
        &format!("/api/customers/{id}"),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["hasRental"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_customer(pool: SqlitePool) {
    let id = create_customer(&pool, "gone@example.com").await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/customers/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete(common::build_test_app(pool), &format!("/api/customers/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_customer_rentals_and_delete_guard(pool: SqlitePool) {
    let car_id = create_car(&pool, "CR1").await;
    let customer_id = create_customer(&pool, "holder@example.com").await;
    let response = create_rental(&pool, car_id, customer_id, "2024-01-01", "2024-01-05").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/customers/{customer_id}/rentals"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rentals = json.as_array().unwrap();
    assert_eq!(rentals.len(), 1);
    assert_eq!(rentals[0]["car"]["licensePlate"], "CR1");

    let response = delete(
        common::build_test_app(pool),
        &format!("/api/customers/{customer_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
