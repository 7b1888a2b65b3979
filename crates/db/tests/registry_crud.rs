//! Integration tests for car and customer persistence.
//!
//! Exercises the repository layer against a real SQLite database:
//! - Create defaults and partial updates
//! - Image columns round trip
//! - Unique constraint violations and the uniqueness lookup
//! - Bulk lookup by id

use rentdesk_core::entity::EntityKind;
use rentdesk_core::image::{ImageUpload, MAX_IMAGE_BYTES};
use rentdesk_db::models::car::{CreateCar, UpdateCar};
use rentdesk_db::models::customer::{CreateCustomer, UpdateCustomer};
use rentdesk_db::repositories::{CarRepo, CustomerRepo, UniquenessRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_car(plate: &str) -> CreateCar {
    CreateCar {
        make: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: 2020,
        license_plate: plate.to_string(),
        daily_rate: None,
        is_available: None,
        image: None,
    }
}

fn new_customer(email: &str) -> CreateCustomer {
    CreateCustomer {
        name: "Jane Doe".to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        license_number: "D1234567".to_string(),
        is_active: None,
        image: None,
    }
}

fn png(bytes: &[u8]) -> ImageUpload {
    ImageUpload::new(bytes.to_vec(), "image/png", "car.png", MAX_IMAGE_BYTES).unwrap()
}

// ---------------------------------------------------------------------------
// Test: Car defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_car_defaults_to_available(pool: SqlitePool) {
    let car = CarRepo::create(&pool, &new_car("ABC123")).await.unwrap();

    assert_eq!(car.license_plate, "ABC123");
    assert!(car.is_available);
    assert!(!car.is_rented);
    assert!(car.daily_rate.is_none());
    assert!(car.image.is_none());

    let found = CarRepo::find_by_id(&pool, car.id).await.unwrap().unwrap();
    assert_eq!(found.id, car.id);
    assert_eq!(found.model, "Corolla");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_car_can_start_unavailable(pool: SqlitePool) {
    let mut input = new_car("OFF1");
    input.is_available = Some(false);
    let car = CarRepo::create(&pool, &input).await.unwrap();
    assert!(!car.is_available);
    assert!(!car.is_rented);
}

// ---------------------------------------------------------------------------
// Test: Partial update keeps untouched fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_car_applies_only_given_fields(pool: SqlitePool) {
    let mut input = new_car("UPD1");
    input.image = Some(png(b"first"));
    let car = CarRepo::create(&pool, &input).await.unwrap();

    let update = UpdateCar {
        model: Some("Camry".to_string()),
        daily_rate: Some(42.0),
        ..Default::default()
    };
    let updated = CarRepo::update(&pool, car.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.make, "Toyota");
    assert_eq!(updated.model, "Camry");
    assert_eq!(updated.daily_rate, Some(42.0));
    assert_eq!(updated.image.as_ref().unwrap().data, b"first");
    assert!(updated.updated_at >= car.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_car_replaces_image(pool: SqlitePool) {
    let mut input = new_car("IMG1");
    input.image = Some(png(b"old"));
    let car = CarRepo::create(&pool, &input).await.unwrap();

    let update = UpdateCar {
        image: Some(png(b"brand new")),
        ..Default::default()
    };
    let updated = CarRepo::update(&pool, car.id, &update)
        .await
        .unwrap()
        .unwrap();

    let image = updated.image.unwrap();
    assert_eq!(image.data, b"brand new");
    assert_eq!(image.size, 9);
    assert_eq!(image.content_type, "image/png");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_car_returns_none(pool: SqlitePool) {
    let result = CarRepo::update(&pool, 999_999, &UpdateCar::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_car(pool: SqlitePool) {
    let car = CarRepo::create(&pool, &new_car("DEL1")).await.unwrap();

    assert!(CarRepo::delete(&pool, car.id).await.unwrap());
    assert!(CarRepo::find_by_id(&pool, car.id).await.unwrap().is_none());
    assert!(!CarRepo::delete(&pool, car.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: Unique constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_license_plate_rejected(pool: SqlitePool) {
    CarRepo::create(&pool, &new_car("DUP1")).await.unwrap();
    let result = CarRepo::create(&pool, &new_car("DUP1")).await;

    let err = result.expect_err("Duplicate license plate should fail");
    let db_err = err.as_database_error().expect("should be a database error");
    assert!(db_err.is_unique_violation());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: SqlitePool) {
    CustomerRepo::create(&pool, &new_customer("jane@example.com"))
        .await
        .unwrap();
    let result = CustomerRepo::create(&pool, &new_customer("jane@example.com")).await;
    assert!(result.is_err(), "Duplicate email should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_uniqueness_lookup_excludes_self(pool: SqlitePool) {
    let car = CarRepo::create(&pool, &new_car("SELF1")).await.unwrap();

    assert!(UniquenessRepo::is_taken(&pool, EntityKind::Car, "SELF1", None)
        .await
        .unwrap());
    assert!(
        !UniquenessRepo::is_taken(&pool, EntityKind::Car, "SELF1", Some(car.id))
            .await
            .unwrap()
    );
    assert!(!UniquenessRepo::is_taken(&pool, EntityKind::Car, "OTHER", None)
        .await
        .unwrap());
    assert!(
        !UniquenessRepo::is_taken(&pool, EntityKind::Customer, "SELF1", None)
            .await
            .unwrap()
    );
}

// ---------------------------------------------------------------------------
// Test: Customers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_customer_defaults_and_deactivation(pool: SqlitePool) {
    let customer = CustomerRepo::create(&pool, &new_customer("a@example.com"))
        .await
        .unwrap();
    assert!(customer.is_active);
    assert!(!customer.has_rental);

    let update = UpdateCustomer {
        is_active: Some(false),
        ..Default::default()
    };
    let updated = CustomerRepo::update(&pool, customer.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(updated.email, "a@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_many_returns_only_requested(pool: SqlitePool) {
    let a = CustomerRepo::create(&pool, &new_customer("a@example.com"))
        .await
        .unwrap();
    let b = CustomerRepo::create(&pool, &new_customer("b@example.com"))
        .await
        .unwrap();
    CustomerRepo::create(&pool, &new_customer("c@example.com"))
        .await
        .unwrap();

    let mut ids: Vec<i64> = CustomerRepo::find_many(&pool, &[a.id, b.id, 424_242])
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![a.id, b.id]);

    assert!(CarRepo::find_many(&pool, &[]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_newest_first(pool: SqlitePool) {
    let first = CarRepo::create(&pool, &new_car("L1")).await.unwrap();
    let second = CarRepo::create(&pool, &new_car("L2")).await.unwrap();

    let cars = CarRepo::list(&pool).await.unwrap();
    assert_eq!(cars.len(), 2);
    assert_eq!(cars[0].id, second.id);
    assert_eq!(cars[1].id, first.id);
}
