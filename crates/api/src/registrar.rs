//! Entity registrar: create, update and delete cars and customers.
//!
//! Both kinds go through the same sequence: field validation, a uniqueness
//! lookup on the kind's unique field (excluding the record being updated),
//! then the repository write. A unique violation raised by the store itself
//! still maps to 409 if two registrations race past the lookup.

use rentdesk_core::entity::EntityDraft;
use rentdesk_core::error::CoreError;
use rentdesk_core::types::DbId;
use rentdesk_db::models::car::{Car, CreateCar, UpdateCar};
use rentdesk_db::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use rentdesk_db::repositories::{CarRepo, CustomerRepo, RentalRepo, UniquenessRepo};
use rentdesk_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::lifecycle::CarLocks;

/// Validate a draft and reject it if its unique value is already taken.
pub async fn check_draft<D: EntityDraft>(
    pool: &DbPool,
    draft: &D,
    exclude: Option<DbId>,
) -> AppResult<()> {
    draft.validate()?;
    if let Some(value) = draft.unique_value() {
        if UniquenessRepo::is_taken(pool, D::KIND, value, exclude).await? {
            tracing::warn!(kind = %D::KIND, value, "Duplicate unique value");
            return Err(D::KIND.duplicate(value).into());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cars
// ---------------------------------------------------------------------------

pub async fn register_car(pool: &DbPool, input: &CreateCar) -> AppResult<Car> {
    check_draft(pool, input, None).await?;
    let car = CarRepo::create(pool, input).await?;
    tracing::info!(car_id = car.id, license_plate = %car.license_plate, "Car registered");
    Ok(car)
}

/// Partially update a car.
///
/// `isAvailable` cannot be switched back on while the car is rented; the
/// rental must be ended through the lifecycle first.
pub async fn update_car(
    pool: &DbPool,
    locks: &CarLocks,
    id: DbId,
    input: &UpdateCar,
) -> AppResult<Car> {
    let _guard = locks.acquire(id).await;

    let existing = CarRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;
    check_draft(pool, input, Some(id)).await?;

    if input.is_available == Some(true) && existing.is_rented {
        return Err(CoreError::InvalidState(format!(
            "Car {} is currently rented; end its rental before marking it available",
            existing.license_plate
        ))
        .into());
    }

    let car = CarRepo::update(pool, id, input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;
    tracing::info!(car_id = id, "Car updated");
    Ok(car)
}

/// Delete a car. Refused while it has a reserved or active rental.
pub async fn delete_car(pool: &DbPool, locks: &CarLocks, id: DbId) -> AppResult<()> {
    let _guard = locks.acquire(id).await;

    CarRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;
    let open = RentalRepo::count_open_for_car(pool, id).await?;
    if open > 0 || !CarRepo::delete(pool, id).await? {
        return Err(CoreError::Conflict(format!(
            "Car {id} has open rentals; cancel or complete them first"
        ))
        .into());
    }
    tracing::info!(car_id = id, "Car deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

pub async fn register_customer(pool: &DbPool, input: &CreateCustomer) -> AppResult<Customer> {
    check_draft(pool, input, None).await?;
    let customer = CustomerRepo::create(pool, input).await?;
    tracing::info!(customer_id = customer.id, email = %customer.email, "Customer registered");
    Ok(customer)
}

pub async fn update_customer(
    pool: &DbPool,
    id: DbId,
    input: &UpdateCustomer,
) -> AppResult<Customer> {
    CustomerRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    check_draft(pool, input, Some(id)).await?;

    let customer = CustomerRepo::update(pool, id, input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    tracing::info!(customer_id = id, "Customer updated");
    Ok(customer)
}

/// Delete a customer. Refused while they hold a reserved or active rental.
pub async fn delete_customer(pool: &DbPool, id: DbId) -> AppResult<()> {
    CustomerRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    let open = RentalRepo::count_open_for_customer(pool, id).await?;
    if open > 0 || !CustomerRepo::delete(pool, id).await? {
        return Err(CoreError::Conflict(format!(
            "Customer {id} has open rentals; cancel or complete them first"
        ))
        .into());
    }
    tracing::info!(customer_id = id, "Customer deleted");
    Ok(())
}
