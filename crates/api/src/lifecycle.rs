//! Rental lifecycle manager.
//!
//! Orchestrates creating, cancelling and completing rentals: resolves the
//! car and customer, validates the request against the domain rules in
//! `rentdesk_core`, and hands the three-record write to
//! [`RentalRepo`], which performs it in one transaction.
//!
//! Within one process, all writes touching a car's rental state are also
//! serialized through [`CarLocks`], so concurrent requests for the same car
//! queue up and each sees the previous one's outcome.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rentdesk_core::availability::{self, DateRange};
use rentdesk_core::error::CoreError;
use rentdesk_core::pricing;
use rentdesk_core::rental::{self, DEFAULT_RENTAL_STATUS};
use rentdesk_core::types::{DbId, RentalDate};
use rentdesk_db::models::rental::{
    CreateRental, CreateRentalOutcome, ReleaseAction, ReleaseOutcome, Rental, RentalDetail,
};
use rentdesk_db::repositories::{CarRepo, CustomerRepo, RentalRepo};
use rentdesk_db::DbPool;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Per-car locks
// ---------------------------------------------------------------------------

/// Keyed async mutex: one lock per car id.
///
/// Idle entries are pruned whenever a new lock is handed out, so the map
/// only ever holds cars with an operation in flight.
#[derive(Default)]
pub struct CarLocks {
    locks: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl CarLocks {
    /// Wait for exclusive access to `car_id`. Released when the guard drops.
    pub async fn acquire(&self, car_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(car_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of cars with a lock currently handed out or awaited.
    pub async fn in_flight(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Validated input of [`RentalLifecycle::create_rental`].
#[derive(Debug, Clone)]
pub struct NewRental {
    pub car_id: DbId,
    pub customer_id: DbId,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    /// Derived from the car's rate when absent.
    pub total_cost: Option<f64>,
}

/// Rental lifecycle operations bound to a pool and the process-wide car
/// locks. Obtained from [`AppState::lifecycle`](crate::state::AppState::lifecycle).
pub struct RentalLifecycle<'a> {
    pool: &'a DbPool,
    locks: &'a CarLocks,
    base_rate: f64,
}

impl<'a> RentalLifecycle<'a> {
    pub fn new(pool: &'a DbPool, locks: &'a CarLocks, base_rate: f64) -> Self {
        Self {
            pool,
            locks,
            base_rate,
        }
    }

    /// Rent a car to a customer for a date range.
    ///
    /// Checks run in this order: car and customer exist, no open rental of
    /// the car overlaps a well-formed range, the car is rentable, the
    /// customer is active, the range is well-formed. The rental, the car flags and the
    /// customer flag are then written in one transaction.
    pub async fn create_rental(&self, input: NewRental) -> AppResult<RentalDetail> {
        let _guard = self.locks.acquire(input.car_id).await;

        let car = CarRepo::find_by_id(self.pool, input.car_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Car",
                id: input.car_id,
            }))?;
        let customer = CustomerRepo::find_by_id(self.pool, input.customer_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Customer",
                id: input.customer_id,
            }))?;

        // A malformed range is reported only after the car and customer
        // states, so an out-of-service car always answers InvalidState.
        let range = DateRange::new(input.start_date, input.end_date);

        if let Ok(range) = &range {
            let bookings: Vec<_> = RentalRepo::list_open_for_car(self.pool, car.id)
                .await?
                .iter()
                .map(Rental::booking)
                .collect();
            if let Some(rental_id) = availability::find_conflict(range, &bookings, None) {
                tracing::warn!(car_id = car.id, rental_id, "Rental rejected: dates overlap");
                return Err(overlap_error(&car.license_plate, rental_id));
            }
        }

        rental::ensure_car_rentable(&car.license_plate, car.is_available, car.is_rented)?;
        rental::ensure_customer_active(&customer.email, customer.is_active)?;
        let range = range?;

        let total_cost = match input.total_cost {
            Some(total) => {
                pricing::validate_total_cost(total)?;
                total
            }
            None => pricing::total_cost(&range, car.daily_rate, self.base_rate),
        };

        let create = CreateRental {
            car_id: car.id,
            customer_id: customer.id,
            range,
            total_cost,
            status: DEFAULT_RENTAL_STATUS,
        };
        let rental = match RentalRepo::create_active(self.pool, &create).await? {
            CreateRentalOutcome::Created(rental) => rental,
            CreateRentalOutcome::Overlap { rental_id } => {
                return Err(overlap_error(&car.license_plate, rental_id));
            }
            CreateRentalOutcome::CarUnavailable => {
                return Err(CoreError::InvalidState(format!(
                    "Car {} is not available for rental",
                    car.license_plate
                ))
                .into());
            }
            CreateRentalOutcome::CustomerInactive => {
                return Err(CoreError::InvalidState(format!(
                    "Customer {} is not active",
                    customer.email
                ))
                .into());
            }
        };

        tracing::info!(
            rental_id = rental.id,
            car_id = rental.car_id,
            customer_id = rental.customer_id,
            start_date = %rental.start_date,
            end_date = %rental.end_date,
            total_cost = rental.total_cost,
            "Rental created",
        );
        self.expand_one(rental).await
    }

    /// Cancel a rental: remove it and restore its car and customer flags.
    ///
    /// Returns the rental as it was before removal.
    pub async fn cancel_rental(&self, id: DbId) -> AppResult<Rental> {
        let rental = self.release(id, ReleaseAction::Delete).await?;
        tracing::info!(rental_id = id, car_id = rental.car_id, "Rental cancelled");
        Ok(rental)
    }

    /// Mark an open rental completed and restore its car and customer flags.
    pub async fn complete_rental(&self, id: DbId) -> AppResult<RentalDetail> {
        let rental = self.release(id, ReleaseAction::Complete).await?;
        tracing::info!(rental_id = id, car_id = rental.car_id, "Rental completed");
        self.expand_one(rental).await
    }

    /// Every rental with its car and customer expanded, newest first.
    pub async fn list_rentals(&self) -> AppResult<Vec<RentalDetail>> {
        let rentals = RentalRepo::list(self.pool).await?;
        let details = self.expand(rentals).await?;
        tracing::debug!(count = details.len(), "Listed rentals");
        Ok(details)
    }

    /// One rental with its car and customer expanded.
    pub async fn get_rental(&self, id: DbId) -> AppResult<RentalDetail> {
        let rental = RentalRepo::find_by_id(self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Rental",
                id,
            }))?;
        self.expand_one(rental).await
    }

    /// Reserved and active rentals of a customer, expanded.
    pub async fn customer_rentals(&self, customer_id: DbId) -> AppResult<Vec<RentalDetail>> {
        CustomerRepo::find_by_id(self.pool, customer_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Customer",
                id: customer_id,
            }))?;
        let rentals = RentalRepo::list_open_for_customer(self.pool, customer_id).await?;
        self.expand(rentals).await
    }

    /// Whether `car_id` has no open rental overlapping `range`.
    pub async fn check_availability(&self, car_id: DbId, range: &DateRange) -> AppResult<bool> {
        CarRepo::find_by_id(self.pool, car_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Car",
                id: car_id,
            }))?;
        let bookings: Vec<_> = RentalRepo::list_open_for_car(self.pool, car_id)
            .await?
            .iter()
            .map(Rental::booking)
            .collect();
        Ok(!availability::is_overlapping(range, &bookings, None))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn release(&self, id: DbId, action: ReleaseAction) -> AppResult<Rental> {
        let not_found = || AppError::Core(CoreError::NotFound { entity: "Rental", id });

        let existing = RentalRepo::find_by_id(self.pool, id)
            .await?
            .ok_or_else(not_found)?;
        let _guard = self.locks.acquire(existing.car_id).await;

        match RentalRepo::release(self.pool, id, action).await? {
            None => Err(not_found()),
            Some(ReleaseOutcome::Released {
                rental,
                flags_restored,
            }) => {
                tracing::debug!(rental_id = id, flags_restored, "Rental released");
                Ok(rental)
            }
            Some(ReleaseOutcome::NotOpen(rental)) => {
                tracing::warn!(rental_id = id, status = %rental.status, "Rental is not open");
                Err(CoreError::InvalidState(format!(
                    "Rental {id} is already {}",
                    rental.status
                ))
                .into())
            }
            Some(ReleaseOutcome::DanglingReference { rental, entity }) => {
                Err(CoreError::Consistency(format!(
                    "Rental {id} references missing {entity} (car {}, customer {})",
                    rental.car_id, rental.customer_id
                ))
                .into())
            }
        }
    }

    async fn expand_one(&self, rental: Rental) -> AppResult<RentalDetail> {
        let car = CarRepo::find_by_id(self.pool, rental.car_id).await?;
        let customer = CustomerRepo::find_by_id(self.pool, rental.customer_id).await?;
        match (car, customer) {
            (Some(car), Some(customer)) => Ok(RentalDetail {
                rental,
                car,
                customer,
            }),
            _ => Err(CoreError::Consistency(format!(
                "Rental {} references a missing car or customer",
                rental.id
            ))
            .into()),
        }
    }

    /// Expand many rentals with two bulk lookups. Rentals whose car or
    /// customer cannot be resolved are skipped and logged.
    async fn expand(&self, rentals: Vec<Rental>) -> AppResult<Vec<RentalDetail>> {
        let car_ids: Vec<DbId> = rentals
            .iter()
            .map(|r| r.car_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let customer_ids: Vec<DbId> = rentals
            .iter()
            .map(|r| r.customer_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let cars: HashMap<DbId, _> = CarRepo::find_many(self.pool, &car_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let customers: HashMap<DbId, _> = CustomerRepo::find_many(self.pool, &customer_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut details = Vec::with_capacity(rentals.len());
        for rental in rentals {
            match (cars.get(&rental.car_id), customers.get(&rental.customer_id)) {
                (Some(car), Some(customer)) => details.push(RentalDetail {
                    car: car.clone(),
                    customer: customer.clone(),
                    rental,
                }),
                _ => tracing::warn!(
                    rental_id = rental.id,
                    car_id = rental.car_id,
                    customer_id = rental.customer_id,
                    "Skipping rental with unresolved references",
                ),
            }
        }
        Ok(details)
    }
}

fn overlap_error(license_plate: &str, rental_id: DbId) -> AppError {
    CoreError::Conflict(format!(
        "Car {license_plate} is already booked for the selected dates (rental {rental_id})"
    ))
    .into()
}
