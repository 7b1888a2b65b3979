//! Repository for the `rentals` table.
//!
//! Creating and ending a rental touches three tables. Both operations run in
//! a single transaction whose first statement is a write, so SQLite hands
//! the transaction the write lock up front and concurrent writers queue on
//! the busy timeout instead of failing half-way.

use chrono::Utc;
use rentdesk_core::availability::DateRange;
use rentdesk_core::rental::RentalStatus;
use rentdesk_core::types::DbId;
use sqlx::SqliteConnection;

use crate::models::rental::{
    CreateRental, CreateRentalOutcome, ReleaseAction, ReleaseOutcome, Rental,
};
use crate::DbPool;

const COLUMNS: &str =
    "id, car_id, customer_id, start_date, end_date, total_cost, status, created_at, updated_at";

/// SQL predicate for rentals that still hold their car.
/// Mirrors [`RentalStatus::holds_car`].
const OPEN: &str = "status IN ('reserved', 'active')";

pub struct RentalRepo;

impl RentalRepo {
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Rental>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rentals WHERE id = ?1");
        sqlx::query_as::<_, Rental>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rentals ordered by most recently created first.
    pub async fn list(pool: &DbPool) -> Result<Vec<Rental>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rentals ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Rental>(&query).fetch_all(pool).await
    }

    /// Reserved and active rentals of one car, oldest booking first.
    pub async fn list_open_for_car(
        pool: &DbPool,
        car_id: DbId,
    ) -> Result<Vec<Rental>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rentals WHERE car_id = ?1 AND {OPEN} ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Rental>(&query)
            .bind(car_id)
            .fetch_all(pool)
            .await
    }

    /// Reserved and active rentals of one customer, oldest booking first.
    pub async fn list_open_for_customer(
        pool: &DbPool,
        customer_id: DbId,
    ) -> Result<Vec<Rental>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rentals
             WHERE customer_id = ?1 AND {OPEN}
             ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Rental>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_open_for_car(pool: &DbPool, car_id: DbId) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM rentals WHERE car_id = ?1 AND {OPEN}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(car_id)
            .fetch_one(pool)
            .await
    }

    pub async fn count_open_for_customer(
        pool: &DbPool,
        customer_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM rentals WHERE customer_id = ?1 AND {OPEN}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(customer_id)
            .fetch_one(pool)
            .await
    }

    /// Book a car for a customer in one transaction.
    ///
    /// 1. Claim the car: flip it to rented only if it is still available.
    /// 2. Re-check the booking overlap against committed rentals.
    /// 3. Insert the rental.
    /// 4. Flag the customer, only if still active.
    ///
    /// Any guard that fails rolls everything back and is reported through
    /// [`CreateRentalOutcome`]; store errors roll back when the transaction
    /// is dropped.
    pub async fn create_active(
        pool: &DbPool,
        input: &CreateRental,
    ) -> Result<CreateRentalOutcome, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE cars SET is_rented = 1, is_available = 0, updated_at = ?2
             WHERE id = ?1 AND is_available = 1 AND is_rented = 0",
        )
        .bind(input.car_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let overlap = find_overlap(&mut tx, input.car_id, &input.range, None).await?;
        if let Some(rental_id) = overlap {
            tx.rollback().await?;
            tracing::debug!(car_id = input.car_id, rental_id, "Rental insert rolled back: overlap");
            return Ok(CreateRentalOutcome::Overlap { rental_id });
        }
        if claimed == 0 {
            tx.rollback().await?;
            tracing::debug!(car_id = input.car_id, "Rental insert rolled back: car taken");
            return Ok(CreateRentalOutcome::CarUnavailable);
        }

        let query = format!(
            "INSERT INTO rentals (car_id, customer_id, start_date, end_date, total_cost, status,
                                  created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {COLUMNS}"
        );
        let rental = sqlx::query_as::<_, Rental>(&query)
            .bind(input.car_id)
            .bind(input.customer_id)
            .bind(input.range.start())
            .bind(input.range.end())
            .bind(input.total_cost)
            .bind(input.status.as_str())
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let flagged = sqlx::query(
            "UPDATE customers SET has_rental = 1, updated_at = ?2
             WHERE id = ?1 AND is_active = 1",
        )
        .bind(input.customer_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if flagged == 0 {
            tx.rollback().await?;
            tracing::debug!(
                customer_id = input.customer_id,
                "Rental insert rolled back: customer inactive"
            );
            return Ok(CreateRentalOutcome::CustomerInactive);
        }

        tx.commit().await?;
        Ok(CreateRentalOutcome::Created(rental))
    }

    /// End a rental and restore its car and customer flags in one
    /// transaction.
    ///
    /// The car becomes available again unless it still has another open
    /// rental; the customer keeps `has_rental` only while another open
    /// rental of theirs remains. Rentals that are already finished are
    /// deleted without touching any flags.
    ///
    /// Returns `None` if no rental with the given `id` exists.
    pub async fn release(
        pool: &DbPool,
        id: DbId,
        action: ReleaseAction,
    ) -> Result<Option<ReleaseOutcome>, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let touch = format!("UPDATE rentals SET updated_at = ?2 WHERE id = ?1 RETURNING {COLUMNS}");
        let Some(rental) = sqlx::query_as::<_, Rental>(&touch)
            .bind(id)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let is_open = rental.status.holds_car();
        if action == ReleaseAction::Complete && !is_open {
            tx.rollback().await?;
            return Ok(Some(ReleaseOutcome::NotOpen(rental)));
        }

        if is_open {
            let car_query = format!(
                "UPDATE cars SET
                    is_rented = EXISTS (SELECT 1 FROM rentals
                                        WHERE car_id = ?1 AND id != ?2 AND {OPEN}),
                    is_available = NOT EXISTS (SELECT 1 FROM rentals
                                               WHERE car_id = ?1 AND id != ?2 AND {OPEN}),
                    updated_at = ?3
                 WHERE id = ?1"
            );
            let cars = sqlx::query(&car_query)
                .bind(rental.car_id)
                .bind(rental.id)
                .bind(now)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            if cars == 0 {
                tx.rollback().await?;
                return Ok(Some(ReleaseOutcome::DanglingReference {
                    rental,
                    entity: "Car",
                }));
            }

            let customer_query = format!(
                "UPDATE customers SET
                    has_rental = EXISTS (SELECT 1 FROM rentals
                                         WHERE customer_id = ?1 AND id != ?2 AND {OPEN}),
                    updated_at = ?3
                 WHERE id = ?1"
            );
            let customers = sqlx::query(&customer_query)
                .bind(rental.customer_id)
                .bind(rental.id)
                .bind(now)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            if customers == 0 {
                tx.rollback().await?;
                return Ok(Some(ReleaseOutcome::DanglingReference {
                    rental,
                    entity: "Customer",
                }));
            }
        }

        let rental = match action {
            ReleaseAction::Delete => {
                sqlx::query("DELETE FROM rentals WHERE id = ?1")
                    .bind(rental.id)
                    .execute(&mut *tx)
                    .await?;
                rental
            }
            ReleaseAction::Complete => {
                let query = format!(
                    "UPDATE rentals SET status = ?2 WHERE id = ?1 RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Rental>(&query)
                    .bind(rental.id)
                    .bind(RentalStatus::Completed.as_str())
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(Some(ReleaseOutcome::Released {
            rental,
            flags_restored: is_open,
        }))
    }
}

/// First open rental of `car_id` overlapping `range` (closed interval),
/// other than `exclude`.
async fn find_overlap(
    conn: &mut SqliteConnection,
    car_id: DbId,
    range: &DateRange,
    exclude: Option<DbId>,
) -> Result<Option<DbId>, sqlx::Error> {
    let query = format!(
        "SELECT id FROM rentals
         WHERE car_id = ?1 AND {OPEN}
           AND start_date <= ?3 AND end_date >= ?2
           AND id IS NOT ?4
         ORDER BY start_date, id
         LIMIT 1"
    );
    sqlx::query_scalar::<_, DbId>(&query)
        .bind(car_id)
        .bind(range.start())
        .bind(range.end())
        .bind(exclude)
        .fetch_optional(conn)
        .await
}
