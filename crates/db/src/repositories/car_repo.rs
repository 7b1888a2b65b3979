//! Repository for the `cars` table.

use chrono::Utc;
use rentdesk_core::types::DbId;
use sqlx::{QueryBuilder, Sqlite};

use crate::models::car::{Car, CarRow, CreateCar, UpdateCar};
use crate::models::image::image_columns;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, make, model, year, license_plate, daily_rate, is_available, \
     is_rented, image_data, image_content_type, image_filename, created_at, updated_at";

/// Provides CRUD operations for cars.
///
/// `is_rented` is never written here; the rental lifecycle owns it through
/// [`RentalRepo`](crate::repositories::RentalRepo).
pub struct CarRepo;

impl CarRepo {
    /// Insert a new car, returning the created row.
    ///
    /// If `is_available` is `None` in the input, defaults to available.
    pub async fn create(pool: &DbPool, input: &CreateCar) -> Result<Car, sqlx::Error> {
        let (image_data, content_type, filename) = image_columns(input.image.as_ref());
        let query = format!(
            "INSERT INTO cars (make, model, year, license_plate, daily_rate, is_available,
                               is_rented, image_data, image_content_type, image_filename,
                               created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, 1), 0, ?7, ?8, ?9, ?10, ?10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarRow>(&query)
            .bind(&input.make)
            .bind(&input.model)
            .bind(input.year)
            .bind(&input.license_plate)
            .bind(input.daily_rate)
            .bind(input.is_available)
            .bind(image_data)
            .bind(content_type)
            .bind(filename)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
            .map(Car::from)
    }

    /// Find a car by its internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = ?1");
        let row = sqlx::query_as::<_, CarRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Car::from))
    }

    /// List all cars ordered by most recently created first.
    pub async fn list(pool: &DbPool) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, CarRow>(&query).fetch_all(pool).await?;
        Ok(rows.into_iter().map(Car::from).collect())
    }

    /// Load every car whose id is in `ids`, in no particular order.
    pub async fn find_many(pool: &DbPool, ids: &[DbId]) -> Result<Vec<Car>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM cars WHERE id IN ("));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let rows = builder.build_query_as::<CarRow>().fetch_all(pool).await?;
        Ok(rows.into_iter().map(Car::from).collect())
    }

    /// Update a car. Only non-`None` fields in `input` are applied; a new
    /// image replaces the stored one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateCar,
    ) -> Result<Option<Car>, sqlx::Error> {
        let (image_data, content_type, filename) = image_columns(input.image.as_ref());
        let query = format!(
            "UPDATE cars SET
                make = COALESCE(?2, make),
                model = COALESCE(?3, model),
                year = COALESCE(?4, year),
                license_plate = COALESCE(?5, license_plate),
                daily_rate = COALESCE(?6, daily_rate),
                is_available = COALESCE(?7, is_available),
                image_data = COALESCE(?8, image_data),
                image_content_type = COALESCE(?9, image_content_type),
                image_filename = COALESCE(?10, image_filename),
                updated_at = ?11
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CarRow>(&query)
            .bind(id)
            .bind(&input.make)
            .bind(&input.model)
            .bind(input.year)
            .bind(&input.license_plate)
            .bind(input.daily_rate)
            .bind(input.is_available)
            .bind(image_data)
            .bind(content_type)
            .bind(filename)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Car::from))
    }

    /// Permanently delete a car by ID. Returns `true` if a row was removed.
    ///
    /// A car with a reserved or active rental is never removed. Finished
    /// rentals of the car go with it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM cars WHERE id = ?1
             AND NOT EXISTS (SELECT 1 FROM rentals
                             WHERE car_id = ?1 AND status IN ('reserved', 'active'))",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
