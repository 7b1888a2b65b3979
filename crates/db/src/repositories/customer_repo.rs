//! Repository for the `customers` table.

use chrono::Utc;
use rentdesk_core::types::DbId;
use sqlx::{QueryBuilder, Sqlite};

use crate::models::customer::{CreateCustomer, Customer, CustomerRow, UpdateCustomer};
use crate::models::image::image_columns;
use crate::DbPool;

const COLUMNS: &str = "id, name, email, phone, license_number, is_active, has_rental, \
     image_data, image_content_type, image_filename, created_at, updated_at";

/// Provides CRUD operations for customers. `has_rental` is owned by the
/// rental lifecycle and never written here.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let (image_data, content_type, filename) = image_columns(input.image.as_ref());
        let query = format!(
            "INSERT INTO customers (name, email, phone, license_number, is_active, has_rental,
                                    image_data, image_content_type, image_filename,
                                    created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, COALESCE(?5, 1), 0, ?6, ?7, ?8, ?9, ?9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.license_number)
            .bind(input.is_active)
            .bind(image_data)
            .bind(content_type)
            .bind(filename)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
            .map(Customer::from)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = ?1");
        let row = sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    /// List all customers ordered by most recently created first.
    pub async fn list(pool: &DbPool) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, CustomerRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    pub async fn find_many(pool: &DbPool, ids: &[DbId]) -> Result<Vec<Customer>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM customers WHERE id IN ("));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let rows = builder
            .build_query_as::<CustomerRow>()
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Update a customer. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let (image_data, content_type, filename) = image_columns(input.image.as_ref());
        let query = format!(
            "UPDATE customers SET
                name = COALESCE(?2, name),
                email = COALESCE(?3, email),
                phone = COALESCE(?4, phone),
                license_number = COALESCE(?5, license_number),
                is_active = COALESCE(?6, is_active),
                image_data = COALESCE(?7, image_data),
                image_content_type = COALESCE(?8, image_content_type),
                image_filename = COALESCE(?9, image_filename),
                updated_at = ?10
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.license_number)
            .bind(input.is_active)
            .bind(image_data)
            .bind(content_type)
            .bind(filename)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    /// Permanently delete a customer by ID. Returns `true` if a row was removed.
    ///
    /// Customers holding a reserved or active rental are kept.
    pub async fn delete(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM customers WHERE id = ?1
             AND NOT EXISTS (SELECT 1 FROM rentals
                             WHERE customer_id = ?1 AND status IN ('reserved', 'active'))",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
