//! Uniqueness lookups for registrable entities.

use rentdesk_core::entity::EntityKind;
use rentdesk_core::types::DbId;

use crate::DbPool;

pub struct UniquenessRepo;

impl UniquenessRepo {
    /// Whether another record of `kind` already holds `value` in its unique
    /// column. `exclude` names the record being updated so it does not
    /// collide with its own current value.
    pub async fn is_taken(
        pool: &DbPool,
        kind: EntityKind,
        value: &str,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (table, column) = match kind {
            EntityKind::Car => ("cars", "license_plate"),
            EntityKind::Customer => ("customers", "email"),
        };
        // With `?2` NULL, `id IS NOT NULL` holds for every row.
        let query =
            format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {column} = ?1 AND id IS NOT ?2)");
        sqlx::query_scalar::<_, bool>(&query)
            .bind(value)
            .bind(exclude)
            .fetch_one(pool)
            .await
    }
}
