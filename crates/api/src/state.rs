use std::sync::Arc;

use crate::config::ServerConfig;
use crate::lifecycle::{CarLocks, RentalLifecycle};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rentdesk_db::DbPool,
    /// Server configuration (image limit and base rate are read per request).
    pub config: Arc<ServerConfig>,
    /// Per-car locks serializing rental writes within this process.
    pub car_locks: Arc<CarLocks>,
}

impl AppState {
    pub fn new(pool: rentdesk_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            car_locks: Arc::new(CarLocks::default()),
        }
    }

    /// The rental lifecycle manager bound to this state.
    pub fn lifecycle(&self) -> RentalLifecycle<'_> {
        RentalLifecycle::new(&self.pool, &self.car_locks, self.config.default_daily_rate)
    }
}
