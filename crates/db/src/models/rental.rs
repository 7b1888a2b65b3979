//! Rental entity model and DTOs.

use rentdesk_core::availability::{Booking, DateRange};
use rentdesk_core::rental::RentalStatus;
use rentdesk_core::types::{DbId, RentalDate, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::car::Car;
use crate::models::customer::Customer;

/// A row from the `rentals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: DbId,
    pub car_id: DbId,
    pub customer_id: DbId,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    pub total_cost: f64,
    #[sqlx(try_from = "String")]
    pub status: RentalStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Rental {
    /// The slice of this rental the overlap check works on.
    pub fn booking(&self) -> Booking {
        Booking {
            rental_id: self.id,
            start: self.start_date,
            end: self.end_date,
            status: self.status,
        }
    }
}

/// A rental with its car and customer expanded.
#[derive(Debug, Clone, Serialize)]
pub struct RentalDetail {
    #[serde(flatten)]
    pub rental: Rental,
    pub car: Car,
    pub customer: Customer,
}

/// DTO for inserting a rental whose inputs have already been validated.
#[derive(Debug, Clone)]
pub struct CreateRental {
    pub car_id: DbId,
    pub customer_id: DbId,
    pub range: DateRange,
    pub total_cost: f64,
    pub status: RentalStatus,
}

/// Result of the transactional create.
///
/// Every variant except `Created` means the transaction was rolled back and
/// nothing was written.
#[derive(Debug)]
pub enum CreateRentalOutcome {
    Created(Rental),
    /// The car's flags no longer allow renting it.
    CarUnavailable,
    /// Another open rental of the car overlaps the requested range.
    Overlap { rental_id: DbId },
    /// The customer was deactivated (or removed) concurrently.
    CustomerInactive,
}

/// How an open rental is ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    /// Remove the rental row.
    Delete,
    /// Keep the row with status `completed`.
    Complete,
}

/// Result of the transactional release.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// The rental was released. `rental` is the deleted row, or the row as
    /// updated to `completed`.
    Released { rental: Rental, flags_restored: bool },
    /// `Complete` was requested for a rental that is no longer open.
    NotOpen(Rental),
    /// The rental references a car or customer that no longer exists.
    DanglingReference { rental: Rental, entity: &'static str },
}
