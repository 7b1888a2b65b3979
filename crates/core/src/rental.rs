//! Rental status values and the preconditions for renting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a rental agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Reserved,
    Active,
    Completed,
    Cancelled,
}

/// Status assigned to newly created rentals.
pub const DEFAULT_RENTAL_STATUS: RentalStatus = RentalStatus::Active;

impl RentalStatus {
    pub const ALL: [RentalStatus; 4] = [
        RentalStatus::Reserved,
        RentalStatus::Active,
        RentalStatus::Completed,
        RentalStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RentalStatus::Reserved => "reserved",
            RentalStatus::Active => "active",
            RentalStatus::Completed => "completed",
            RentalStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a rental in this status keeps its car booked.
    pub fn holds_car(self) -> bool {
        matches!(self, RentalStatus::Reserved | RentalStatus::Active)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RentalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown rental status '{s}'")))
    }
}

impl TryFrom<String> for RentalStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A car may be rented only while it is flagged available and not rented.
pub fn ensure_car_rentable(
    license_plate: &str,
    is_available: bool,
    is_rented: bool,
) -> Result<(), CoreError> {
    if !is_available || is_rented {
        return Err(CoreError::InvalidState(format!(
            "Car {license_plate} is not available for rental"
        )));
    }
    Ok(())
}

/// Only active customers may take out a rental.
pub fn ensure_customer_active(email: &str, is_active: bool) -> Result<(), CoreError> {
    if !is_active {
        return Err(CoreError::InvalidState(format!(
            "Customer {email} is not active"
        )));
    }
    Ok(())
}
