//! Booking overlap rules.
//!
//! Rental ranges are closed intervals of whole days: a rental ending on the
//! 5th and another starting on the 5th share that day and therefore conflict.
//! Only bookings whose status still holds the car (see
//! [`RentalStatus::holds_car`]) take part in the check.

use serde::Serialize;

use crate::error::CoreError;
use crate::rental::RentalStatus;
use crate::types::{DbId, RentalDate};

/// A validated rental date range with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: RentalDate,
    end: RentalDate,
}

impl DateRange {
    /// Build a range, rejecting empty or inverted ones.
    pub fn new(start: RentalDate, end: RentalDate) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Validation(format!(
                "End date ({end}) must be after start date ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> RentalDate {
        self.start
    }

    pub fn end(&self) -> RentalDate {
        self.end
    }

    /// Closed-interval overlap: `a.start <= b.end && a.end >= b.start`.
    pub fn overlaps(&self, start: RentalDate, end: RentalDate) -> bool {
        self.start <= end && self.end >= start
    }
}

/// The slice of a rental row the overlap check needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    pub rental_id: DbId,
    pub start: RentalDate,
    pub end: RentalDate,
    pub status: RentalStatus,
}

/// Return the id of the first booking that collides with `candidate`.
///
/// `exclude` skips one rental, so an existing booking can be re-validated
/// against its own car without conflicting with itself. Completed and
/// cancelled bookings never conflict.
pub fn find_conflict(
    candidate: &DateRange,
    bookings: &[Booking],
    exclude: Option<DbId>,
) -> Option<DbId> {
    bookings
        .iter()
        .filter(|b| Some(b.rental_id) != exclude)
        .filter(|b| b.status.holds_car())
        .find(|b| candidate.overlaps(b.start, b.end))
        .map(|b| b.rental_id)
}

/// `true` if any booking collides with `candidate`.
pub fn is_overlapping(candidate: &DateRange, bookings: &[Booking], exclude: Option<DbId>) -> bool {
    find_conflict(candidate, bookings, exclude).is_some()
}
