//! Rental cost derivation.

use crate::availability::DateRange;
use crate::error::CoreError;

/// Base rate per day applied when a car has no rate of its own.
pub const DEFAULT_DAILY_RATE: f64 = 50.0;

/// Number of billable days in a range. Always at least one.
pub fn billable_days(range: &DateRange) -> i64 {
    (range.end() - range.start()).num_days().max(1)
}

/// Derive the total cost of a rental: `days * rate`.
///
/// `car_rate` wins over `base_rate` when the car carries one.
pub fn total_cost(range: &DateRange, car_rate: Option<f64>, base_rate: f64) -> f64 {
    let rate = car_rate.unwrap_or(base_rate);
    billable_days(range) as f64 * rate
}

/// Reject negative or non-finite explicit totals.
pub fn validate_total_cost(total: f64) -> Result<(), CoreError> {
    if !total.is_finite() || total < 0.0 {
        return Err(CoreError::Validation(format!(
            "totalCost must be a non-negative number, got {total}"
        )));
    }
    Ok(())
}
