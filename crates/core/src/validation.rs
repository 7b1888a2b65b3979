//! Field-level validation and normalization for registrar input.
//!
//! Form values arrive as text (multipart bodies), so these helpers both
//! coerce and validate: required text is trimmed and must be non-empty,
//! plates are upper-cased, emails lower-cased, and numbers/booleans are
//! parsed with field-specific error messages.

use chrono::DateTime;

use crate::error::CoreError;
use crate::types::RentalDate;

/// Oldest model year accepted for a car.
pub const MIN_CAR_YEAR: i32 = 1950;

/// Maximum length of any free-text field.
pub const MAX_TEXT_LEN: usize = 200;

/// Trim a required text field, rejecting empty or oversize values.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, CoreError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    optional_text(field, trimmed).map(|v| v.unwrap_or_default())
}

/// Trim an optional text field. Blank input becomes `None`.
pub fn optional_text(field: &str, value: &str) -> Result<Option<String>, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::Validation(format!(
            "{field} is too long (max {MAX_TEXT_LEN} characters)"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Canonical form of a license plate: trimmed, inner whitespace collapsed,
/// upper-cased.
pub fn normalize_license_plate(plate: &str) -> String {
    plate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Canonical form of an email address, with a minimal shape check.
pub fn normalize_email(email: &str) -> Result<String, CoreError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.contains(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(email)
}

/// Parse and range-check a model year.
pub fn parse_year(value: &str) -> Result<i32, CoreError> {
    let year: i32 = value
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("year must be an integer, got '{value}'")))?;
    validate_year(year)?;
    Ok(year)
}

pub fn validate_year(year: i32) -> Result<(), CoreError> {
    if year < MIN_CAR_YEAR {
        return Err(CoreError::Validation(format!(
            "year must be {MIN_CAR_YEAR} or later, got {year}"
        )));
    }
    Ok(())
}

/// Parse a non-negative, finite monetary amount.
pub fn parse_amount(field: &str, value: &str) -> Result<f64, CoreError> {
    let amount: f64 = value
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("{field} must be a number, got '{value}'")))?;
    validate_amount(field, amount)?;
    Ok(amount)
}

pub fn validate_amount(field: &str, amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}

/// Parse an HTML-form style boolean.
pub fn parse_bool(field: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(CoreError::Validation(format!(
            "{field} must be a boolean, got '{other}'"
        ))),
    }
}

/// Parse a rental day from `YYYY-MM-DD` or a full RFC 3339 timestamp.
///
/// Timestamps are reduced to the calendar day they name in their own offset.
pub fn parse_date(field: &str, value: &str) -> Result<RentalDate, CoreError> {
    let value = value.trim();
    if let Ok(date) = RentalDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.date_naive())
        .map_err(|_| {
            CoreError::Validation(format!(
                "{field} must be a date (YYYY-MM-DD), got '{value}'"
            ))
        })
}
