//! Registrable entity kinds and the capabilities the registrar relies on.

use std::fmt;

use crate::error::CoreError;

/// The closed set of records managed by the entity registrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Car,
    Customer,
}

impl EntityKind {
    /// Human-readable entity name, used in `NotFound` errors.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Car => "Car",
            EntityKind::Customer => "Customer",
        }
    }

    /// Name of the field that must be unique across records of this kind.
    pub fn unique_field(self) -> &'static str {
        match self {
            EntityKind::Car => "licensePlate",
            EntityKind::Customer => "email",
        }
    }

    /// Conflict error raised when `value` is already taken.
    pub fn duplicate(self, value: &str) -> CoreError {
        let what = match self {
            EntityKind::Car => "license plate",
            EntityKind::Customer => "email",
        };
        CoreError::Conflict(format!(
            "{} with this {what} already exists: {value}",
            self.label()
        ))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Create or update input for a registrable entity.
///
/// Implemented by the create/update DTOs of each [`EntityKind`] so the
/// registrar can run the same validate / uniqueness / persist sequence for
/// cars and customers.
pub trait EntityDraft {
    const KIND: EntityKind;

    /// Check field-level rules. Values are expected to be normalized already.
    fn validate(&self) -> Result<(), CoreError>;

    /// The value of the unique field, if this draft sets it.
    fn unique_value(&self) -> Option<&str>;
}
