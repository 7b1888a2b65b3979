//! Car entity model and DTOs.

use rentdesk_core::entity::{EntityDraft, EntityKind};
use rentdesk_core::error::CoreError;
use rentdesk_core::image::ImageUpload;
use rentdesk_core::types::{DbId, Timestamp};
use rentdesk_core::validation;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::image::StoredImage;

/// A row from the `cars` table, image columns unassembled.
#[derive(Debug, Clone, FromRow)]
pub struct CarRow {
    pub id: DbId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub daily_rate: Option<f64>,
    pub is_available: bool,
    pub is_rented: bool,
    pub image_data: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    pub image_filename: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A car as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: DbId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub daily_rate: Option<f64>,
    pub is_available: bool,
    pub is_rented: bool,
    pub image: Option<StoredImage>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Self {
            id: row.id,
            make: row.make,
            model: row.model,
            year: row.year,
            license_plate: row.license_plate,
            daily_rate: row.daily_rate,
            is_available: row.is_available,
            is_rented: row.is_rented,
            image: StoredImage::from_columns(
                row.image_data,
                row.image_content_type,
                row.image_filename,
            ),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for registering a car.
///
/// There is no `is_rented` field: only the rental lifecycle sets it.
#[derive(Debug, Clone)]
pub struct CreateCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub daily_rate: Option<f64>,
    /// Defaults to `true` if omitted.
    pub is_available: Option<bool>,
    pub image: Option<ImageUpload>,
}

/// DTO for a partial car update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateCar {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub daily_rate: Option<f64>,
    pub is_available: Option<bool>,
    pub image: Option<ImageUpload>,
}

impl EntityDraft for CreateCar {
    const KIND: EntityKind = EntityKind::Car;

    fn validate(&self) -> Result<(), CoreError> {
        validation::require_text("make", Some(self.make.as_str()))?;
        validation::require_text("model", Some(self.model.as_str()))?;
        validation::require_text("licensePlate", Some(self.license_plate.as_str()))?;
        validation::validate_year(self.year)?;
        if let Some(rate) = self.daily_rate {
            validation::validate_amount("dailyRate", rate)?;
        }
        Ok(())
    }

    fn unique_value(&self) -> Option<&str> {
        Some(&self.license_plate)
    }
}

impl EntityDraft for UpdateCar {
    const KIND: EntityKind = EntityKind::Car;

    fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("make", &self.make),
            ("model", &self.model),
            ("licensePlate", &self.license_plate),
        ] {
            if let Some(value) = value {
                validation::require_text(field, Some(value.as_str()))?;
            }
        }
        if let Some(year) = self.year {
            validation::validate_year(year)?;
        }
        if let Some(rate) = self.daily_rate {
            validation::validate_amount("dailyRate", rate)?;
        }
        Ok(())
    }

    fn unique_value(&self) -> Option<&str> {
        self.license_plate.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn create() -> CreateCar {
        CreateCar {
            make: "Toyota".into(),
            model: "Corolla".into(),
            year: 2020,
            license_plate: "ABC123".into(),
            daily_rate: None,
            is_available: None,
            image: None,
        }
    }

    #[test]
    fn valid_create_passes() {
        assert!(create().validate().is_ok());
        assert_eq!(create().unique_value(), Some("ABC123"));
    }

    #[test]
    fn create_rejects_old_year_and_negative_rate() {
        let mut car = create();
        car.year = 1900;
        assert_matches!(car.validate(), Err(CoreError::Validation(_)));

        let mut car = create();
        car.daily_rate = Some(-3.0);
        assert_matches!(car.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_update_is_valid_and_has_no_unique_value() {
        let update = UpdateCar::default();
        assert!(update.validate().is_ok());
        assert_eq!(update.unique_value(), None);
    }

    #[test]
    fn update_rejects_blank_make() {
        let update = UpdateCar {
            make: Some("  ".into()),
            ..Default::default()
        };
        assert_matches!(update.validate(), Err(CoreError::Validation(_)));
    }
}
