//! Customer entity model and DTOs.

use rentdesk_core::entity::{EntityDraft, EntityKind};
use rentdesk_core::error::CoreError;
use rentdesk_core::image::ImageUpload;
use rentdesk_core::types::{DbId, Timestamp};
use rentdesk_core::validation;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::image::StoredImage;

/// A row from the `customers` table, image columns unassembled.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub is_active: bool,
    pub has_rental: bool,
    pub image_data: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    pub image_filename: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A customer as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub is_active: bool,
    pub has_rental: bool,
    pub image: Option<StoredImage>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            license_number: row.license_number,
            is_active: row.is_active,
            has_rental: row.has_rental,
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

/// DTO for registering a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub name: String,
    /// Lower-cased before it reaches the store.
    pub email: String,
    pub phone: String,
    pub license_number: String,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    pub image: Option<ImageUpload>,
}

/// DTO for a partial customer update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub is_active: Option<bool>,
    pub image: Option<ImageUpload>,
}

impl EntityDraft for CreateCustomer {
    const KIND: EntityKind = EntityKind::Customer;

    fn validate(&self) -> Result<(), CoreError> {
        validation::require_text("name", Some(self.name.as_str()))?;
        validation::normalize_email(&self.email)?;
        validation::require_text("phone", Some(self.phone.as_str()))?;
        validation::require_text("licenseNumber", Some(self.license_number.as_str()))?;
        Ok(())
    }

    fn unique_value(&self) -> Option<&str> {
        Some(&self.email)
    }
}

impl EntityDraft for UpdateCustomer {
    const KIND: EntityKind = EntityKind::Customer;

    fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("licenseNumber", &self.license_number),
        ] {
            if let Some(value) = value {
                validation::require_text(field, Some(value.as_str()))?;
            }
        }
        if let Some(email) = &self.email {
            validation::normalize_email(email)?;
        }
        Ok(())
    }

    fn unique_value(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
