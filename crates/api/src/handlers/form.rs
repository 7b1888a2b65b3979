//! Multipart form decoding for car and customer registration.
//!
//! Every form field arrives as text except `image`, which is a file part.
//! Unknown fields are ignored, which also drops any attempt to set
//! `isRented` or `hasRental` through the registrar.

use std::collections::HashMap;

use axum::extract::Multipart;
use rentdesk_core::image::ImageUpload;
use rentdesk_core::validation;
use rentdesk_db::models::car::{CreateCar, UpdateCar};
use rentdesk_db::models::customer::{CreateCustomer, UpdateCustomer};

use crate::error::{AppError, AppResult};

/// Name of the file part carrying an image.
const IMAGE_FIELD: &str = "image";

/// A decoded multipart body.
#[derive(Debug, Default)]
pub struct EntityForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl EntityForm {
    /// Drain a multipart body, validating the image part against
    /// `max_image_bytes`.
    pub async fn read(mut multipart: Multipart, max_image_bytes: usize) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == IMAGE_FIELD {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part when no file was picked.
                if data.is_empty() && filename.is_empty() {
                    continue;
                }
                form.image = Some(ImageUpload::new(
                    data.to_vec(),
                    &content_type,
                    &filename,
                    max_image_bytes,
                )?);
            } else if !name.is_empty() {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    fn required(&self, field: &str) -> AppResult<String> {
        Ok(validation::require_text(field, self.get(field))?)
    }

    /// Optional text; blank counts as absent.
    fn optional(&self, field: &str) -> AppResult<Option<String>> {
        match self.get(field) {
            Some(value) => Ok(validation::optional_text(field, value)?),
            None => Ok(None),
        }
    }

    fn optional_bool(&self, field: &str) -> AppResult<Option<bool>> {
        match self.get(field) {
            Some(value) => Ok(Some(validation::parse_bool(field, value)?)),
            None => Ok(None),
        }
    }

    fn optional_amount(&self, field: &str) -> AppResult<Option<f64>> {
        match self.optional(field)? {
            Some(value) => Ok(Some(validation::parse_amount(field, &value)?)),
            None => Ok(None),
        }
    }

    fn optional_year(&self) -> AppResult<Option<i32>> {
        match self.optional("year")? {
            Some(value) => Ok(Some(validation::parse_year(&value)?)),
            None => Ok(None),
        }
    }

    fn optional_email(&self) -> AppResult<Option<String>> {
        match self.optional("email")? {
            Some(value) => Ok(Some(validation::normalize_email(&value)?)),
            None => Ok(None),
        }
    }

    pub fn into_create_car(self) -> AppResult<CreateCar> {
        let year = validation::parse_year(&self.required("year")?)?;
        Ok(CreateCar {
            make: self.required("make")?,
            model: self.required("model")?,
            year,
            license_plate: validation::normalize_license_plate(&self.required("licensePlate")?),
            daily_rate: self.optional_amount("dailyRate")?,
            is_available: self.optional_bool("isAvailable")?,
            image: self.image,
        })
    }

    pub fn into_update_car(self) -> AppResult<UpdateCar> {
        Ok(UpdateCar {
            make: self.optional("make")?,
            model: self.optional("model")?,
            year: self.optional_year()?,
            license_plate: self
                .optional("licensePlate")?
                .map(|plate| validation::normalize_license_plate(&plate)),
            daily_rate: self.optional_amount("dailyRate")?,
            is_available: self.optional_bool("isAvailable")?,
            image: self.image,
        })
    }

    pub fn into_create_customer(self) -> AppResult<CreateCustomer> {
        let email = validation::normalize_email(&self.required("email")?)?;
        Ok(CreateCustomer {
            name: self.required("name")?,
            email,
            phone: self.required("phone")?,
            license_number: self.required("licenseNumber")?,
            is_active: self.optional_bool("isActive")?,
            image: self.image,
        })
    }

    pub fn into_update_customer(self) -> AppResult<UpdateCustomer> {
        Ok(UpdateCustomer {
            name: self.optional("name")?,
            email: self.optional_email()?,
            phone: self.optional("phone")?,
            license_number: self.optional("licenseNumber")?,
            is_active: self.optional_bool("isActive")?,
            image: self.image,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn form(pairs: &[(&str, &str)]) -> EntityForm {
        EntityForm {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn car_form_is_normalized() {
        let car = form(&[
            ("make", " Toyota "),
            ("model", "Corolla"),
            ("year", "2020"),
            ("licensePlate", " abc 123 "),
            ("isAvailable", "false"),
            ("isRented", "true"),
        ])
        .into_create_car()
        .unwrap();

        assert_eq!(car.make, "Toyota");
        assert_eq!(car.license_plate, "ABC 123");
        assert_eq!(car.is_available, Some(false));
        assert_eq!(car.daily_rate, None);
    }

    #[test]
    fn car_form_requires_year() {
        let result = form(&[("make", "Toyota"), ("model", "Corolla"), ("licensePlate", "X1")])
            .into_create_car();
        assert_matches!(result, Err(AppError::Core(_)));
    }

    #[test]
    fn blank_update_fields_are_left_alone() {
        let update = form(&[("make", ""), ("dailyRate", " "), ("year", "2018")])
            .into_update_car()
            .unwrap();
        assert_eq!(update.make, None);
        assert_eq!(update.daily_rate, None);
        assert_eq!(update.year, Some(2018));
    }

    #[test]
    fn customer_email_is_lower_cased() {
        let customer = form(&[
            ("name", "Jane"),
            ("email", "Jane@Example.com"),
            ("phone", "555"),
            ("licenseNumber", "D1"),
        ])
        .into_create_customer()
        .unwrap();
        assert_eq!(customer.email, "jane@example.com");
        assert_eq!(customer.is_active, None);
    }

    #[test]
    fn bad_boolean_is_rejected() {
        let result = form(&[("isActive", "sometimes")]).into_update_customer();
        assert_matches!(result, Err(AppError::Core(_)));
    }
}
