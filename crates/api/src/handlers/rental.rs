//! Handlers for the `/rentals` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rentdesk_core::error::CoreError;
use rentdesk_core::types::DbId;
use rentdesk_core::validation;
use rentdesk_db::models::rental::RentalDetail;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::lifecycle::NewRental;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for `POST /api/rentals`.
///
/// Every field is optional at the serde level so a missing one is reported
/// by name instead of as a generic deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRentalRequest {
    pub car_id: Option<DbId>,
    pub customer_id: Option<DbId>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_cost: Option<f64>,
}

impl CreateRentalRequest {
    fn into_new_rental(self) -> AppResult<NewRental> {
        let missing = |field: &str| CoreError::Validation(format!("{field} is required"));
        let car_id = self.car_id.ok_or_else(|| missing("carId"))?;
        let customer_id = self.customer_id.ok_or_else(|| missing("customerId"))?;
        let start = validation::require_text("startDate", self.start_date.as_deref())?;
        let end = validation::require_text("endDate", self.end_date.as_deref())?;
        Ok(NewRental {
            car_id,
            customer_id,
            start_date: validation::parse_date("startDate", &start)?,
            end_date: validation::parse_date("endDate", &end)?,
            total_cost: self.total_cost,
        })
    }
}

/// POST /api/rentals
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateRentalRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RentalDetail>)> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let input = request.into_new_rental()?;
    let rental = state.lifecycle().create_rental(input).await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

/// GET /api/rentals
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<RentalDetail>>> {
    let rentals = state.lifecycle().list_rentals().await?;
    Ok(Json(rentals))
}

/// GET /api/rentals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<RentalDetail>> {
    let rental = state.lifecycle().get_rental(id).await?;
    Ok(Json(rental))
}

/// DELETE /api/rentals/{id}
///
/// Cancels the rental and frees its car and customer.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    state.lifecycle().cancel_rental(id).await?;
    Ok(Json(MessageResponse::new("Rental cancelled successfully", id)))
}

/// POST /api/rentals/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<RentalDetail>> {
    let rental = state.lifecycle().complete_rental(id).await?;
    Ok(Json(rental))
}
