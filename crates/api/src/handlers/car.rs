//! Handlers for the `/cars` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use rentdesk_core::availability::DateRange;
use rentdesk_core::error::CoreError;
use rentdesk_core::types::DbId;
use rentdesk_core::validation;
use rentdesk_db::models::car::Car;
use rentdesk_db::repositories::CarRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::form::EntityForm;
use crate::handlers::image_response;
use crate::query::DateRangeParams;
use crate::registrar;
use crate::response::{AvailabilityResponse, MessageResponse};
use crate::state::AppState;

/// POST /api/cars
///
/// Multipart fields: `make`, `model`, `year`, `licensePlate`, optional
/// `dailyRate`, `isAvailable` and `image`.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Car>)> {
    let input = EntityForm::read(multipart, state.config.max_image_bytes)
        .await?
        .into_create_car()?;
    let car = registrar::register_car(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

/// GET /api/cars
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Car>>> {
    let cars = CarRepo::list(&state.pool).await?;
    tracing::debug!(count = cars.len(), "Listed cars");
    Ok(Json(cars))
}

/// GET /api/cars/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Car>> {
    let car = CarRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;
    Ok(Json(car))
}

/// PUT /api/cars/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Car>> {
    let input = EntityForm::read(multipart, state.config.max_image_bytes)
        .await?
        .into_update_car()?;
    let car = registrar::update_car(&state.pool, &state.car_locks, id, &input).await?;
    Ok(Json(car))
}

/// DELETE /api/cars/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    registrar::delete_car(&state.pool, &state.car_locks, id).await?;
    Ok(Json(MessageResponse::new("Car deleted successfully", id)))
}

/// GET /api/cars/{id}/image
pub async fn image(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let car = CarRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;
    let image = car
        .image
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car image", id }))?;
    Ok(image_response(image))
}

/// GET /api/cars/{id}/availability?startDate=&endDate=
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<AvailabilityResponse>> {
    let start = validation::require_text("startDate", params.start_date.as_deref())?;
    let end = validation::require_text("endDate", params.end_date.as_deref())?;
    let range = DateRange::new(
        validation::parse_date("startDate", &start)?,
        validation::parse_date("endDate", &end)?,
    )?;
    let available = state.lifecycle().check_availability(id, &range).await?;
    Ok(Json(AvailabilityResponse { available }))
}
