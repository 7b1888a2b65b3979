//! Handlers for the `/customers` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use rentdesk_core::error::CoreError;
use rentdesk_core::types::DbId;
use rentdesk_db::models::customer::Customer;
use rentdesk_db::models::rental::RentalDetail;
use rentdesk_db::repositories::CustomerRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::form::EntityForm;
use crate::handlers::image_response;
use crate::registrar;
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let input = EntityForm::read(multipart, state.config.max_image_bytes)
        .await?
        .into_create_customer()?;
    let customer = registrar::register_customer(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = CustomerRepo::list(&state.pool).await?;
    tracing::debug!(count = customers.len(), "Listed customers");
    Ok(Json(customers))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    Ok(Json(customer))
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Customer>> {
    let input = EntityForm::read(multipart, state.config.max_image_bytes)
        .await?
        .into_update_customer()?;
    let customer = registrar::update_customer(&state.pool, id, &input).await?;
    Ok(Json(customer))
}

/// DELETE /api/customers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    registrar::delete_customer(&state.pool, id).await?;
    Ok(Json(MessageResponse::new("Customer deleted successfully", id)))
}

/// GET /api/customers/{id}/image
pub async fn image(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let customer = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    let image = customer.image.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Customer image",
        id,
    }))?;
    Ok(image_response(image))
}

/// GET /api/customers/{id}/rentals
///
/// The customer's reserved and active rentals, expanded.
pub async fn rentals(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<RentalDetail>>> {
    let rentals = state.lifecycle().customer_rentals(id).await?;
    Ok(Json(rentals))
}
