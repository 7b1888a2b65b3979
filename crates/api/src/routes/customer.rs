//! Route definitions for the `/customers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::customer;
use crate::state::AppState;

/// Routes mounted at `/customers`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/image        -> image
/// GET    /{id}/rentals      -> rentals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(customer::list).post(customer::create))
        .route(
            "/{id}",
            get(customer::get_by_id)
                .put(customer::update)
                .delete(customer::delete),
        )
        .route("/{id}/image", get(customer::image))
        .route("/{id}/rentals", get(customer::rentals))
}
