//! Route definitions for the `/rentals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::rental;
use crate::state::AppState;

/// Routes mounted at `/rentals`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> delete (cancel)
/// POST   /{id}/complete     -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rental::list).post(rental::create))
        .route("/{id}", get(rental::get_by_id).delete(rental::delete))
        .route("/{id}/complete", post(rental::complete))
}
