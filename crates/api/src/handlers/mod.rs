pub mod car;
pub mod customer;
pub mod form;
pub mod rental;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use rentdesk_db::models::image::StoredImage;

/// Serve a stored image as raw bytes under its own content type.
pub(crate) fn image_response(image: StoredImage) -> Response {
    let filename: String = image
        .filename
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && *c != '"')
        .collect();
    let disposition = format!("inline; filename=\"{filename}\"");
    (
        [(CONTENT_TYPE, image.content_type), (CONTENT_DISPOSITION, disposition)],
        image.data,
    )
        .into_response()
}
