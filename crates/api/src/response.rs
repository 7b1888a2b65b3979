//! Shared response payload types for API handlers.

use rentdesk_core::types::DbId;
use serde::Serialize;

/// `{ "message": ..., "id": ... }` body returned by delete-style endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub id: DbId,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>, id: DbId) -> Self {
        Self {
            message: message.into(),
            id,
        }
    }
}

/// Answer of the availability endpoint.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}
