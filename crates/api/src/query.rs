//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Candidate rental range (`?startDate=&endDate=`).
///
/// Kept as raw text so malformed dates surface as validation errors rather
/// than extractor rejections.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
