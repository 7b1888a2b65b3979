//! Image payload as stored alongside a car or customer row.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rentdesk_core::image::ImageUpload;
use serde::{Serialize, Serializer};

/// An image read back from the store.
///
/// Serialized with the bytes base64-encoded:
/// `{ "contentType", "filename", "size", "data" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub content_type: String,
    pub filename: String,
    pub size: usize,
    #[serde(serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
}

impl StoredImage {
    /// Reassemble an image from its three nullable columns.
    ///
    /// Returns `None` unless the payload is present.
    pub fn from_columns(
        data: Option<Vec<u8>>,
        content_type: Option<String>,
        filename: Option<String>,
    ) -> Option<Self> {
        let data = data?;
        Some(Self {
            content_type: content_type.unwrap_or_else(|| "application/octet-stream".into()),
            filename: filename.unwrap_or_default(),
            size: data.len(),
            data,
        })
    }
}

/// Split an optional upload into the `(data, content_type, filename)`
/// column triple. `None` binds three NULLs.
pub fn image_columns(image: Option<&ImageUpload>) -> (Option<&[u8]>, Option<&str>, Option<&str>) {
    match image {
        Some(img) => (
            Some(img.data.as_slice()),
            Some(img.content_type.as_str()),
            Some(img.filename.as_str()),
        ),
        None => (None, None, None),
    }
}

fn serialize_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}
