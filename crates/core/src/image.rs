//! Uploaded image payloads attached to cars and customers.

use crate::error::CoreError;

/// Upper bound on an uploaded image (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image as received from a client and as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

impl ImageUpload {
    /// Validate and build an upload.
    ///
    /// The content type must be `image/*` (any case) and the payload
    /// non-empty and no larger than `max_bytes`. Content type and filename
    /// are kept exactly as the client sent them.
    pub fn new(
        data: Vec<u8>,
        content_type: &str,
        filename: &str,
        max_bytes: usize,
    ) -> Result<Self, CoreError> {
        if !is_image_type(content_type) {
            return Err(CoreError::Validation(format!(
                "Only image files are allowed, got '{content_type}'"
            )));
        }
        if data.is_empty() {
            return Err(CoreError::Validation("Image file is empty".to_string()));
        }
        if data.len() > max_bytes {
            return Err(CoreError::Validation(format!(
                "File too large. Maximum size is {}MB",
                max_bytes / (1024 * 1024)
            )));
        }
        Ok(Self {
            data,
            content_type: content_type.to_string(),
            filename: filename.to_string(),
        })
    }
}

fn is_image_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_small_png() {
        let data = vec![0x89, b'P', b'N', b'G'];
        let img = ImageUpload::new(data, "image/png", "car.png", MAX_IMAGE_BYTES).unwrap();
        assert_eq!(img.content_type, "image/png");
        assert_eq!(img.filename, "car.png");
    }

    #[test]
    fn rejects_non_image_content_type() {
        assert_matches!(
            ImageUpload::new(vec![1, 2, 3], "application/pdf", "x.pdf", MAX_IMAGE_BYTES),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_oversize_payload() {
        assert_matches!(
            ImageUpload::new(vec![0; 11], "image/jpeg", "big.jpg", 10),
            Err(CoreError::Validation(msg)) if msg.starts_with("File too large")
        );
    }

    #[test]
    fn rejects_empty_payload() {
        assert_matches!(
            ImageUpload::new(Vec::new(), "image/jpeg", "none.jpg", MAX_IMAGE_BYTES),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn content_type_and_filename_are_kept_as_sent() {
        let img = ImageUpload::new(vec![1], "image/PNG", "My Car.PNG", MAX_IMAGE_BYTES).unwrap();
        assert_eq!(img.content_type, "image/PNG");
        assert_eq!(img.filename, "My Car.PNG");

        let img = ImageUpload::new(vec![1], "IMAGE/GIF", "", MAX_IMAGE_BYTES).unwrap();
        assert_eq!(img.content_type, "IMAGE/GIF");
        assert_eq!(img.filename, "");
    }

    #[test]
    fn short_or_foreign_types_are_rejected() {
        for bad in ["", "image", "imag/png", "text/image/png"] {
            assert_matches!(
                ImageUpload::new(vec![1], bad, "x", MAX_IMAGE_BYTES),
                Err(CoreError::Validation(_)),
                "{bad}"
            );
        }
    }
}
