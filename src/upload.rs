//! Profile-image handling: images are stored inline as base64 data URIs.

use base64::{engine::general_purpose, Engine};

use crate::error::AppError;

/// Content types accepted for profile images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 512_000;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    Empty,
    #[error("Unsupported file type: {0}. Allowed types: jpeg, jpg, png, gif")]
    UnsupportedType(String),
    #[error("File too large: {0} bytes exceeds the 500KB limit")]
    TooLarge(usize),
    #[error("Invalid image data: {0}")]
    InvalidDataUri(String),
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> AppError {
        match error {
            UploadError::TooLarge(_) => AppError::PayloadTooLarge(error.to_string()),
            _ => AppError::BadRequest(error.to_string()),
        }
    }
}

fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Validates an uploaded image and encodes it as `data:<mime>;base64,<payload>`.
pub fn encode_image(content_type: &str, bytes: &[u8]) -> Result<String, UploadError> {
    let mime = normalize_mime(content_type);
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(UploadError::UnsupportedType(mime));
    }
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge(bytes.len()));
    }
    Ok(format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    ))
}

/// Checks a stored data URI: `data:image/` prefix, non-empty payload that
/// decodes and stays within [`MAX_IMAGE_BYTES`]. Returns the decoded size.
pub fn validate_data_uri(uri: &str) -> Result<usize, UploadError> {
    let rest = uri
        .strip_prefix("data:image/")
        .ok_or_else(|| UploadError::InvalidDataUri("expected a data:image/ URI".into()))?;
    let (_, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| UploadError::InvalidDataUri("expected base64 encoding".into()))?;
    if payload.is_empty() {
        return Err(UploadError::Empty);
    }
    let decoded = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| UploadError::InvalidDataUri(e.to_string()))?;
    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge(decoded.len()));
    }
    Ok(decoded.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png() {
        let uri = encode_image("image/png", &[0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        assert_eq!(validate_data_uri(&uri), Ok(4));
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let uri = encode_image("Image/JPEG; charset=binary", b"jpeg").unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            encode_image("application/pdf", b"%PDF"),
            Err(UploadError::UnsupportedType("application/pdf".into()))
        );
        assert_eq!(encode_image("image/gif", b""), Err(UploadError::Empty));
        assert_eq!(
            encode_image("image/gif", &vec![0u8; MAX_IMAGE_BYTES + 1]),
            Err(UploadError::TooLarge(MAX_IMAGE_BYTES + 1))
        );
        assert!(encode_image("image/gif", &vec![0u8; MAX_IMAGE_BYTES]).is_ok());
    }

    #[test]
    fn test_validate_data_uri_rejects_other_payloads() {
        assert!(validate_data_uri("https://example.com/a.png").is_err());
        assert!(validate_data_uri("data:image/png;base64,").is_err());
        assert!(validate_data_uri("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_error_statuses() {
        use actix_web::ResponseError;
        let too_large: AppError = UploadError::TooLarge(1).into();
        assert_eq!(too_large.status_code(), 413);
        let bad_type: AppError = UploadError::UnsupportedType("text/plain".into()).into();
        assert_eq!(bad_type.status_code(), 400);
    }
}
