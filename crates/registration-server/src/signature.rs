//! Embedded-image handling for signature fields.
//!
//! Signatures travel as `data:<media type>;base64,<payload>` strings. Stored
//! signatures are always labeled `image/png` so the exporter can treat every
//! one the same way.

use crate::error::ServerError;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Every stored, non-empty signature starts with this.
pub const PNG_MARKER: &str = "data:image/png";

const DATA_SCHEME: &str = "data:";
const IMAGE_PREFIX: &str = "data:image/";
const RAW_PREFIX: &str = "data:image/png;base64,";

/// Normalize a submitted signature.
///
/// Empty stays empty. A bare base64 payload gets the PNG prefix. Any image
/// subtype is relabeled `png` without touching the pixel data. A `data:`
/// payload that is not an image is rejected.
pub fn normalize(signature: &str) -> Result<String, ServerError> {
    if signature.is_empty() {
        return Ok(String::new());
    }

    if !signature.starts_with(DATA_SCHEME) {
        return Ok(format!("{}{}", RAW_PREFIX, signature));
    }

    let Some(rest) = signature.strip_prefix(IMAGE_PREFIX) else {
        return Err(ServerError::InvalidSignature(format!(
            "expected an image, got {}",
            media_type(signature)
        )));
    };

    let subtype_len = rest.find([';', ',']).unwrap_or(rest.len());
    Ok(format!("{}{}", PNG_MARKER, &rest[subtype_len..]))
}

/// Decode the image bytes of a stored signature.
pub fn decode(signature: &str) -> Result<Vec<u8>, ServerError> {
    let (header, payload) = signature
        .split_once(',')
        .ok_or_else(|| ServerError::InvalidSignature("missing data separator".into()))?;

    if !header.starts_with(DATA_SCHEME) || !header.ends_with(";base64") {
        return Err(ServerError::InvalidSignature(format!(
            "unsupported encoding: {}",
            header
        )));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| ServerError::InvalidSignature(format!("bad base64 payload: {}", e)))
}

fn media_type(data_url: &str) -> &str {
    let rest = &data_url[DATA_SCHEME.len()..];
    let end = rest.find([';', ',']).unwrap_or(rest.len());
    match &rest[..end] {
        "" => "an untyped payload",
        media => media,
    }
}
