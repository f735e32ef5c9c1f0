//! Reading and validating uploaded images from multipart bodies.

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::settings::Settings;

/// Multipart field that carries the image
pub const IMAGE_FIELD: &str = "file";

async fn drain(field: &mut Field) -> ApiResult<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| ApiError::BadRequest(e.to_string()))?;
    }
    Ok(())
}

fn too_large(settings: &Settings) -> ApiError {
    ApiError::BadRequest(format!(
        "Image too large. Max: {:.1}MB",
        settings.max_image_size as f64 / 1024.0 / 1024.0
    ))
}

/// Raw bytes of the `file` field.
///
/// The content type must be one of the allowed image types and the body
/// must not exceed the configured size. Decoding is left to the caller.
pub async fn read_image(mut payload: Multipart, settings: &Settings) -> ApiResult<Vec<u8>> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if field.name() != Some(IMAGE_FIELD) {
            drain(&mut field).await?;
            continue;
        }

        let content_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        if !settings.is_allowed_image_type(&content_type) {
            return Err(ApiError::BadRequest(format!(
                "Unsupported image type: {}",
                content_type
            )));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ApiError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > settings.max_image_size {
                return Err(too_large(settings));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded image is empty".to_string()));
        }
        debug!("Received {} byte {} upload", bytes.len(), content_type);
        return Ok(bytes);
    }

    Err(ApiError::BadRequest(format!(
        "Missing '{}' field",
        IMAGE_FIELD
    )))
}
