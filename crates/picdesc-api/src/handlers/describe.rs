//! Image description handler.
//!
//! `POST /api/describe` accepts a `multipart/form-data` upload with one image
//! field, forwards the bytes to the vendor annotation API, and templates the
//! structured response into prose. The templater itself cannot fail; every
//! error this handler returns happens before description generation.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{info, warn};

use picdesc_caption::generate_description;
use picdesc_models::DescribeImageResponse;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Preferred multipart field name; any `image/*` field is accepted as a
/// fallback for sloppy clients.
const IMAGE_FIELD: &str = "image";

/// Generate a description for an uploaded image.
pub async fn describe_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<DescribeImageResponse>> {
    let image_bytes = read_image_field(&mut multipart).await?;

    if image_bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded image is empty"));
    }
    if image_bytes.len() > state.config.max_image_bytes {
        return Err(ApiError::bad_request(format!(
            "Image exceeds the {} byte limit",
            state.config.max_image_bytes
        )));
    }

    let start = Instant::now();
    let annotations = match state.vision.annotate(&image_bytes).await {
        Ok(annotations) => {
            metrics::record_vision_request("ok", start.elapsed().as_secs_f64());
            annotations
        }
        Err(e) => {
            metrics::record_vision_request("error", start.elapsed().as_secs_f64());
            warn!("Annotation request failed: {}", e);
            return Err(e.into());
        }
    };

    let description = generate_description(&annotations);
    metrics::record_description_generated();

    info!(
        bytes = image_bytes.len(),
        labels = annotations.labels.len(),
        objects = annotations.objects.len(),
        faces = annotations.faces.len(),
        "Generated image description"
    );

    Ok(Json(DescribeImageResponse::new(description, &annotations)))
}

/// Pull the image bytes out of the multipart payload.
///
/// The `image` field wins; otherwise the first field with an `image/*`
/// content type is used. A matching field with a non-image content type is a
/// client error, not a skip.
async fn read_image_field(multipart: &mut Multipart) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        if name != IMAGE_FIELD && !content_type.starts_with("image/") {
            continue;
        }
        if !content_type.starts_with("image/") {
            return Err(ApiError::bad_request(format!(
                "Field '{IMAGE_FIELD}' must be an image, got '{content_type}'"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read image field: {e}")))?;
        return Ok(bytes.to_vec());
    }

    Err(ApiError::bad_request(
        "Missing image field in multipart payload",
    ))
}
