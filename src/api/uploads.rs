use axum::{Json, extract::Multipart, extract::State};
use std::sync::Arc;
use tracing::info;

use super::types::UploadDto;
use super::{ApiError, ApiResponse, AppState};

/// POST /uploads
///
/// Accepts a single multipart `file` field and stores it with the configured
/// image host. Open to anonymous callers so shared forms can attach images
/// before submitting.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadDto>>, ApiError> {
    let Some(cloudinary) = state.cloudinary() else {
        return Err(ApiError::validation(
            "Image uploads are disabled (Cloudinary not configured)",
        ));
    };

    let mut file: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read file: {e}")))?;
            file = Some((data.to_vec(), filename));
            break;
        }
    }

    let Some((data, filename)) = file else {
        return Err(ApiError::validation("No file provided"));
    };
    if data.is_empty() {
        return Err(ApiError::validation("No file provided"));
    }

    let size = data.len();
    let url = cloudinary
        .upload_image(data, &filename)
        .await
        .map_err(|e| ApiError::cloudinary_error(e.to_string()))?;

    info!(filename = %filename, size, "Image uploaded");

    Ok(Json(ApiResponse::success(UploadDto { url })))
}
