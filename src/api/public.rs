use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;

use super::types::{PublicFormDto, SubmissionAcceptedDto, SubmitFormRequest};
use super::{ApiError, ApiResponse, AppState, validation};

/// GET /public/forms/{share_token}
///
/// Anonymous view of a shared form. Owner identity and internal ids stay
/// hidden; the token itself is the only handle.
pub async fn get_public_form(
    State(state): State<Arc<AppState>>,
    Path(share_token): Path<String>,
) -> Result<Json<ApiResponse<PublicFormDto>>, ApiError> {
    let model = state
        .store()
        .get_form_by_share_token(&share_token)
        .await?
        .ok_or_else(ApiError::form_not_found)?;

    Ok(Json(ApiResponse::success(PublicFormDto::from_model(
        &model,
    )?)))
}

/// POST /public/forms/{share_token}/submit
///
/// Anonymous submission against a shared form. Responses are stored as
/// given; no per-field validation happens server side.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(share_token): Path<String>,
    Json(payload): Json<SubmitFormRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionAcceptedDto>>), ApiError> {
    let SubmitFormRequest {
        responses,
        image_urls,
    } = payload;

    validation::validate_responses(&responses)?;
    let image_urls = validation::validate_image_urls(image_urls)?;

    let form = state
        .store()
        .get_form_by_share_token(&share_token)
        .await?
        .ok_or_else(ApiError::form_not_found)?;

    let model = state
        .store()
        .add_submission(form.id, &responses, &image_urls)
        .await?;

    info!(
        form_id = form.id,
        submission_id = model.id,
        "Submission recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SubmissionAcceptedDto {
            submission_id: model.id,
        })),
    ))
}
