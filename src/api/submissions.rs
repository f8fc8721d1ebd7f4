use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::info;

use super::auth::AuthUser;
use super::types::{SubmissionDto, SubmissionListDto};
use super::{ApiError, ApiResponse, AppState, validation};

/// GET /forms/{id}/submissions
/// Submissions for one of the caller's forms, newest first
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(form_id): Path<i32>,
) -> Result<Json<ApiResponse<SubmissionListDto>>, ApiError> {
    validation::validate_form_id(form_id)?;

    let form = state
        .store()
        .get_form_for_user(form_id, auth.id)
        .await?
        .ok_or_else(ApiError::form_not_found)?;

    let models = state.store().list_submissions(form_id).await?;

    let mut submissions = Vec::with_capacity(models.len());
    for model in &models {
        submissions.push(SubmissionDto::from_model(model)?);
    }

    Ok(Json(ApiResponse::success(SubmissionListDto {
        form_id: form.id,
        form_title: form.title,
        submissions,
    })))
}

/// DELETE /forms/{id}/submissions/{submission_id}
pub async fn delete_submission(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((form_id, submission_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_form_id(form_id)?;

    if state
        .store()
        .get_form_for_user(form_id, auth.id)
        .await?
        .is_none()
    {
        return Err(ApiError::form_not_found());
    }

    // Scoped delete so a submission id from another form cannot match
    let deleted = state
        .store()
        .delete_submission_scoped(submission_id, form_id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Submission", submission_id));
    }

    info!(
        user_id = auth.id,
        form_id, submission_id, "Submission deleted"
    );

    Ok(Json(ApiResponse::success(())))
}
