use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::auth::AuthUser;
use super::types::FormDto;
use super::{ApiError, ApiResponse, AppState};
use crate::services::{TemplateSummary, templates};

/// GET /templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TemplateSummary>>>, ApiError> {
    let ttl = state.config().read().await.retrieval.cache_ttl_seconds;
    let list = state.templates().list(ttl).await?;
    Ok(Json(ApiResponse::success(list)))
}

/// POST /templates/{template_id}/use
/// Instantiate a catalog template as a new form owned by the caller
pub async fn use_template(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(template_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<FormDto>>), ApiError> {
    let Some(template) = templates::find(&template_id) else {
        return Err(ApiError::not_found("Template", template_id));
    };

    let generated = template.instantiate();

    let embedding = match state
        .embeddings()
        .embed_form(&generated.title, &generated.purpose, &generated.keywords)
        .await
    {
        Ok(vector) => vector,
        Err(e) => {
            warn!(error = %e, "Form embedding failed, storing without vector");
            None
        }
    };

    let model = state
        .store()
        .create_form(auth.id, &generated, embedding.as_deref())
        .await?;

    info!(
        user_id = auth.id,
        form_id = model.id,
        template = template.id,
        "Form created from template"
    );

    let dto = FormDto::from_model(&model, 0)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}
