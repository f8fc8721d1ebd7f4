use anyhow::Context;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::auth::AuthUser;
use super::types::{FormDto, GenerateFormRequest};
use super::{ApiError, ApiResponse, AppState, validation};
use crate::models::FormField;
use crate::prompt::{FormSummary, build_context_prompt, extract_keywords};

/// POST /forms/generate
///
/// The full pipeline: extract keywords from the prompt, retrieve the user's
/// relevant existing forms (cached per query), feed them as context to the
/// schema generator and persist the result under a fresh share token.
pub async fn generate_form(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<GenerateFormRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FormDto>>), ApiError> {
    let prompt = validation::validate_prompt(&payload.prompt)?;
    let retrieval_config = state.config().read().await.retrieval.clone();

    let keywords = extract_keywords(prompt);

    let matched = state
        .retrieval()
        .retrieve(
            auth.id,
            prompt,
            &keywords,
            payload.use_embeddings,
            retrieval_config.limit,
            retrieval_config.cache_ttl_seconds,
        )
        .await?;

    let context = build_context_prompt(&summarize(&matched)?);

    let mut generated = state.generator().generate(prompt, &context).await?;
    // The stored keywords are the ones extracted from the prompt, not
    // whatever the model chose to echo back
    generated.keywords = keywords;

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
        share_token = %model.share_token,
        "Form created"
    );

    let dto = FormDto::from_model(&model, 0)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

fn summarize(matched: &[crate::entities::forms::Model]) -> anyhow::Result<Vec<FormSummary>> {
    let mut summaries = Vec::with_capacity(matched.len());
    for form in matched {
        let fields: Vec<FormField> = serde_json::from_str(&form.fields)
            .with_context(|| format!("Corrupt fields column on form {}", form.id))?;

        summaries.push(FormSummary {
            title: form.title.clone(),
            purpose: form.purpose.clone(),
            field_names: fields.into_iter().map(|f| f.name).collect(),
        });
    }
    Ok(summaries)
}

/// GET /forms
pub async fn list_forms(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<FormDto>>>, ApiError> {
    let models = state.store().list_forms_for_user(auth.id).await?;

    let mut results = Vec::with_capacity(models.len());
    for model in models {
        let count = state.store().count_submissions_for_form(model.id).await?;
        results.push(FormDto::from_model(&model, count)?);
    }

    Ok(Json(ApiResponse::success(results)))
}

/// GET /forms/{id}
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FormDto>>, ApiError> {
    validation::validate_form_id(id)?;

    let model = state
        .store()
        .get_form_for_user(id, auth.id)
        .await?
        .ok_or_else(ApiError::form_not_found)?;

    let count = state.store().count_submissions_for_form(id).await?;
    Ok(Json(ApiResponse::success(FormDto::from_model(
        &model, count,
    )?)))
}

/// DELETE /forms/{id}
/// Removes the form and every submission made against it
pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_form_id(id)?;

    if state.store().get_form_for_user(id, auth.id).await?.is_none() {
        return Err(ApiError::form_not_found());
    }

    let removed = state.store().delete_form_cascade(id).await?;
    info!(
        user_id = auth.id,
        form_id = id,
        submissions_removed = removed,
        "Form deleted"
    );

    Ok(Json(ApiResponse::success(())))
}
