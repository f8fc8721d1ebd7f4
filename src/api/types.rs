use serde::{Deserialize, Serialize};

use crate::entities::{forms, submissions};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ===== Auth =====

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub api_key: String,
    pub created_at: String,
}

impl From<crate::db::User> for UserDto {
    fn from(user: crate::db::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            api_key: user.api_key,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiKeyDto {
    pub api_key: String,
}

// ===== Forms =====

#[derive(Debug, Deserialize)]
pub struct GenerateFormRequest {
    pub prompt: String,
    /// Not consulted during generation; templates are instantiated through
    /// their own endpoints
    #[serde(default)]
    pub use_templates: bool,
    #[serde(default)]
    pub use_embeddings: bool,
}

#[derive(Debug, Serialize)]
pub struct FormDto {
    pub id: i32,
    pub title: String,
    pub purpose: String,
    pub keywords: Vec<String>,
    pub fields: serde_json::Value,
    pub share_token: String,
    /// Relative path anonymous users reach the form under
    pub share_path: String,
    pub submission_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl FormDto {
    pub fn from_model(model: &forms::Model, submission_count: u64) -> anyhow::Result<Self> {
        use anyhow::Context;

        Ok(Self {
            id: model.id,
            title: model.title.clone(),
            purpose: model.purpose.clone(),
            keywords: serde_json::from_str(&model.keywords)
                .with_context(|| format!("Corrupt keywords column on form {}", model.id))?,
            fields: serde_json::from_str(&model.fields)
                .with_context(|| format!("Corrupt fields column on form {}", model.id))?,
            share_token: model.share_token.clone(),
            share_path: format!("/form/{}", model.share_token),
            submission_count,
            created_at: model.created_at.clone(),
            updated_at: model.updated_at.clone(),
        })
    }
}

/// What anonymous visitors see: the schema, nothing about the owner
#[derive(Debug, Serialize)]
pub struct PublicFormDto {
    pub title: String,
    pub purpose: String,
    pub fields: serde_json::Value,
    pub share_token: String,
}

impl PublicFormDto {
    pub fn from_model(model: &forms::Model) -> anyhow::Result<Self> {
        use anyhow::Context;

        Ok(Self {
            title: model.title.clone(),
            purpose: model.purpose.clone(),
            fields: serde_json::from_str(&model.fields)
                .with_context(|| format!("Corrupt fields column on form {}", model.id))?,
            share_token: model.share_token.clone(),
        })
    }
}

// ===== Submissions =====

#[derive(Debug, Deserialize)]
pub struct SubmitFormRequest {
    pub responses: serde_json::Value,
    #[serde(default)]
    pub image_urls: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionAcceptedDto {
    pub submission_id: i32,
}

#[derive(Debug, Serialize)]
pub struct SubmissionDto {
    pub id: i32,
    pub responses: serde_json::Value,
    pub image_urls: serde_json::Value,
    pub submitted_at: String,
}

impl SubmissionDto {
    pub fn from_model(model: &submissions::Model) -> anyhow::Result<Self> {
        use anyhow::Context;

        Ok(Self {
            id: model.id,
            responses: serde_json::from_str(&model.responses)
                .with_context(|| format!("Corrupt responses column on submission {}", model.id))?,
            image_urls: serde_json::from_str(&model.image_urls)
                .with_context(|| format!("Corrupt image_urls column on submission {}", model.id))?,
            submitted_at: model.submitted_at.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionListDto {
    pub form_id: i32,
    pub form_title: String,
    pub submissions: Vec<SubmissionDto>,
}

// ===== Uploads =====

#[derive(Debug, Serialize)]
pub struct UploadDto {
    pub url: String,
}

// ===== System =====

#[derive(Debug, Serialize)]
pub struct SystemStatusDto {
    pub version: String,
    pub uptime_seconds: u64,
    pub users: u64,
    pub forms: u64,
    pub submissions: u64,
    pub database: String,
}
