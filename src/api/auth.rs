use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::types::{ApiKeyDto, LoginRequest, SignupRequest, UserDto};
use super::{ApiError, ApiResponse, AppState, validation};

const SESSION_USER_KEY: &str = "user_id";

/// Authenticated identity the middleware attaches to every protected request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

impl From<crate::db::User> for AuthUser {
    fn from(user: crate::db::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login/signup)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    // Check session first (fastest path for web clients)
    if let Ok(Some(user_id)) = session.get::<i32>(SESSION_USER_KEY).await
        && let Ok(Some(user)) = state.store().get_user_by_id(user_id).await
    {
        tracing::Span::current().record("user_id", user.id);
        request.extensions_mut().insert(AuthUser::from(user));
        return Ok(next.run(request).await);
    }

    if let Some(key) = extract_api_key(&headers)
        && let Ok(Some(user)) = state.store().verify_api_key(&key).await
    {
        tracing::Span::current().record("user_id", user.id);
        request.extensions_mut().insert(AuthUser::from(user));
        return Ok(next.run(request).await);
    }

    let response = (StatusCode::UNAUTHORIZED, "Unauthorized");
    Ok(response.into_response())
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    // Check X-Api-Key header
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    // Check Authorization: Bearer header
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/signup
/// Register a new account and start a session
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let email = validation::validate_email(&payload.email)?;
    let auth_config = state.config().read().await.auth.clone();

    let user = state
        .auth_service()
        .signup(&email, &payload.password, &auth_config)
        .await?;

    if let Err(e) = session.insert(SESSION_USER_KEY, user.id).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

/// POST /auth/login
/// Authenticate with email and password, returns the account and API key
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    if let Err(e) = session.insert(SESSION_USER_KEY, user.id).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
/// Current account details
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    axum::Extension(auth): axum::Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.auth_service().get_user(auth.id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// POST /auth/api-key/regenerate
/// Mint a new API key, invalidating the previous one
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    axum::Extension(auth): axum::Extension<AuthUser>,
) -> Result<Json<ApiResponse<ApiKeyDto>>, ApiError> {
    let api_key = state.auth_service().regenerate_api_key(auth.id).await?;

    tracing::info!(user_id = auth.id, "API key regenerated");

    Ok(Json(ApiResponse::success(ApiKeyDto { api_key })))
}
