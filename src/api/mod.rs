use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
mod forms;
mod observability;
mod public;
mod submissions;
mod system;
mod templates;
mod types;
mod uploads;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn generator(&self) -> &Arc<crate::services::SchemaGenerator> {
        &self.shared.generator
    }

    #[must_use]
    pub fn embeddings(&self) -> &crate::services::EmbeddingService {
        &self.shared.embeddings
    }

    #[must_use]
    pub fn retrieval(&self) -> &Arc<crate::services::RetrievalService> {
        &self.shared.retrieval
    }

    #[must_use]
    pub fn templates(&self) -> &Arc<crate::services::TemplateService> {
        &self.shared.templates
    }

    #[must_use]
    pub fn cloudinary(&self) -> &Option<Arc<crate::clients::cloudinary::CloudinaryClient>> {
        &self.shared.cloudinary
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.auth.session_minutes,
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/public/forms/{share_token}", get(public::get_public_form))
        .route(
            "/public/forms/{share_token}/submit",
            post(public::submit_form),
        )
        .route("/uploads", post(uploads::upload_image))
        .layer(session_layer)
        .with_state(state.clone());

    let root_routes = Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .merge(root_routes)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route("/forms/generate", post(forms::generate_form))
        .route("/forms", get(forms::list_forms))
        .route("/forms/{id}", get(forms::get_form))
        .route("/forms/{id}", delete(forms::delete_form))
        .route("/forms/{id}/submissions", get(submissions::list_submissions))
        .route(
            "/forms/{id}/submissions/{submission_id}",
            delete(submissions::delete_submission),
        )
        .route("/templates", get(templates::list_templates))
        .route("/templates/{template_id}/use", post(templates::use_template))
        .route("/system/status", get(system::get_status))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
