use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::cloudinary::CloudinaryClient;
use crate::clients::gemini::GeminiClient;
use crate::clients::huggingface::HuggingFaceClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, EmbeddingService, RetrievalService, SchemaGenerator, TemplateService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Formarr/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<AuthService>,

    pub generator: Arc<SchemaGenerator>,

    pub embeddings: EmbeddingService,

    pub retrieval: Arc<RetrievalService>,

    pub templates: Arc<TemplateService>,

    pub cloudinary: Option<Arc<CloudinaryClient>>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // One pooled HTTP client behind every outbound integration
        let http_client = build_shared_http_client(config.general.http_timeout_seconds)?;

        let gemini = GeminiClient::new(http_client.clone(), &config.gemini);
        let generator = Arc::new(SchemaGenerator::from_config(&gemini, &config.gemini));

        let huggingface = config
            .huggingface
            .is_configured()
            .then(|| HuggingFaceClient::new(http_client.clone(), &config.huggingface));
        if huggingface.is_none() {
            tracing::info!("Embeddings disabled (no HuggingFace API key configured)");
        }
        let embeddings = EmbeddingService::new(huggingface);

        let cloudinary = config
            .cloudinary
            .is_configured()
            .then(|| Arc::new(CloudinaryClient::new(http_client, &config.cloudinary)));
        if cloudinary.is_none() {
            tracing::info!("Image uploads disabled (Cloudinary not configured)");
        }

        let retrieval = Arc::new(RetrievalService::new(store.clone(), embeddings.clone()));
        let templates = Arc::new(TemplateService::new(store.clone()));
        let auth_service = Arc::new(AuthService::new(store.clone()));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            generator,
            embeddings,
            retrieval,
            templates,
            cloudinary,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
