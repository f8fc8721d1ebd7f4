use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub gemini: GeminiConfig,

    pub huggingface: HuggingFaceConfig,

    pub cloudinary: CloudinaryConfig,

    pub retrieval: RetrievalConfig,

    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Timeout for outbound HTTP calls in seconds (default: 30).
    /// This is the only bound on a hung upstream.
    pub http_timeout_seconds: u64,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/formarr.db".to_string(),
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
            http_timeout_seconds: 30,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 6790,
            cors_allowed_origins: vec![
                "http://localhost:6790".to_string(),
                "http://127.0.0.1:6790".to_string(),
            ],
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// Minimum accepted password length on signup
    pub min_password_length: usize,

    /// Session inactivity expiry in minutes
    pub session_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            min_password_length: 8,
            session_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,

    pub base_url: String,

    /// Candidate model ids, tried in order until one yields a usable schema
    pub models: Vec<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            models: vec![
                "gemini-2.0-flash".to_string(),
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-pro".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    /// Empty key disables the embedding feature entirely
    pub api_key: String,

    pub base_url: String,

    pub model: String,
}

impl HuggingFaceConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,

    pub api_key: String,

    pub api_secret: String,

    pub base_url: String,

    /// Remote folder uploads are filed under
    pub folder: String,
}

impl CloudinaryConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            base_url: "https://api.cloudinary.com".to_string(),
            folder: "formarr".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// How long a cached retrieval result stays valid (default: 1 hour)
    pub cache_ttl_seconds: i64,

    /// Maximum number of past forms fed into the generation prompt
    pub limit: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 3600,
            limit: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,

    /// Minutes between cache cleanup runs when no cron expression is set
    pub cleanup_interval_minutes: u32,

    /// Optional cron expression overriding the interval
    pub cron_expression: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cleanup_interval_minutes: 60,
            cron_expression: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "formarr".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            gemini: GeminiConfig::default(),
            huggingface: HuggingFaceConfig::default(),
            cloudinary: CloudinaryConfig::default(),
            retrieval: RetrievalConfig::default(),
            scheduler: SchedulerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        if let Ok(env_path) = std::env::var("FORMARR_CONFIG") {
            paths.push(PathBuf::from(env_path));
        }

        paths.push(PathBuf::from("formarr.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("formarr").join("formarr.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".formarr").join("formarr.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("formarr.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.enabled && self.server.port == 0 {
            anyhow::bail!("Server port must be set when the server is enabled");
        }

        if self.scheduler.enabled
            && self.scheduler.cleanup_interval_minutes == 0
            && self.scheduler.cron_expression.is_none()
        {
            anyhow::bail!("Cleanup interval must be > 0 or a cron expression must be set");
        }

        if self.retrieval.limit == 0 {
            anyhow::bail!("Retrieval limit must be at least 1");
        }

        if self.retrieval.cache_ttl_seconds <= 0 {
            anyhow::bail!("Retrieval cache TTL must be positive");
        }

        if self.gemini.models.is_empty() {
            anyhow::bail!("At least one Gemini model must be configured");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.retrieval.cache_ttl_seconds, 3600);
        assert_eq!(config.retrieval.limit, 5);
        assert_eq!(config.scheduler.cleanup_interval_minutes, 60);
        assert_eq!(config.gemini.models.len(), 3);
        assert_eq!(config.gemini.models[0], "gemini-2.0-flash");
        assert!(!config.huggingface.is_configured());
        assert!(!config.cloudinary.is_configured());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[gemini]"));
        assert!(toml_str.contains("[retrieval]"));
        assert!(toml_str.contains("[scheduler]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [retrieval]
            cache_ttl_seconds = 120

            [gemini]
            models = ["gemini-2.0-flash"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.retrieval.cache_ttl_seconds, 120);
        assert_eq!(config.gemini.models, vec!["gemini-2.0-flash"]);

        assert_eq!(config.server.port, 6790);
        assert_eq!(config.auth.min_password_length, 8);
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = Config::default();
        config.retrieval.limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_model_list() {
        let mut config = Config::default();
        config.gemini.models.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huggingface_configured_by_key() {
        let mut config = Config::default();
        assert!(!config.huggingface.is_configured());
        config.huggingface.api_key = "hf_test".to_string();
        assert!(config.huggingface.is_configured());
    }
}
