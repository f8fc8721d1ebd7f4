//! Form schema generation.
//!
//! Candidate backends share one `generate(prompt) -> text` contract and are
//! tried in configuration order; the first response containing a parseable
//! schema wins. There is no per-candidate retry.

use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::clients::gemini::GeminiClient;
use crate::config::GeminiConfig;
use crate::models::GeneratedForm;
use crate::prompt::{build_generation_prompt, extract_json_object};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("All generation backends failed. Last error: {0}")]
    AllBackendsFailed(String),

    #[error("No generation backends configured")]
    NoBackends,
}

/// Anything that can turn an instruction prompt into response text.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// One Gemini model id behind the backend contract
pub struct GeminiModelBackend {
    client: GeminiClient,
    model: String,
}

impl GeminiModelBackend {
    #[must_use]
    pub const fn new(client: GeminiClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl GenerationBackend for GeminiModelBackend {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.client.generate(&self.model, prompt).await
    }
}

#[derive(Clone)]
pub struct SchemaGenerator {
    backends: Vec<Arc<dyn GenerationBackend>>,
}

impl SchemaGenerator {
    #[must_use]
    pub fn new(backends: Vec<Arc<dyn GenerationBackend>>) -> Self {
        Self { backends }
    }

    /// One candidate per configured model id, in configuration order
    #[must_use]
    pub fn from_config(client: &GeminiClient, config: &GeminiConfig) -> Self {
        let backends = config
            .models
            .iter()
            .map(|model| {
                Arc::new(GeminiModelBackend::new(client.clone(), model.clone()))
                    as Arc<dyn GenerationBackend>
            })
            .collect();

        Self::new(backends)
    }

    /// Generate a schema for a user request, with optional context describing
    /// previously created forms.
    pub async fn generate(
        &self,
        request: &str,
        context: &str,
    ) -> Result<GeneratedForm, GenerationError> {
        if self.backends.is_empty() {
            return Err(GenerationError::NoBackends);
        }

        let prompt = build_generation_prompt(request, context);
        let mut last_error = String::new();

        for backend in &self.backends {
            match try_backend(backend.as_ref(), &prompt).await {
                Ok(form) => {
                    debug!(backend = backend.name(), "Form schema generated");
                    return Ok(form);
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "Generation backend failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(GenerationError::AllBackendsFailed(last_error))
    }
}

async fn try_backend(
    backend: &dyn GenerationBackend,
    prompt: &str,
) -> anyhow::Result<GeneratedForm> {
    let text = backend.generate(prompt).await?;

    let json = extract_json_object(&text)
        .ok_or_else(|| anyhow::anyhow!("Response contains no JSON object"))?;

    let form: GeneratedForm =
        serde_json::from_str(json).context("Response JSON does not match the expected schema")?;

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedBackend {
        name: &'static str,
        response: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl FixedBackend {
        fn ok(name: &'static str, response: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                response: Ok(response),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str, message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                response: Err(message),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Ok(text) => Ok(text.to_string()),
                Err(message) => Err(anyhow::anyhow!("{message}")),
            }
        }
    }

    const VALID: &str = r#"Sure! {"title": "T", "purpose": "P", "fields": []}"#;

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let first = FixedBackend::ok("one", VALID);
        let second = FixedBackend::ok("two", VALID);
        let generator = SchemaGenerator::new(vec![first.clone(), second.clone()]);

        let form = generator.generate("a survey", "").await.unwrap();
        assert_eq!(form.title, "T");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_to_next_candidate() {
        let first = FixedBackend::failing("one", "rate limited");
        let second = FixedBackend::ok("two", VALID);
        let generator = SchemaGenerator::new(vec![first.clone(), second.clone()]);

        let form = generator.generate("a survey", "").await.unwrap();
        assert_eq!(form.title, "T");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn test_all_failures_surface_last_error() {
        let first = FixedBackend::failing("one", "rate limited");
        let second = FixedBackend::failing("two", "model overloaded");
        let generator = SchemaGenerator::new(vec![first, second]);

        let err = generator.generate("a survey", "").await.unwrap_err();
        match err {
            GenerationError::AllBackendsFailed(message) => {
                assert!(message.contains("model overloaded"));
            }
            GenerationError::NoBackends => panic!("wrong variant"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_response_counts_as_failure() {
        let first = FixedBackend::ok("one", "no json here");
        let second = FixedBackend::ok("two", VALID);
        let generator = SchemaGenerator::new(vec![first.clone(), second.clone()]);

        let form = generator.generate("a survey", "").await.unwrap();
        assert_eq!(form.title, "T");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn test_schema_mismatch_counts_as_failure() {
        // JSON-shaped but missing required keys
        let first = FixedBackend::ok("one", r#"{"totally": "unrelated"}"#);
        let generator = SchemaGenerator::new(vec![first]);

        let err = generator.generate("a survey", "").await.unwrap_err();
        assert!(matches!(err, GenerationError::AllBackendsFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_backend_list() {
        let generator = SchemaGenerator::new(vec![]);
        let err = generator.generate("a survey", "").await.unwrap_err();
        assert!(matches!(err, GenerationError::NoBackends));
    }
}
