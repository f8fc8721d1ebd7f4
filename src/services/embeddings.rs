//! Optional vector embeddings for stored forms.
//!
//! Backed by the HuggingFace feature-extraction API. When no API key is
//! configured the whole feature is off: forms store no vector and
//! embedding-mode retrieval yields nothing.

use anyhow::Result;

use crate::clients::huggingface::HuggingFaceClient;

/// Text a form is embedded under
#[must_use]
pub fn embedding_text(title: &str, purpose: &str, keywords: &[String]) -> String {
    format!("{title} {purpose} {}", keywords.join(" "))
}

#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[derive(Clone)]
pub struct EmbeddingService {
    client: Option<HuggingFaceClient>,
}

impl EmbeddingService {
    #[must_use]
    pub const fn new(client: Option<HuggingFaceClient>) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Embed a form's searchable text. `None` when the backend is not configured.
    pub async fn embed_form(
        &self,
        title: &str,
        purpose: &str,
        keywords: &[String],
    ) -> Result<Option<Vec<f32>>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };

        let text = embedding_text(title, purpose, keywords);
        Ok(Some(client.embed(&text).await?))
    }

    /// Embed a free-form query. `None` when the backend is not configured.
    pub async fn embed_query(&self, text: &str) -> Result<Option<Vec<f32>>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };

        Ok(Some(client.embed(text).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text_layout() {
        let keywords = vec!["signup".to_string(), "newsletter".to_string()];
        assert_eq!(
            embedding_text("Signup", "Collect subscribers", &keywords),
            "Signup Collect subscribers signup newsletter"
        );
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.5_f32, 0.25, 0.8];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = [1.0_f32, 0.0];
        let b = [0.0_f32, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_mismatched_lengths() {
        let a = [1.0_f32, 2.0];
        let b = [1.0_f32, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = [0.0_f32, 0.0];
        let b = [1.0_f32, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_disabled_service_embeds_nothing() {
        let service = EmbeddingService::new(None);
        assert!(!service.is_enabled());
    }
}
