//! Relevant-form retrieval for prompt context.
//!
//! Results are cached per (query, user) for the configured TTL. A cache hit
//! resolves the stored id list against the forms table; ids whose forms were
//! deleted in the meantime are silently dropped. On a miss the matching mode
//! is either keyword intersection or embedding similarity, never one falling
//! back to the other.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::db::Store;
use crate::entities::forms;
use crate::services::embeddings::{EmbeddingService, cosine_similarity};

/// Cache key for a retrieval query: SHA-256 hex of `"{query}-{user_id}"`.
/// Collision resistance is all that matters here; this is not a secret.
#[must_use]
pub fn query_hash(query: &str, user_id: i32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{query}-{user_id}").as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Clone)]
pub struct RetrievalService {
    store: Store,
    embeddings: EmbeddingService,
}

impl RetrievalService {
    #[must_use]
    pub const fn new(store: Store, embeddings: EmbeddingService) -> Self {
        Self { store, embeddings }
    }

    /// Find up to `limit` forms of `user_id` relevant to `query`, consulting
    /// the retrieval cache first and refreshing it on a miss.
    pub async fn retrieve(
        &self,
        user_id: i32,
        query: &str,
        keywords: &[String],
        use_embeddings: bool,
        limit: u64,
        ttl_seconds: i64,
    ) -> Result<Vec<forms::Model>> {
        let hash = query_hash(query, user_id);

        if let Some(ids) = self.store.get_cached_retrieval(&hash).await? {
            debug!(user_id, cached = ids.len(), "Retrieval cache hit");
            return self.resolve_ids(&ids).await;
        }

        let matched = if use_embeddings {
            self.match_by_embedding(user_id, query, limit).await?
        } else {
            self.store
                .find_forms_by_keywords(user_id, keywords, limit)
                .await?
        };

        let ids: Vec<i32> = matched.iter().map(|f| f.id).collect();
        self.store
            .put_cached_retrieval(&hash, user_id, &ids, ttl_seconds)
            .await?;

        debug!(user_id, matched = matched.len(), "Retrieval cache refreshed");
        Ok(matched)
    }

    /// Resolve cached ids in their stored order, dropping any that no longer exist
    async fn resolve_ids(&self, ids: &[i32]) -> Result<Vec<forms::Model>> {
        let rows = self.store.get_forms_by_ids(ids).await?;
        let mut by_id: HashMap<i32, forms::Model> =
            rows.into_iter().map(|f| (f.id, f)).collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Rank the user's embedded forms by cosine similarity to the query.
    /// Empty when the embedding backend is unconfigured or unreachable; the
    /// empty result still lands in the cache like any other.
    async fn match_by_embedding(
        &self,
        user_id: i32,
        query: &str,
        limit: u64,
    ) -> Result<Vec<forms::Model>> {
        let query_vec = match self.embeddings.embed_query(query).await {
            Ok(Some(v)) => v,
            Ok(None) => return Ok(vec![]),
            Err(e) => {
                warn!(error = %e, "Query embedding failed, returning no matches");
                return Ok(vec![]);
            }
        };

        let candidates = self.store.list_forms_with_embeddings(user_id).await?;

        let mut scored: Vec<(f32, forms::Model)> = Vec::with_capacity(candidates.len());
        for form in candidates {
            let Some(raw) = form.embedding.as_deref() else {
                continue;
            };
            let stored: Vec<f32> = serde_json::from_str(raw)
                .with_context(|| format!("Corrupt embedding column on form {}", form.id))?;

            scored.push((cosine_similarity(&query_vec, &stored), form));
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(_, form)| form)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_hash_shape() {
        let hash = query_hash("i need a signup form", 1);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_query_hash_scoped_per_user() {
        assert_ne!(
            query_hash("i need a signup form", 1),
            query_hash("i need a signup form", 2)
        );
    }

    #[test]
    fn test_query_hash_deterministic() {
        assert_eq!(
            query_hash("i need a signup form", 7),
            query_hash("i need a signup form", 7)
        );
    }
}
