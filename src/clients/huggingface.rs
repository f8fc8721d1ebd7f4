use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::HuggingFaceConfig;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    inputs: &'a str,
    options: EmbeddingOptions,
}

#[derive(Serialize)]
struct EmbeddingOptions {
    wait_for_model: bool,
}

/// The inference API returns either a flat vector or a batch of rows
/// depending on how the model pipeline is wired.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Flat(Vec<f32>),
    Rows(Vec<Vec<f32>>),
}

#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HuggingFaceClient {
    #[must_use]
    pub fn new(client: Client, config: &HuggingFaceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Compute a sentence embedding for `text`
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                inputs: text,
                options: EmbeddingOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await
            .context("HuggingFace request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "HuggingFace API error: {} - {}",
                status,
                body
            ));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse HuggingFace response")?;

        let vector = match parsed {
            EmbeddingResponse::Flat(v) => v,
            EmbeddingResponse::Rows(rows) => rows.into_iter().next().unwrap_or_default(),
        };

        if vector.is_empty() {
            return Err(anyhow::anyhow!("HuggingFace returned an empty embedding"));
        }

        Ok(vector)
    }
}
