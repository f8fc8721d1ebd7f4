use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed upload client for the Cloudinary HTTP API.
#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
}

impl CloudinaryClient {
    #[must_use]
    pub fn new(client: Client, config: &CloudinaryConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: (!config.folder.is_empty()).then(|| config.folder.clone()),
        }
    }

    /// Upload image bytes and return the hosted `secure_url`
    pub async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        let timestamp = chrono::Utc::now().timestamp();

        let mut params: Vec<(String, String)> = vec![
            ("signature_algorithm".to_string(), "sha256".to_string()),
            ("timestamp".to_string(), timestamp.to_string()),
        ];
        if let Some(folder) = &self.folder {
            params.push(("folder".to_string(), folder.clone()));
        }

        let signature = sign_params(&mut params, &self.api_secret);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        let url = format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Cloudinary request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Cloudinary API error: {} - {}",
                status,
                body
            ));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .context("Failed to parse Cloudinary response")?;

        Ok(parsed.secure_url)
    }
}

/// Sign upload parameters: sort by name, join as `k=v` pairs with `&`, append
/// the api secret, SHA-256, hex encode. The `file`, `api_key` and `signature`
/// fields are never part of the signed string.
fn sign_params(params: &mut Vec<(String, String)>, api_secret: &str) -> String {
    params.sort();

    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_params_sorts_by_name() {
        let mut a = vec![
            ("timestamp".to_string(), "1000".to_string()),
            ("folder".to_string(), "forms".to_string()),
        ];
        let mut b = vec![
            ("folder".to_string(), "forms".to_string()),
            ("timestamp".to_string(), "1000".to_string()),
        ];

        assert_eq!(sign_params(&mut a, "secret"), sign_params(&mut b, "secret"));
    }

    #[test]
    fn test_sign_params_hex_shape() {
        let mut params = vec![("timestamp".to_string(), "1000".to_string())];
        let signature = sign_params(&mut params, "secret");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_params_depends_on_secret() {
        let mut a = vec![("timestamp".to_string(), "1000".to_string())];
        let mut b = a.clone();
        assert_ne!(sign_params(&mut a, "secret"), sign_params(&mut b, "other"));
    }
}
