use crate::{
    auth::TokenProvider,
    config::StorageConfig,
    error::{PipelineError, Result},
    storage::traits::BlobStore,
};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;

pub struct GcsBlobStore {
    client: Client,
    config: StorageConfig,
    tokens: TokenProvider,
}

impl GcsBlobStore {
    pub fn new(config: StorageConfig, tokens: TokenProvider) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/b/{}/o",
            self.config.upload_base_url.trim_end_matches('/'),
            self.config.bucket
        )
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| PipelineError::StorageFailed(e.to_string()))?;
        let size = data.len();

        let response = self
            .client
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", key)])
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| PipelineError::StorageFailed(format!("GCS request failed: {}", e)))?;

        if response.status().is_success() {
            log::info!(
                "📦 Uploaded gs://{}/{} ({} bytes)",
                self.config.bucket,
                key,
                size
            );
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(PipelineError::StorageFailed(format!(
                "GCS upload returned {}: {}",
                status, error_text
            )))
        }
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }

    fn backend_name(&self) -> &'static str {
        "gcs"
    }
}
