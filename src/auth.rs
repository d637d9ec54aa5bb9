use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{PipelineError, Result};

pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

#[derive(Clone)]
pub enum TokenProvider {
    Static(String),
    MetadataServer { client: Client, url: String },
}

impl TokenProvider {
    pub fn from_config(access_token: Option<String>, timeout_secs: u64) -> Result<Self> {
        match access_token {
            Some(token) => Ok(TokenProvider::Static(token)),
            None => Self::metadata_server(METADATA_TOKEN_URL, timeout_secs),
        }
    }

    pub fn metadata_server(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PipelineError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(TokenProvider::MetadataServer {
            client,
            url: url.into(),
        })
    }

    pub async fn token(&self) -> Result<String> {
        match self {
            TokenProvider::Static(token) => Ok(token.clone()),
            TokenProvider::MetadataServer { client, url } => {
                let response = client
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| {
                        PipelineError::ConfigError(format!("Metadata server unreachable: {}", e))
                    })?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(PipelineError::ConfigError(format!(
                        "Metadata server returned {}: {}",
                        status, body
                    )));
                }

                let token: MetadataToken = response.json().await.map_err(|e| {
                    PipelineError::ConfigError(format!("Malformed metadata token: {}", e))
                })?;
                Ok(token.access_token)
            }
        }
    }
}
