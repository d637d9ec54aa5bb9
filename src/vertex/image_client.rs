use crate::{
    auth::TokenProvider,
    config::VertexConfig,
    error::{PipelineError, Result},
    models::{
        vertex::{GenerateContentRequest, GenerateContentResponse},
        ContentPart, GenerationResponse,
    },
    vertex::ImageGenerator,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct VertexImageClient {
    client: Client,
    config: VertexConfig,
    tokens: TokenProvider,
    endpoint: String,
}

impl VertexImageClient {
    pub fn new(config: VertexConfig, tokens: TokenProvider) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::ConfigError(format!("HTTP client: {}", e)))?;
        let endpoint = config.endpoint();

        Ok(Self {
            client,
            config,
            tokens,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageGenerator for VertexImageClient {
    async fn generate(&self, parts: Vec<ContentPart>) -> Result<GenerationResponse> {
        let payload = GenerateContentRequest::new(
            &parts,
            &self.config.aspect_ratio,
            self.config.enable_search_grounding,
        );

        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| PipelineError::GenerationFailed(e.to_string()))?;

        log::info!(
            "Generating image with model: {} ({} parts)",
            self.config.model_id,
            parts.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PipelineError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Model call failed with status {}", status);
            return Err(PipelineError::GenerationFailed(format!(
                "{} returned {}: {}",
                self.config.model_id, status, error_text
            )));
        }

        let wire: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::GenerationFailed(format!("Malformed response: {}", e)))?;

        log::debug!("Model returned {} candidate(s)", wire.candidates.len());

        GenerationResponse::try_from(wire)
    }

    fn model_name(&self) -> &str {
        &self.config.model_id
    }
}
