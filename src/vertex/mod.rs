pub mod image_client;

use crate::{
    error::Result,
    models::{ContentPart, GenerationResponse},
};
use async_trait::async_trait;

pub use image_client::VertexImageClient;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, parts: Vec<ContentPart>) -> Result<GenerationResponse>;

    fn model_name(&self) -> &str;
}
