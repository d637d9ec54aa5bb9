pub mod auth;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod vertex;

#[cfg(test)]
mod test_support;

pub use auth::TokenProvider;
pub use config::{Config, StorageConfig, VertexConfig};
pub use error::{PipelineError, Result};
pub use models::{
    Candidate, ContentPart, GenerateResponse, GenerationOutcome, GenerationRequest,
    GenerationResponse, ImageAttachment, ResponsePart, StoredArtifact,
};
pub use pipeline::Pipeline;
pub use storage::{BlobStorageManager, BlobStore, GcsBlobStore, MemoryBlobStore};
pub use vertex::{ImageGenerator, VertexImageClient};
