use crate::{error::Result, models::StoredArtifact, storage::BlobStore};
use std::sync::Arc;
use uuid::Uuid;

pub const KEY_SUFFIX: &str = ".png";

pub fn generate_key() -> String {
    format!("{}{}", Uuid::new_v4(), KEY_SUFFIX)
}

#[derive(Clone)]
pub struct BlobUploader {
    store: Arc<dyn BlobStore>,
}

impl BlobUploader {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub async fn store(&self, data: Vec<u8>, content_type: &str) -> Result<StoredArtifact> {
        let key = generate_key();
        let size_bytes = data.len();

        self.store.put(&key, data, content_type).await?;

        Ok(StoredArtifact {
            public_url: self.store.public_url(&key),
            key,
            content_type: content_type.to_string(),
            size_bytes,
        })
    }
}
