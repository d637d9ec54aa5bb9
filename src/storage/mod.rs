pub mod gcs;
pub mod memory;
pub mod traits;

use crate::{auth::TokenProvider, config::Config, error::Result};
use std::sync::Arc;

pub use gcs::GcsBlobStore;
pub use memory::MemoryBlobStore;
pub use traits::BlobStore;

pub struct BlobStorageManager {
    backend: Arc<dyn BlobStore>,
}

impl BlobStorageManager {
    pub fn new(config: &Config, tokens: TokenProvider) -> Result<Self> {
        let backend: Arc<dyn BlobStore> = if config.use_memory_storage {
            log::warn!("⚠️  Using in-memory blob storage; uploads are not durable");
            Arc::new(MemoryBlobStore::new(config.storage.clone()))
        } else {
            Arc::new(GcsBlobStore::new(config.storage.clone(), tokens)?)
        };

        Ok(Self { backend })
    }

    pub fn storage(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        let tokens = TokenProvider::Static("t".into());

        let gcs = BlobStorageManager::new(&Config::new(), tokens.clone()).unwrap();
        assert_eq!(gcs.storage().backend_name(), "gcs");

        let memory = BlobStorageManager::new(&Config::new().with_memory_storage(), tokens).unwrap();
        assert_eq!(memory.storage().backend_name(), "memory");
    }
}
